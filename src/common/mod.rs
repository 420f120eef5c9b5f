//! Definition of structures and functions,
//! which are used by both [`real`][crate::real::World] and [`local`][crate::local] communicators.

pub mod error;
pub mod mailbox;
pub mod message;

#[cfg(test)]
mod tests;

/// Identity of one process inside of the process group, in `0..size`.
pub type Rank = u32;

/// Represents message tag.
///
/// Receive operations match on the source rank and the tag,
/// see [`Communicator::recv`][crate::Communicator::recv].
pub type Tag = u64;

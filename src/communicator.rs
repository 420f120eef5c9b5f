//! Definition of trait [`Communicator`].

use crate::common::{
    error::{TransportError, TransportResult},
    message::Message,
    Rank, Tag,
};

/// Represents blocking point-to-point message passing between the ranks of one process group.
///
/// Both operations block the calling thread:
/// - [`send`][Communicator::send] returns once the transport accepted the message,
///   which does not mean the receiver already consumed it;
/// - [`recv`][Communicator::recv] suspends until a message from the requested source
///   with the requested tag arrives. There is no timeout and no cancellation,
///   so a receive without a counterpart send never returns.
///
/// Messages which arrived before a matching receive are kept in arrival order.
pub trait Communicator {
    /// Rank of the calling process.
    fn rank(&self) -> Rank;

    /// Number of processes in the group.
    fn size(&self) -> u32;

    /// Send message to the process with rank `dest`.
    fn send(&mut self, msg: &Message, dest: Rank, tag: Tag) -> TransportResult<()>;

    /// Receive message from the process with rank `source`.
    fn recv(&mut self, source: Rank, tag: Tag) -> TransportResult<Message>;

    /// Checks that `rank` names some other process of the group.
    fn check_peer(&self, rank: Rank) -> TransportResult<()> {
        if rank >= self.size() || rank == self.rank() {
            Err(TransportError::InvalidRank {
                rank,
                size: self.size(),
            })
        } else {
            Ok(())
        }
    }
}

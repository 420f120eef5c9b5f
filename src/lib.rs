//! Library for passing a counter back and forth between two processes
//! over blocking point-to-point message passing.
//!
//! The [`Alternator`] plays the ping-pong on top of any [`Communicator`]:
//! - [`World`] connects separate OS processes over gRPC,
//!   they are started by the [`Launcher`];
//! - [`local::group`] connects threads of one process.

// Add warnings for missing public documentation.
#![warn(missing_docs)]

pub mod alternator;

pub mod common;

mod communicator;

pub mod launch;

pub mod local;

pub mod real;

pub use alternator::{Alternator, AlternatorConfig, Exchange, Finished, Role, ROUND_LIMIT};
pub use common::{
    error::{AlternatorError, ConfigError, LaunchError, MessageError, TransportError},
    message::{Message, PingPongCount, Tipped},
    Rank, Tag,
};
pub use communicator::Communicator;
pub use launch::Launcher;
pub use real::{World, WorldConfig};

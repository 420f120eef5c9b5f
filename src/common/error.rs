//! Error types shared by communicators and the alternator.

use thiserror::Error;

use super::Rank;

/// Errors which appear when creating or decoding a [`Message`][super::message::Message].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageError {
    /// Payload could not be serialized.
    #[error("can not create message: {0}")]
    Encode(String),
    /// Payload could not be deserialized into the requested type.
    #[error("can not extract message data: {0}")]
    Decode(String),
    /// Message tip differs from the one the receiver expects.
    #[error("unexpected message tip: expected '{expected}', got '{got}'")]
    UnexpectedTip {
        /// Tip the receiver asked for.
        expected: String,
        /// Tip the message carries.
        got: String,
    },
}

/// Errors of [send][crate::Communicator::send] and [recv][crate::Communicator::recv] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// Rank is outside of the group or addresses the calling process itself.
    #[error("invalid rank {rank} for group of size {size}")]
    InvalidRank {
        /// Requested rank.
        rank: Rank,
        /// Size of the group.
        size: u32,
    },
    /// Peer listener did not come up within the connect window.
    #[error("can not connect to process {rank} at {address}: {info}")]
    Unreachable {
        /// Rank of the peer.
        rank: Rank,
        /// Address the peer was expected to listen on.
        address: String,
        /// Last connection error.
        info: String,
    },
    /// Peer received the envelope, but refused to queue it.
    #[error("process {rank} rejected transmission: {info}")]
    Rejected {
        /// Rank of the peer.
        rank: Rank,
        /// Status returned by the peer.
        info: String,
    },
    /// Local listener is gone, nothing can be received anymore.
    #[error("mailbox of process {0} is closed")]
    Closed(Rank),
    /// Communication environment could not be set up.
    #[error("can not initialize communication: {0}")]
    Init(String),
}

/// Represents result of communicator operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors which appear when reading the [world configuration][crate::real::WorldConfig].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("environment variable {0} is not set, launch the program with pingpong-launch")]
    Missing(&'static str),
    /// Environment variable is set to something unparsable.
    #[error("bad value '{value}' of {var}")]
    Invalid {
        /// Name of the variable.
        var: &'static str,
        /// Its value.
        value: String,
    },
    /// Hostfile could not be read or parsed.
    #[error("bad hostfile '{path}': {info}")]
    Hostfile {
        /// Path to the hostfile.
        path: String,
        /// What went wrong.
        info: String,
    },
    /// Rank does not belong to the group.
    #[error("rank {rank} is out of group of size {size}")]
    RankOutOfRange {
        /// Rank of the process.
        rank: Rank,
        /// Size of the group.
        size: u32,
    },
}

/// Errors of the [ping-pong alternator][crate::alternator::Alternator].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlternatorError {
    /// Group does not consist of exactly two processes.
    #[error("This application requires exactly 2 processes, got {size}.")]
    Topology {
        /// Size of the group.
        size: u32,
    },
    /// Counter could not be passed to the partner.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Partner sent something which is not a counter.
    #[error(transparent)]
    Message(#[from] MessageError),
    /// Counter does not follow the round sequence.
    #[error("round {round}: expected ping_pong_count {expected}, got {got}")]
    OutOfSequence {
        /// Index of the round.
        round: u32,
        /// Value the round must end with.
        expected: u32,
        /// Value the process holds.
        got: u32,
    },
}

impl AlternatorError {
    /// Exit status of the process which failed with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AlternatorError::Topology { .. } => 1,
            _ => 2,
        }
    }
}

/// Errors of the [launcher][crate::launch::Launcher].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchError {
    /// Command line could not be parsed.
    #[error("{0}")]
    Usage(String),
    /// Child process could not be started or waited for.
    #[error("can not run process {rank}: {info}")]
    Spawn {
        /// Rank of the child.
        rank: Rank,
        /// What went wrong.
        info: String,
    },
}

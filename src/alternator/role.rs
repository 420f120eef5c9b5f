//! Definition of the turn-taking rule.

use std::fmt;

use crate::common::Rank;

/// Part a process plays in one round of ping-pong.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Increments the counter and sends it to the partner.
    Sender,
    /// Waits for the counter from the partner.
    Receiver,
}

impl Role {
    /// Role of the process with rank `rank` in round `round`.
    ///
    /// Round `i` is driven by the process with rank `i mod 2`,
    /// so for every round exactly one of ranks 0 and 1 is the sender.
    pub fn for_round(rank: Rank, round: u32) -> Self {
        if rank == round % 2 {
            Role::Sender
        } else {
            Role::Receiver
        }
    }

    /// Role of the partner in the same round.
    pub fn opposite(self) -> Self {
        match self {
            Role::Sender => Role::Receiver,
            Role::Receiver => Role::Sender,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Sender => write!(f, "sender"),
            Role::Receiver => write!(f, "receiver"),
        }
    }
}

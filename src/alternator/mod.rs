//! Implementation of [`Alternator`], which plays ping-pong with the counter between two processes.

use std::fmt;

use crate::{
    common::{
        error::AlternatorError,
        message::{Message, PingPongCount},
        Rank, Tag,
    },
    Communicator,
};

mod role;

pub use role::Role;


/// Default number of rounds.
pub const ROUND_LIMIT: u32 = 10;

/// Tag of the counter messages.
pub const PING_PONG_TAG: Tag = 0;

/// Number of processes the alternator works with.
pub const GROUP_SIZE: u32 = 2;

////////////////////////////////////////////////////////////////////////////////

/// Parameters of the alternation.
#[derive(Clone, Debug, PartialEq)]
pub struct AlternatorConfig {
    /// Total number of rounds, which is also the number of transmissions
    /// across both processes.
    pub rounds: u32,
    /// Print every round to stdout.
    pub verbose: bool,
}

impl Default for AlternatorConfig {
    fn default() -> Self {
        Self {
            rounds: ROUND_LIMIT,
            verbose: false,
        }
    }
}

impl AlternatorConfig {
    /// Creates config with specified number of rounds.
    pub fn with_rounds(rounds: u32) -> Self {
        Self {
            rounds,
            ..Self::default()
        }
    }

    /// Enables printing of the rounds.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Round of ping-pong as seen by one of the processes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exchange {
    /// Index of the round.
    pub round: u32,
    /// Rank of the process.
    pub rank: Rank,
    /// Role the process played.
    pub role: Role,
    /// Counter value after the round.
    pub value: u32,
    /// Rank of the partner.
    pub partner: Rank,
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Role::Sender => write!(
                f,
                "Process {} sent ping_pong_count {} to process {}",
                self.rank, self.value, self.partner
            ),
            Role::Receiver => write!(
                f,
                "Process {} received ping_pong_count {} from process {}",
                self.rank, self.value, self.partner
            ),
        }
    }
}

/// Outcome of the whole alternation on one process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Finished {
    /// Rank of the process.
    pub rank: Rank,
    /// Final counter value.
    pub count: u32,
}

impl fmt::Display for Finished {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Process {} finished ping-pong with count {}",
            self.rank, self.count
        )
    }
}

////////////////////////////////////////////////////////////////////////////////

/// [`Alternator`] passes the counter back and forth between two processes.
///
/// In round `i` the process with rank `i mod 2` increments the counter and sends it,
/// while the partner blocks until the counter arrives and takes it over.
/// After every round both processes hold counter equal to `i + 1`.
pub struct Alternator<'a, C: Communicator + ?Sized> {
    /// Communicator of the current process.
    comm: &'a mut C,
    /// Rank of the other process of the pair.
    partner: Rank,
    /// Counter value after the last played round, initially equals to zero.
    counter: u32,
    config: AlternatorConfig,
    /// Rounds played so far.
    history: Vec<Exchange>,
}

impl<'a, C: Communicator + ?Sized> Alternator<'a, C> {
    /// Creates alternator on top of the communicator.
    ///
    /// Fails with [`AlternatorError::Topology`] if the group
    /// does not consist of exactly two processes.
    pub fn new(comm: &'a mut C, config: AlternatorConfig) -> Result<Self, AlternatorError> {
        if comm.size() != GROUP_SIZE {
            return Err(AlternatorError::Topology { size: comm.size() });
        }

        let partner = (comm.rank() + 1) % GROUP_SIZE;

        Ok(Self {
            comm,
            partner,
            counter: 0,
            config,
            history: Vec::new(),
        })
    }

    /// Rank of the current process.
    pub fn rank(&self) -> Rank {
        self.comm.rank()
    }

    /// Rank of the partner process.
    pub fn partner(&self) -> Rank {
        self.partner
    }

    /// Current counter value.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Rounds played so far.
    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    /// Plays round `round`.
    ///
    /// The counter must hold the value left by the previous round, i.e. be equal to `round`.
    pub fn run_round(&mut self, round: u32) -> Result<Exchange, AlternatorError> {
        if self.counter != round {
            return Err(AlternatorError::OutOfSequence {
                round,
                expected: round,
                got: self.counter,
            });
        }

        let role = Role::for_round(self.rank(), round);
        match role {
            Role::Sender => {
                self.counter += 1;
                let msg = Message::from_tipped(&PingPongCount(self.counter))?;
                self.comm.send(&msg, self.partner, PING_PONG_TAG)?;
            }
            Role::Receiver => {
                let msg = self.comm.recv(self.partner, PING_PONG_TAG)?;
                let PingPongCount(value) = msg.get_tipped()?;
                if value != round + 1 {
                    return Err(AlternatorError::OutOfSequence {
                        round,
                        expected: round + 1,
                        got: value,
                    });
                }
                self.counter = value;
            }
        }

        let exchange = Exchange {
            round,
            rank: self.rank(),
            role,
            value: self.counter,
            partner: self.partner,
        };

        log::debug!("round {}: process {} was {}", round, exchange.rank, role);
        if self.config.verbose {
            println!("{}", exchange);
        }

        self.history.push(exchange);
        Ok(exchange)
    }

    /// Plays all rounds and returns the final counter.
    pub fn run(&mut self) -> Result<Finished, AlternatorError> {
        let start = self.history.len() as u32;
        for round in start..self.config.rounds {
            self.run_round(round)?;
        }

        let finished = Finished {
            rank: self.rank(),
            count: self.counter,
        };
        if self.config.verbose {
            println!("{}", finished);
        }

        Ok(finished)
    }
}

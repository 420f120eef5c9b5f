//! In-process [`Communicator`] implementation.
//!
//! Every rank of the group is served by its own [`LocalCommunicator`],
//! which is intended to be moved into a separate thread.
//! Ranks are connected with unbounded channels, so [`send`][Communicator::send]
//! never blocks and [`recv`][Communicator::recv] blocks the thread until a matching
//! message arrives.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    common::{
        error::{TransportError, TransportResult},
        mailbox::Mailbox,
        message::{Envelope, Message},
        Rank, Tag,
    },
    Communicator,
};

#[cfg(test)]
mod tests;

/// Communicator of one rank inside of the in-process group.
pub struct LocalCommunicator {
    rank: Rank,
    peers: Vec<UnboundedSender<Envelope>>,
    inbox: UnboundedReceiver<Envelope>,
    mailbox: Mailbox,
    transmissions: usize,
}

/// Creates group of `size` connected communicators, indexed by rank.
pub fn group(size: u32) -> Vec<LocalCommunicator> {
    let (senders, receivers): (Vec<_>, Vec<_>) =
        (0..size).map(|_| mpsc::unbounded_channel()).unzip();

    receivers
        .into_iter()
        .zip(0..)
        .map(|(inbox, rank)| LocalCommunicator {
            rank,
            peers: senders.clone(),
            inbox,
            mailbox: Mailbox::default(),
            transmissions: 0,
        })
        .collect()
}

impl LocalCommunicator {
    /// Returns number of messages sent by this rank.
    pub fn transmissions(&self) -> usize {
        self.transmissions
    }
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> u32 {
        self.peers.len() as u32
    }

    fn send(&mut self, msg: &Message, dest: Rank, tag: Tag) -> TransportResult<()> {
        self.check_peer(dest)?;

        let envelope = Envelope {
            source: self.rank,
            dest,
            tag,
            msg: msg.clone(),
        };

        self.peers[dest as usize]
            .send(envelope)
            .map_err(|_| TransportError::Rejected {
                rank: dest,
                info: "receiver dropped".to_owned(),
            })?;

        self.transmissions += 1;
        Ok(())
    }

    fn recv(&mut self, source: Rank, tag: Tag) -> TransportResult<Message> {
        self.check_peer(source)?;

        if let Some(msg) = self.mailbox.take(source, tag) {
            return Ok(msg);
        }

        loop {
            let envelope = self
                .inbox
                .blocking_recv()
                .ok_or(TransportError::Closed(self.rank))?;

            if let Some(msg) = self.mailbox.accept(envelope, source, tag) {
                return Ok(msg);
            }
        }
    }
}

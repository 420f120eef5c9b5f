//! Definition of [`Mailbox`], which matches arrived envelopes against receive requests.

use std::collections::VecDeque;

use super::{
    message::{Envelope, Message},
    Rank, Tag,
};

/// Holds envelopes which arrived before a matching receive was posted.
///
/// Envelopes from the same source with the same tag are delivered in arrival order.
#[derive(Default, Debug)]
pub struct Mailbox {
    pending: VecDeque<Envelope>,
}

impl Mailbox {
    /// Takes the earliest pending message from `source` with `tag`, if any.
    pub fn take(&mut self, source: Rank, tag: Tag) -> Option<Message> {
        let position = self
            .pending
            .iter()
            .position(|envelope| envelope.matches(source, tag))?;
        self.pending.remove(position).map(|envelope| envelope.msg)
    }

    /// Checks the freshly arrived envelope.
    /// Returns its message if it matches, otherwise keeps it for later receives.
    pub fn accept(&mut self, envelope: Envelope, source: Rank, tag: Tag) -> Option<Message> {
        if envelope.matches(source, tag) {
            Some(envelope.msg)
        } else {
            log::debug!(
                "stashing message '{}' from {} with tag {}",
                envelope.msg.get_tip(),
                envelope.source,
                envelope.tag
            );
            self.pending.push_back(envelope);
            None
        }
    }

    /// Number of envelopes waiting for a matching receive.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

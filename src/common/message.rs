//! Definition of [`Message`] which could be passed through network.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{error::MessageError, Rank, Tag};

////////////////////////////////////////////////////////////////////////////////

/// Represents message, which is used by processes to communicate
/// with each other through the [`Communicator`][crate::Communicator].
///
/// Message consists of the tip, which names the payload type,
/// and the payload itself serialized into JSON.
#[derive(Serialize, Deserialize, Clone, Eq, Hash, PartialEq, Debug)]
pub struct Message {
    tip: String,
    data: Vec<u8>,
}

impl Message {
    /// Create a new message with specified tip and data, which will be serialized and passed
    /// inside of the message.
    pub fn new<T>(tip: &str, data: &T) -> Result<Self, MessageError>
    where
        T: Serialize,
    {
        serde_json::to_vec(data)
            .map_err(|err| MessageError::Encode(err.to_string()))
            .map(|data| Self {
                tip: tip.to_owned(),
                data,
            })
    }

    /// Create a new message with specified tip and raw data.
    pub fn new_raw(tip: &str, data: &[u8]) -> Self {
        Self {
            tip: tip.to_owned(),
            data: data.to_vec(),
        }
    }

    /// Get message's tip.
    pub fn get_tip(&self) -> &str {
        &self.tip
    }

    /// Get message's raw data.
    pub fn get_raw_data(&self) -> &[u8] {
        &self.data
    }

    /// Returns deserialized message's data of template type.
    pub fn get_data<T>(&self) -> Result<T, MessageError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice::<T>(&self.data).map_err(|err| MessageError::Decode(err.to_string()))
    }

    /// Returns typed payload, checking the message tip first.
    pub fn get_tipped<T: Tipped>(&self) -> Result<T, MessageError> {
        if self.tip != T::TIP {
            return Err(MessageError::UnexpectedTip {
                expected: T::TIP.to_owned(),
                got: self.tip.clone(),
            });
        }
        self.get_data()
    }

    /// Create message from the typed payload, using its [tip][Tipped::TIP].
    pub fn from_tipped<T: Tipped>(value: &T) -> Result<Self, MessageError> {
        Self::new(T::TIP, value)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Payload type with a fixed tip.
pub trait Tipped: Serialize + DeserializeOwned {
    /// Represents tip of the message.
    const TIP: &'static str;
}

/// Value of the counter passed between two processes playing ping-pong.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PingPongCount(pub u32);

impl Tipped for PingPongCount {
    const TIP: &'static str = "PING_PONG_COUNT";
}

////////////////////////////////////////////////////////////////////////////////

/// Message together with its routing information.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Rank of the process which sent the message.
    pub source: Rank,
    /// Rank of the process which must receive the message.
    pub dest: Rank,
    /// Tag used to match the message on receive.
    pub tag: Tag,
    /// Passed message.
    pub msg: Message,
}

impl Envelope {
    /// Returns true if the envelope matches receive from `source` with `tag`.
    pub fn matches(&self, source: Rank, tag: Tag) -> bool {
        self.source == source && self.tag == tag
    }
}

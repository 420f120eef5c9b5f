use serde::{Deserialize, Serialize};

use super::{
    error::MessageError,
    mailbox::Mailbox,
    message::{Envelope, Message, PingPongCount, Tipped},
};

#[test]
fn message_basic() {
    let message_data = "hello".to_owned();

    let message = Message::new("message_type", &message_data).expect("Can not create message");

    assert_eq!(message.get_tip(), "message_type");

    let deserialized_data = message
        .get_data::<String>()
        .expect("Can not extract data from message");
    assert_eq!(deserialized_data, message_data);
}

#[test]
fn data_outlives_message() {
    let deserialized_data: String;

    {
        let message = Message::new("type", &"data").expect("Can not create message");
        deserialized_data = message.get_data::<String>().expect("Can not extract data");
    }

    assert_eq!(deserialized_data, "data");
}

#[test]
fn raw_message_keeps_bytes() {
    let message = Message::new_raw("raw", b"42");
    assert_eq!(message.get_raw_data(), b"42");
    assert_eq!(message.get_data::<u32>().unwrap(), 42);
}

#[test]
fn tipped_payload_round_trip() {
    let message = Message::from_tipped(&PingPongCount(7)).expect("Can not create message");

    assert_eq!(message.get_tip(), PingPongCount::TIP);
    assert_eq!(message.get_tipped::<PingPongCount>(), Ok(PingPongCount(7)));
}

#[test]
fn tipped_payload_checks_tip() {
    #[derive(Serialize, Deserialize)]
    struct Other(u32);

    impl Tipped for Other {
        const TIP: &'static str = "OTHER";
    }

    let message = Message::from_tipped(&Other(1)).unwrap();
    let result = message.get_tipped::<PingPongCount>();

    assert_eq!(
        result,
        Err(MessageError::UnexpectedTip {
            expected: PingPongCount::TIP.to_owned(),
            got: "OTHER".to_owned(),
        })
    );
}

#[test]
fn bad_payload_is_decode_error() {
    let message = Message::new_raw(PingPongCount::TIP, b"not json");
    assert!(matches!(
        message.get_tipped::<PingPongCount>(),
        Err(MessageError::Decode(_))
    ));
}

fn envelope(source: u32, tag: u64, value: u32) -> Envelope {
    Envelope {
        source,
        dest: 0,
        tag,
        msg: Message::from_tipped(&PingPongCount(value)).unwrap(),
    }
}

#[test]
fn mailbox_matches_source_and_tag() {
    let mut mailbox = Mailbox::default();

    assert!(mailbox.accept(envelope(1, 5, 1), 1, 0).is_none());
    assert!(mailbox.accept(envelope(2, 0, 2), 1, 0).is_none());
    assert_eq!(mailbox.pending(), 2);

    let got = mailbox.accept(envelope(1, 0, 3), 1, 0).unwrap();
    assert_eq!(got.get_tipped::<PingPongCount>().unwrap(), PingPongCount(3));

    assert!(mailbox.take(1, 0).is_none());
    let stashed = mailbox.take(1, 5).unwrap();
    assert_eq!(stashed.get_tipped::<PingPongCount>().unwrap(), PingPongCount(1));
    assert_eq!(mailbox.pending(), 1);
}

#[test]
fn mailbox_keeps_arrival_order() {
    let mut mailbox = Mailbox::default();

    for value in 1..=3 {
        assert!(mailbox.accept(envelope(1, 0, value), 0, 0).is_none());
    }

    for value in 1..=3 {
        let msg = mailbox.take(1, 0).unwrap();
        assert_eq!(msg.get_tipped::<PingPongCount>().unwrap(), PingPongCount(value));
    }
    assert_eq!(mailbox.pending(), 0);
}

use std::thread;

use crate::{
    common::{error::TransportError, message::Message},
    Communicator,
};

use super::group;

#[test]
fn group_ranks_and_size() {
    let comms = group(3);

    assert_eq!(comms.len(), 3);
    for (rank, comm) in comms.iter().enumerate() {
        assert_eq!(comm.rank(), rank as u32);
        assert_eq!(comm.size(), 3);
    }
}

#[test]
fn send_recv_between_threads() {
    let mut comms = group(2);
    let mut second = comms.pop().unwrap();
    let mut first = comms.pop().unwrap();

    let echo = thread::spawn(move || {
        let msg = second.recv(0, 0).unwrap();
        second.send(&msg, 0, 1).unwrap();
        second.transmissions()
    });

    let msg = Message::new("ECHO", &"hello").unwrap();
    first.send(&msg, 1, 0).unwrap();
    let answer = first.recv(1, 1).unwrap();

    assert_eq!(answer, msg);
    assert_eq!(first.transmissions(), 1);
    assert_eq!(echo.join().unwrap(), 1);
}

#[test]
fn recv_matches_by_tag() {
    let mut comms = group(2);
    let mut second = comms.pop().unwrap();
    let mut first = comms.pop().unwrap();

    first.send(&Message::new("A", &1).unwrap(), 1, 10).unwrap();
    first.send(&Message::new("B", &2).unwrap(), 1, 20).unwrap();

    assert_eq!(second.recv(0, 20).unwrap().get_tip(), "B");
    assert_eq!(second.recv(0, 10).unwrap().get_tip(), "A");
}

#[test]
fn invalid_ranks_are_rejected() {
    let mut comms = group(2);
    let first = &mut comms[0];
    let msg = Message::new("X", &0).unwrap();

    assert_eq!(
        first.send(&msg, 0, 0),
        Err(TransportError::InvalidRank { rank: 0, size: 2 })
    );
    assert_eq!(
        first.send(&msg, 5, 0),
        Err(TransportError::InvalidRank { rank: 5, size: 2 })
    );
    assert_eq!(
        first.recv(2, 0),
        Err(TransportError::InvalidRank { rank: 2, size: 2 })
    );
    assert_eq!(first.transmissions(), 0);
}

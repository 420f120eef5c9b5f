use std::{net::SocketAddr, thread};

use pingpong::{
    local, Alternator, AlternatorConfig, Communicator, Finished, Role, World, WorldConfig,
};

fn play<C: Communicator>(comm: &mut C) -> (Finished, Vec<(Role, u32)>) {
    let mut alternator = Alternator::new(comm, AlternatorConfig::default()).unwrap();
    let finished = alternator.run().unwrap();
    let history = alternator
        .history()
        .iter()
        .map(|exchange| (exchange.role, exchange.value))
        .collect();
    (finished, history)
}

fn expected_history(rank: u32) -> Vec<(Role, u32)> {
    (0..10)
        .map(|round| (Role::for_round(rank, round), round + 1))
        .collect()
}

#[test]
fn alternation_over_grpc() {
    let peers: Vec<SocketAddr> = vec![
        "127.0.0.1:11511".parse().unwrap(),
        "127.0.0.1:11512".parse().unwrap(),
    ];

    let handles = (0..2)
        .map(|rank| {
            let peers = peers.clone();
            thread::spawn(move || {
                let mut world = World::init(WorldConfig::new(rank, peers).unwrap()).unwrap();
                let result = play(&mut world);
                let transmissions = world.transmissions();
                world.finalize();
                (result, transmissions)
            })
        })
        .collect::<Vec<_>>();

    for (rank, handle) in (0..).zip(handles) {
        let ((finished, history), transmissions) = handle.join().unwrap();
        assert_eq!(finished, Finished { rank, count: 10 });
        assert_eq!(history, expected_history(rank));
        assert_eq!(transmissions, 5);
    }
}

#[test]
fn alternation_between_threads() {
    let handles = local::group(2)
        .into_iter()
        .map(|mut comm| {
            thread::spawn(move || {
                let result = play(&mut comm);
                (result, comm.transmissions())
            })
        })
        .collect::<Vec<_>>();

    for (rank, handle) in (0..).zip(handles) {
        let ((finished, history), transmissions) = handle.join().unwrap();
        assert_eq!(finished, Finished { rank, count: 10 });
        assert_eq!(history, expected_history(rank));
        assert_eq!(transmissions, 5);
    }
}

#[test]
fn alternation_survives_late_partner() {
    let peers: Vec<SocketAddr> = vec![
        "127.0.0.1:11521".parse().unwrap(),
        "127.0.0.1:11522".parse().unwrap(),
    ];

    let late_peers = peers.clone();
    let late = thread::spawn(move || {
        thread::sleep(std::time::Duration::from_millis(500));
        let mut world = World::init(WorldConfig::new(1, late_peers).unwrap()).unwrap();
        play(&mut world).0
    });

    let mut world = World::init(WorldConfig::new(0, peers).unwrap()).unwrap();
    assert_eq!(play(&mut world).0.count, 10);
    assert_eq!(late.join().unwrap().count, 10);
}

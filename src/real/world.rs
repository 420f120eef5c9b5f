//! Definition of [`World`], the communication environment of one OS process.

use std::{collections::HashMap, time::Duration};

use tokio::{
    runtime::{Builder, Runtime},
    sync::{
        mpsc::{self, Receiver},
        oneshot,
    },
    task::JoinHandle,
};

use crate::{
    common::{
        error::{TransportError, TransportResult},
        mailbox::Mailbox,
        message::{Envelope, Message},
        Rank, Tag,
    },
    Communicator,
};

use super::{
    config::WorldConfig,
    messenger::{ExchangeService, GRpcMessenger, PeerClient},
};

/// Capacity of the inbox between the listener and the receiving thread.
const MAX_BUFFER_SIZE: usize = 4 << 10;

/// How long teardown waits for the listener to stop.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Represents communication environment of one process of the group.
///
/// World is [initialized][World::init] once at process start, before any transmission.
/// It binds the listener of the current rank, through which peers deliver messages.
/// Connections to peers are established on the first [send][Communicator::send] to them.
///
/// World is torn down exactly once: either by an explicit [finalize][World::finalize],
/// or when it is dropped.
///
/// All operations block the calling thread, so world must not be used
/// from inside of an asynchronous runtime.
pub struct World {
    config: WorldConfig,
    runtime: Option<Runtime>,
    inbox: Receiver<Envelope>,
    mailbox: Mailbox,
    clients: HashMap<Rank, PeerClient>,
    shutdown: Option<oneshot::Sender<()>>,
    listener: Option<JoinHandle<()>>,
    transmissions: usize,
}

impl World {
    /// Initializes communication environment for the process described by `config`.
    pub fn init(config: WorldConfig) -> TransportResult<Self> {
        let address = config.address(config.rank).ok_or(TransportError::InvalidRank {
            rank: config.rank,
            size: config.size(),
        })?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| TransportError::Init(e.to_string()))?;

        let incoming = {
            let _guard = runtime.enter();
            GRpcMessenger::bind(address)?
        };

        let (send_to, inbox) = mpsc::channel(MAX_BUFFER_SIZE);
        let (shutdown, shutdown_receiver) = oneshot::channel();
        let service = ExchangeService::new(config.rank, send_to);

        let rank = config.rank;
        let listener = runtime.spawn(async move {
            if let Err(info) = GRpcMessenger::listen(incoming, service, shutdown_receiver).await {
                log::error!("process {} stopped listening: {}", rank, info);
            }
        });

        log::info!(
            "process {} of {} listening on {}",
            config.rank,
            config.size(),
            address
        );

        Ok(Self {
            config,
            runtime: Some(runtime),
            inbox,
            mailbox: Mailbox::default(),
            clients: HashMap::new(),
            shutdown: Some(shutdown),
            listener: Some(listener),
            transmissions: 0,
        })
    }

    /// Returns config the world was initialized with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns number of messages sent by this process.
    pub fn transmissions(&self) -> usize {
        self.transmissions
    }

    /// Tears down communication environment.
    pub fn finalize(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };

        self.clients.clear();

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(listener) = self.listener.take() {
            runtime.block_on(async {
                if tokio::time::timeout(SHUTDOWN_GRACE, listener).await.is_err() {
                    log::warn!("process {} listener did not stop in time", self.config.rank);
                }
            });
        }

        runtime.shutdown_timeout(SHUTDOWN_GRACE);

        log::info!(
            "process {} finalized after {} transmissions",
            self.config.rank,
            self.transmissions
        );
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Communicator for World {
    fn rank(&self) -> Rank {
        self.config.rank
    }

    fn size(&self) -> u32 {
        self.config.size()
    }

    fn send(&mut self, msg: &Message, dest: Rank, tag: Tag) -> TransportResult<()> {
        self.check_peer(dest)?;

        let rank = self.config.rank;
        let runtime = self.runtime.as_ref().ok_or(TransportError::Closed(rank))?;
        let address = self.config.address(dest).ok_or(TransportError::InvalidRank {
            rank: dest,
            size: self.config.size(),
        })?;
        let timeout = self.config.connect_timeout;

        let envelope = Envelope {
            source: rank,
            dest,
            tag,
            msg: msg.clone(),
        };

        let clients = &mut self.clients;
        runtime.block_on(async move {
            let mut client = match clients.remove(&dest) {
                Some(client) => client,
                None => match GRpcMessenger::connect(dest, address, timeout).await {
                    Ok(client) => client,
                    Err(e) => return Err(e),
                },
            };
            let result = GRpcMessenger::send(&mut client, &envelope).await;
            clients.insert(dest, client);
            result
        })?;

        self.transmissions += 1;
        Ok(())
    }

    fn recv(&mut self, source: Rank, tag: Tag) -> TransportResult<Message> {
        self.check_peer(source)?;

        if let Some(msg) = self.mailbox.take(source, tag) {
            return Ok(msg);
        }

        let rank = self.config.rank;
        let runtime = self.runtime.as_ref().ok_or(TransportError::Closed(rank))?;
        let inbox = &mut self.inbox;
        let mailbox = &mut self.mailbox;

        runtime.block_on(async move {
            loop {
                let Some(envelope) = inbox.recv().await else {
                    return Err(TransportError::Closed(rank));
                };
                if let Some(msg) = mailbox.accept(envelope, source, tag) {
                    return Ok(msg);
                }
            }
        })
    }
}

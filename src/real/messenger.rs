//! Definition of gRPC messenger [`GRpcMessenger`] structure.

use std::{net::SocketAddr, time::Duration};

use tokio::{
    sync::{mpsc::Sender, oneshot},
    time::{sleep, Instant},
};
use tonic::transport::{server::TcpIncoming, Channel, Endpoint};

use crate::common::{
    error::{TransportError, TransportResult},
    message::{Envelope, Message},
    Rank,
};

#[allow(missing_docs)]
#[allow(clippy::missing_docs_in_private_items)]
pub mod exchange {
    tonic::include_proto!("exchange");
}

use exchange::exchange_client::ExchangeClient;
use exchange::exchange_server::{Exchange, ExchangeServer};
use exchange::{Envelope as WireEnvelope, Receipt};

use tonic::{transport::Server, Request, Response, Status};

/// Delay between attempts to reach a peer listener which is not up yet.
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Client side of the connection to one peer.
pub(crate) type PeerClient = ExchangeClient<Channel>;

////////////////////////////////////////////////////////////////////////////////

/// Accepts envelopes addressed to the local rank and queues them into the inbox.
#[derive(Debug)]
pub(crate) struct ExchangeService {
    rank: Rank,
    send_to: Sender<Envelope>,
}

impl ExchangeService {
    pub fn new(rank: Rank, send_to: Sender<Envelope>) -> Self {
        Self { rank, send_to }
    }
}

#[tonic::async_trait]
impl Exchange for ExchangeService {
    async fn deliver(&self, request: Request<WireEnvelope>) -> Result<Response<Receipt>, Status> {
        let req = request.into_inner();

        if req.dest != self.rank {
            return Err(Status::invalid_argument(format!(
                "envelope for process {} delivered to process {}",
                req.dest, self.rank
            )));
        }

        let envelope = Envelope {
            source: req.source,
            dest: req.dest,
            tag: req.tag,
            msg: Message::new_raw(&req.message_tip, &req.message_data),
        };

        log::debug!(
            "process {} queued '{}' from process {} with tag {}",
            self.rank,
            envelope.msg.get_tip(),
            envelope.source,
            envelope.tag
        );

        self.send_to
            .send(envelope)
            .await
            .map_err(|e| Status::unavailable(e.to_string()))?;

        Ok(Response::new(Receipt { accepted: true }))
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Client and server halves of the gRPC transport.
pub(crate) struct GRpcMessenger {}

impl GRpcMessenger {
    /// Connects to the listener of process `rank`.
    ///
    /// Peers of one group start concurrently, so refused connections are retried
    /// until `timeout` passes.
    pub async fn connect(
        rank: Rank,
        address: SocketAddr,
        timeout: Duration,
    ) -> TransportResult<PeerClient> {
        let endpoint = Endpoint::from_shared(format!("http://{}", address))
            .map_err(|e| TransportError::Init(e.to_string()))?;
        let deadline = Instant::now() + timeout;

        loop {
            match endpoint.connect().await {
                Ok(channel) => {
                    log::debug!("connected to process {} at {}", rank, address);
                    return Ok(ExchangeClient::new(channel));
                }
                Err(e) if Instant::now() < deadline => {
                    log::trace!("process {} at {} is not up yet: {}", rank, address, e);
                    sleep(CONNECT_RETRY_DELAY).await;
                }
                Err(e) => {
                    return Err(TransportError::Unreachable {
                        rank,
                        address: address.to_string(),
                        info: e.to_string(),
                    })
                }
            }
        }
    }

    /// Delivers the envelope and waits until the peer accepts it.
    pub async fn send(client: &mut PeerClient, envelope: &Envelope) -> TransportResult<()> {
        let request = WireEnvelope {
            source: envelope.source,
            dest: envelope.dest,
            tag: envelope.tag,
            message_tip: envelope.msg.get_tip().to_owned(),
            message_data: envelope.msg.get_raw_data().to_vec(),
        };

        let receipt = client
            .deliver(request)
            .await
            .map_err(|status| TransportError::Rejected {
                rank: envelope.dest,
                info: status.message().to_owned(),
            })?
            .into_inner();

        if receipt.accepted {
            Ok(())
        } else {
            Err(TransportError::Rejected {
                rank: envelope.dest,
                info: "not accepted".to_owned(),
            })
        }
    }

    /// Binds listen socket. Must be called within the runtime context.
    pub fn bind(address: SocketAddr) -> TransportResult<TcpIncoming> {
        TcpIncoming::new(address, true, None).map_err(|e| {
            TransportError::Init(format!("can not listen on {}: {}", address, e))
        })
    }

    /// Serves incoming deliveries until `shutdown` fires.
    pub async fn listen(
        incoming: TcpIncoming,
        service: ExchangeService,
        shutdown: oneshot::Receiver<()>,
    ) -> Result<(), String> {
        Server::builder()
            .add_service(ExchangeServer::new(service))
            .serve_with_incoming_shutdown(incoming, async {
                let _ = shutdown.await;
            })
            .await
            .map_err(|e| "gRPC messenger server error: ".to_owned() + e.to_string().as_str())
    }
}

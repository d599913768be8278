use crate::core::connection::{Connection, ConnectionState, ReconnectDecision, ReconnectPolicy};
use crate::core::protocol::{self, Inbound, Outbound, ProtocolError};
use crate::dom;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::stream::{SplitSink, SplitStream};
use futures::{future, SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not connected")]
    NotConnected,
    #[error(transparent)]
    Encode(#[from] ProtocolError),
    #[error("send failed: {0}")]
    Send(String),
}

/// Status callback: current state plus a label for the status line.
pub type StatusHandler = Rc<dyn Fn(ConnectionState, String)>;
pub type InboundHandler = Rc<dyn Fn(Inbound)>;

struct ClientInner {
    url: String,
    connection: Connection,
    on_inbound: InboundHandler,
    on_status: StatusHandler,
    /// Queue drained by the writer task of the live socket.
    outbox: Option<UnboundedSender<String>>,
    /// Bumped per socket; tasks of an older socket stop touching state.
    session: u64,
}

/// Duplex channel to the backend with bounded linear-backoff reconnects.
///
/// Outbound sends fail fast while disconnected; nothing is queued across
/// connections.
#[derive(Clone)]
pub struct ProtocolClient {
    inner: Rc<RefCell<ClientInner>>,
}

impl ProtocolClient {
    pub fn new(
        url: String,
        policy: ReconnectPolicy,
        on_inbound: InboundHandler,
        on_status: StatusHandler,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClientInner {
                url,
                connection: Connection::new(policy),
                on_inbound,
                on_status,
                outbox: None,
                session: 0,
            })),
        }
    }

    pub fn connect(&self) {
        let (url, session, status) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.connection.begin_connect() {
                log::warn!("[ws] reconnect budget exhausted; staying offline");
                return;
            }
            inner.session += 1;
            inner.outbox = None;
            (
                inner.url.clone(),
                inner.session,
                inner.connection.status_label(),
            )
        };
        self.notify_status(status);
        log::info!("[ws] connecting to {url}");

        let socket = match WebSocket::open(&url) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[ws] open failed: {e}");
                self.handle_closed(session);
                return;
            }
        };
        let (sink, stream) = socket.split();
        let (tx, rx) = mpsc::unbounded::<String>();
        self.inner.borrow_mut().outbox = Some(tx);

        spawn_local(self.clone().write_loop(session, sink, rx));
        spawn_local(self.clone().read_loop(session, stream));
    }

    /// Wait for the socket to open, then forward queued frames until the
    /// queue is dropped or the socket refuses a write.
    async fn write_loop(
        self,
        session: u64,
        mut sink: SplitSink<WebSocket, Message>,
        mut rx: mpsc::UnboundedReceiver<String>,
    ) {
        if future::poll_fn(|cx| sink.poll_ready_unpin(cx)).await.is_err() {
            // never opened; the read side reports the close
            return;
        }
        let status = {
            let mut inner = self.inner.borrow_mut();
            if inner.session != session {
                return;
            }
            inner.connection.on_open();
            inner.connection.status_label()
        };
        log::info!("[ws] connected");
        self.notify_status(status);

        while let Some(text) = rx.next().await {
            if let Err(e) = sink.send(Message::Text(text)).await {
                log::warn!("[ws] write failed: {e}");
                break;
            }
        }
    }

    /// Decode and dispatch frames until the stream ends or errors.
    async fn read_loop(self, session: u64, mut stream: SplitStream<WebSocket>) {
        while let Some(frame) = stream.next().await {
            if self.inner.borrow().session != session {
                return;
            }
            let text = match frame {
                Ok(Message::Text(text)) => text,
                Ok(Message::Bytes(_)) => {
                    log::warn!("[ws] dropping non-text frame");
                    continue;
                }
                Err(e) => {
                    log::warn!("[ws] socket error: {e}");
                    break;
                }
            };
            match protocol::decode(&text) {
                Ok(msg) => {
                    let handler = self.inner.borrow().on_inbound.clone();
                    handler(msg);
                }
                Err(ProtocolError::UnknownType(kind)) => {
                    log::warn!("[ws] ignoring unknown envelope type `{kind}`");
                }
                Err(e) => log::warn!("[ws] dropping message: {e}"),
            }
        }
        self.handle_closed(session);
    }

    fn handle_closed(&self, session: u64) {
        let (decision, status) = {
            let mut inner = self.inner.borrow_mut();
            if inner.session != session {
                return;
            }
            let decision = inner.connection.on_closed();
            if decision != ReconnectDecision::Ignore {
                // dropping the sender ends the writer, which releases the socket
                inner.outbox = None;
            }
            (decision, inner.connection.status_label())
        };
        match decision {
            ReconnectDecision::Ignore => {}
            ReconnectDecision::Retry { attempt, delay_ms } => {
                log::warn!("[ws] disconnected; retry {attempt} in {delay_ms} ms");
                self.notify_status(status);
                let client = self.clone();
                dom::set_timeout(delay_ms, move || client.connect());
            }
            ReconnectDecision::GiveUp => {
                log::warn!("[ws] giving up after repeated failures");
                self.notify_status(status);
            }
        }
    }

    fn notify_status(&self, label: String) {
        let (handler, state) = {
            let inner = self.inner.borrow();
            (inner.on_status.clone(), inner.connection.state())
        };
        handler(state, label);
    }

    /// Encode and queue one envelope. Fails while not connected.
    pub fn send(&self, msg: &Outbound) -> Result<(), ClientError> {
        let inner = self.inner.borrow();
        let outbox = match (&inner.outbox, inner.connection.is_connected()) {
            (Some(outbox), true) => outbox,
            _ => return Err(ClientError::NotConnected),
        };
        let text = protocol::encode(msg)?;
        outbox
            .unbounded_send(text)
            .map_err(|e| ClientError::Send(e.to_string()))
    }
}

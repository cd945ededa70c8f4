//! WebSocket connection management.
//!
//! Each connection runs on its own thread which owns the socket. The UI
//! thread talks to it through channels: outbound frames go in, tagged
//! [`ConnectionEvent`]s come out. Events from a connection that has since
//! been replaced are discarded.

use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// How long a socket read blocks before the worker checks for outbound frames.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Identifies one opened connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

/// Something that happened on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened,
    Message(String),
    Error(String),
    Closed,
}

enum Outbound {
    Text(String),
    Close,
}

struct Connection {
    id: ConnectionId,
    outbound: Sender<Outbound>,
}

/// Owner of the single live connection.
pub struct ConnectionLink {
    endpoint: String,
    next_id: u64,
    current: Option<Connection>,
    events_tx: Sender<(ConnectionId, ConnectionEvent)>,
    events_rx: Receiver<(ConnectionId, ConnectionEvent)>,
}

impl ConnectionLink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            endpoint: endpoint.into(),
            next_id: 0,
            current: None,
            events_tx,
            events_rx,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Open a new connection, closing the current one if any.
    pub fn open(&mut self) {
        self.close();

        let id = ConnectionId(self.next_id);
        self.next_id += 1;

        let (outbound_tx, outbound_rx) = mpsc::channel();
        let endpoint = self.endpoint.clone();
        let events = self.events_tx.clone();

        info!(endpoint = %endpoint, ?id, "opening connection");
        thread::spawn(move || run_connection(id, &endpoint, outbound_rx, events));

        self.current = Some(Connection {
            id,
            outbound: outbound_tx,
        });
    }

    /// Queue a text frame. Returns false when there is no live connection.
    pub fn send(&mut self, text: String) -> bool {
        match &self.current {
            Some(conn) => conn.outbound.send(Outbound::Text(text)).is_ok(),
            None => false,
        }
    }

    /// Ask the current connection to close. Its `Closed` event still arrives.
    pub fn close(&mut self) {
        if let Some(conn) = &self.current {
            let _ = conn.outbound.send(Outbound::Close);
        }
    }

    /// Drain pending events of the current connection.
    pub fn poll_events(&mut self) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();
        while let Ok((id, event)) = self.events_rx.try_recv() {
            let is_current = self.current.as_ref().is_some_and(|c| c.id == id);
            if !is_current {
                debug!(?id, ?event, "dropping event from stale connection");
                continue;
            }
            if event == ConnectionEvent::Closed {
                self.current = None;
            }
            events.push(event);
        }
        events
    }

    /// Wait up to `timeout` for the next event of the current connection.
    pub fn wait_event(&mut self, timeout: Duration) -> Option<ConnectionEvent> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(std::time::Instant::now())?;
            let (id, event) = self.events_rx.recv_timeout(remaining).ok()?;
            if self.current.as_ref().is_some_and(|c| c.id == id) {
                if event == ConnectionEvent::Closed {
                    self.current = None;
                }
                return Some(event);
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

impl Drop for ConnectionLink {
    fn drop(&mut self) {
        self.close();
    }
}

fn run_connection(
    id: ConnectionId,
    endpoint: &str,
    outbound: Receiver<Outbound>,
    events: Sender<(ConnectionId, ConnectionEvent)>,
) {
    let emit = |event: ConnectionEvent| {
        let _ = events.send((id, event));
    };

    let mut socket = match tungstenite::connect(endpoint) {
        Ok((socket, _response)) => socket,
        Err(e) => {
            warn!(?id, error = %e, "connect failed");
            emit(ConnectionEvent::Error(e.to_string()));
            emit(ConnectionEvent::Closed);
            return;
        }
    };

    if let Err(e) = set_read_timeout(&socket, READ_TIMEOUT) {
        warn!(?id, error = %e, "could not set read timeout");
        emit(ConnectionEvent::Error(e.to_string()));
        emit(ConnectionEvent::Closed);
        return;
    }
    emit(ConnectionEvent::Opened);

    let mut closing = false;
    loop {
        if !closing {
            match drain_outbound(&mut socket, &outbound) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(?id, "closing");
                    closing = true;
                    if let Err(e) = socket.close(None) {
                        debug!(?id, error = %e, "close handshake failed");
                        break;
                    }
                }
                Err(e) => {
                    emit(ConnectionEvent::Error(e.to_string()));
                    break;
                }
            }
        }

        match socket.read() {
            Ok(Message::Text(text)) => emit(ConnectionEvent::Message(text.to_string())),
            Ok(Message::Close(frame)) => debug!(?id, ?frame, "server closed"),
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                break;
            }
            Err(e) => {
                if !closing {
                    warn!(?id, error = %e, "read failed");
                    emit(ConnectionEvent::Error(e.to_string()));
                }
                break;
            }
        }
    }

    info!(?id, "connection closed");
    emit(ConnectionEvent::Closed);
}

/// Send queued frames. Returns `Ok(false)` when the owner asked to close
/// or went away.
fn drain_outbound(
    socket: &mut WebSocket<MaybeTlsStream<TcpStream>>,
    outbound: &Receiver<Outbound>,
) -> tungstenite::Result<bool> {
    loop {
        match outbound.try_recv() {
            Ok(Outbound::Text(text)) => socket.send(Message::text(text))?,
            Ok(Outbound::Close) | Err(TryRecvError::Disconnected) => return Ok(false),
            Err(TryRecvError::Empty) => return Ok(true),
        }
    }
}

fn set_read_timeout(
    socket: &WebSocket<MaybeTlsStream<TcpStream>>,
    timeout: Duration,
) -> std::io::Result<()> {
    match socket.get_ref() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(timeout)),
        MaybeTlsStream::Rustls(stream) => stream.get_ref().set_read_timeout(Some(timeout)),
        _ => Ok(()),
    }
}

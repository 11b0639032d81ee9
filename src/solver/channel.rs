//! WebSocket implementation of [`SolverLink`].
//!
//! A background tokio task owns the socket. The editor side only touches two
//! unbounded queues (commands out, events in) and a status watch, so nothing
//! on the interaction thread ever waits for the network.
//!
//! While the socket is down, solve requests follow [`SendPolicy`]. The task
//! reconnects with exponential backoff until the channel is shut down or
//! dropped.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use super::protocol::{SolveRequest, decode_message};
use super::{LinkStatus, SolverEvent, SolverLink};
use crate::error::{SolverError, SolverResult};

pub const DEFAULT_SOLVER_URL: &str = "ws://localhost:8080";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Called from the connection task whenever an event is queued, e.g. to wake
/// a GUI event loop.
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// What to do with a solve request while the socket is not open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPolicy {
    /// Keep the most recent request and send it once connected. Older pending
    /// requests are superseded.
    #[default]
    Queue,
    /// Discard the request.
    Drop,
}

#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub url: String,
    pub send_policy: SendPolicy,
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOLVER_URL.to_string(),
            send_policy: SendPolicy::Queue,
            reconnect_delay: Duration::from_millis(500),
            max_reconnect_delay: Duration::from_secs(10),
        }
    }
}

impl SolverConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_send_policy(mut self, policy: SendPolicy) -> Self {
        self.send_policy = policy;
        self
    }

    pub fn with_reconnect_delay(mut self, initial: Duration, max: Duration) -> Self {
        self.reconnect_delay = initial;
        self.max_reconnect_delay = max.max(initial);
        self
    }

    /// Parse and check the solver URL.
    pub fn parsed_url(&self) -> SolverResult<Url> {
        let url = Url::parse(self.url.trim())?;
        match url.scheme() {
            "ws" | "wss" => Ok(url),
            other => Err(SolverError::UnsupportedScheme(other.to_string())),
        }
    }
}

enum Command {
    Solve(SolveRequest),
    Shutdown,
}

/// Persistent connection to the solver.
pub struct SolverChannel {
    commands: mpsc::UnboundedSender<Command>,
    events: mpsc::UnboundedReceiver<SolverEvent>,
    status: watch::Receiver<LinkStatus>,
    task: Option<JoinHandle<()>>,
}

impl SolverChannel {
    /// Start the connection task on the current tokio runtime.
    pub fn connect(config: SolverConfig) -> SolverResult<Self> {
        Self::connect_with_notifier(config, None)
    }

    pub fn connect_with_notifier(
        config: SolverConfig,
        notifier: Option<Notifier>,
    ) -> SolverResult<Self> {
        let url = config.parsed_url()?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SolverError::NoRuntime)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(LinkStatus::Connecting);

        let worker = Worker {
            url,
            config,
            commands: command_rx,
            events: event_tx,
            status: status_tx,
            notifier,
            pending: None,
        };
        let task = runtime.spawn(worker.run());

        Ok(Self {
            commands: command_tx,
            events: event_rx,
            status: status_rx,
            task: Some(task),
        })
    }

    /// Wait for the next event. Returns `None` once the connection task has
    /// stopped and every queued event was consumed.
    pub async fn next_event(&mut self) -> Option<SolverEvent> {
        self.events.recv().await
    }

    /// Close the socket and wait for the connection task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl SolverLink for SolverChannel {
    fn submit(&mut self, request: SolveRequest) -> SolverResult<()> {
        self.commands
            .send(Command::Solve(request))
            .map_err(|_| SolverError::ChannelClosed)
    }

    fn poll_event(&mut self) -> Option<SolverEvent> {
        self.events.try_recv().ok()
    }

    fn status(&self) -> LinkStatus {
        *self.status.borrow()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Connection task
// ────────────────────────────────────────────────────────────────────────────

struct Worker {
    url: Url,
    config: SolverConfig,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<SolverEvent>,
    status: watch::Sender<LinkStatus>,
    notifier: Option<Notifier>,
    pending: Option<SolveRequest>,
}

impl Worker {
    async fn run(mut self) {
        let mut delay = self.config.reconnect_delay;
        loop {
            self.set_status(LinkStatus::Connecting);
            debug!("connecting to solver at {}", self.url);

            let connected = {
                let connect = tokio_tungstenite::connect_async(self.url.to_string());
                tokio::pin!(connect);
                loop {
                    // Commands first, so every request queued before the
                    // handshake finished is parked before the flush.
                    tokio::select! {
                        biased;
                        command = self.commands.recv() => {
                            if !self.park(command) {
                                break None;
                            }
                        }
                        result = &mut connect => break Some(result),
                    }
                }
            };
            let Some(result) = connected else {
                self.set_status(LinkStatus::Closed);
                return;
            };

            match result {
                Ok((ws, _response)) => {
                    info!("solver connected at {}", self.url);
                    delay = self.config.reconnect_delay;
                    self.set_status(LinkStatus::Open);
                    let keep_running = self.serve(ws).await;
                    self.set_status(LinkStatus::Closed);
                    if !keep_running {
                        return;
                    }
                }
                Err(e) => {
                    warn!("solver connection to {} failed: {e}", self.url);
                    self.set_status(LinkStatus::Closed);
                }
            }

            debug!("retrying solver connection in {:?}", delay);
            if !self.wait(delay).await {
                return;
            }
            delay = (delay * 2).min(self.config.max_reconnect_delay);
        }
    }

    /// Sleep for `delay` while still accepting commands. Returns false on shutdown.
    async fn wait(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                command = self.commands.recv() => {
                    if !self.park(command) {
                        return false;
                    }
                }
            }
        }
    }

    /// Handle a command while no socket is open. Returns false on shutdown.
    fn park(&mut self, command: Option<Command>) -> bool {
        match command {
            Some(Command::Solve(request)) => {
                match self.config.send_policy {
                    SendPolicy::Queue => {
                        if self.pending.replace(request).is_some() {
                            debug!("solver offline, superseding queued solve request");
                        } else {
                            debug!("solver offline, queueing solve request");
                        }
                    }
                    SendPolicy::Drop => {
                        warn!(
                            "solver offline, dropping solve request for {} cities",
                            request.data.size()
                        );
                    }
                }
                true
            }
            Some(Command::Shutdown) | None => false,
        }
    }

    fn requeue(&mut self, request: SolveRequest) {
        if self.config.send_policy == SendPolicy::Queue && self.pending.is_none() {
            self.pending = Some(request);
        }
    }

    /// Pump one open connection. Returns false when the channel was shut down.
    async fn serve(&mut self, ws: WsStream) -> bool {
        let (mut write, mut read) = ws.split();

        if let Some(request) = self.pending.take() {
            if let Err(e) = send_request(&mut write, &request).await {
                warn!("failed to send queued solve request: {e}");
                self.requeue(request);
                return true;
            }
        }

        loop {
            tokio::select! {
                message = read.next() => match message {
                    Some(Ok(Message::Text(text))) => self.receive(text.as_str()),
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => self.receive(text),
                        Err(_) => warn!("discarding non-UTF-8 solver frame ({} bytes)", bytes.len()),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        info!("solver closed the connection: {frame:?}");
                        return true;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("solver connection error: {e}");
                        return true;
                    }
                    None => {
                        info!("solver connection ended");
                        return true;
                    }
                },
                command = self.commands.recv() => match command {
                    Some(Command::Solve(request)) => {
                        if let Err(e) = send_request(&mut write, &request).await {
                            warn!("failed to send solve request: {e}");
                            self.requeue(request);
                            return true;
                        }
                    }
                    Some(Command::Shutdown) | None => {
                        let _ = write.send(Message::Close(None)).await;
                        return false;
                    }
                },
            }
        }
    }

    fn receive(&self, text: &str) {
        match decode_message(text) {
            Ok(update) => {
                debug!(
                    "solver sent '{}' with {} stops",
                    update.kind,
                    update.tour.len()
                );
                self.emit(SolverEvent::Tour(update));
            }
            Err(e) => warn!("discarding solver message: {e}"),
        }
    }

    fn set_status(&self, status: LinkStatus) {
        let previous = self.status.send_replace(status);
        if previous != status {
            self.emit(SolverEvent::Status(status));
        }
    }

    fn emit(&self, event: SolverEvent) {
        if self.events.send(event).is_ok() {
            if let Some(notify) = &self.notifier {
                notify();
            }
        }
    }
}

async fn send_request(write: &mut WsSink, request: &SolveRequest) -> SolverResult<()> {
    let json = request.to_json()?;
    debug!("sending solve request for {} cities", request.data.size());
    write.send(Message::Text(json.into())).await?;
    Ok(())
}

//! Gesture transport between external producers and the render thread.
//!
//! Producers (a remote vision session, stdin, a replay script, the keyboard)
//! push raw tokens through a [`GestureSender`]. The render thread owns the
//! matching [`GestureInbox`] and drains it once per frame. Tokens stay raw
//! until they reach the session so that validation happens in one place.
//!
//! The channel is bounded. When a producer bursts faster than frames drain it,
//! the newest tokens are dropped rather than blocking the producer.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default number of tokens buffered between frames.
pub const DEFAULT_INBOX_CAPACITY: usize = 32;

/// Producer side of the gesture channel.
#[derive(Clone, Debug)]
pub struct GestureSender {
    tx: SyncSender<String>,
}

/// Outcome of pushing one token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendStatus {
    Queued,
    /// The inbox was full; the token was discarded.
    Dropped,
    /// The consumer is gone; producers should stop.
    Closed,
}

impl GestureSender {
    /// Push a token without blocking.
    pub fn send(&self, token: impl Into<String>) -> SendStatus {
        match self.tx.try_send(token.into()) {
            Ok(()) => SendStatus::Queued,
            Err(TrySendError::Full(token)) => {
                log::debug!("gesture inbox full, dropping {:?}", token);
                SendStatus::Dropped
            }
            Err(TrySendError::Disconnected(_)) => SendStatus::Closed,
        }
    }
}

/// Consumer side of the gesture channel, owned by the render thread.
#[derive(Debug)]
pub struct GestureInbox {
    rx: Receiver<String>,
    connected: bool,
}

impl GestureInbox {
    /// Create a bounded channel holding up to `capacity` pending tokens.
    pub fn bounded(capacity: usize) -> Result<(GestureSender, GestureInbox), ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::EmptyInbox);
        }
        let (tx, rx) = mpsc::sync_channel(capacity);
        Ok((GestureSender { tx }, GestureInbox { rx, connected: true }))
    }

    /// Take every token that is ready right now, oldest first.
    pub fn drain(&mut self) -> Vec<String> {
        let mut tokens = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(token) => tokens.push(token),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.connected {
                        log::info!("all gesture producers disconnected");
                        self.connected = false;
                    }
                    break;
                }
            }
        }
        tokens
    }

    /// Whether any producer is still attached.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Anything that can deliver gesture tokens from its own thread.
pub trait GestureSource: Send + 'static {
    fn run(self: Box<Self>, tx: GestureSender);
}

/// Spawn a gesture source on its own thread.
pub fn spawn_gesture_source<G: GestureSource>(source: G, tx: GestureSender) -> JoinHandle<()> {
    thread::spawn(move || Box::new(source).run(tx))
}

/// Tool-call payload shapes a remote agent may emit instead of a bare token.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Direct { gesture: String },
    ToolCall { args: ToolArgs },
}

#[derive(Deserialize)]
struct ToolArgs {
    gesture: String,
}

/// Extract a gesture token from one inbound line.
///
/// Accepts a bare token (`zoom_in`), `{"gesture": "zoom_in"}` or
/// `{"name": "...", "args": {"gesture": "zoom_in"}}`. Blank lines and
/// malformed JSON yield `None`.
pub fn parse_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('{') {
        return match serde_json::from_str::<Payload>(line) {
            Ok(Payload::Direct { gesture }) | Ok(Payload::ToolCall { args: ToolArgs { gesture } }) => {
                Some(gesture)
            }
            Err(e) => {
                log::debug!("ignoring malformed gesture payload: {}", e);
                None
            }
        };
    }
    Some(line.to_string())
}

/// Reads one gesture per line from any reader, typically stdin.
pub struct LineGestureSource<R> {
    reader: R,
}

impl<R: BufRead + Send + 'static> LineGestureSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead + Send + 'static> GestureSource for LineGestureSource<R> {
    fn run(self: Box<Self>, tx: GestureSender) {
        for line in self.reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("gesture input closed: {}", e);
                    return;
                }
            };
            if let Some(token) = parse_line(&line) {
                if tx.send(token) == SendStatus::Closed {
                    return;
                }
            }
        }
        log::info!("gesture input reached end of stream");
    }
}

/// Replays a fixed list of `(delay, token)` pairs, optionally forever.
pub struct ScriptedGestureSource {
    steps: Vec<(Duration, String)>,
    repeat: bool,
}

impl ScriptedGestureSource {
    pub fn new(steps: Vec<(Duration, String)>) -> Self {
        Self {
            steps,
            repeat: false,
        }
    }

    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// A short tour through every motion gesture.
    pub fn demo() -> Self {
        let tour = [
            "zoom_in", "zoom_in", "move_left", "move_left", "stop", "move_down", "move_right",
            "zoom_out", "move_up", "stop", "zoom_out",
        ];
        Self::new(
            tour.iter()
                .map(|t| (Duration::from_millis(1200), t.to_string()))
                .collect(),
        )
        .repeating()
    }
}

impl GestureSource for ScriptedGestureSource {
    fn run(self: Box<Self>, tx: GestureSender) {
        if self.steps.is_empty() {
            return;
        }
        loop {
            for (delay, token) in &self.steps {
                thread::sleep(*delay);
                if tx.send(token.clone()) == SendStatus::Closed {
                    return;
                }
            }
            if !self.repeat {
                return;
            }
        }
    }
}

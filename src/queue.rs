//! Handoff between the sampler thread and the consumer.

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TryRecvError};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::snapshot::Sample;

/// Display width error messages are cut to before they are queued.
pub const ERROR_MESSAGE_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueueItem {
    Sample(Sample),
    Error { message: String },
}

impl QueueItem {
    pub fn error(message: impl AsRef<str>) -> Self {
        QueueItem::Error {
            message: truncate_message(message.as_ref()),
        }
    }
}

/// Cut to `ERROR_MESSAGE_WIDTH` display columns, ending in an ellipsis when
/// anything was dropped.
fn truncate_message(message: &str) -> String {
    if message.width() <= ERROR_MESSAGE_WIDTH {
        return message.to_string();
    }
    let budget = ERROR_MESSAGE_WIDTH - 1;
    let mut kept = String::with_capacity(message.len().min(ERROR_MESSAGE_WIDTH * 4));
    let mut used = 0;
    for ch in message.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        kept.push(ch);
        used += w;
    }
    kept.push('\u{2026}');
    kept
}

/// Unbounded, FIFO, single-producer/single-consumer channel.
pub fn sample_queue() -> (SampleSender, SampleQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SampleSender { tx }, SampleQueue { rx, closed: false })
}

/// Producer half, owned by the sampler thread.
#[derive(Debug)]
pub struct SampleSender {
    tx: mpsc::UnboundedSender<QueueItem>,
}

impl SampleSender {
    /// Returns `false` once the consumer is gone.
    pub fn push(&self, item: QueueItem) -> bool {
        self.tx.send(item).is_ok()
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct SampleQueue {
    rx: mpsc::UnboundedReceiver<QueueItem>,
    closed: bool,
}

impl SampleQueue {
    /// Take every item currently queued without waiting. An empty vector is
    /// the common case.
    pub fn drain(&mut self) -> Vec<QueueItem> {
        let mut items = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(item) => items.push(item),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
        items
    }

    /// True once the producer has gone away and every item was drained.
    /// From then on `drain` always returns an empty vector.
    pub fn is_finished(&self) -> bool {
        self.closed
    }
}

//! Periodic sampling loop on a dedicated thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{CollectionError, SamplerError};
use crate::queue::{QueueItem, SampleQueue, SampleSender, sample_queue};
use crate::system::collector::Collector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Running,
    Stopped,
}

/// Owns the collector until `start`, then the sampling thread does.
///
/// `Idle -> Running -> Stopped`; a stopped sampler cannot be restarted.
pub struct Sampler {
    interval: Duration,
    pending: Option<(Collector, SampleSender)>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Sampler {
    pub fn new(collector: Collector, sender: SampleSender, interval: Duration) -> Self {
        Sampler {
            interval,
            pending: Some((collector, sender)),
            cancel: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Build a sampler together with the queue it feeds.
    pub fn with_queue(collector: Collector, interval: Duration) -> (Self, SampleQueue) {
        let (sender, queue) = sample_queue();
        (Self::new(collector, sender, interval), queue)
    }

    pub fn state(&self) -> SamplerState {
        if self.cancel.load(Ordering::Acquire) {
            return SamplerState::Stopped;
        }
        if self.pending.is_some() {
            return SamplerState::Idle;
        }
        match &self.handle {
            Some(handle) if !handle.is_finished() => SamplerState::Running,
            _ => SamplerState::Stopped,
        }
    }

    pub fn start(&mut self) -> Result<(), SamplerError> {
        match self.state() {
            SamplerState::Running => return Err(SamplerError::AlreadyStarted),
            SamplerState::Stopped => return Err(SamplerError::Stopped),
            SamplerState::Idle => {}
        }
        let Some((collector, sender)) = self.pending.take() else {
            return Err(SamplerError::Stopped);
        };

        let cancel = Arc::clone(&self.cancel);
        let interval = self.interval;
        let handle = thread::Builder::new()
            .name("hostpulse-sampler".to_string())
            .spawn(move || run_loop(collector, sender, interval, cancel))
            .map_err(|e| SamplerError::Spawn(e.to_string()))?;

        tracing::info!(interval_ms = interval.as_millis() as u64, "sampler started");
        self.handle = Some(handle);
        Ok(())
    }

    /// Request shutdown. Returns immediately; the loop exits at its next
    /// checkpoint, after finishing any tick already in flight.
    pub fn stop(&mut self) {
        if self.cancel.swap(true, Ordering::AcqRel) {
            return;
        }
        self.pending = None;
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
        tracing::info!("sampler stop requested");
    }

    /// Wait for the sampling thread to exit. Call after `stop`.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("sampler thread panicked outside a tick");
            }
            // The loop may have exited on its own; joined is terminal either way.
            self.cancel.store(true, Ordering::Release);
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut collector: Collector,
    sender: SampleSender,
    interval: Duration,
    cancel: Arc<AtomicBool>,
) {
    let mut tick_index: u64 = 0;
    loop {
        let item = {
            let _span = tracing::debug_span!("sampler.tick", tick = tick_index).entered();
            tick(&mut collector)
        };
        tick_index += 1;

        if !sender.push(item) {
            tracing::debug!("sample queue consumer dropped; sampler exiting");
            break;
        }
        if cancel.load(Ordering::Acquire) {
            break;
        }
        sleep_until_cancelled(interval, &cancel);
        if cancel.load(Ordering::Acquire) {
            break;
        }
    }
    tracing::debug!(ticks = tick_index, "sampler loop finished");
}

/// One collection pass. Never panics and never fails the loop: any failure
/// becomes an error item.
fn tick(collector: &mut Collector) -> QueueItem {
    match panic::catch_unwind(AssertUnwindSafe(|| collector.collect())) {
        Ok(Ok(sample)) => QueueItem::Sample(sample),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "collection failed");
            QueueItem::error(err.to_string())
        }
        Err(payload) => {
            let err = CollectionError::Panicked(panic_message(payload.as_ref()));
            tracing::error!(error = %err, "collection panicked");
            QueueItem::error(err.to_string())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Sleep for `interval`, waking early when `stop` unparks the thread.
fn sleep_until_cancelled(interval: Duration, cancel: &AtomicBool) {
    let deadline = Instant::now() + interval;
    while !cancel.load(Ordering::Acquire) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::park_timeout(deadline - now);
    }
}

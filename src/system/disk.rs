use crate::error::SensorResult;

/// Cumulative read/write operation counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiskIoSnapshot {
    pub read_count: u64,
    pub write_count: u64,
}

impl DiskIoSnapshot {
    pub fn new(read_count: u64, write_count: u64) -> Self {
        Self {
            read_count,
            write_count,
        }
    }
}

/// Detects disk activity from the delta between consecutive snapshots.
///
/// Activity is computed once in aggregate and reported identically for
/// every tracked slot.
#[derive(Debug)]
pub struct DiskActivityTracker {
    slots: usize,
    last: Option<DiskIoSnapshot>,
}

impl DiskActivityTracker {
    pub fn new(slots: usize) -> Self {
        Self { slots, last: None }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    #[cfg(test)]
    fn last_snapshot(&self) -> Option<DiskIoSnapshot> {
        self.last
    }

    /// Feed the latest counter read. A failed read reports no activity and
    /// keeps the previous snapshot.
    pub fn observe(&mut self, reading: SensorResult<DiskIoSnapshot>) -> Vec<bool> {
        let current = match reading {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::trace!(error = %err, "disk counters unavailable");
                return vec![false; self.slots];
            }
        };

        let active = match self.last.replace(current) {
            // A counter that went backwards was reset; treat it as idle.
            Some(previous) => {
                let read_delta = current.read_count.saturating_sub(previous.read_count);
                let write_delta = current.write_count.saturating_sub(previous.write_count);
                read_delta.saturating_add(write_delta) > 0
            }
            None => false,
        };

        vec![active; self.slots]
    }
}

use std::collections::VecDeque;

pub const DEFAULT_WPM_HISTORY_CAPACITY: usize = 30;

/// Fixed-capacity circular buffer of instantaneous WPM readings.
///
/// Pushing into a full buffer evicts the oldest reading first, so the buffer
/// always holds the most recent `capacity` samples in the order they were
/// taken.
#[derive(Debug, Clone, PartialEq)]
pub struct WpmHistory {
    samples: VecDeque<u32>,
    capacity: usize,
}

impl WpmHistory {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a sample, returning the evicted one if the buffer was full.
    pub fn push(&mut self, wpm: u32) -> Option<u32> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(wpm);
        evicted
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<u32> {
        self.samples.back().copied()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }

    pub fn nonzero(&self) -> Vec<f64> {
        self.iter().filter(|&s| s > 0).map(f64::from).collect()
    }
}

impl Default for WpmHistory {
    fn default() -> Self {
        Self::new(DEFAULT_WPM_HISTORY_CAPACITY)
    }
}

use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};
use std::sync::Arc;

struct Inner {
    buffer: HeapRb<f32>,
    /// Total samples handed to the output device since the last clear.
    consumed: u64,
}

/// Thread-safe FIFO of scheduled playback samples.
///
/// The voice relay appends decoded fragments; the output callback drains.
/// `clear` services barge-in: pending samples are dropped and the consumed
/// counter (the playback clock) restarts from zero.
pub struct PlaybackQueue {
    inner: Arc<Mutex<Inner>>,
}

impl PlaybackQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                buffer: HeapRb::new(capacity),
                consumed: 0,
            })),
        }
    }

    /// Append samples to the tail of the queue.
    /// Returns the number of samples actually queued; overflow is dropped.
    pub fn push(&self, samples: &[f32]) -> usize {
        let mut inner = self.inner.lock();
        let mut written = 0;
        for &sample in samples {
            if inner.buffer.try_push(sample).is_err() {
                break;
            }
            written += 1;
        }
        written
    }

    /// Drain up to `count` samples from the head of the queue.
    pub fn pop(&self, count: usize) -> Vec<f32> {
        let mut inner = self.inner.lock();
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            match inner.buffer.try_pop() {
                Some(sample) => samples.push(sample),
                None => break,
            }
        }
        inner.consumed += samples.len() as u64;
        samples
    }

    /// Samples queued but not yet played.
    pub fn pending(&self) -> usize {
        self.inner.lock().buffer.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().buffer.is_empty()
    }

    /// Playback clock in samples since the last clear.
    pub fn consumed_samples(&self) -> u64 {
        self.inner.lock().consumed
    }

    /// Barge-in: drop pending samples and reset the playback clock.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.buffer.clear();
        inner.consumed = 0;
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().buffer.capacity().get()
    }
}

impl Clone for PlaybackQueue {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = PlaybackQueue::new(16);
        queue.push(&[1.0, 2.0, 3.0]);
        assert_eq!(queue.pop(2), vec![1.0, 2.0]);
        assert_eq!(queue.pop(2), vec![3.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_consumed_tracks_playback_clock() {
        let queue = PlaybackQueue::new(16);
        queue.push(&[0.0; 8]);
        queue.pop(5);
        assert_eq!(queue.consumed_samples(), 5);
        queue.pop(5);
        assert_eq!(queue.consumed_samples(), 8);
    }

    #[test]
    fn test_clear_resets_clock_and_pending() {
        let queue = PlaybackQueue::new(16);
        queue.push(&[0.5; 8]);
        queue.pop(3);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.consumed_samples(), 0);
        assert!(queue.pop(4).is_empty());
    }

    #[test]
    fn test_overflow_is_dropped_not_wrapped() {
        let queue = PlaybackQueue::new(4);
        let written = queue.push(&[1.0; 6]);
        assert_eq!(written, 4);
        assert_eq!(queue.pop(6), vec![1.0; 4]);
    }
}

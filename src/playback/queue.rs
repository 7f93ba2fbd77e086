//! Double-buffered queue between decode and the output device callback.
//!
//! Entries are tagged with the seek epoch they were decoded under; a refill
//! that raced a seek carries a stale epoch and is dropped on push. The queue
//! never blocks: the consumer asks `needs_refill` and the producer tops it
//! up when it can.

use std::collections::VecDeque;

use crate::core::types::PcmFrame;

/// what a `take` call observed about queue health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSignal {
    /// request fully served
    Ok,
    /// served, but the buffer dipped below the refill threshold
    Low,
    /// request could not be fully served and more input is expected
    Underflow,
    /// drained and the stream has ended
    Ended,
}

pub struct PlaybackQueue {
    entries: VecDeque<PcmFrame>,
    /// PCM frames currently buffered across entries
    buffered: usize,
    /// refill threshold in PCM frames
    low_water: usize,
    epoch: u64,
    ended: bool,
}

impl PlaybackQueue {
    pub fn new(low_water: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            buffered: 0,
            low_water,
            epoch: 0,
            ended: false,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn buffered_frames(&self) -> usize {
        self.buffered
    }

    pub fn needs_refill(&self) -> bool {
        !self.ended && self.buffered < self.low_water
    }

    /// queue a decoded block; stale epochs are dropped
    pub fn push(&mut self, epoch: u64, frame: PcmFrame) -> bool {
        if epoch != self.epoch || frame.frame_count() == 0 {
            return false;
        }
        self.buffered += frame.frame_count();
        self.entries.push_back(frame);
        true
    }

    /// no more frames will arrive for the current epoch
    pub fn mark_ended(&mut self, epoch: u64) {
        if epoch == self.epoch {
            self.ended = true;
        }
    }

    /// drop everything and start a new epoch (after a seek)
    pub fn clear(&mut self) -> u64 {
        self.entries.clear();
        self.buffered = 0;
        self.ended = false;
        self.epoch += 1;
        self.epoch
    }

    /// Pull up to `max_frames` PCM frames, splitting a block when it
    /// straddles the request boundary.
    pub fn take(&mut self, max_frames: usize) -> (Option<PcmFrame>, QueueSignal) {
        let Some(mut front) = self.entries.pop_front() else {
            let signal = if self.ended {
                QueueSignal::Ended
            } else {
                QueueSignal::Underflow
            };
            return (None, signal);
        };

        let channels = front.channels as usize;
        if front.frame_count() > max_frames {
            let rest = front.samples.split_off(max_frames * channels);
            let rest_ms = front.timestamp_ms; // close enough for queue-internal splits
            self.entries.push_front(PcmFrame {
                samples: rest,
                channels: front.channels,
                timestamp_ms: rest_ms,
            });
        }
        self.buffered -= front.frame_count();

        let signal = if self.ended && self.entries.is_empty() {
            QueueSignal::Ended
        } else if self.buffered < self.low_water && !self.ended {
            QueueSignal::Low
        } else {
            QueueSignal::Ok
        };
        (Some(front), signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: usize) -> PcmFrame {
        PcmFrame {
            samples: vec![0.5; n * 2],
            channels: 2,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn low_water_drives_refill() {
        let mut q = PlaybackQueue::new(100);
        assert!(q.needs_refill());
        q.push(0, frame(150));
        assert!(!q.needs_refill());
        let (taken, signal) = q.take(80);
        assert_eq!(taken.unwrap().frame_count(), 80);
        assert_eq!(signal, QueueSignal::Low);
        assert!(q.needs_refill());
    }

    #[test]
    fn take_splits_blocks() {
        let mut q = PlaybackQueue::new(10);
        q.push(0, frame(100));
        let (a, _) = q.take(30);
        assert_eq!(a.unwrap().frame_count(), 30);
        let (b, _) = q.take(100);
        assert_eq!(b.unwrap().frame_count(), 70);
    }

    #[test]
    fn stale_epoch_is_discarded() {
        let mut q = PlaybackQueue::new(10);
        let new_epoch = q.clear();
        assert!(!q.push(new_epoch - 1, frame(50)));
        assert!(q.push(new_epoch, frame(50)));
        assert_eq!(q.buffered_frames(), 50);
    }

    #[test]
    fn empty_queue_signals_underflow_then_ended() {
        let mut q = PlaybackQueue::new(10);
        let (none, signal) = q.take(10);
        assert!(none.is_none());
        assert_eq!(signal, QueueSignal::Underflow);
        q.mark_ended(0);
        let (none, signal) = q.take(10);
        assert!(none.is_none());
        assert_eq!(signal, QueueSignal::Ended);
    }
}

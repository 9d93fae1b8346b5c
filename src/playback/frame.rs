//! Display-frame callback queue.
//!
//! Hosts own the real frame clock. This queue only tracks which callbacks are
//! outstanding so that each loop can be cancelled by handle, and so that a
//! loop is never scheduled twice.

use std::collections::BTreeMap;

/// Opaque handle to one pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Which loop a frame callback belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// Discrete step clock.
    Scheduler,
    /// Continuous actor motion.
    Motion,
}

/// Pending frame callbacks, fired in request order.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: BTreeMap<FrameHandle, LoopKind>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a callback on the next display frame.
    pub fn request(&mut self, kind: LoopKind) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending.insert(handle, kind);
        log::trace!("frame {} requested for {kind:?}", handle.0);
        handle
    }

    /// Cancel a pending callback. Returns false if it already fired or was
    /// already cancelled.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    /// Whether `handle` is still waiting to fire.
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Number of outstanding callbacks for one loop.
    pub fn pending(&self, kind: LoopKind) -> usize {
        self.pending.values().filter(|k| **k == kind).count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every callback due this frame.
    ///
    /// Callbacks requested while the drained batch is processed wait for
    /// the next frame.
    pub fn drain(&mut self) -> Vec<(FrameHandle, LoopKind)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Drop every pending callback.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let mut frames = FrameQueue::new();
        let handle = frames.request(LoopKind::Scheduler);
        assert!(frames.is_pending(handle));
        assert!(frames.cancel(handle));
        assert!(!frames.cancel(handle));
        assert!(frames.is_idle());
    }

    #[test]
    fn test_drain_preserves_request_order() {
        let mut frames = FrameQueue::new();
        let a = frames.request(LoopKind::Motion);
        let b = frames.request(LoopKind::Scheduler);
        assert_eq!(frames.pending(LoopKind::Motion), 1);
        assert_eq!(frames.pending(LoopKind::Scheduler), 1);

        let due = frames.drain();
        assert_eq!(due, vec![(a, LoopKind::Motion), (b, LoopKind::Scheduler)]);
        assert!(frames.is_idle());

        let c = frames.request(LoopKind::Motion);
        assert!(c > b);
        assert!(!frames.cancel(a));
    }
}

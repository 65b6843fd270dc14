/// Single-slot trailing debounce.
///
/// Holds at most one pending value. Queueing again replaces it and restarts
/// the quiet period, so only the last value of a burst becomes ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

/// Debounces document conversions, keyed by buffer revision.
pub type RenderDebouncer = Debouncer<u64>;

impl<T: Copy> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn queue(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// Returns the pending value once `delay_ms` have passed since it was queued.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let (value, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some(value)
        } else {
            None
        }
    }

    pub fn due_in(&self, now_ms: u64) -> Option<u64> {
        let (_, queued_at) = self.pending?;
        Some(queued_at.saturating_add(self.delay_ms).saturating_sub(now_ms))
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<T> {
        self.pending.map(|(value, _)| value)
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

use super::ANIMATION_DURATION;
use std::fmt;

/// Outcome of advancing the hand by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Running,
    Finished,
    /// A newer rotation replaced the one this frame belonged to.
    Cancelled,
}

/// A single hand sweep from `from` to `from + delta`, sampled against frame
/// clock timestamps (microseconds). The first sampled frame marks the start.
#[derive(Debug, Clone, PartialEq)]
pub struct HandAnimation {
    pub generation: u64,
    pub from: f64,
    pub delta: f64,
    started_at: Option<i64>,
}

impl HandAnimation {
    pub fn new(generation: u64, from: f64, to: f64) -> Self {
        Self {
            generation,
            from,
            delta: to - from,
            started_at: None,
        }
    }

    pub fn target(&self) -> f64 {
        self.from + self.delta
    }

    /// Returns the angle for the frame at `now` and whether the sweep is done.
    pub fn sample(&mut self, now: i64) -> (f64, bool) {
        let start = *self.started_at.get_or_insert(now);
        let elapsed = (now - start).max(0) as f64;
        let progress = (elapsed / ANIMATION_DURATION.as_micros() as f64).min(1.0);
        if progress >= 1.0 {
            return (self.target(), true);
        }
        (self.from + ease(progress) * self.delta, false)
    }
}

/// Quadratic ease-in.
pub fn ease(progress: f64) -> f64 {
    progress.powi(2)
}

/// Callback run once when the next animated rotation finishes.
pub struct OnComplete(Box<dyn FnOnce() + 'static>);

impl OnComplete {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn call(self) {
        (self.0)()
    }
}

impl fmt::Debug for OnComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnComplete(..)")
    }
}

/// One-shot subscriptions to the end of the next hand transition. Every
/// registered callback fires at most once and is detached when it does.
#[derive(Debug, Default)]
pub struct TransitionListeners {
    pending: Vec<OnComplete>,
}

impl TransitionListeners {
    pub fn register(&mut self, callback: OnComplete) {
        self.pending.push(callback);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Runs and drops every pending callback. Returns how many fired.
    pub fn fire(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let fired = pending.len();
        pending.into_iter().for_each(OnComplete::call);
        fired
    }
}

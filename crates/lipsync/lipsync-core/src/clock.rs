//! Wall-clock abstraction.
//!
//! The scheduler never samples the system clock directly: hosts inject a
//! [`Clock`] so frame timing is testable without real timers, and so the same
//! code runs on native and wasm32 targets (via the `instant` crate).

use core::cell::Cell;

/// Source of the current time, in seconds from an arbitrary fixed origin.
/// Must be monotonic for the duration of a playback session.
pub trait Clock: core::fmt::Debug {
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> f64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    #[inline]
    fn now(&self) -> f64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    #[inline]
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Monotonic clock counting seconds since its creation.
#[derive(Debug)]
pub struct SystemClock {
    epoch: instant::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: instant::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests: time only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    time: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(time: f64) -> Self {
        Self { time: Cell::new(time) }
    }

    pub fn set(&self, time: f64) {
        self.time.set(time);
    }

    pub fn advance(&self, dt: f64) {
        self.time.set(self.time.get() + dt);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> f64 {
        self.time.get()
    }
}

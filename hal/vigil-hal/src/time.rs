//! Time source abstractions

/// Monotonic millisecond clock
///
/// Counts from board start-up and never goes backwards. Blocking waits are
/// not part of this trait; they go through `embedded_hal::delay::DelayNs`.
pub trait Monotonic {
    /// Milliseconds elapsed since start-up
    fn now_ms(&self) -> u64;

    /// Whole seconds elapsed since start-up
    fn uptime_secs(&self) -> u64 {
        self.now_ms() / 1000
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u64 {
        T::now_ms(self)
    }
}

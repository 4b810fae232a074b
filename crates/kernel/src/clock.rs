/// Elapsed simulation time, advanced once per frame by the host.
///
/// Stored as `f64` so long sessions do not lose sub-frame precision in the
/// driver's wave arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    elapsed: f64,
    frame: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative or non-finite values are ignored so
    /// elapsed time stays monotonic.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if dt.is_finite() && dt >= 0.0 {
            self.elapsed += dt;
            self.frame += 1;
        } else {
            tracing::warn!(dt, "ignoring clock advance with invalid dt");
        }
        self.elapsed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of accepted advances.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn restart(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates() {
        let mut c = Clock::new();
        c.advance(0.5);
        assert_eq!(c.advance(0.25), 0.75);
        assert_eq!(c.frame(), 2);
    }

    #[test]
    fn clock_rejects_backwards_time() {
        let mut c = Clock::new();
        c.advance(1.0);
        c.advance(-0.5);
        c.advance(f64::NAN);
        c.advance(f64::INFINITY);
        assert_eq!(c.elapsed(), 1.0);
        assert_eq!(c.frame(), 1);
    }

    #[test]
    fn zero_dt_still_counts_a_frame() {
        let mut c = Clock::new();
        c.advance(0.0);
        assert_eq!(c.elapsed(), 0.0);
        assert_eq!(c.frame(), 1);
    }

    #[test]
    fn restart_resets() {
        let mut c = Clock::new();
        c.advance(3.0);
        c.restart();
        assert_eq!(c, Clock::default());
    }
}

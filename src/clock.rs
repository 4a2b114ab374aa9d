use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::Ms;

/// Supplies the current instant. Injected into the engine so tests can pin
/// "now" to a fixed value.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Ms;
}

/// Wall clock, unix milliseconds.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Ms {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as Ms
    }
}

/// A clock frozen at a single instant.
pub struct FixedClock(pub Ms);

impl Clock for FixedClock {
    fn now_ms(&self) -> Ms {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(a > 1_600_000_000_000); // sanity: after 2020
    }

    #[test]
    fn fixed_clock_stays_put() {
        let clock = FixedClock(42);
        assert_eq!(clock.now_ms(), 42);
        assert_eq!(clock.now_ms(), 42);
    }
}

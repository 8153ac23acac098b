use std::time::{Duration, Instant};

/// Linear fade of one slot towards a target byte.
///
/// The offset from the start value is recomputed from the time since the fade
/// started, so rounding never accumulates over many short steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Fader {
    start: Instant,
    duration: Duration,
    /// Value units per millisecond, negative when fading down.
    velocity: f64,
    target: u8,
    /// Offset already added to the slot.
    applied: i64,
}

impl Fader {
    /// A fade from `from` to `target`. Returns `None` if there is nothing to
    /// fade, i.e. zero velocity.
    pub fn new(start: Instant, from: u8, target: u8, duration: Duration) -> Option<Self> {
        let ms = duration.as_secs_f64() * 1000.0;
        if ms <= 0.0 {
            return None;
        }
        let velocity = (target as f64 - from as f64) / ms;
        if velocity == 0.0 {
            return None;
        }
        Some(Self {
            start,
            duration,
            velocity,
            target,
            applied: 0,
        })
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// The value of a slot currently holding `current`, advanced to `now`.
    pub fn advance(&mut self, current: u8, now: Instant) -> u8 {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration {
            return self.target;
        }

        let total = (elapsed.as_secs_f64() * 1000.0 * self.velocity).floor() as i64;
        let delta = total - self.applied;
        if delta == 0 {
            return current;
        }
        self.applied = total;

        let next = current as i64 + delta;
        let remaining = self.target as i64 - next;
        if delta.signum() != remaining.signum() {
            // overshoot
            self.target
        } else {
            u8::try_from(next).unwrap_or(self.target)
        }
    }
}

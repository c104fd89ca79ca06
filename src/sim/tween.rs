//! Interpolated value animations
//!
//! A tween runs alongside the tick loop and never blocks it. The owner
//! advances it with the frame delta and reacts when `advance` reports
//! completion (the completion hook).

use std::time::Duration;

/// How many times a tween plays after the first cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Forever,
}

/// Linear tween between two values
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    /// Duration of one leg (from -> to)
    leg: Duration,
    /// Play back to `from` after each leg
    yoyo: bool,
    repeat: Repeat,
    elapsed: Duration,
    finished: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, leg: Duration) -> Self {
        Self {
            from,
            to,
            leg,
            yoyo: false,
            repeat: Repeat::Times(0),
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    fn cycle(&self) -> Duration {
        if self.yoyo { self.leg * 2 } else { self.leg }
    }

    /// Total running time, `None` for endless tweens
    pub fn total(&self) -> Option<Duration> {
        match self.repeat {
            Repeat::Times(n) => Some(self.cycle() * (n + 1)),
            Repeat::Forever => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `dt`. Returns true exactly once, on the call that completes it.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.finished {
            return false;
        }
        self.elapsed += dt;
        if let Some(total) = self.total() {
            if self.elapsed >= total {
                self.elapsed = total;
                self.finished = true;
                return true;
            }
        }
        false
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        let leg = self.leg.as_secs_f32();
        if leg <= 0.0 {
            return self.to;
        }
        if self.finished {
            return if self.yoyo { self.from } else { self.to };
        }

        let cycle = self.cycle().as_secs_f32();
        let in_cycle = self.elapsed.as_secs_f32() % cycle;
        let t = if in_cycle <= leg {
            in_cycle / leg
        } else {
            // Playing back
            1.0 - (in_cycle - leg) / leg
        };
        self.from + (self.to - self.from) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_yoyo_tween_total_and_completion() {
        let mut tween = Tween::new(1.0, 0.5, ms(100)).yoyo().repeat(Repeat::Times(2));
        assert_eq!(tween.total(), Some(ms(600)));

        let mut completions = 0;
        for _ in 0..59 {
            if tween.advance(ms(10)) {
                completions += 1;
            }
        }
        assert_eq!(completions, 0);
        assert!(tween.advance(ms(10)));
        assert!(!tween.advance(ms(10)));
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn test_yoyo_value_goes_there_and_back() {
        let mut tween = Tween::new(1.0, 0.0, ms(200)).yoyo().repeat(Repeat::Forever);
        tween.advance(ms(100));
        assert!((tween.value() - 0.5).abs() < 1e-4);
        tween.advance(ms(100));
        assert!(tween.value().abs() < 1e-4);
        tween.advance(ms(100));
        assert!((tween.value() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_forever_never_finishes() {
        let mut tween = Tween::new(0.0, 1.0, ms(50)).repeat(Repeat::Forever);
        for _ in 0..1000 {
            assert!(!tween.advance(ms(16)));
        }
        assert!(!tween.is_finished());
        assert_eq!(tween.total(), None);
    }
}

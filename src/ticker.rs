/// Periodic trigger driven by frame time.
///
/// Fires on the very first tick, then every `interval` seconds. Overshoot is
/// carried into the next period so the cadence does not drift with frame
/// timing.
pub struct Ticker {
    interval: f32,
    elapsed: f32,
    started: bool,
}

impl Ticker {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            elapsed: 0.0,
            started: false,
        }
    }

    /// Returns how many triggers are due after `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> u32 {
        let mut fired = 0;
        if !self.started {
            self.started = true;
            fired += 1;
        } else {
            self.elapsed += dt;
        }
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_immediately_on_first_tick() {
        let mut ticker = Ticker::new(5.0);
        assert_eq!(ticker.tick(0.0), 1);
        assert_eq!(ticker.tick(1.0), 0);
    }

    #[test]
    fn fires_once_per_interval() {
        let mut ticker = Ticker::new(5.0);
        ticker.tick(0.0);
        let mut total = 0;
        for _ in 0..20 {
            total += ticker.tick(1.0);
        }
        assert_eq!(total, 4);
    }

    #[test]
    fn long_frames_fire_every_missed_period() {
        let mut ticker = Ticker::new(5.0);
        ticker.tick(0.0);
        assert_eq!(ticker.tick(12.0), 2);
        assert_eq!(ticker.tick(3.0), 1);
    }
}

use stopwatch::Stopwatch;

const SMOOTHING: f64 = 0.9;

/// Rolling samples-per-second tracker.
///
/// `tic` starts the clock; each `steptoc` marks one processed sample and
/// folds the instantaneous rate into an exponentially smoothed figure so a
/// single late sample does not swing the reported value.
pub struct Fps {
    watch: Stopwatch,
    rate: f64,
    steps: u64,
}

impl Fps {
    pub fn new() -> Fps {
        Fps {
            watch: Stopwatch::new(),
            rate: 0.,
            steps: 0,
        }
    }

    /// Starts (or restarts) the clock and clears the rate.
    pub fn tic(&mut self) {
        self.watch.restart();
        self.rate = 0.;
        self.steps = 0;
    }

    /// Marks one processed sample and refreshes the rolling rate.
    pub fn steptoc(&mut self) {
        let elapsed = self.watch.elapsed();
        self.watch.restart();
        let secs = elapsed.as_secs_f64();
        if secs <= 0. {
            return;
        }
        let instant_rate = 1. / secs;
        self.rate = if self.steps == 0 {
            instant_rate
        } else {
            SMOOTHING * self.rate + (1. - SMOOTHING) * instant_rate
        };
        self.steps += 1;
    }

    /// Current samples-per-second figure; zero until the first step lands.
    pub fn fps(&self) -> f64 {
        self.rate
    }
}

impl Default for Fps {
    fn default() -> Fps {
        Fps::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn zero_before_first_step() {
        let mut fps = Fps::new();
        fps.tic();
        assert_eq!(fps.fps(), 0.);
    }

    #[test]
    fn single_step_reports_instant_rate() {
        let mut fps = Fps::new();
        fps.tic();
        thread::sleep(Duration::from_millis(10));
        fps.steptoc();
        // 10ms nominal spacing; allow generous slop for scheduler jitter
        assert!(fps.fps() > 1., "fps was {}", fps.fps());
        assert!(fps.fps() < 150., "fps was {}", fps.fps());
    }

    #[test]
    fn rate_tracks_repeated_steps() {
        let mut fps = Fps::new();
        fps.tic();
        for _ in 0..5 {
            thread::sleep(Duration::from_millis(5));
            fps.steptoc();
        }
        assert!(fps.fps() > 1.);
    }

    #[test]
    fn tic_resets_the_rate() {
        let mut fps = Fps::new();
        fps.tic();
        thread::sleep(Duration::from_millis(5));
        fps.steptoc();
        fps.tic();
        assert_eq!(fps.fps(), 0.);
    }
}

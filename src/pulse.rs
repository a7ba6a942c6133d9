use crate::error::{Error, Result};

/// Parameters describing a repeated rectangular pulse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PulseParams {
    pub amplitude: f32,
    /// Samples per second.
    pub sample_rate: u32,
    /// Fraction of each period spent at full amplitude, in `[0, 1]`.
    pub duty_cycle: f32,
    /// Length of a single period in seconds.
    pub period: f32,
    /// Number of identical periods in the train.
    pub repetitions: u32,
}

impl PulseParams {
    pub fn validate(&self) -> Result<()> {
        if !self.amplitude.is_finite() {
            return Err(Error::config(format!(
                "amplitude must be finite, got {}",
                self.amplitude
            )));
        }
        if self.sample_rate == 0 {
            return Err(Error::config("sample rate must be above zero"));
        }
        if !self.duty_cycle.is_finite() || self.duty_cycle < 0. || self.duty_cycle > 1. {
            return Err(Error::config(format!(
                "duty cycle must be within [0, 1], got {}",
                self.duty_cycle
            )));
        }
        if !self.period.is_finite() || self.period <= 0. {
            return Err(Error::config(format!(
                "period must be a positive number of seconds, got {}",
                self.period
            )));
        }
        if self.repetitions == 0 {
            return Err(Error::config("repetition count must be above zero"));
        }
        if self.samples_per_period() == 0 {
            return Err(Error::config(format!(
                "period of {}s is shorter than one sample at {} Hz",
                self.period, self.sample_rate
            )));
        }
        if (self.sample_rate as f64 * self.period as f64) >= usize::MAX as f64 {
            return Err(Error::config(format!(
                "period of {}s at {} Hz does not fit in an addressable sample count",
                self.period, self.sample_rate
            )));
        }
        Ok(())
    }

    /// Sample count covering one period, truncated toward zero.
    fn samples_per_period(&self) -> usize {
        (self.sample_rate as f64 * self.period as f64) as usize
    }
}

/// A generated pulse train paired with its time axis.
///
/// `samples[i]` is the signal value at `time[i]` seconds. Both vectors
/// always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseTrain {
    pub samples: Vec<f32>,
    pub time: Vec<f32>,
}

impl PulseTrain {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Builds `repetitions` back-to-back rectangular pulses.
///
/// Within each period the first `floor(samples_per_period * duty_cycle)`
/// samples sit at `amplitude` and the rest at zero. Pulse `i` starts at
/// sample `i * samples_per_period`, so the pattern repeats without phase
/// drift even when `sample_rate * period` is fractional. The time axis
/// spans `[0, repetitions * period)` with the endpoint excluded.
pub fn generate_pulse_train(params: &PulseParams) -> Result<PulseTrain> {
    params.validate()?;

    let samples_per_period = params.samples_per_period();
    let pulse_width = (samples_per_period as f64 * params.duty_cycle as f64).floor() as usize;
    let len = samples_per_period
        .checked_mul(params.repetitions as usize)
        .ok_or_else(|| {
            Error::config(format!(
                "{} periods of {} samples each overflow the maximum train length",
                params.repetitions, samples_per_period
            ))
        })?;

    let mut samples = vec![0.; len];
    for i in 0..params.repetitions as usize {
        let start = i * samples_per_period;
        for sample in &mut samples[start..start + pulse_width] {
            *sample = params.amplitude;
        }
    }

    let total_duration = params.repetitions as f64 * params.period as f64;
    let step = total_duration / len as f64;
    let time = (0..len).map(|i| (i as f64 * step) as f32).collect();

    Ok(PulseTrain { samples, time })
}

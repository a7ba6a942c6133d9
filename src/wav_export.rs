use std::path::Path;

use num::ToPrimitive;

use crate::error::{Error, Result};

const FULL_SCALE: f32 = i16::MAX as f32;

/// Writes `samples` as a mono 16-bit signed WAV file at `sample_rate` Hz.
///
/// The signal is linearly scaled so its peak absolute sample lands exactly
/// on the format's maximum positive value. An all-zero signal is written
/// unscaled as silence.
pub fn write_wav<T, P>(path: P, sample_rate: u32, samples: &[T]) -> Result<()>
where
    T: ToPrimitive,
    P: AsRef<Path>,
{
    if sample_rate == 0 {
        return Err(Error::config("sample rate must be above zero"));
    }

    let samples: Vec<f32> = samples
        .iter()
        .map(|s| {
            s.to_f32()
                .ok_or_else(|| Error::config("sample not representable as f32"))
        })
        .collect::<Result<_>>()?;

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in normalized(&samples) {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Scales so the peak absolute sample maps to `i16::MAX`.
///
/// Dividing by the peak before multiplying keeps the peak itself exact:
/// `peak / peak == 1.0`, so it always lands on full scale. Precomputing a
/// `FULL_SCALE / peak` factor instead rounds twice and can leave the peak
/// one step short.
fn normalized(samples: &[f32]) -> Vec<i16> {
    let peak = samples.iter().fold(0f32, |acc, s| acc.max(s.abs()));
    if peak == 0. {
        return vec![0; samples.len()];
    }
    samples
        .iter()
        .map(|s| (s / peak * FULL_SCALE) as i16)
        .collect()
}

pub mod chart;
pub mod error;
pub mod fps;
pub mod pulse;
pub mod recorder;
pub mod source;
pub mod wav_export;

#[cfg(test)]
mod test_utils;

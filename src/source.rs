use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use log::{info, warn};
use rand::Rng;

use crate::error::{Error, Result};

pub const SIMULATED_INTERVAL: Duration = Duration::from_millis(500);
pub const SIMULATED_SAMPLE_COUNT: usize = 30;
const SIMULATED_RANGE: (i32, i32) = (-20_000, 20_000);

/// A push-based producer of scalar samples.
///
/// `stream` blocks until the source is exhausted or `cancel` is raised,
/// then returns, dropping the sender so the receiving side unblocks.
pub trait SampleSource {
    fn label(&self) -> &str;
    fn stream(self, sender: Sender<f32>, cancel: &AtomicBool);
}

/// Emits uniformly random samples at a fixed interval.
///
/// Stand-in for a physical acquisition board: one periodic loop checking a
/// cancel flag between sends, rather than a timer that reschedules itself.
pub struct SimulatedSource {
    pub interval: Duration,
    pub count: usize,
}

impl Default for SimulatedSource {
    fn default() -> SimulatedSource {
        SimulatedSource {
            interval: SIMULATED_INTERVAL,
            count: SIMULATED_SAMPLE_COUNT,
        }
    }
}

impl SampleSource for SimulatedSource {
    fn label(&self) -> &str {
        "simulated"
    }

    fn stream(self, sender: Sender<f32>, cancel: &AtomicBool) {
        let mut rng = rand::thread_rng();
        for _ in 0..self.count {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let value = rng.gen_range(SIMULATED_RANGE.0..=SIMULATED_RANGE.1) as f32;
            if sender.send(value).is_err() {
                break;
            }
            thread::sleep(self.interval);
        }
        info!("simulated stream finished");
    }
}

/// Thin binding to an acquisition device exposed as a path emitting one
/// numeric sample per line.
pub struct BoardSource {
    path: PathBuf,
    reader: BufReader<File>,
}

impl BoardSource {
    /// Opens the device path. An unreachable device surfaces as a
    /// connectivity error the caller can recover from.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<BoardSource> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|err| {
            Error::connectivity(format!("cannot open device {}: {}", path.display(), err))
        })?;
        info!("connected to device at {}", path.display());
        Ok(BoardSource {
            path,
            reader: BufReader::new(file),
        })
    }
}

impl SampleSource for BoardSource {
    fn label(&self) -> &str {
        "board"
    }

    fn stream(mut self, sender: Sender<f32>, cancel: &AtomicBool) {
        let mut line = String::new();
        loop {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => match line.trim().parse::<f32>() {
                    Ok(value) => {
                        if sender.send(value).is_err() {
                            break;
                        }
                    }
                    Err(_) => warn!(
                        "skipping malformed sample from {}: {:?}",
                        self.path.display(),
                        line.trim()
                    ),
                },
                Err(err) => {
                    warn!("device read failed on {}: {}", self.path.display(), err);
                    break;
                }
            }
        }
    }
}

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{info, warn};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::Result;
use crate::fps::Fps;
use crate::source::SampleSource;

/// Number of records kept around for display; older ones are evicted.
pub const DISPLAY_LEN: usize = 20;
const LOG_HEADER: &str = "timestamp;fps;value";

/// One recorded sample as it appears in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Elapsed wall-clock time since recording began, formatted HH:MM:SS.
    pub timestamp: String,
    pub fps: f64,
    pub value: f32,
}

/// Owns the log sink, the bounded display buffer, and the clocks.
///
/// Lifecycle is explicit: `create` opens the sink and writes the header,
/// `handle_sample` ingests one value, `finish` flushes and closes.
pub struct Recorder {
    started: Instant,
    fps: Fps,
    display: VecDeque<Record>,
    sink: BufWriter<File>,
    path: PathBuf,
}

impl Recorder {
    /// Creates a recorder logging to a timestamped `output_HH-MM-SS.txt`
    /// inside `dir`.
    pub fn create_in<P: AsRef<Path>>(dir: P) -> Result<Recorder> {
        let name = format!("output_{}.txt", filename_stamp());
        Recorder::create(dir.as_ref().join(name))
    }

    pub fn create<P: AsRef<Path>>(path: P) -> Result<Recorder> {
        let path = path.as_ref().to_path_buf();
        let mut sink = BufWriter::new(File::create(&path)?);
        writeln!(sink, "{}", LOG_HEADER)?;

        let mut fps = Fps::new();
        fps.tic();

        Ok(Recorder {
            started: Instant::now(),
            fps,
            display: VecDeque::with_capacity(DISPLAY_LEN),
            sink,
            path,
        })
    }

    /// Ingests one sample: steps the fps clock, appends a log line, and
    /// pushes the record into the display buffer, evicting the oldest
    /// entry once `DISPLAY_LEN` is reached.
    pub fn handle_sample(&mut self, value: f32) -> Result<()> {
        self.fps.steptoc();
        let record = Record {
            timestamp: format_elapsed(self.started.elapsed().as_secs()),
            fps: self.fps.fps(),
            value,
        };
        writeln!(
            self.sink,
            "{};{};{}",
            record.timestamp, record.fps, record.value
        )?;

        if self.display.len() == DISPLAY_LEN {
            self.display.pop_front();
        }
        self.display.push_back(record);
        Ok(())
    }

    /// Records currently held for display, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.display.iter()
    }

    pub fn latest(&self) -> Option<&Record> {
        self.display.back()
    }

    pub fn log_path(&self) -> &Path {
        &self.path
    }

    /// Flushes and closes the log sink, returning its path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.sink.flush()?;
        Ok(self.path)
    }
}

fn format_elapsed(total_seconds: u64) -> String {
    let (hours, remainder) = (total_seconds / 3600, total_seconds % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

fn filename_stamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = format_description!("[hour]-[minute]-[second]");
    now.format(&format).unwrap_or_else(|_| String::from("00-00-00"))
}

/// Runs a sample source on a single background thread, feeding a recorder
/// through a channel on the foreground side.
pub struct Session {
    worker: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
    receiver: Receiver<f32>,
    recorder: Recorder,
    label: String,
}

impl Session {
    /// Spawns one worker thread running `source` and takes ownership of
    /// `recorder` for the duration of the session.
    pub fn start<S>(source: S, recorder: Recorder) -> Session
    where
        S: SampleSource + Send + 'static,
    {
        let (sender, receiver) = channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let label = source.label().to_string();

        let worker_cancel = Arc::clone(&cancel);
        let worker = thread::spawn(move || {
            source.stream(sender, &worker_cancel);
        });

        info!("session started with {} source", label);
        Session {
            worker,
            cancel,
            receiver,
            recorder,
            label,
        }
    }

    /// Blocks until the source is exhausted, ingesting every sample.
    /// `on_record` sees each record as it lands; this is the display hook.
    pub fn run<F>(&mut self, mut on_record: F) -> Result<()>
    where
        F: FnMut(&Record),
    {
        while let Ok(value) = self.receiver.recv() {
            self.recorder.handle_sample(value)?;
            if let Some(record) = self.recorder.latest() {
                on_record(record);
            }
        }
        Ok(())
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Raises the cancel flag, joins the worker, drains any samples it
    /// produced before stopping, and hands the recorder back.
    pub fn stop(self) -> Result<Recorder> {
        let Session {
            worker,
            cancel,
            receiver,
            mut recorder,
            label,
        } = self;

        cancel.store(true, Ordering::Relaxed);
        if worker.join().is_err() {
            warn!("{} source worker panicked", label);
        }
        for value in receiver.try_iter() {
            recorder.handle_sample(value)?;
        }

        info!("session stopped, log at {}", recorder.log_path().display());
        Ok(recorder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SimulatedSource;
    use crate::test_utils::*;
    use std::fs;
    use std::time::Duration;

    mod recorder {
        use super::*;

        #[test]
        fn log_starts_with_the_header() {
            let path = temp_path("recorder_header.txt");
            let recorder = Recorder::create(&path).unwrap();
            recorder.finish().unwrap();

            let contents = fs::read_to_string(&path).unwrap();
            assert_eq!(contents.lines().next(), Some("timestamp;fps;value"));
            fs::remove_file(&path).ok();
        }

        #[test]
        fn lines_are_semicolon_delimited() {
            let path = temp_path("recorder_lines.txt");
            let mut recorder = Recorder::create(&path).unwrap();
            recorder.handle_sample(12.5).unwrap();
            recorder.handle_sample(-3.).unwrap();
            recorder.finish().unwrap();

            let contents = fs::read_to_string(&path).unwrap();
            let lines: Vec<&str> = contents.lines().collect();
            assert_eq!(lines.len(), 3);
            for line in &lines[1..] {
                assert_eq!(line.split(';').count(), 3, "line was {:?}", line);
                assert!(line.starts_with("00:00:0"), "line was {:?}", line);
            }
            assert!(lines[1].ends_with(";12.5"));
            assert!(lines[2].ends_with(";-3"));
            fs::remove_file(&path).ok();
        }

        #[test]
        fn display_buffer_keeps_the_last_twenty() {
            let path = temp_path("recorder_display.txt");
            let mut recorder = Recorder::create(&path).unwrap();
            for i in 0..25 {
                recorder.handle_sample(i as f32).unwrap();
            }

            assert_eq!(recorder.records().count(), DISPLAY_LEN);
            let values: Vec<f32> = recorder.records().map(|r| r.value).collect();
            assert_almost_eq(values[0], 5.);
            assert_almost_eq(*values.last().unwrap(), 24.);
            assert_almost_eq(recorder.latest().unwrap().value, 24.);

            recorder.finish().unwrap();
            fs::remove_file(&path).ok();
        }

        #[test]
        fn elapsed_formatting_rolls_over_units() {
            assert_eq!(format_elapsed(0), "00:00:00");
            assert_eq!(format_elapsed(59), "00:00:59");
            assert_eq!(format_elapsed(61), "00:01:01");
            assert_eq!(format_elapsed(3600 + 2 * 60 + 3), "01:02:03");
        }
    }

    mod session {
        use super::*;

        #[test]
        fn runs_a_source_to_exhaustion() {
            let path = temp_path("session_run.txt");
            let recorder = Recorder::create(&path).unwrap();
            let source = SimulatedSource {
                interval: Duration::from_millis(1),
                count: 5,
            };

            let mut session = Session::start(source, recorder);
            let mut seen = 0;
            session.run(|_| seen += 1).unwrap();
            assert_eq!(seen, 5);

            let recorder = session.stop().unwrap();
            assert_eq!(recorder.records().count(), 5);
            let log_path = recorder.finish().unwrap();

            let contents = fs::read_to_string(&log_path).unwrap();
            assert_eq!(contents.lines().count(), 6);
            fs::remove_file(&log_path).ok();
        }

        #[test]
        fn stop_cancels_a_long_running_source() {
            let path = temp_path("session_stop.txt");
            let recorder = Recorder::create(&path).unwrap();
            let source = SimulatedSource {
                interval: Duration::from_millis(50),
                count: 1000,
            };

            let session = Session::start(source, recorder);
            thread::sleep(Duration::from_millis(120));
            let recorder = session.stop().unwrap();

            let seen = recorder.records().count();
            assert!(seen >= 1, "no samples arrived before stop");
            assert!(seen < 1000, "source ran to completion despite stop");
            let log_path = recorder.finish().unwrap();
            fs::remove_file(&log_path).ok();
        }
    }
}

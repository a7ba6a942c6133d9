use std::process;
use std::str::FromStr;

use anyhow::Context;
use clap::{App, Arg, ArgMatches, SubCommand};
use log::error;

use pulsegen::chart;
use pulsegen::pulse::{generate_pulse_train, PulseParams};
use pulsegen::recorder::{Recorder, Session};
use pulsegen::source::{BoardSource, SimulatedSource};
use pulsegen::wav_export;

const AMPLITUDE_ARG: &str = "AMPLITUDE";
const RATE_ARG: &str = "RATE";
const DUTY_ARG: &str = "DUTY_CYCLE";
const PERIOD_ARG: &str = "PERIOD";
const REPS_ARG: &str = "REPETITIONS";
const OUT_PATH_ARG: &str = "OUT_PATH";
const CHART_PATH_ARG: &str = "CHART_PATH";
const TEST_ARG: &str = "TEST";
const PORT_ARG: &str = "PORT";

pub fn main() {
    env_logger::init();

    let mut app = App::new("pulsegen")
        .about("Pulse-train waveform generation and sample recording")
        .subcommand(generate_subcommand())
        .subcommand(stream_subcommand());
    let matches = app.clone().get_matches();

    let result = match matches.subcommand() {
        ("generate", Some(sub)) => run_generate(sub),
        ("stream", Some(sub)) => run_stream(sub),
        _ => {
            app.print_long_help().ok();
            println!();
            process::exit(2);
        }
    };

    if let Err(err) = result {
        error!("{:#}", err);
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn generate_subcommand<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("generate")
        .about("Generate a pulse-train WAV file")
        .arg(
            Arg::with_name(AMPLITUDE_ARG)
                .short("a")
                .long("amplitude")
                .help("Pulse amplitude")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::with_name(RATE_ARG)
                .short("f")
                .long("rate")
                .help("Sampling frequency in Hz")
                .takes_value(true)
                .default_value("1000"),
        )
        .arg(
            Arg::with_name(DUTY_ARG)
                .short("d")
                .long("duty")
                .help("Duty cycle as a fraction in [0, 1]")
                .takes_value(true)
                .default_value("0.5"),
        )
        .arg(
            Arg::with_name(PERIOD_ARG)
                .short("t")
                .long("period")
                .help("Length of one period in seconds")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::with_name(REPS_ARG)
                .short("n")
                .long("repetitions")
                .help("Number of pulse periods")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::with_name(OUT_PATH_ARG)
                .short("o")
                .long("output")
                .help("Target path to write audio, must be *.wav")
                .takes_value(true)
                .default_value("pulse_signal.wav"),
        )
        .arg(
            Arg::with_name(CHART_PATH_ARG)
                .long("chart")
                .help("Also write a PNG chart of the waveform to this path")
                .takes_value(true),
        )
}

fn stream_subcommand<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("stream")
        .about("Record samples from an acquisition device to a log file")
        .arg(
            Arg::with_name(TEST_ARG)
                .long("test")
                .help("Simulate a sample stream instead of connecting to a device"),
        )
        .arg(
            Arg::with_name(PORT_ARG)
                .short("p")
                .long("port")
                .help("Device path to read samples from")
                .takes_value(true)
                .default_value("/dev/ttyUSB0"),
        )
}

fn run_generate(matches: &ArgMatches) -> anyhow::Result<()> {
    let params = PulseParams {
        amplitude: parse_arg(matches, AMPLITUDE_ARG)?,
        sample_rate: parse_arg(matches, RATE_ARG)?,
        duty_cycle: parse_arg(matches, DUTY_ARG)?,
        period: parse_arg(matches, PERIOD_ARG)?,
        repetitions: parse_arg(matches, REPS_ARG)?,
    };
    let train = generate_pulse_train(&params)?;

    let out_path = matches.value_of(OUT_PATH_ARG).unwrap();
    wav_export::write_wav(out_path, params.sample_rate, &train.samples)?;
    println!("wrote {} samples to {}", train.len(), out_path);

    if let Some(chart_path) = matches.value_of(CHART_PATH_ARG) {
        chart::save_chart(chart_path, &train)?;
        println!("wrote chart to {}", chart_path);
    }
    Ok(())
}

fn run_stream(matches: &ArgMatches) -> anyhow::Result<()> {
    let recorder = Recorder::create_in(".")?;

    let mut session = if matches.is_present(TEST_ARG) {
        Session::start(SimulatedSource::default(), recorder)
    } else {
        let port = matches.value_of(PORT_ARG).unwrap();
        let source = BoardSource::open(port)
            .with_context(|| format!("could not connect to device on {}", port))?;
        Session::start(source, recorder)
    };

    session.run(|record| {
        println!("{};{};{}", record.timestamp, record.fps, record.value);
    })?;

    let recorder = session.stop()?;
    let log_path = recorder.finish()?;
    println!("log written to {}", log_path.display());
    Ok(())
}

fn parse_arg<T>(matches: &ArgMatches, name: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .value_of(name)
        .unwrap()
        .parse::<T>()
        .with_context(|| format!("invalid value for {}", name))
}

// Copyright 2020 TwoCookingMice

use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use mcvolume::app::{self, Outputs};
use mcvolume::plot::{PngPlotter, Visualizer};
use mcvolume::{EstimatorConfig, SampleBudget};

const USAGE: &str = "[prisms.txt] [--seed N] [--workers N] [--points N] [--timeout SECS] [--plot out.png]";

struct Options {
    input: PathBuf,
    config: EstimatorConfig,
    plot: Option<PathBuf>,
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    args.get(i)
        .ok_or_else(|| format!("{} needs a value", flag))?
        .parse::<T>()
        .map_err(|_| format!("invalid value for {}: {}", flag, args[i]))
}

fn parse_timeout(secs: f64) -> Option<Duration> {
    if secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut input = PathBuf::from("prisms.txt");
    let mut config = EstimatorConfig::default();
    let mut workers = config.budget.workers();
    let mut points = config.budget.points_per_worker();
    let mut plot = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                config.seed = parse_value(args, i, "--seed")?;
            }
            "--workers" => {
                i += 1;
                workers = parse_value(args, i, "--workers")?;
            }
            "--points" => {
                i += 1;
                points = parse_value(args, i, "--points")?;
            }
            "--timeout" => {
                i += 1;
                let secs: f64 = parse_value(args, i, "--timeout")?;
                config.task_timeout = Some(parse_timeout(secs)
                    .ok_or_else(|| format!("invalid value for --timeout: {}", args[i]))?);
            }
            "--plot" => {
                i += 1;
                plot = Some(PathBuf::from(parse_value::<String>(args, i, "--plot")?));
            }
            other if other.starts_with("--") => return Err(format!("unknown option: {}", other)),
            other => input = PathBuf::from(other),
        }
        i += 1;
    }

    config.budget = SampleBudget::new(workers, points).map_err(|err| err.to_string())?;
    Ok(Options { input, config, plot })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            let program = args.get(0).map(String::as_str).unwrap_or("mcvolume");
            eprintln!("Usage: {} {}", program, USAGE);
            std::process::exit(2);
        }
    };

    let mut plotter = options.plot.map(PngPlotter::new);
    let mut stdout = io::stdout();
    let outputs = Outputs {
        out: &mut stdout,
        styled: console::colors_enabled(),
        visualizer: plotter.as_mut().map(|p| p as &mut dyn Visualizer),
    };

    if let Err(err) = app::run_file(&options.input, &options.config, outputs) {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        // input problems and failed runs exit differently
        std::process::exit(if err.is_parse_stage() { 1 } else { 3 });
    }
}

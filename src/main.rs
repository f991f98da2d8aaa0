use std::path::PathBuf;
use std::process::{Command, ExitCode};
use std::time::Duration;

use log::{error, info};

use carbonrun::{RaplTracker, TrackingSession};

const USAGE: &str = "usage: carbonrun [--project NAME] [--output PATH] [--json] [--] [CMD [ARGS...]]
Tracks energy and emissions while CMD runs and writes one summary row to PATH
(default emissions.csv). Without CMD a short idle interval is measured.";

struct CliArgs {
    project: String,
    output: PathBuf,
    json: bool,
    command: Vec<String>,
}

impl CliArgs {
    fn parse(args: Vec<String>) -> Result<Self, String> {
        let mut parsed = Self {
            project: "carbonrun project".into(),
            output: PathBuf::from("emissions.csv"),
            json: false,
            command: Vec::new(),
        };

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--project" => {
                    parsed.project = iter.next().ok_or("--project needs a value")?;
                }
                "--output" => {
                    parsed.output = PathBuf::from(iter.next().ok_or("--output needs a value")?);
                }
                "--json" => parsed.json = true,
                "--help" | "-h" => return Err(USAGE.into()),
                "--" => {
                    parsed.command = iter.collect();
                    break;
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown option '{other}'"));
                }
                other => {
                    parsed.command = std::iter::once(other.to_owned()).chain(iter).collect();
                    break;
                }
            }
        }
        Ok(parsed)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = match CliArgs::parse(std::env::args().skip(1).collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let mut session = TrackingSession::new(args.project.clone(), RaplTracker::new());
    if let Err(err) = session.start() {
        error!("failed to start tracking: {err:#}");
        return ExitCode::FAILURE;
    }

    let child_code = if args.command.is_empty() {
        info!("no command given; measuring a short idle interval");
        std::thread::sleep(Duration::from_secs(1));
        0
    } else {
        match Command::new(&args.command[0])
            .args(&args.command[1..])
            .status()
        {
            Ok(status) => status.code().unwrap_or(1),
            Err(err) => {
                error!("failed to run {}: {err}", args.command[0]);
                1
            }
        }
    };

    let record = match session.stop(&args.output) {
        Ok(record) => record,
        Err(err) => {
            error!("failed to record the run: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&record) {
            Ok(json) => println!("{json}"),
            Err(err) => error!("failed to render record as JSON: {err}"),
        }
    }

    info!(
        "{}: {:.6} kg CO2eq over {:.1}s -> {}",
        record.project_name,
        record.emissions,
        record.duration,
        args.output.display(),
    );

    ExitCode::from(u8::try_from(child_code).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_command() {
        let args = CliArgs::parse(
            ["--project", "train-v2", "--output", "run.csv", "--", "sleep", "5"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        assert_eq!(args.project, "train-v2");
        assert_eq!(args.output, PathBuf::from("run.csv"));
        assert_eq!(args.command, vec!["sleep", "5"]);
    }

    #[test]
    fn bare_command_needs_no_separator() {
        let args = CliArgs::parse(
            ["python", "train.py", "--epochs", "3"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        assert_eq!(args.command, vec!["python", "train.py", "--epochs", "3"]);
    }

    #[test]
    fn unknown_option_is_rejected() {
        assert!(CliArgs::parse(vec!["--bogus".into()]).is_err());
    }

    #[test]
    fn defaults_apply_without_args() {
        let args = CliArgs::parse(Vec::new()).unwrap();
        assert_eq!(args.output, PathBuf::from("emissions.csv"));
        assert!(args.command.is_empty());
        assert!(!args.json);
    }
}

use clap::Parser;
use clap::error::ErrorKind;
use owo_colors::Stream;
use std::path::PathBuf;

use pureref_reorganize::commands::{self, ReorganizeOptions};
use pureref_reorganize::error_fmt::{AppError, SettingsResultExt};
use pureref_reorganize::settings::Settings;

#[derive(Parser)]
#[command(name = "reorganize", version)]
#[command(about = "Lay out the images of a PureRef board in a grid")]
struct Cli {
    /// PureRef file to read
    input: PathBuf,
    /// Where to write the reorganized board (overwritten if it exists)
    output: PathBuf,
    /// YAML settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Compute the grid and report it without writing the output file
    #[arg(long)]
    dry_run: bool,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => exit_with(AppError::Usage(e.render().to_string())),
        },
    };

    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        exit_with(e);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path).with_path(&path.display().to_string())?,
        None => Settings::default(),
    };

    let options = ReorganizeOptions {
        settings,
        dry_run: cli.dry_run,
    };
    commands::reorganize(&cli.input, &cli.output, &options)?;
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn exit_with(err: AppError) -> ! {
    let stream = err.stream();
    let report = err.report(stream);
    match stream {
        Stream::Stderr => eprintln!("{}", report),
        _ => println!("{}", report),
    }
    std::process::exit(err.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pureref_reorganize::{Board, BoardWriter, ImageElement, PurCodec};

    #[test]
    fn test_parse_input_and_output() {
        let cli = Cli::try_parse_from(["reorganize", "in.pur", "out.pur"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.pur"));
        assert_eq!(cli.output, PathBuf::from("out.pur"));
        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_missing_output_is_usage_error() {
        let err = Cli::try_parse_from(["reorganize", "in.pur"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert!(err.render().to_string().contains("Usage:"));
    }

    #[test]
    fn test_extra_argument_is_usage_error() {
        let result = Cli::try_parse_from(["reorganize", "a.pur", "b.pur", "c.pur"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "reorganize",
            "-vv",
            "--dry-run",
            "--config",
            "grid.yml",
            "in.pur",
            "out.pur",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.dry_run);
        assert_eq!(cli.config, Some(PathBuf::from("grid.yml")));
    }

    #[test]
    fn test_run_with_missing_config() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let input = dir.path().join("in.pur");
        let board = Board::with_images(vec![ImageElement::new(1, 50.0, 50.0)]);
        std::fs::write(&input, PurCodec.write(&board).unwrap()).unwrap();

        let cli = Cli {
            input,
            output: dir.path().join("out.pur"),
            config: Some(dir.path().join("missing.yml")),
            dry_run: false,
            verbose: 0,
        };

        let err = run(cli).unwrap_err();
        assert!(matches!(err, AppError::Settings { .. }));
        assert!(!dir.path().join("out.pur").exists());
    }

    #[test]
    fn test_run_with_config() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let input = dir.path().join("in.pur");
        let config = dir.path().join("grid.yml");
        let board = Board::with_images(vec![ImageElement::new(1, 50.0, 50.0)]);
        std::fs::write(&input, PurCodec.write(&board).unwrap()).unwrap();
        std::fs::write(&config, "padding: 0.5\n").unwrap();

        let cli = Cli {
            input,
            output: dir.path().join("out.pur"),
            config: Some(config),
            dry_run: false,
            verbose: 0,
        };

        run(cli).unwrap();
        assert!(dir.path().join("out.pur").exists());
    }
}

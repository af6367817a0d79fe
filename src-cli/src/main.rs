//! Siterec Command-Line Interface
//!
//! A headless CLI for recording browser test runs: captures the configured
//! display region, cropped to the browser content area, into a video file.

mod colors;
mod commands;
mod exit_codes;

use clap::{Parser, Subcommand};
use exit_codes::ExitCode;

/// Siterec - Browser-Run Screen Recording CLI
#[derive(Parser, Debug)]
#[command(name = "siterec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record the configured display into a video file
    Record(RecordArgs),
    /// Verify ffmpeg availability and platform capture support
    Check,
    /// Show version information
    Version,
}

#[derive(Parser, Debug, Clone)]
pub struct RecordArgs {
    /// Output file path (default: timestamped file in the Videos directory)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Auto-stop after duration (seconds); records until Ctrl-C when omitted
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Browser whose chrome determines the crop: firefox, chrome, edge, safari
    #[arg(short, long)]
    pub browser: Option<String>,

    /// Capture viewport as WxH (e.g. 1366x708)
    #[arg(long)]
    pub viewport: Option<String>,

    /// X display number to capture
    #[arg(long)]
    pub display: Option<u32>,

    /// Capture framerate
    #[arg(long)]
    pub framerate: Option<u32>,

    /// Encoder quality (constant rate factor)
    #[arg(long)]
    pub crf: Option<u32>,

    /// Capture process priority adjustment
    #[arg(long)]
    pub nice: Option<i32>,

    /// Rename the captured file into place instead of transcoding it
    #[arg(long)]
    pub no_convert: bool,

    /// Result directory; pre-existing output files there are replaced
    #[arg(long)]
    pub result_dir: Option<String>,
}

fn init_tracing(verbose: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Daily-rolling file log in the platform log directory; skipped if the
    // directory can't be created.
    let (file_layer, guard) = match siterec_types::logging::ensure_log_dir() {
        Ok(()) => {
            let appender =
                tracing_appender::rolling::daily(siterec_types::logging::log_dir(), "siterec.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime");

    let exit_code = runtime.block_on(run(cli));
    std::process::exit(exit_code.as_i32());
}

async fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Commands::Record(args) => commands::record(args, cli.json, cli.quiet).await,
        Commands::Check => commands::check(cli.json, cli.quiet).await,
        Commands::Version => {
            commands::version(cli.json);
            ExitCode::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// Verify the CLI definition is valid
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    /// Test parsing 'record' with defaults
    #[test]
    fn parse_record_defaults() {
        let cli = Cli::try_parse_from(["siterec", "record"]).unwrap();
        assert!(!cli.json);
        assert!(!cli.quiet);
        match cli.command {
            Commands::Record(args) => {
                assert!(args.output.is_none());
                assert!(args.duration.is_none());
                assert!(args.browser.is_none());
                assert!(!args.no_convert);
            }
            _ => panic!("Expected Record command"),
        }
    }

    /// Test parsing 'record' with output options
    #[test]
    fn parse_record_with_options() {
        let cli = Cli::try_parse_from([
            "siterec",
            "record",
            "-o",
            "/tmp/run.mp4",
            "-d",
            "60",
            "-b",
            "firefox",
            "--viewport",
            "1280x720",
            "--crf",
            "18",
            "--no-convert",
        ])
        .unwrap();
        match cli.command {
            Commands::Record(args) => {
                assert_eq!(args.output, Some("/tmp/run.mp4".to_string()));
                assert_eq!(args.duration, Some(60));
                assert_eq!(args.browser, Some("firefox".to_string()));
                assert_eq!(args.viewport, Some("1280x720".to_string()));
                assert_eq!(args.crf, Some(18));
                assert!(args.no_convert);
            }
            _ => panic!("Expected Record command"),
        }
    }

    /// Test parsing 'record' with capture tuning flags
    #[test]
    fn parse_record_capture_flags() {
        let cli = Cli::try_parse_from([
            "siterec",
            "record",
            "--display",
            "99",
            "--framerate",
            "25",
            "--nice",
            "10",
            "--result-dir",
            "/tmp/results",
        ])
        .unwrap();
        match cli.command {
            Commands::Record(args) => {
                assert_eq!(args.display, Some(99));
                assert_eq!(args.framerate, Some(25));
                assert_eq!(args.nice, Some(10));
                assert_eq!(args.result_dir, Some("/tmp/results".to_string()));
            }
            _ => panic!("Expected Record command"),
        }
    }

    /// Test global flags before and after the subcommand
    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from(["siterec", "--json", "check"]).unwrap();
        assert!(cli.json);

        let cli = Cli::try_parse_from(["siterec", "check", "--json", "-q"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
    }

    /// Test parsing 'check' command
    #[test]
    fn parse_check() {
        let cli = Cli::try_parse_from(["siterec", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
    }

    /// Test parsing 'version' command
    #[test]
    fn parse_version() {
        let cli = Cli::try_parse_from(["siterec", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    /// Test invalid command returns error
    #[test]
    fn parse_invalid_command() {
        let result = Cli::try_parse_from(["siterec", "transcode"]);
        assert!(result.is_err());
    }

    /// Test non-numeric duration returns error
    #[test]
    fn parse_invalid_duration() {
        let result = Cli::try_parse_from(["siterec", "record", "-d", "soon"]);
        assert!(result.is_err());
    }
}

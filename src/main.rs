//! Command line front end: parse options, run the coordinator, print the
//! summary.
//!
//! ```bash
//! secchi --threads 8 --size 4 --iterations 100000 --variant bucketed -f table
//! ```

use std::process::ExitCode;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser, ValueEnum};
use secchi::config::{Config, Variant, DEFAULT_BUCKETS, DEFAULT_ITERATIONS, DEFAULT_THREADS};
use secchi::coordinator::Coordinator;
use secchi::logging::init_tracing;
#[cfg(feature = "table")]
use secchi::report::table::TableStyle;
use secchi::report::{self, Format};
use secchi::ConfigError;

/// Counter variant selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum VariantChoice {
    /// One global lock, fixed iterations per thread
    SingleLock,
    /// One global lock, threads share a countdown of iterations
    Budget,
    /// Per-bucket locks, 2 x threads workers doing random transfers
    #[default]
    Bucketed,
}

impl From<VariantChoice> for Variant {
    fn from(choice: VariantChoice) -> Self {
        match choice {
            VariantChoice::SingleLock => Variant::SingleLock,
            VariantChoice::Budget => Variant::Budget,
            VariantChoice::Bucketed => Variant::Bucketed,
        }
    }
}

/// Output format for the final summary.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum FormatChoice {
    /// Single "Final: ..." line
    #[default]
    Text,
    /// Two-column table
    #[cfg(feature = "table")]
    Table,
    /// JSON document
    #[cfg(feature = "json")]
    Json,
}

/// Table style selection.
#[cfg(feature = "table")]
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Markdown,
    Blank,
}

#[cfg(feature = "table")]
impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Bucketed counter pool: parallel workers moving units between buckets
/// under ordered per-bucket locking.
#[derive(Parser, Debug)]
#[command(name = "secchi", author, version, about, long_about = None)]
struct Args {
    /// Number of threads
    #[arg(short, long, default_value_t = DEFAULT_THREADS)]
    threads: usize,

    /// Array size (number of buckets)
    #[arg(short, long, default_value_t = DEFAULT_BUCKETS)]
    size: usize,

    /// Iterations per thread (total budget for the budget variant)
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u64,

    /// Counter variant
    #[arg(long, value_enum, default_value = "bucketed")]
    variant: VariantChoice,

    /// Seed the per-worker random generators
    #[arg(long)]
    seed: Option<u64>,

    /// Summary output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: FormatChoice,

    /// Table style (for the table format)
    #[cfg(feature = "table")]
    #[arg(long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Print the per-transfer "Thread <id> increasing .. decreasing .. diff .."
    /// lines to stderr (off by default; RUST_LOG=debug does the same)
    #[arg(short, long)]
    verbose: bool,

    #[arg(hide = true)]
    rest: Vec<String>,
}

impl Args {
    fn output_format(&self) -> Format {
        match self.format {
            FormatChoice::Text => Format::Text,
            #[cfg(feature = "table")]
            FormatChoice::Table => Format::Table(self.style.into()),
            #[cfg(feature = "json")]
            FormatChoice::Json => Format::Json,
        }
    }
}

/// What the command line asked for.
#[derive(Debug)]
enum Invocation {
    Run { config: Config, format: Format, verbose: bool },
    /// `--help` or `--version`: the rendered text, exit 0.
    Info(String),
}

fn context_string(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn config_error(err: &clap::Error) -> ConfigError {
    match err.kind() {
        ErrorKind::ValueValidation | ErrorKind::InvalidValue => ConfigError::InvalidValue {
            option: context_string(err, ContextKind::InvalidArg).unwrap_or_default(),
            value: context_string(err, ContextKind::InvalidValue).unwrap_or_default(),
        },
        ErrorKind::UnknownArgument => ConfigError::UnknownFlag(
            context_string(err, ContextKind::InvalidArg).unwrap_or_default(),
        ),
        _ => ConfigError::UnknownFlag(err.kind().to_string()),
    }
}

fn parse<I, T>(argv: I) -> Result<Invocation, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    Ok(Invocation::Info(err.render().to_string()))
                }
                _ => Err(config_error(&err)),
            }
        }
    };

    if !args.rest.is_empty() {
        return Err(ConfigError::TrailingArguments(args.rest));
    }

    let mut config = Config::new(args.threads, args.iterations, args.size)?
        .with_variant(args.variant.into());
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    Ok(Invocation::Run {
        config,
        format: args.output_format(),
        verbose: args.verbose,
    })
}

fn main() -> ExitCode {
    let (config, format, verbose) = match parse(std::env::args_os()) {
        Ok(Invocation::Run {
            config,
            format,
            verbose,
        }) => (config, format, verbose),
        Ok(Invocation::Info(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}\n");
            eprintln!("{}", Args::command().render_help());
            return ExitCode::from(err.exit_code());
        }
    };

    init_tracing(verbose);

    let summary = match Coordinator::new(config).run() {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    match report::render(&summary, format) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_config(argv: &[&str]) -> Config {
        match parse(argv.iter().copied()) {
            Ok(Invocation::Run { config, .. }) => config,
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = run_config(&["secchi"]);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_short_and_long_options() {
        let config = run_config(&["secchi", "-t", "8", "--size=3", "-i", "50", "--variant", "budget"]);
        assert_eq!(config.thread_count(), 8);
        assert_eq!(config.bucket_size(), 3);
        assert_eq!(config.iterations(), 50);
        assert_eq!(config.variant(), Variant::Budget);
    }

    #[test]
    fn test_seed() {
        let config = run_config(&["secchi", "--seed", "99"]);
        assert_eq!(config.seed(), Some(99));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = parse(["secchi", "--threads", "0"]).unwrap_err();
        assert_eq!(err, ConfigError::ZeroThreads);
        assert_eq!(err.exit_code(), 253);
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = parse(["secchi", "-s", "0"]).unwrap_err();
        assert_eq!(err, ConfigError::ZeroBuckets);
    }

    #[test]
    fn test_non_integer_rejected() {
        let err = parse(["secchi", "--iterations", "lots"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref value, .. } if value == "lots"));
        assert_eq!(err.exit_code(), 253);
    }

    #[test]
    fn test_negative_rejected() {
        let err = parse(["secchi", "--threads=-1"]).unwrap_err();
        assert_eq!(err.exit_code(), 253);
    }

    #[test]
    fn test_trailing_arguments_rejected() {
        let err = parse(["secchi", "-t", "2", "extra", "more"]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TrailingArguments(vec!["extra".into(), "more".into()])
        );
        assert_eq!(err.exit_code(), 254);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = parse(["secchi", "--bogus"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFlag(_)));
        assert_eq!(err.exit_code(), 255);
    }

    #[test]
    fn test_help() {
        match parse(["secchi", "--help"]) {
            Ok(Invocation::Info(text)) => {
                assert!(text.contains("--threads"));
                assert!(text.contains("Thread <id> increasing"));
                assert!(text.contains("RUST_LOG=debug"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(feature = "table")]
    #[test]
    fn test_table_style() {
        match parse(["secchi", "-f", "table", "--style", "markdown"]) {
            Ok(Invocation::Run { format, .. }) => {
                assert_eq!(format, Format::Table(TableStyle::Markdown))
            }
            other => panic!("unexpected: {other:?}"),
        }
        match parse(["secchi", "-f", "table"]) {
            Ok(Invocation::Run { format, .. }) => {
                assert_eq!(format, Format::Table(TableStyle::Rounded))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }
}

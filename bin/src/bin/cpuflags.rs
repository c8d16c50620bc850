use clap::Parser;
use cpuflags::cpu::{FeatureCategory, FeatureReporter, HostFeatures};
use cpuflags::FeatureError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Prints the lowercase names of the feature flags of the host CPU
#[derive(Parser, Debug)]
#[command(version, about = "cpuflags command line interface", long_about = None)]
struct Args {
    /// Only report these categories (base, extended, extra)
    #[arg(short, long = "category", value_name = "CATEGORY")]
    categories: Vec<FeatureCategory>,

    /// Terminate the output with a newline
    #[arg(long)]
    newline: bool,

    /// Log detection details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    ExitCode::from(exit_status(print_features(&args)))
}

fn exit_status(result: Result<(), FeatureError>) -> u8 {
    match result {
        Ok(()) => 0,
        // The reader stopped listening; everything it wanted was written.
        Err(err) if err.is_broken_pipe() => 0,
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "cpuflags=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_features(args: &Args) -> Result<(), FeatureError> {
    let host = HostFeatures::host();
    tracing::debug!(vendor = host.vendor(), "scanning host cpu features");
    reporter(args, host).run()
}

fn reporter<'a>(args: &Args, host: &'a HostFeatures) -> FeatureReporter<'a, HostFeatures> {
    let reporter = FeatureReporter::new(host).with_newline(args.newline);
    if args.categories.is_empty() {
        reporter
    } else {
        reporter.with_categories(args.categories.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments() {
        let args = Args::try_parse_from(["cpuflags"]).unwrap();
        assert!(args.categories.is_empty());
        assert!(!args.newline);
        assert!(!args.verbose);

        let host = HostFeatures::host();
        let reporter = reporter(&args, host);
        assert_eq!(reporter.categories(), FeatureCategory::ALL);

        let report = reporter.render();
        assert_eq!(report, FeatureReporter::new(host).render());
        assert!(!report.contains('\n'));
        assert!(report.is_empty() || report.ends_with(' '));
    }

    #[test]
    fn repeated_categories() {
        let args =
            Args::try_parse_from(["cpuflags", "-c", "extra", "--category", "BASE", "-c", "extra"])
                .unwrap();
        assert_eq!(
            args.categories,
            [
                FeatureCategory::Extra,
                FeatureCategory::Base,
                FeatureCategory::Extra
            ]
        );

        let reporter = reporter(&args, HostFeatures::host());
        assert_eq!(
            reporter.categories(),
            [FeatureCategory::Base, FeatureCategory::Extra]
        );
    }

    #[test]
    fn newline_flag() {
        let args = Args::try_parse_from(["cpuflags", "--newline", "-v"]).unwrap();
        assert!(args.newline);
        assert!(args.verbose);

        let host = HostFeatures::host();
        let report = reporter(&args, host).render();
        assert_eq!(report, format!("{}\n", FeatureReporter::new(host).render()));
        assert_eq!(report.matches('\n').count(), 1);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = Args::try_parse_from(["cpuflags", "-c", "vendor"]).unwrap_err();
        assert!(err.to_string().contains("unknown feature category"));
    }

    #[test]
    fn closed_stdout_exits_successfully() {
        let err = FeatureError::from(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert_eq!(exit_status(Err(err)), 0);
        assert_eq!(exit_status(Ok(())), 0);
    }

    #[test]
    fn other_failures_exit_with_an_error() {
        let err = FeatureError::from(std::io::Error::from(std::io::ErrorKind::Other));
        assert_eq!(exit_status(Err(err)), 1);
    }
}

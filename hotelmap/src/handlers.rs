use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use hotelmap_core::pipeline::{PipelineOptions, generate_run_report, run_pipeline};
use hotelmap_scanner::Site;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Settings for one run, taken from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub site: String,
    pub output: PathBuf,
    pub timeout_secs: u64,
    pub verbose: bool,
}

impl RunArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let site = matches
            .get_one::<String>("site")
            .cloned()
            .unwrap_or_else(|| hotelmap_scanner::site::DEFAULT_SITE.to_string());
        let output = matches
            .get_one::<String>("output")
            .map(|raw| resolve_output_path(raw))
            .unwrap_or_else(|| resolve_output_path(crate::commands::DEFAULT_OUTPUT));
        let timeout_secs = *matches.get_one::<u64>("timeout").unwrap_or(&10);
        let verbose = matches.get_flag("verbose");

        Self {
            site,
            output,
            timeout_secs,
            verbose,
        }
    }
}

/// Expand a leading `~` in the output path
pub fn resolve_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Install the fmt subscriber on stderr. `RUST_LOG` takes precedence over
/// the verbosity flag.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn build_options(args: &RunArgs) -> anyhow::Result<PipelineOptions> {
    let site = Site::new(&args.site).with_context(|| format!("bad --site value {}", args.site))?;

    let mut options = PipelineOptions::new(site, args.output.clone());
    options.timeout_secs = args.timeout_secs;
    options.show_progress = args.verbose;
    Ok(options)
}

pub async fn handle_run(args: RunArgs) -> anyhow::Result<()> {
    debug!("Run settings: {:?}", args);
    let options = build_options(&args)?;

    let summary = run_pipeline(options, None)
        .await
        .with_context(|| format!("hotel extraction from {} failed", args.site))?;

    if args.verbose {
        println!("\n{} Extraction complete!\n", "✓".green().bold());
        print!("{}", generate_run_report(&summary));
    }

    Ok(())
}

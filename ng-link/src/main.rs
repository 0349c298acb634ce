use anyhow::Context;
use clap::Parser;
use ng_link_rs::config::{
    DEFAULT_BUNDLE_DIR, DEFAULT_CONDITION, DEFAULT_EXTENSION, DEFAULT_JOBS, DEFAULT_MANIFEST,
};
use ng_link_rs::{link_package, LinkConfig, TransformOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// ng-link: Links a package's FESM bundles and publishes the linked variants
/// under an extra package.json export condition
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Package directory containing the bundle directory and package.json
    #[clap(default_value = ".")]
    pub package_dir: PathBuf,

    /// Bundle directory, relative to the package directory
    #[clap(short, long, default_value = DEFAULT_BUNDLE_DIR)]
    pub bundle_dir: String,

    /// Bundle file extension
    #[clap(short, long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Export condition pointing at the linked bundles
    #[clap(short, long, default_value = DEFAULT_CONDITION)]
    pub condition: String,

    /// Manifest file name, relative to the package directory
    #[clap(short, long, default_value = DEFAULT_MANIFEST)]
    pub manifest: String,

    /// Maximum number of files processed at once
    #[clap(short, long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Log each skipped entry and rewritten specifier
    #[clap(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[clap(short, long)]
    pub quiet: bool,
}

impl Args {
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    fn into_config(self) -> LinkConfig {
        LinkConfig {
            base_dir: self.package_dir,
            bundle_dir: self.bundle_dir,
            extension: self.extension,
            condition: self.condition,
            manifest: self.manifest,
            jobs: self.jobs,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    match run(args.into_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: LinkConfig) -> anyhow::Result<()> {
    let options = TransformOptions::from(&config);
    let report = link_package(&config, &options)
        .await
        .with_context(|| format!("Failed to link package at {}", config.base_dir.display()))?;

    if report.artifacts.is_empty() {
        log::warn!(
            "No bundles found under {}",
            config.base_dir.join(config.bundle_dir_name()).display()
        );
    }
    Ok(())
}

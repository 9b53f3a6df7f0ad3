//! Command-line entry point.

use bundlesync::http::{HttpClientConfig, Session};
use bundlesync::layout::Layout;
use bundlesync::progress::StyleOptions;
use bundlesync::reconcile::ReconcilerBuilder;
use bundlesync::storefront::{CachedStorefront, HttpStorefront, Storefront, DEFAULT_BASE_URL};
use bundlesync::sync::Syncer;

use clap::Parser;
use color_eyre::Result;
use indicatif::HumanBytes;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mirror every purchased bundle file into a local directory tree.
#[derive(Clone, Debug, Parser)]
#[command(name = "bundlesync", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Cli {
    /// Directory the product folders live in.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory for digest records and alias manifest [default: <root>/json]
    #[arg(long)]
    metadata_dir: Option<PathBuf>,

    /// File holding the session cookie value.
    #[arg(long, default_value = "login-token")]
    token_file: PathBuf,

    /// Session cookie value, overrides --token-file.
    #[arg(long, env = "BUNDLESYNC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Reuse saved key and order documents, saving any that are missing.
    #[arg(long)]
    use_cache: bool,

    /// Where --use-cache keeps documents [default: <root>/cache]
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Storefront base URL.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Concurrent order requests [default: one per key, at most 16]
    #[arg(long)]
    concurrency: Option<usize>,

    /// Retries for requests that fail before a response arrives.
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Hash every downloaded file before moving it into place.
    #[arg(long)]
    verify: bool,

    /// Hide progress bars.
    #[arg(short, long)]
    quiet: bool,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "bundlesync=debug"
    } else {
        "bundlesync=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let session = match cli.token {
        Some(ref token) => Session::new(token.as_str())?,
        None => Session::from_token_file(&cli.token_file)?,
    };

    let http_config = HttpClientConfig {
        retries: cli.retries,
        ..HttpClientConfig::default()
    };
    let live = HttpStorefront::with_session(&session, http_config, &cli.base_url)?;
    let storefront: Box<dyn Storefront> = if cli.use_cache {
        let dir = cli.cache_dir.clone().unwrap_or_else(|| cli.root.join("cache"));
        Box::new(CachedStorefront::new(live, dir))
    } else {
        Box::new(live)
    };

    let metadata_dir = cli
        .metadata_dir
        .clone()
        .unwrap_or_else(|| cli.root.join("json"));
    let layout = Layout::new(&cli.root, metadata_dir);

    let style = if cli.quiet {
        StyleOptions::hidden()
    } else {
        StyleOptions::default()
    };
    let reconciler = ReconcilerBuilder::new()
        .style_options(style)
        .retries(cli.retries)
        .verify_downloads(cli.verify)
        .session(&session)?;

    let mut syncer = Syncer::new(storefront, layout, reconciler);
    if let Some(workers) = cli.concurrency {
        syncer = syncer.concurrency(workers);
    }

    let report = syncer.run().await?;

    for summary in report.summaries.iter().filter(|s| !s.is_ok()) {
        eprintln!("{}: {:?}", summary.target().display(), summary.status());
    }
    println!(
        "{} up to date, {} fetched ({}), {} failed",
        report.satisfied(),
        report.done(),
        HumanBytes(report.transferred()),
        report.failed()
    );

    println!();
    println!("Orphans:");
    for orphan in &report.orphans {
        println!("{}", orphan.display());
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atomodon::cache::ResponseCache;
use atomodon::cli::Args;
use atomodon::fetch::Fetcher;
use atomodon::{atom, feed, mastodon};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = run(args).await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let cache = match &args.cache {
        Some(path) => ResponseCache::load(path),
        None => ResponseCache::in_memory(),
    };
    let mut fetcher = Fetcher::new(cache);

    let base_url = format!("https://{}", args.server);

    let profile = mastodon::resolve_account(&mut fetcher, &base_url, &args.server, &args.username)
        .await
        .context("Failed to resolve account")?;
    info!(account_id = %profile.id, "resolved account");

    let statuses = mastodon::fetch_statuses(&mut fetcher, &base_url, &profile.id)
        .await
        .context("Failed to fetch posts")?;
    info!(posts = statuses.len(), "fetched posts");

    let document = feed::build_feed(&profile, &statuses).context("Failed to build feed")?;

    // Persist the cache only after a successful run, before output.
    fetcher.cache().save().context("Failed to save cache")?;

    let xml = atom::render_feed(&document);
    match &args.output {
        Some(path) => std::fs::write(path, &xml)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{xml}"),
    }

    Ok(())
}

/// Logs go to stderr so the feed can go to stdout. `RUST_LOG` overrides the
/// verbosity flags when set.
fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

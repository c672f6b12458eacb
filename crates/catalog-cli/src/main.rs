mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use catalog_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "catalog-scraper")]
#[command(about = "Scrape the product catalog into products.jsonl and Supabase")]
struct Cli {
    /// Write products.jsonl only; skip Supabase upserts
    #[arg(long)]
    dry_run: bool,

    /// Process at most N product URLs (0 means no limit)
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Directory for products.jsonl and failed_urls.txt
    #[arg(long, value_name = "PATH")]
    output_dir: Option<PathBuf>,
}

impl Cli {
    /// Flags take precedence over the environment.
    fn apply(self, config: &mut AppConfig) {
        if self.dry_run {
            config.dry_run = true;
        }
        if let Some(limit) = self.limit {
            config.limit = (limit > 0).then_some(limit);
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = catalog_core::load_app_config()?;
    cli.apply(&mut config);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let summary = pipeline::run(&config).await?;
    pipeline::print_summary(&config, &summary);

    Ok(())
}

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use gamebanana_provider::{CancellationToken, NormalizedPackage, PackageSearch};
use tracing::warn;

use crate::config::{self, Overrides};
use crate::io;

#[derive(Args)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY")]
    query: String,
    #[arg(long, env = "GAMEBANANA_GAME_ID")]
    game_id: Option<u64>,
    #[arg(long, default_value_t = 0)]
    skip: u32,
    #[arg(long, default_value_t = 50)]
    take: u32,
    #[arg(long, env = "GAMEBANANA_API_URL")]
    api_url: Option<String>,
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Print the packages as JSON instead of one line each.
    #[arg(long)]
    json: bool,
}

pub async fn run(args: SearchArgs) -> Result<()> {
    let file = args
        .config
        .as_deref()
        .map(config::load_file_config)
        .transpose()?;
    let provider_config = config::resolve_provider_config(
        Overrides {
            game_id: args.game_id,
            api_url: args.api_url.clone(),
        },
        file,
    )?;

    let search = PackageSearch::gamebanana(provider_config)
        .context("Failed to set up GameBanana client")?;

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling search");
            ctrl_c_token.cancel();
        }
    });

    let packages = search
        .search(&args.query, args.skip, args.take, &token)
        .await
        .with_context(|| format!("Search for '{}' failed", args.query))?;

    let output = if args.json {
        let mut text =
            serde_json::to_string_pretty(&packages).context("Failed to serialize packages")?;
        text.push('\n');
        text
    } else {
        render_lines(&packages)
    };
    io::write_stdout(&output)
}

fn render_lines(packages: &[NormalizedPackage]) -> String {
    let mut out = String::new();
    for package in packages {
        out.push_str(&format!(
            "{}  {}  {}  {}\n",
            package.name,
            package.version.as_deref().unwrap_or("-"),
            if package.authors.is_empty() { "-" } else { package.authors.as_str() },
            package.download_url,
        ));
    }
    out
}

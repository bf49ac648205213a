use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::Path;
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod media;
mod utils;

use config::Config;
use media::{extract_post_id, CanonicalVariant, FetchError, PostFetcher, PostInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "List downloadable video renditions of a post", long_about = None)]
struct Args {
    /// Link to the post, e.g. https://x.com/<user>/status/<id>
    url: String,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the lookup API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// How to print the result
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
}

fn get_config_path(args: &Args) -> Option<String> {
    resolve_config_path(
        args,
        |key| std::env::var(key).ok(),
        dirs::home_dir().as_deref(),
    )
}

fn resolve_config_path(
    args: &Args,
    env_lookup: impl Fn(&str) -> Option<String>,
    home: Option<&Path>,
) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Some(path) = env_lookup("CONFIG_FILE") {
        return Some(path);
    }

    if let Some(xdg_config_home) = env_lookup("XDG_CONFIG_HOME") {
        let config_path = format!("{}/twitdown/config.toml", xdg_config_home);
        if Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = home {
        let config_path = format!("{}/.config/twitdown/config.toml", home.display());
        if Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn load_config(args: &Args, config_path: Option<String>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default(),
    };

    if let Some(base) = &args.api_base {
        config.api.base_url = base.clone();
    }

    Ok(config)
}

fn init_logging(format: &str) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn variant_line(variant: &CanonicalVariant) -> String {
    if variant.width > 0 {
        format!(
            "{:<8} {}x{}  {}",
            variant.quality, variant.width, variant.height, variant.url
        )
    } else {
        format!("{:<8} {}", variant.quality, variant.url)
    }
}

fn render_text(info: &PostInfo) -> String {
    let mut lines = vec![
        format!(
            "{} (@{})  likes {}  reposts {}",
            info.author_name,
            info.author_handle,
            utils::format_count(info.likes),
            utils::format_count(info.retweets)
        ),
        info.date.clone(),
    ];

    if !info.text.is_empty() {
        lines.push(info.text.clone());
    }
    if let Some(thumbnail) = &info.thumbnail {
        lines.push(format!("thumbnail: {}", thumbnail));
    }

    if info.variants.is_empty() {
        lines.push("No playable asset found".to_string());
    } else {
        lines.extend(info.variants.iter().map(variant_line));
    }

    lines.join("\n")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args, get_config_path(&args))?;

    init_logging(config.get_logging_format());

    let id = extract_post_id(&args.url, &config.links.extra_hosts)
        .ok_or_else(|| FetchError::InvalidUrl(args.url.clone()))?;
    info!("Resolved post id {}", id);

    let fetcher = PostFetcher::new(&config.api).context("Failed to initialize lookup client")?;
    let info = fetcher.fetch(&id).await?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Text => println!("{}", render_text(&info)),
    }

    Ok(())
}

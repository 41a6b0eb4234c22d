use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use crate::config::Config;
use crate::core::document::{find_blocks, process_document, render_document, rewrite_document};
use crate::core::{Availability, Resolver};
use crate::utils::{minimal_block, title_link};

#[derive(Parser)]
#[command(name = "vidy")]
#[command(about = "Turn YouTube and Vimeo links into thumbnail cards")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a video URL into title, author and thumbnail
    Resolve {
        /// Video URL (read from stdin when omitted)
        url: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the video id of a URL
    Id { url: Option<String> },
    /// Wrap a video URL in a vidy block
    Block { url: Option<String> },
    /// Print a markdown link titled with the video's title
    Link { url: Option<String> },
    /// Render every vidy block of a markdown note
    Render {
        file: PathBuf,

        /// Also rewrite blocks with stored metadata back to a bare URL
        #[arg(short, long)]
        write: bool,
    },
    /// Show or change the stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    /// Store a YouTube Data API key, used when oEmbed refuses a video
    SetApiKey { key: String },
    ClearApiKey,
}

fn url_or_stdin(url: &Option<String>) -> Result<String> {
    if let Some(url) = url {
        return Ok(url.trim().to_string());
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read URL from stdin")?;
    Ok(input.trim().to_string())
}

impl Cli {
    fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::default_path)
    }

    pub async fn run(&self) -> Result<()> {
        let config_path = self.config_path();
        if let Command::Config { action } = &self.command {
            return Self::run_config(action, config_path);
        }

        let config = Config::load(config_path.as_deref())?;
        let resolver = Resolver::from_config(&config)?;

        match &self.command {
            Command::Resolve { url, json } => {
                let url = url_or_stdin(url)?;
                let info = resolver.resolve(&url, &config).await;

                if *json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                    return Ok(());
                }

                match info.availability() {
                    Availability::Found => {
                        println!("Title: {}", info.title);
                        println!("Author: {}", info.author);
                        println!("Author URL: {}", info.author_url);
                        println!("Thumbnail: {}", info.thumbnail);
                    }
                    Availability::NotFound => bail!("Cannot find video: {}", info.url),
                    Availability::Unavailable => {
                        bail!("Video temporarily unavailable (network error): {}", info.url)
                    }
                }
            }
            Command::Id { url } => {
                let url = url_or_stdin(url)?;
                let id = resolver.video_id(&url).await;
                if id.is_empty() {
                    bail!("No valid video in {:?}", url);
                }
                println!("{}", id);
            }
            Command::Block { url } => {
                let url = url_or_stdin(url)?;
                if resolver.video_id(&url).await.is_empty() {
                    bail!("No valid video in {:?}", url);
                }
                println!("{}", minimal_block(&url));
            }
            Command::Link { url } => {
                let url = url_or_stdin(url)?;
                if resolver.video_id(&url).await.is_empty() {
                    bail!("No valid video in {:?}", url);
                }
                let info = resolver.resolve(&url, &config).await;
                match info.availability() {
                    Availability::Found => println!("{}", title_link(&info)),
                    Availability::NotFound => bail!("Cannot find video: {}", info.url),
                    Availability::Unavailable => {
                        bail!("Video temporarily unavailable (network error): {}", info.url)
                    }
                }
            }
            Command::Render { file, write } => {
                let text = std::fs::read_to_string(file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let blocks = find_blocks(&text);
                tracing::info!("Found {} vidy blocks in {}", blocks.len(), file.display());

                let outcomes = process_document(&resolver, &blocks, &config).await;
                println!("{}", render_document(&text, &blocks, &outcomes));

                if *write {
                    let rewritten = rewrite_document(&text, &blocks, &outcomes);
                    if rewritten != text {
                        std::fs::write(file, rewritten)
                            .with_context(|| format!("Failed to write {}", file.display()))?;
                        tracing::info!("Removed stored metadata from {}", file.display());
                    }
                }
            }
            Command::Config { action } => Self::run_config(action, config_path)?,
        }

        Ok(())
    }

    /// Works on the file alone, so an environment key is never persisted.
    fn run_config(action: &ConfigAction, path: Option<PathBuf>) -> Result<()> {
        let mut config = match &path {
            Some(path) if path.exists() => Config::from_file(path)?,
            _ => Config::default(),
        };

        match action {
            ConfigAction::Show => {
                if let Some(path) = &path {
                    println!("Config file: {}", path.display());
                }
                let key = if config.youtube_api_key().is_some() { "set" } else { "not set" };
                println!("YouTube API key: {}", key);
                println!("User agent: {}", config.user_agent);
                println!("Timeout: {}s", config.timeout);
                return Ok(());
            }
            ConfigAction::SetApiKey { key } => config.youtube_api_key = Some(key.trim().to_string()),
            ConfigAction::ClearApiKey => config.youtube_api_key = None,
        }

        let Some(path) = path.as_deref() else {
            bail!("No config directory available; pass --config");
        };
        config.save(path)?;
        println!("Saved {}", path.display());
        Ok(())
    }
}

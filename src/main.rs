use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ytfacts::config::Config;
use ytfacts::crawler::{ChannelScraper, CommentClient, CommentPipeline};
use ytfacts::error::Error;
use ytfacts::models::{CommentPage, CommentSort, ScrapedChannelData};
use ytfacts::parser::{self, ParsedNumber};
use ytfacts::utils::{single_line, truncate_text};

#[derive(Parser)]
#[command(
    name = "ytfacts",
    version,
    about = "Extract channel facts and comments from YouTube pages",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file (environment variables are used otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Display language (ko, en)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a channel page
    Channel {
        /// Handle (@name), channel id (UC...) or channel URL
        channel: String,
    },

    /// Load comments for a video
    Comments {
        /// Video id
        video_id: String,

        /// Sort order (top, newest)
        #[arg(short, long)]
        sort: Option<String>,

        /// Continuation token for a following page
        #[arg(long)]
        next: Option<String>,

        /// Maximum comments to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Parse an abbreviated count ("1.5만", "3.2K")
    Count {
        text: String,
    },

    /// Format a duration (ISO-8601 such as PT1H2M3S, or seconds)
    Duration {
        value: String,
    },

    /// Format a timestamp relative to now
    Ago {
        /// RFC 3339 or YYYY-MM-DDTHH:MM:SS timestamp
        timestamp: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    let locale = cli
        .lang
        .as_deref()
        .map(ytfacts::i18n::normalize_locale)
        .unwrap_or_else(|| ytfacts::i18n::normalize_locale(&config.display.locale));
    ytfacts::i18n::set_locale(locale);

    tracing::debug!(locale, "ytfacts starting");

    let outcome = match cli.command {
        Commands::Channel { channel } => {
            tracing::info!(channel = %channel, "Starting channel command");
            channel_command(&config, &channel, cli.json).await
        }

        Commands::Comments {
            video_id,
            sort,
            next,
            limit,
        } => {
            let sort = match sort {
                Some(s) => CommentSort::parse(&s)
                    .with_context(|| format!("Unknown sort order: {s}"))?,
                None => config.comments.default_sort,
            };
            tracing::info!(
                video_id = %video_id,
                sort = sort.as_str(),
                next = next.is_some(),
                "Starting comments command"
            );
            comments_command(&config, &video_id, sort, next, limit, cli.json).await
        }

        Commands::Count { text } => {
            count_command(&text, cli.json)?;
            Ok(())
        }

        Commands::Duration { value } => {
            duration_command(&value, cli.json)?;
            Ok(())
        }

        Commands::Ago { timestamp } => {
            ago_command(&timestamp, locale, cli.json)?;
            Ok(())
        }
    };

    if let Err(err) = outcome {
        report_error(&err, cli.json);
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("ytfacts=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("ytfacts={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn report_error(err: &Error, json: bool) {
    if json {
        let body = serde_json::json!({
            "error": {
                "code": err.code(),
                "message": err.to_string(),
                "recoverable": err.is_recoverable(),
            }
        });
        println!("{body}");
    } else {
        eprintln!("[{}] {}", err.code(), err.localized_desc());
    }
}

async fn channel_command(config: &Config, channel: &str, json: bool) -> ytfacts::error::Result<()> {
    let scraper = ChannelScraper::new(config.scraper.clone())?;
    let data = scraper.scrape_channel_page(channel).await?;

    if json {
        print_json(&data);
    } else {
        print_channel(&data);
    }
    Ok(())
}

fn print_channel(data: &ScrapedChannelData) {
    println!("Name:        {}", data.name);
    match &data.subscriber_text {
        Some(text) => println!("Subscribers: {} ({text})", data.subscriber_count),
        None => println!("Subscribers: {}", data.subscriber_count),
    }
    if let Some(count) = data.video_count {
        println!("Videos:      {count}");
    }
    println!("Avatar:      {}", data.avatar_url);
    if let Some(banner) = &data.banner_url {
        println!("Banner:      {banner}");
    }
    if !data.description.is_empty() {
        println!();
        println!("{}", data.description);
    }
}

async fn comments_command(
    config: &Config,
    video_id: &str,
    sort: CommentSort,
    next: Option<String>,
    limit: usize,
    json: bool,
) -> ytfacts::error::Result<()> {
    let client = CommentClient::new(&config.comments)?;
    let pipeline = CommentPipeline::new(client);

    let page = match next {
        Some(continuation) => pipeline.fetch_next_page(&continuation).await?,
        None => {
            // Phase 1 goes out before phase 2 is requested.
            let _token = pipeline.prefetch_token(video_id, sort).await;
            pipeline.load_comments(video_id, sort).await?
        }
    };

    if json {
        print_json(&page);
    } else {
        print_comments(&page, limit);
    }
    Ok(())
}

fn print_comments(page: &CommentPage, limit: usize) {
    if let Some(total) = &page.total_count_text {
        println!("{total} ({})", page.total_count());
    }
    for comment in page.comments.iter().take(limit) {
        let mut flags = String::new();
        if comment.is_pinned {
            flags.push_str(" [pinned]");
        }
        if comment.is_hearted {
            flags.push_str(" [hearted]");
        }
        println!(
            "- {} · {} · {} likes{flags}",
            comment.author.name, comment.published_time_text, comment.like_count
        );
        println!("  {}", truncate_text(&single_line(&comment.content), 120));
    }
    if let Some(continuation) = &page.continuation {
        println!();
        println!("next: {continuation}");
    } else if page.has_more {
        println!();
        println!("more comments available");
    }
}

fn count_command(text: &str, json: bool) -> Result<()> {
    let parsed: ParsedNumber = parser::parse_number(text);
    if json {
        print_json(&parsed);
    } else {
        println!("{}", parsed.value);
    }
    Ok(())
}

fn duration_command(value: &str, json: bool) -> Result<()> {
    let formatted = match value.trim().parse::<i64>() {
        Ok(seconds) => parser::parse_seconds(seconds),
        Err(_) => parser::parse_iso8601(value.trim()),
    };
    if json {
        print_json(&serde_json::json!({ "input": value, "formatted": formatted }));
    } else {
        println!("{formatted}");
    }
    Ok(())
}

fn ago_command(timestamp: &str, locale: &str, json: bool) -> Result<()> {
    let formatted = parser::format_relative_time_at(timestamp, chrono::Utc::now(), locale);
    if formatted.is_empty() {
        anyhow::bail!("Unrecognized timestamp: {timestamp}");
    }
    if json {
        print_json(&serde_json::json!({ "input": timestamp, "relative": formatted }));
    } else {
        println!("{formatted}");
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::error!(error = %err, "Failed to serialize output"),
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use snatch_acquire::{languages, quotes, spotify, tiktok, translate, youtube};
use snatch_acquire::{ClientConfig, HttpClient};

mod output;

#[derive(Parser)]
#[command(name = "snatch")]
#[command(about = "Resolve TikTok, Spotify and YouTube links, anime quotes, and translations")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Write the JSON result to this file instead of stdout
    #[arg(short = 'O', long, global = true)]
    output: Option<String>,

    #[command(flatten)]
    endpoints: Endpoints,

    #[command(subcommand)]
    command: Commands,
}

/// Remote endpoints; defaults are the production services.
#[derive(clap::Args)]
struct Endpoints {
    /// Host of the Spotify intermediary page and convert endpoint
    #[arg(long, global = true, env = "SNATCH_BASE_URL")]
    base_url: Option<String>,

    /// Spotify metadata API (queried with ?url=)
    #[arg(long, global = true, env = "SNATCH_METADATA_API")]
    metadata_api: Option<String>,

    /// Host of the anime quote feed
    #[arg(long, global = true, env = "SNATCH_QUOTE_BASE_URL")]
    quote_base_url: Option<String>,

    /// TikTok resolver API
    #[arg(long, global = true, env = "SNATCH_TIKTOK_API")]
    tiktok_api: Option<String>,

    /// Translation API
    #[arg(long, global = true, env = "SNATCH_TRANSLATE_API")]
    translate_api: Option<String>,
}

impl Endpoints {
    fn into_config(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            metadata_api_base: self.metadata_api.unwrap_or(defaults.metadata_api_base),
            quote_base_url: self.quote_base_url.unwrap_or(defaults.quote_base_url),
            tiktok_api_base: self.tiktok_api.unwrap_or(defaults.tiktok_api_base),
            translate_api_base: self.translate_api.unwrap_or(defaults.translate_api_base),
            ..defaults
        }
    }
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a Spotify track url to metadata and a download url
    Spotify {
        /// Track url (e.g., "https://open.spotify.com/track/4iV5W9uYEdYUVa79Axb7Rh")
        url: String,
    },

    /// Resolve a TikTok post url to its watermark-free media
    Tiktok {
        /// Post url (e.g., "https://www.tiktok.com/@user/video/7234567890123456789")
        url: String,
    },

    /// Describe a YouTube video and its stream url (requires yt-dlp on PATH)
    Youtube {
        url: String,

        /// yt-dlp format selector
        #[arg(short, long, default_value = youtube::DEFAULT_FORMAT)]
        format: String,
    },

    /// Scrape the anime quote feed
    Quote {
        /// Print every quote on the feed instead of one random pick
        #[arg(short, long)]
        all: bool,
    },

    /// Translate text, auto-detecting the source language
    Translate {
        text: String,

        /// Target language code (see `snatch languages`)
        #[arg(short, long, default_value = "en")]
        to: String,
    },

    /// List supported translation target languages
    Languages,
}

#[derive(serde::Serialize)]
struct LanguageEntry {
    code: &'static str,
    name: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    // Logs go to stderr; stdout carries the JSON result
    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let out = cli.output.as_deref();
    let client = HttpClient::new(cli.endpoints.into_config())?;

    match cli.command {
        Commands::Spotify { url } => {
            tracing::info!(url = %url, "Resolving Spotify track");
            let result = spotify::download_track(&client, &url).await?;
            output::emit(&result, out)?;
        }
        Commands::Tiktok { url } => {
            tracing::info!(url = %url, "Resolving TikTok video");
            let video = tiktok::fetch_video(&client, &url).await?;
            output::emit(&video, out)?;
        }
        Commands::Youtube { url, format } => {
            tracing::info!(url = %url, format = %format, "Resolving YouTube video");
            let video = youtube::fetch_video(&url, &format).await?;
            output::emit(&video, out)?;
        }
        Commands::Quote { all } => {
            if all {
                let records = quotes::all_quotes(&client).await?;
                output::emit(&records, out)?;
            } else {
                match quotes::random_quote(&client).await? {
                    Some(record) => output::emit(&record, out)?,
                    None => anyhow::bail!("The quote feed had no complete quotes"),
                }
            }
        }
        Commands::Translate { text, to } => {
            let translation = translate::translate(&client, &text, &to).await?;
            output::emit(&translation, out)?;
        }
        Commands::Languages => {
            let entries: Vec<LanguageEntry> = languages::LANGUAGES
                .iter()
                .map(|&(code, name)| LanguageEntry { code, name })
                .collect();
            output::emit(&entries, out)?;
        }
    }

    Ok(())
}

//! Command-line interface definitions for the Google Ads digest monitor.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every credential and identity option can be supplied via an environment
//! variable, which is how scheduled runs (cron, CI secrets) configure the
//! binary. Parsed once in `main` and passed by reference into each pipeline
//! stage; no other module reads the environment directly.
//!
//! Missing secrets fall back to placeholder defaults. The run still starts,
//! and the placeholder is rejected by the downstream API or SMTP server,
//! which the affected stage absorbs as its normal fallback path.

use clap::Parser;

/// Command-line arguments for the digest monitor.
///
/// # Examples
///
/// ```sh
/// # Typical scheduled run, fully configured from the environment
/// GEMINI_API_KEY=... GMAIL_ADDRESS=... GMAIL_APP_PASSWORD=... \
///     RECIPIENT_EMAIL=... ads_digest
///
/// # Keep a dated HTML copy of each digest next to the inbox delivery
/// ads_digest --html-output-dir ./digests
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing page to scrape for article candidates
    #[arg(long, env = "SOURCE_URL", default_value = "https://searchengineland.com/")]
    pub source_url: String,

    /// Gemini API key for ranking and summarization calls
    #[arg(long, env = "GEMINI_API_KEY", default_value = "your_gemini_api_key_here")]
    pub gemini_api_key: String,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub gemini_model: String,

    /// Sender address, also used as the SMTP login user
    #[arg(long, env = "GMAIL_ADDRESS", default_value = "your_email@gmail.com")]
    pub mail_address: String,

    /// App-level password for the sender account
    #[arg(long, env = "GMAIL_APP_PASSWORD", default_value = "your_16_char_app_password")]
    pub mail_password: String,

    /// Recipient address for the digest
    #[arg(long, env = "RECIPIENT_EMAIL", default_value = "your_email@gmail.com")]
    pub recipient: String,

    /// SMTP submission host
    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS)
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// Topic keywords for the ranking fallback filter (comma-separated)
    #[arg(
        long,
        env = "TOPIC_KEYWORDS",
        value_delimiter = ',',
        default_values_t = [
            "google ads".to_string(),
            "google advertising".to_string(),
            "ppc".to_string(),
            "paid search".to_string(),
            "google adwords".to_string(),
        ]
    )]
    pub keywords: Vec<String>,

    /// Concurrent summarization fetches; 1 keeps the pipeline fully sequential
    #[arg(long, env = "SUMMARY_WORKERS", default_value_t = 1)]
    pub summary_workers: usize,

    /// Optional directory for a dated HTML copy of each rendered digest
    #[arg(long, env = "HTML_OUTPUT_DIR")]
    pub html_output_dir: Option<String>,
}

//! # Ads Digest
//!
//! A monitoring pipeline that scrapes Search Engine Land for recent
//! articles, ranks them for Google Ads relevance with a generative model,
//! summarizes the top matches, and emails the result as an HTML digest.
//!
//! ## Architecture
//!
//! The application follows a strictly sequential pipeline:
//! 1. **Scrape**: Extract article candidates from the listing page
//! 2. **Rank**: Score candidates for topical relevance (keyword fallback on failure)
//! 3. **Summarize**: Fetch each selected article and produce bullet points
//!    (snippet fallback on failure)
//! 4. **Render & Deliver**: Assemble the HTML digest and send it by email
//!
//! An empty scrape or an empty selection ends the run early; a day with
//! nothing to report is a normal outcome, not an error. Every external
//! failure degrades to a stage-local fallback; the only failure surfaced in
//! the exit status is a digest that was rendered but could not be delivered.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... GMAIL_ADDRESS=... GMAIL_APP_PASSWORD=... \
//!     RECIPIENT_EMAIL=... ads_digest
//! ```

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod email;
mod models;
mod outputs;
mod ranker;
mod scrapers;
mod summarizer;
mod utils;

use api::GeminiClient;
use cli::Cli;
use models::{RankMethod, SummarySource};
use utils::{digest_date, ensure_writable_dir, file_date, subject_date};

/// Fixed User-Agent for the listing and article-page fetches.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fixed timeout for page fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ads_digest starting up");

    let args = Cli::parse();

    let http = match reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };
    let ai = match GeminiClient::new(&args.gemini_api_key, &args.gemini_model) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build model client");
            return ExitCode::FAILURE;
        }
    };

    // ---- Scrape ----
    info!(url = %args.source_url, "Scraping listing page");
    let candidates = scrapers::searchengineland::fetch_candidates(&http, &args.source_url).await;
    if candidates.is_empty() {
        info!("No candidates found; nothing to report today");
        return ExitCode::SUCCESS;
    }

    // ---- Rank ----
    info!(count = candidates.len(), "Ranking candidates for relevance");
    let ranking = ranker::rank_candidates(&ai, &candidates, &args.keywords).await;
    if ranking.selected.is_empty() {
        match ranking.method {
            RankMethod::Model => info!("Model found no relevant candidates; nothing to report today"),
            RankMethod::KeywordFallback => {
                info!("Keyword fallback found no relevant candidates; nothing to report today")
            }
        }
        return ExitCode::SUCCESS;
    }
    info!(
        count = ranking.selected.len(),
        method = ?ranking.method,
        "Candidates selected"
    );

    // ---- Summarize ----
    let articles =
        summarizer::summarize_all(&ai, &http, ranking.selected, args.summary_workers).await;
    let fallbacks = articles
        .iter()
        .filter(|a| a.source == SummarySource::Snippet)
        .count();
    info!(
        total = articles.len(),
        fallbacks,
        "Summaries produced"
    );

    // ---- Render ----
    let html = outputs::html::render_digest(&articles, &digest_date());
    info!(bytes = html.len(), "Digest rendered");

    // ---- Optional snapshot ----
    if let Some(ref dir) = args.html_output_dir {
        match ensure_writable_dir(dir).await {
            Ok(()) => {
                if let Err(e) = outputs::html::write_snapshot(&html, dir, &file_date()).await {
                    warn!(error = %e, "Failed to write digest snapshot");
                }
            }
            Err(e) => warn!(path = %dir, error = %e, "Snapshot directory is not writable"),
        }
    }

    // ---- Deliver ----
    let sent = email::send_digest(&args, html, &subject_date()).await;

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        sent,
        "Execution complete"
    );

    if sent {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

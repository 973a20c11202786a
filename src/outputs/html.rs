//! HTML digest rendering.
//!
//! Assembles summarized articles into a single self-contained HTML document:
//! a gradient page header with the date stamp, one visually distinct block
//! per article with a cycling accent color, and a page footer crediting the
//! source. Inline styles only, since the document is delivered as an email
//! body.
//!
//! Scraped and model-generated text is untrusted. Titles, summaries, and
//! URLs are HTML-escaped before interpolation, so a hostile headline cannot
//! inject markup into the digest.

use crate::models::SummarizedArticle;
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

/// Accent colors cycled across article blocks, keyed by 1-based position.
pub const ACCENT_COLORS: [&str; 3] = ["#1a73e8", "#d93025", "#0d9488"];

/// Accent color for the article at 1-based `position`.
pub fn accent_color(position: usize) -> &'static str {
    ACCENT_COLORS[position % ACCENT_COLORS.len()]
}

/// Render the digest document.
///
/// Pure function: identical articles and date always produce byte-identical
/// output. The caller supplies the date stamp so rendering stays
/// deterministic under test.
///
/// # Arguments
///
/// * `articles` - Summarized articles in final display order
/// * `date` - Human-readable date stamp for the page header
pub fn render_digest(articles: &[SummarizedArticle], date: &str) -> String {
    let mut blocks = String::new();
    for (i, article) in articles.iter().enumerate() {
        let position = i + 1;
        let color = accent_color(position);
        let title = html_escape::encode_text(&article.ranked.candidate.title);
        let url = html_escape::encode_double_quoted_attribute(&article.ranked.candidate.url);
        let summary = html_escape::encode_text(&article.summary)
            .replace('\n', "<br>\n");

        write!(
            blocks,
            r#"
        <div style="background: white; border-left: 5px solid {color}; padding: 25px; margin-bottom: 30px; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);">
            <div style="background: {color}; color: white; padding: 15px 20px; margin: -25px -25px 20px -25px; border-radius: 8px 8px 0 0;">
                <h2 style="margin: 0; font-size: 24px; font-weight: bold; line-height: 1.3;">
                    📌 ARTICLE {position}: {title}
                </h2>
            </div>

            <div style="padding: 10px 0;">
                <h3 style="color: #333; font-size: 18px; margin-bottom: 15px; font-weight: 600;">Key Insights:</h3>
                <div style="color: #444; font-size: 15px; line-height: 1.8;">
                    {summary}
                </div>
            </div>

            <div style="margin-top: 20px; padding-top: 15px; border-top: 2px solid #eee;">
                <a href="{url}" style="background: {color}; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px; font-weight: bold; display: inline-block; font-size: 14px;">
                    📖 READ FULL ARTICLE →
                </a>
            </div>
        </div>
"#
        )
        .unwrap();
    }

    let date = html_escape::encode_text(date);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="margin: 0; padding: 0; background-color: #f5f5f5; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;">
    <div style="max-width: 700px; margin: 0 auto; padding: 20px;">

        <!-- Header -->
        <div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 40px 30px; border-radius: 12px; text-align: center; margin-bottom: 30px;">
            <h1 style="margin: 0; font-size: 32px; font-weight: bold;">🎯 Your Daily Google Ads Digest</h1>
            <p style="margin: 10px 0 0 0; font-size: 16px; opacity: 0.9;">Top 3 Articles from Search Engine Land</p>
            <p style="margin: 5px 0 0 0; font-size: 14px; opacity: 0.8;">{date}</p>
        </div>

        <!-- Articles -->
{blocks}
        <!-- Footer -->
        <div style="text-align: center; padding: 20px; color: #666; font-size: 13px; border-top: 2px solid #ddd; margin-top: 30px;">
            <p style="margin: 5px 0;">🤖 Powered by AI Article Monitor</p>
            <p style="margin: 5px 0;">Source: <a href="https://searchengineland.com" style="color: #1a73e8;">Search Engine Land</a></p>
        </div>

    </div>
</body>
</html>
"#
    )
}

/// Write a dated snapshot of the rendered digest.
///
/// # Arguments
///
/// * `html` - The rendered digest document
/// * `dir` - Snapshot directory (already validated as writable)
/// * `file_date` - Date in `YYYY-MM-DD` form used as the filename
///
/// # Returns
///
/// `Ok(())` on success, or the underlying I/O error.
#[instrument(level = "info", skip_all, fields(dir = %dir, date = %file_date))]
pub async fn write_snapshot(html: &str, dir: &str, file_date: &str) -> Result<(), Box<dyn Error>> {
    let path = format!("{}/{}.html", dir.trim_end_matches('/'), file_date);
    fs::write(&path, html).await?;
    info!(path = %path, "Wrote digest snapshot");
    Ok(())
}

//! Per-article summarization.
//!
//! For each selected candidate the summarizer fetches the full article page,
//! extracts readable text from the most specific content container available
//! (`article`, then `main`, then `body`) while skipping script, style, and
//! chrome subtrees, truncates it to a fixed character budget, and asks the
//! model for 3-4 bullet points. Any fetch or model failure degrades to the
//! listing snippet wrapped as a single bullet, so every selection reaches
//! the renderer with a non-empty summary.
//!
//! Articles are processed as an ordered stream with a configurable worker
//! pool. The default pool size of 1 keeps the stage fully sequential; the
//! fixed delay before each article is a throttle for the external API, not
//! a correctness requirement.

use crate::api::AskAsync;
use crate::models::{RankedCandidate, SummarizedArticle, SummarySource};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Character budget for article text sent to the model.
pub const CONTENT_CHAR_BUDGET: usize = 8000;

/// Fixed pause before each summarization, to respect external rate limits.
const INTER_CALL_DELAY: Duration = Duration::from_secs(1);

/// Subtrees dropped during text extraction.
const STRIP_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Content containers in preference order.
static CONTAINERS: Lazy<[Selector; 3]> = Lazy::new(|| {
    [
        Selector::parse("article").unwrap(),
        Selector::parse("main").unwrap(),
        Selector::parse("body").unwrap(),
    ]
});

/// Extract readable text from an article page.
///
/// Picks the first present container among `article`, `main`, `body` and
/// collects its text nodes, one line per node, skipping [`STRIP_TAGS`]
/// subtrees entirely.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    for selector in CONTAINERS.iter() {
        if let Some(container) = document.select(selector).next() {
            let mut out = String::new();
            collect_text(container, &mut out);
            return out.trim_end().to_string();
        }
    }
    String::new()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if STRIP_TAGS.contains(&element.value().name()) {
        return;
    }
    for node in element.children() {
        match node.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push_str(trimmed);
                    out.push('\n');
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(node) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

/// Truncate to at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Build the bullet-point summary prompt for one article.
pub fn build_summary_prompt(title: &str, content: &str) -> String {
    format!(
        r#"Summarize this article about Google Ads in 3-4 concise bullet points. Focus on:
- Key takeaways for Google Ads marketers
- Important updates or changes
- Actionable insights

Article Title: {title}

Article Content:
{content}

Provide a summary in bullet points (use • symbol)."#
    )
}

/// Wrap a listing snippet as a single-bullet summary.
pub fn snippet_fallback(snippet: &str) -> String {
    format!("• {snippet}")
}

/// Fetch an article page and extract its text.
///
/// Returns `None` on transport failure, non-success status, or a page that
/// yields no readable text, logging the cause; the caller treats `None` as
/// the fallback trigger.
#[instrument(level = "info", skip_all, fields(url = %url))]
pub async fn fetch_article_text(http: &reqwest::Client, url: &str) -> Option<String> {
    let response = match http.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Article fetch failed");
            return None;
        }
    };
    if !response.status().is_success() {
        warn!(status = %response.status(), "Article fetch returned error status");
        return None;
    }
    let html = match response.text().await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Article body could not be read");
            return None;
        }
    };

    let text = extract_article_text(&html);
    if text.is_empty() {
        warn!("Article page produced no readable text");
        None
    } else {
        debug!(bytes = text.len(), "Extracted article text");
        Some(text)
    }
}

/// Summarize one selection from already-extracted page text.
///
/// `text` is `None` when the page fetch failed. A missing or empty text, a
/// failed model call, or an empty model response all yield the snippet
/// fallback; the result always carries a non-empty `summary`.
pub async fn summarize_from_text<T>(
    ai: &T,
    ranked: RankedCandidate,
    text: Option<String>,
) -> SummarizedArticle
where
    T: AskAsync<Response = String>,
{
    let Some(content) = text.filter(|t| !t.trim().is_empty()) else {
        info!(
            title = %truncate_for_log(&ranked.candidate.title, 50),
            "No article text available; using snippet fallback"
        );
        let summary = snippet_fallback(&ranked.candidate.snippet);
        return SummarizedArticle {
            ranked,
            summary,
            source: SummarySource::Snippet,
        };
    };

    let prompt = build_summary_prompt(
        &ranked.candidate.title,
        truncate_chars(&content, CONTENT_CHAR_BUDGET),
    );
    match ai.ask(&prompt).await {
        Ok(summary) if !summary.trim().is_empty() => SummarizedArticle {
            ranked,
            summary,
            source: SummarySource::Model,
        },
        Ok(_) => {
            warn!("Model returned an empty summary; using snippet fallback");
            let summary = snippet_fallback(&ranked.candidate.snippet);
            SummarizedArticle {
                ranked,
                summary,
                source: SummarySource::Snippet,
            }
        }
        Err(e) => {
            warn!(error = %e, "Summary call failed; using snippet fallback");
            let summary = snippet_fallback(&ranked.candidate.snippet);
            SummarizedArticle {
                ranked,
                summary,
                source: SummarySource::Snippet,
            }
        }
    }
}

/// Summarize every selection, preserving the ranker's output order.
///
/// Selections flow through an ordered buffered stream sized by `workers`
/// (minimum 1). Each article waits [`INTER_CALL_DELAY`] before its fetch,
/// which serializes external calls at the default pool size; larger pools
/// trade that throttle for throughput.
#[instrument(level = "info", skip_all, fields(count = selected.len(), workers))]
pub async fn summarize_all<T>(
    ai: &T,
    http: &reqwest::Client,
    selected: Vec<RankedCandidate>,
    workers: usize,
) -> Vec<SummarizedArticle>
where
    T: AskAsync<Response = String>,
{
    let total = selected.len();
    stream::iter(selected.into_iter().enumerate())
        .map(|(i, ranked)| async move {
            sleep(INTER_CALL_DELAY).await;
            info!(
                index = i + 1,
                total,
                title = %truncate_for_log(&ranked.candidate.title, 50),
                "Summarizing article"
            );
            let text = fetch_article_text(http, &ranked.candidate.url).await;
            summarize_from_text(ai, ranked, text).await
        })
        .buffered(workers.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;
    use std::error::Error;

    struct StaticAsk {
        response: Option<String>,
    }

    impl AskAsync for StaticAsk {
        type Response = String;

        async fn ask(&self, _prompt: &str) -> Result<String, Box<dyn Error>> {
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => Err("model unavailable".into()),
            }
        }
    }

    fn ranked(title: &str, snippet: &str) -> RankedCandidate {
        RankedCandidate {
            candidate: Candidate {
                title: title.to_string(),
                url: "http://127.0.0.1:9/unreachable".to_string(),
                snippet: snippet.to_string(),
            },
            score: Some(9),
            reason: Some("On topic".to_string()),
        }
    }

    #[test]
    fn test_extract_prefers_article_container() {
        let html = r#"
            <html><body>
                <nav>Site navigation</nav>
                <article><p>Inside the article.</p></article>
                <p>Outside the article.</p>
            </body></html>
        "#;
        let text = extract_article_text(html);
        assert_eq!(text, "Inside the article.");
    }

    #[test]
    fn test_extract_strips_script_style_and_chrome() {
        let html = r#"
            <article>
                <header>Masthead</header>
                <script>var tracking = true;</script>
                <style>.a { color: red }</style>
                <p>Real content.</p>
                <footer>Copyright</footer>
            </article>
        "#;
        let text = extract_article_text(html);
        assert_eq!(text, "Real content.");
    }

    #[test]
    fn test_extract_falls_back_to_body() {
        let html = "<html><body><p>Body text only.</p></body></html>";
        assert_eq!(extract_article_text(html), "Body text only.");
    }

    #[test]
    fn test_extract_joins_text_nodes_with_newlines() {
        let html = "<article><h1>Title</h1><p>First.</p><p>Second.</p></article>";
        assert_eq!(extract_article_text(html), "Title\nFirst.\nSecond.");
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        let s = "•••••";
        assert_eq!(truncate_chars(s, 3), "•••");
        assert_eq!(truncate_chars(s, 10), s);
    }

    #[test]
    fn test_snippet_fallback_wraps_as_single_bullet() {
        assert_eq!(snippet_fallback("A short excerpt."), "• A short excerpt.");
    }

    #[test]
    fn test_summary_prompt_contains_title_and_content() {
        let prompt = build_summary_prompt("Big update", "Paragraph one.");
        assert!(prompt.contains("Article Title: Big update"));
        assert!(prompt.contains("Paragraph one."));
        assert!(prompt.contains("use • symbol"));
    }

    #[tokio::test]
    async fn test_summarize_from_text_model_path() {
        let ai = StaticAsk {
            response: Some("• Takeaway one\n• Takeaway two".to_string()),
        };
        let article = summarize_from_text(&ai, ranked("Story", "Snip"), Some("Body".into())).await;
        assert_eq!(article.source, SummarySource::Model);
        assert_eq!(article.summary, "• Takeaway one\n• Takeaway two");
    }

    #[tokio::test]
    async fn test_summarize_from_text_without_text_uses_snippet() {
        let ai = StaticAsk {
            response: Some("should never be called".to_string()),
        };
        let article = summarize_from_text(&ai, ranked("Story", "The snippet"), None).await;
        assert_eq!(article.source, SummarySource::Snippet);
        assert_eq!(article.summary, "• The snippet");
    }

    #[tokio::test]
    async fn test_summarize_from_text_model_failure_uses_snippet() {
        let ai = StaticAsk { response: None };
        let article =
            summarize_from_text(&ai, ranked("Story", "The snippet"), Some("Body".into())).await;
        assert_eq!(article.source, SummarySource::Snippet);
        assert_eq!(article.summary, "• The snippet");
    }

    #[tokio::test]
    async fn test_summarize_from_text_empty_model_output_uses_snippet() {
        let ai = StaticAsk {
            response: Some("   \n".to_string()),
        };
        let article =
            summarize_from_text(&ai, ranked("Story", "The snippet"), Some("Body".into())).await;
        assert_eq!(article.source, SummarySource::Snippet);
    }

    #[tokio::test]
    async fn test_summarize_all_preserves_order_under_full_failure() {
        let ai = StaticAsk { response: None };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let selected = vec![ranked("First", "one"), ranked("Second", "two")];

        let articles = summarize_all(&ai, &http, selected, 2).await;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].ranked.candidate.title, "First");
        assert_eq!(articles[1].ranked.candidate.title, "Second");
        assert!(articles.iter().all(|a| a.source == SummarySource::Snippet));
        assert!(articles.iter().all(|a| !a.summary.is_empty()));
    }
}

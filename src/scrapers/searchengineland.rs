//! Search Engine Land listing scraper.
//!
//! Scrapes the [Search Engine Land](https://searchengineland.com) homepage,
//! where stories are laid out as `<article>` cards: a heading with the story
//! link, followed by an excerpt paragraph. Cards missing a heading or link
//! are skipped rather than failing the listing.
//!
//! Relative hrefs are resolved against the listing URL, so candidates always
//! carry absolute article URLs.

use crate::models::Candidate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Maximum number of listing elements examined per run.
pub const LISTING_CAP: usize = 30;

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, h3, h4").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static EXCERPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.excerpt, div.description").unwrap());

/// Fetch the listing page and extract article candidates.
///
/// Issues a single GET with the shared client (fixed User-Agent and
/// timeout). A non-success status or transport failure is logged and
/// yields an empty list; no error escapes this boundary.
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `listing_url` - The listing page to scrape
///
/// # Returns
///
/// Candidates in listing order, at most [`LISTING_CAP`].
#[instrument(level = "info", skip_all, fields(url = %listing_url))]
pub async fn fetch_candidates(http: &reqwest::Client, listing_url: &str) -> Vec<Candidate> {
    let base = match Url::parse(listing_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "Listing URL is not parseable");
            return Vec::new();
        }
    };

    let response = match http.get(listing_url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Listing fetch failed");
            return Vec::new();
        }
    };
    if !response.status().is_success() {
        warn!(status = %response.status(), "Listing fetch returned error status");
        return Vec::new();
    }
    let html = match response.text().await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Listing body could not be read");
            return Vec::new();
        }
    };

    let candidates = parse_listing(&html, &base);
    info!(count = candidates.len(), "Indexed listing candidates");
    debug!(titles = ?candidates.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(), "Candidate titles");
    candidates
}

/// Extract article candidates from listing markup.
///
/// Examines up to [`LISTING_CAP`] `<article>` elements. For each one:
/// - title: text of the first `h2`/`h3`/`h4` heading
/// - link: an anchor inside the heading, else the first anchor in the
///   element, resolved against `base`
/// - snippet: the first `<p>`, else the first `.excerpt`/`.description`
///   element, else empty
///
/// Elements missing a heading, a non-empty title, or a resolvable link are
/// skipped. Listing order is preserved.
pub fn parse_listing(html: &str, base: &Url) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    for element in document.select(&ARTICLE).take(LISTING_CAP) {
        let Some(heading) = element.select(&HEADING).next() else {
            continue;
        };
        let title = element_text(heading);
        if title.is_empty() {
            continue;
        }

        let anchor = heading
            .select(&ANCHOR)
            .next()
            .or_else(|| element.select(&ANCHOR).next());
        let Some(href) = anchor.and_then(|a| a.value().attr("href")) else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            continue;
        };

        let snippet = element
            .select(&PARAGRAPH)
            .next()
            .or_else(|| element.select(&EXCERPT).next())
            .map(|el| element_text(el))
            .unwrap_or_default();

        candidates.push(Candidate {
            title,
            url: resolved.to_string(),
            snippet,
        });
    }

    candidates
}

/// Collect an element's text with whitespace collapsed to single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://searchengineland.com/").unwrap()
    }

    #[test]
    fn test_parse_listing_extracts_title_link_snippet() {
        let html = r#"
            <html><body>
            <article>
                <h2><a href="/google-ads-update-1">Google Ads update</a></h2>
                <p>Bidding changes roll out this week.</p>
            </article>
            </body></html>
        "#;
        let candidates = parse_listing(html, &base());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Google Ads update");
        assert_eq!(
            candidates[0].url,
            "https://searchengineland.com/google-ads-update-1"
        );
        assert_eq!(candidates[0].snippet, "Bidding changes roll out this week.");
    }

    #[test]
    fn test_parse_listing_skips_elements_without_heading() {
        let html = r#"
            <article><p>No heading here.</p><a href="/x">link</a></article>
            <article><h3><a href="/kept">Kept story</a></h3></article>
        "#;
        let candidates = parse_listing(html, &base());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Kept story");
    }

    #[test]
    fn test_parse_listing_skips_elements_without_link() {
        let html = r#"
            <article><h2>Headline without anchor</h2><p>text</p></article>
        "#;
        let candidates = parse_listing(html, &base());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_parse_listing_falls_back_to_element_anchor() {
        let html = r#"
            <article>
                <h2>Plain headline</h2>
                <a href="/fallback-anchor">Read more</a>
            </article>
        "#;
        let candidates = parse_listing(html, &base());
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].url,
            "https://searchengineland.com/fallback-anchor"
        );
    }

    #[test]
    fn test_parse_listing_uses_excerpt_class_when_no_paragraph() {
        let html = r#"
            <article>
                <h2><a href="/a">Story</a></h2>
                <div class="excerpt">Excerpt text here.</div>
            </article>
        "#;
        let candidates = parse_listing(html, &base());
        assert_eq!(candidates[0].snippet, "Excerpt text here.");
    }

    #[test]
    fn test_parse_listing_snippet_may_be_empty() {
        let html = r#"<article><h2><a href="/a">Story</a></h2></article>"#;
        let candidates = parse_listing(html, &base());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].snippet, "");
    }

    #[test]
    fn test_parse_listing_preserves_listing_order() {
        let html = r#"
            <article><h2><a href="/first">First</a></h2></article>
            <article><h2><a href="/second">Second</a></h2></article>
            <article><h2><a href="/third">Third</a></h2></article>
        "#;
        let titles: Vec<String> = parse_listing(html, &base())
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_parse_listing_caps_examined_elements() {
        let mut html = String::new();
        for i in 0..40 {
            html.push_str(&format!(
                "<article><h2><a href=\"/story-{i}\">Story {i}</a></h2></article>"
            ));
        }
        let candidates = parse_listing(&html, &base());
        assert_eq!(candidates.len(), LISTING_CAP);
        assert_eq!(candidates[0].title, "Story 0");
        assert_eq!(candidates[LISTING_CAP - 1].title, "Story 29");
    }

    #[test]
    fn test_parse_listing_collapses_title_whitespace() {
        let html = "<article><h2><a href=\"/a\">Google\n   Ads   <em>news</em></a></h2></article>";
        let candidates = parse_listing(html, &base());
        assert_eq!(candidates[0].title, "Google Ads news");
    }

    #[test]
    fn test_parse_listing_absolute_links_kept() {
        let html = r#"<article><h2><a href="https://example.com/abs">Abs</a></h2></article>"#;
        let candidates = parse_listing(html, &base());
        assert_eq!(candidates[0].url, "https://example.com/abs");
    }
}

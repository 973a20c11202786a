//! Data models for scraped articles and their processed representations.
//!
//! This module defines the core data structures that flow through the pipeline:
//! - [`Candidate`]: A scraped article stub before any relevance judgment
//! - [`RankedCandidate`]: A candidate selected by the relevance ranker
//! - [`SummarizedArticle`]: A ranked candidate plus its bullet-point summary
//! - [`RankingEntry`]: The wire format of a single entry in the model's ranking
//!
//! Each stage's output type carries enough provenance ([`RankMethod`],
//! [`SummarySource`]) for callers and tests to tell a clean result from a
//! degraded one without parsing log output.

use serde::Deserialize;

/// A raw article stub as scraped from the listing page.
///
/// # Fields
///
/// * `title` - Headline text from the listing element
/// * `url` - Absolute URL of the article page
/// * `snippet` - Short excerpt or description, possibly empty
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The article headline.
    pub title: String,
    /// Absolute link to the full article.
    pub url: String,
    /// Listing excerpt; empty when the listing element had none.
    pub snippet: String,
}

/// How the final selection of candidates was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMethod {
    /// The model returned a parseable ranking.
    Model,
    /// The model call failed or was unparseable; keyword matching was used.
    KeywordFallback,
}

/// The ranker's output: at most three selections plus the method that produced them.
#[derive(Debug)]
pub struct Ranking {
    /// Selected candidates, highest-ranked first (or listing order for the fallback).
    pub selected: Vec<RankedCandidate>,
    /// Whether the model or the keyword fallback made the selection.
    pub method: RankMethod,
}

/// A candidate selected by the relevance ranker.
///
/// Score and reason are present only when the model produced the ranking;
/// the keyword fallback selects without judging.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    /// The underlying scraped candidate.
    pub candidate: Candidate,
    /// Relevance score 0-10 assigned by the model.
    pub score: Option<u8>,
    /// The model's one-line justification for the score.
    pub reason: Option<String>,
}

/// One entry of the JSON array the ranking prompt asks the model to return.
///
/// `number` is a 1-based index into the enumerated candidate list. The score
/// is deserialized as a plain integer and clamped to 0-10 during resolution,
/// so an out-of-range value from the model never survives past the ranker.
#[derive(Debug, Deserialize)]
pub struct RankingEntry {
    /// 1-based index of the candidate in the prompt enumeration.
    pub number: i64,
    /// Relevance score as returned by the model.
    pub score: i64,
    /// Brief justification.
    #[serde(default)]
    pub reason: String,
}

/// Where a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// Bullet points generated by the model from the full article text.
    Model,
    /// The listing snippet wrapped as a single bullet (fetch or model failure).
    Snippet,
}

/// A ranked candidate with its finished summary, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizedArticle {
    /// The selection this summary belongs to.
    pub ranked: RankedCandidate,
    /// Bullet-formatted summary text.
    pub summary: String,
    /// Whether the summary is model output or the snippet fallback.
    pub source: SummarySource,
}

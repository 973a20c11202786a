//! Relevance ranking of scraped candidates.
//!
//! The ranker enumerates up to [`PROMPT_CANDIDATE_CAP`] candidates into a
//! single prompt, asks the model to score their relevance to Google Ads on a
//! 0-10 scale, and parses a JSON array of the top three back out of the
//! response. A failed call or an unparseable response degrades to a
//! deterministic keyword filter over title + snippet.
//!
//! Prompt building, response parsing, and index resolution are separate
//! functions so each can be exercised without network access; only
//! [`rank_candidates`] touches the model seam.

use crate::api::AskAsync;
use crate::models::{Candidate, RankMethod, RankedCandidate, Ranking, RankingEntry};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;
use tracing::{info, instrument, warn};

/// Maximum number of candidates enumerated into the ranking prompt.
pub const PROMPT_CANDIDATE_CAP: usize = 20;

/// Maximum number of selections a ranking may produce.
pub const SELECTION_CAP: usize = 3;

/// First `[`-to-last-`]` substring, dot matching newlines. Mirrors how the
/// ranking prompt formats its expected answer.
static RANKING_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Build the single natural-language ranking prompt.
///
/// Candidates are enumerated with 1-based indices, `TITLE:`/`SNIPPET:` per
/// entry, followed by the scoring rubric and the exact JSON shape the model
/// must return. At most [`PROMPT_CANDIDATE_CAP`] candidates are included.
pub fn build_ranking_prompt(candidates: &[Candidate]) -> String {
    let mut enumeration = String::new();
    for (i, candidate) in candidates.iter().take(PROMPT_CANDIDATE_CAP).enumerate() {
        writeln!(
            enumeration,
            "\n{}. TITLE: {}\n   SNIPPET: {}",
            i + 1,
            candidate.title,
            candidate.snippet
        )
        .unwrap();
    }

    format!(
        r#"Analyze these articles from Search Engine Land and identify which ones are most relevant to Google Ads (PPC, paid search, Google advertising).

Articles:
{enumeration}
For each article, rate its relevance to Google Ads on a scale of 0-10:
- 10 = Directly about Google Ads features, updates, strategies, or news
- 7-9 = Heavily related to paid search or PPC
- 4-6 = Mentions Google Ads but focuses on other topics
- 0-3 = Not relevant to Google Ads

Return ONLY a JSON array with the top 3 most relevant articles in this exact format:
[
  {{"number": 1, "score": 10, "reason": "Brief reason"}},
  {{"number": 5, "score": 9, "reason": "Brief reason"}},
  {{"number": 3, "score": 8, "reason": "Brief reason"}}
]"#
    )
}

/// Parse the first JSON-array-shaped substring out of a model response.
///
/// # Returns
///
/// The deserialized entries, or `None` when the response contains no
/// `[`…`]` span or the span is not a valid `RankingEntry` array.
pub fn parse_ranking(response: &str) -> Option<Vec<RankingEntry>> {
    let span = RANKING_ARRAY.find(response)?;
    serde_json::from_str(span.as_str()).ok()
}

/// Resolve ranking entries back to the candidates they point at.
///
/// Takes at most [`SELECTION_CAP`] entries in response order, drops repeated
/// indices and indices outside `1..=candidates.len()`, and clamps scores to
/// 0-10.
pub fn resolve_rankings(entries: &[RankingEntry], candidates: &[Candidate]) -> Vec<RankedCandidate> {
    entries
        .iter()
        .take(SELECTION_CAP)
        .unique_by(|entry| entry.number)
        .filter_map(|entry| {
            if entry.number < 1 || entry.number as usize > candidates.len() {
                warn!(number = entry.number, "Ranking entry index out of range; dropping");
                return None;
            }
            let candidate = candidates[entry.number as usize - 1].clone();
            Some(RankedCandidate {
                candidate,
                score: Some(entry.score.clamp(0, 10) as u8),
                reason: Some(entry.reason.clone()),
            })
        })
        .collect()
}

/// Deterministic keyword filter used when the model path fails.
///
/// A candidate is relevant if its title + snippet contains any configured
/// keyword, case-insensitively. Returns the first [`SELECTION_CAP`] matches
/// in original listing order, without scores or reasons.
pub fn keyword_fallback(candidates: &[Candidate], keywords: &[String]) -> Vec<RankedCandidate> {
    candidates
        .iter()
        .filter(|candidate| {
            let text = format!("{} {}", candidate.title, candidate.snippet).to_lowercase();
            keywords
                .iter()
                .any(|keyword| text.contains(&keyword.to_lowercase()))
        })
        .take(SELECTION_CAP)
        .map(|candidate| RankedCandidate {
            candidate: candidate.clone(),
            score: None,
            reason: None,
        })
        .collect()
}

/// Rank candidates by topical relevance, model first, keyword filter second.
///
/// Issues one model call over the enumerated candidates. If the call fails
/// or its response contains no parseable JSON array, the keyword fallback
/// makes the selection instead. An empty selection is a normal outcome for
/// a day with no relevant coverage, not an error.
#[instrument(level = "info", skip_all, fields(candidates = candidates.len()))]
pub async fn rank_candidates<T>(ai: &T, candidates: &[Candidate], keywords: &[String]) -> Ranking
where
    T: AskAsync<Response = String>,
{
    if candidates.is_empty() {
        return Ranking {
            selected: Vec::new(),
            method: RankMethod::Model,
        };
    }

    let prompt = build_ranking_prompt(candidates);
    match ai.ask(&prompt).await {
        Ok(response) => match parse_ranking(&response) {
            Some(entries) => {
                let selected = resolve_rankings(&entries, candidates);
                info!(count = selected.len(), "Model ranked candidates");
                Ranking {
                    selected,
                    method: RankMethod::Model,
                }
            }
            None => {
                warn!(
                    response_preview = %truncate_for_log(&response, 300),
                    "No JSON array in ranking response; using keyword fallback"
                );
                Ranking {
                    selected: keyword_fallback(candidates, keywords),
                    method: RankMethod::KeywordFallback,
                }
            }
        },
        Err(e) => {
            warn!(error = %e, "Ranking call failed; using keyword fallback");
            Ranking {
                selected: keyword_fallback(candidates, keywords),
                method: RankMethod::KeywordFallback,
            }
        }
    }
}

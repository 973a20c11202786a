//! Listing-page scrapers for discovering article candidates.
//!
//! Each scraper module exposes the same narrow surface:
//! - `parse_listing(html, base)`: Pure extraction from listing markup to
//!   a list of [`crate::models::Candidate`] values
//! - `fetch_candidates(http, url)`: Fetches the listing page and runs the
//!   parser, absorbing network failures into an empty list
//!
//! Keeping the parser pure means the site-specific DOM heuristics can be
//! exercised against canned markup, and a replacement source only has to
//! provide the same two functions to slot into the pipeline.
//!
//! # Supported Sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | Search Engine Land | [`searchengineland`] | `<article>` cards on the homepage |

pub mod searchengineland;

//! packscope - authenticated review harvesting with packaging-issue
//! classification.
//!
//! The crawler signs in to a storefront, harvests a product's reviews,
//! re-queries the listing for every packaging term those reviews mention and
//! returns a deduplicated [`models::Corpus`]. The analysis layer labels
//! sentiment, scores each review for packaging relevance and summarizes the
//! result.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod services;
pub mod utils;

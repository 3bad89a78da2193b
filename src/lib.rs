//! Volare library crate
//!
//! AI-grounded minimum cost-of-living estimates. The model does the
//! estimating; this crate builds the prompts, digs the JSON out of the
//! replies, merges the grounding citations, and classifies the failures.

pub mod budget;
pub mod config;
pub mod corrections;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod locale;
pub mod prompt;
pub mod suggest;

//! GrantScope - Grant Data Exploration Toolkit
//!
//! Loads Candid-style grant datasets, derives analyses (summary statistics,
//! amount distribution, relationships, top categories, description text),
//! renders them as chart artifacts, and optionally asks an LLM for
//! natural-language commentary framed by the user's project theme. Everything
//! can be assembled into a single Markdown report.

pub mod analysis;
pub mod chart;
pub mod commands;
pub mod dataset;
pub mod insight;
pub mod report;
pub mod session;

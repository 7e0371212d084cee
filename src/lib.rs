//! Business-analysis report assembly and an Exa neural search wrapper.
//!
//! The two components are independent: [`report::ReportGenerator`] turns an
//! analysis input into a sectioned report, and [`search::SearchService`] wraps
//! the Exa API with a single basic-search fallback.

pub mod config;
pub mod exa;
pub mod report;
pub mod search;

pub const USER_AGENT: &str = concat!("marketlens/", env!("CARGO_PKG_VERSION"));

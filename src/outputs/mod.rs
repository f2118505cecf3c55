//! Output writers for scraped judgments.
//!
//! - [`json`]: one pretty-printed JSON array per year

pub mod json;

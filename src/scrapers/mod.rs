//! Scrapers for the landmark judgments pages.
//!
//! - [`sci`]: fetches a year's page and drives extraction and output
//! - [`table`]: turns the judgments table into records, tolerating header,
//!   serial-column and link-placement differences between years

pub mod sci;
pub mod table;

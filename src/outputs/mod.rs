//! Output generation for the daily digest.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`ResultDocument`](crate::models::ResultDocument) to disk
//! - [`summary`]: Renders the human-readable console summary

pub mod json;
pub mod summary;

//! Feed pagers.
//!
//! Each pager walks one source's pagination scheme and hands back every
//! item it saw together with the reason it stopped. Failures end the walk
//! but never discard earlier pages.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | 36Kr news flow | [`kr36`] | JSON gateway, `pageCallback` cursor | Fixed pause between pages |

pub mod kr36;

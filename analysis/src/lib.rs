//! Turns the implicit, order-dependent fragments of a match page into explicit
//! per-team records.
//!
//! Nothing in here performs I/O: callers hand over already located fragments
//! (the draft note, the round strip, stat-table team labels) together with the
//! [`common::MatchContext`] and get records back.

pub mod boundary;
pub mod draft;
pub mod matchinfo;
pub mod player_maps;
pub mod rounds;

/// Placeholder map name for segments the page did not name.
pub const UNKNOWN_MAP: &str = "Unknown";

//! Map labels for player stat rows.
//!
//! The stats tab renders one table per map plus an "all maps" table, and the
//! rows do not say which table they came from. Each table lists the players
//! of one team, then the other, so the tables are recovered with
//! [`crate::boundary::Alternation`] on the team label of every row.

use crate::boundary::Alternation;

pub const ALL_MAPS: &str = "all";

/// Table order on the page: first map, the combined table, remaining maps.
pub fn stats_table_order(nav_maps: &[String]) -> Vec<String> {
    let mut order = nav_maps.to_vec();
    order.insert(order.len().min(1), ALL_MAPS.to_owned());
    order
}

/// The table (map) name of every stat row, given each row's team label.
pub fn label_rows<S>(labels: &[S], table_order: &[String]) -> Vec<String>
where
    S: AsRef<str>,
{
    let mut state = Alternation::new();
    let mut overflowed = false;

    labels
        .iter()
        .map(|label| {
            let segment = state.next(label.as_ref());
            match table_order.get(segment.index) {
                Some(name) => name.clone(),
                None => {
                    if !overflowed {
                        tracing::warn!(
                            "Stat rows span more tables than the {} known",
                            table_order.len()
                        );
                        overflowed = true;
                    }
                    crate::UNKNOWN_MAP.to_owned()
                }
            }
        })
        .collect()
}

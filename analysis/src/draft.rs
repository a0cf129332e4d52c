//! Map draft reconstruction from the free-text draft note, e.g.
//! `"PRX ban Split; FNC ban Icebox; PRX pick Ascent; ...; Lotus remains"`.
//!
//! The note carries no explicit action tags. Phrases are told apart by their
//! word count only: three words are a team action (`<team> <pick|ban> <map>`),
//! two words are the decider (`<map> remains`).

use common::{DraftRecord, MatchContext, Perspective};

/// Slot `i` of the second team's draft is slot `DRAFT_PERMUTATION[i]` of the
/// first team's. Each pair of slots is one turn contested by both teams, the
/// decider is shared.
pub const DRAFT_PERMUTATION: [usize; 7] = [1, 0, 3, 2, 5, 4, 6];

pub const DRAFT_SLOTS: usize = DRAFT_PERMUTATION.len();

const PHRASE_DELIMITER: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftAction {
    Pick,
    Ban,
    Decider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftToken {
    pub action: DraftAction,
    pub map: String,
    /// `None` for the decider, which neither team chose.
    pub team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftParseError {
    #[error("{match_id}: draft note has {found} map slots, expected 7")]
    Incomplete { match_id: String, found: usize },
    #[error("{match_id}: no draft note on the page")]
    MissingNote { match_id: String },
}

impl DraftParseError {
    pub fn match_id(&self) -> &str {
        match self {
            Self::Incomplete { match_id, .. } => match_id,
            Self::MissingNote { match_id } => match_id,
        }
    }
}

pub fn tokenize(note: &str) -> Vec<DraftToken> {
    note.split(PHRASE_DELIMITER)
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .filter_map(|phrase| {
            let token = classify_phrase(phrase);
            if token.is_none() {
                tracing::debug!(phrase, "Dropping draft phrase with unexpected word count");
            }
            token
        })
        .collect()
}

fn classify_phrase(phrase: &str) -> Option<DraftToken> {
    let words: Vec<&str> = phrase.split_whitespace().collect();

    match words.as_slice() {
        [team, action, map] => {
            let action = if action.eq_ignore_ascii_case("ban") {
                DraftAction::Ban
            } else {
                DraftAction::Pick
            };

            Some(DraftToken {
                action,
                map: (*map).to_owned(),
                team: Some((*team).to_owned()),
            })
        }
        [first, last] => {
            let map = if first.eq_ignore_ascii_case("decider") {
                last
            } else {
                first
            };

            Some(DraftToken {
                action: DraftAction::Decider,
                map: (*map).to_owned(),
                team: None,
            })
        }
        _ => None,
    }
}

/// Builds the draft record of both teams from the draft note.
///
/// The first team's slots are the map names in note order, the second team's
/// slots are derived through [`DRAFT_PERMUTATION`].
#[tracing::instrument(skip(note, context), fields(match_id = %context.match_id()))]
pub fn reconstruct(
    note: &str,
    context: &MatchContext,
) -> Result<[DraftRecord; 2], DraftParseError> {
    let tokens = tokenize(note);

    if tokens.len() < DRAFT_SLOTS {
        return Err(DraftParseError::Incomplete {
            match_id: context.match_id(),
            found: tokens.len(),
        });
    }
    if tokens.len() > DRAFT_SLOTS {
        tracing::warn!(
            "Draft note has {} map slots, ignoring the last {}",
            tokens.len(),
            tokens.len() - DRAFT_SLOTS
        );
    }

    let team_a_maps: [String; DRAFT_SLOTS] = std::array::from_fn(|i| tokens[i].map.clone());
    let team_b_maps: [String; DRAFT_SLOTS] =
        std::array::from_fn(|i| team_a_maps[DRAFT_PERMUTATION[i]].clone());

    let team_a = DraftRecord {
        team_self: context.team_a_code.clone(),
        team_opponent: context.team_b_code.clone(),
        maps: team_a_maps,
        perspective: Perspective::A,
        best_of: context.best_of,
        date: context.date.clone(),
        event: context.event.clone(),
    };
    let team_b = DraftRecord {
        team_self: context.team_b_code.clone(),
        team_opponent: context.team_a_code.clone(),
        maps: team_b_maps,
        perspective: Perspective::B,
        best_of: context.best_of,
        date: context.date.clone(),
        event: context.event.clone(),
    };

    Ok([team_a, team_b])
}

/// [`reconstruct`] for pages where the note may be absent altogether.
pub fn reconstruct_optional(
    note: Option<&str>,
    context: &MatchContext,
) -> Result<[DraftRecord; 2], DraftParseError> {
    match note {
        Some(note) => reconstruct(note, context),
        None => Err(DraftParseError::MissingNote {
            match_id: context.match_id(),
        }),
    }
}

//! Match header helpers: page title, best-of note and whether a match should
//! be extracted at all.

use common::MatchContext;

const FINAL_STATUS: &str = "final";
const SHOWMATCH: &str = "Showmatch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParts {
    pub team_a: String,
    pub team_b: String,
    pub event: String,
    pub stage: String,
    pub series_type: String,
}

/// Splits a match page title of the form
/// `"<team a> vs. <team b> | <event> | <stage> | <series type> | <site>"`.
pub fn parse_title(title: &str) -> Option<TitleParts> {
    let fields: Vec<&str> = title.split('|').map(str::trim).collect();
    let [teams, event, stage, series_type, _site] = fields.as_slice() else {
        return None;
    };

    let (team_a, team_b) = teams.split_once(" vs. ")?;
    let (team_a, team_b) = (team_a.trim(), team_b.trim());
    if team_a.is_empty() || team_b.is_empty() {
        return None;
    }

    Some(TitleParts {
        team_a: team_a.to_owned(),
        team_b: team_b.to_owned(),
        event: (*event).to_owned(),
        stage: (*stage).to_owned(),
        series_type: (*series_type).to_owned(),
    })
}

/// Reads the series length from a note like `"Bo3"`.
pub fn parse_best_of(note: &str) -> Option<u8> {
    let digit = note.trim().chars().last()?.to_digit(10)?;
    match digit {
        1 | 3 | 5 => Some(digit as u8),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMatch {
    #[error("match status is {0:?}, not final")]
    NotFinal(String),
    #[error("showmatches are not extracted")]
    Showmatch,
}

/// Only completed, competitive matches are extracted.
pub fn check_valid(context: &MatchContext) -> Result<(), InvalidMatch> {
    if context.series_type.trim().eq_ignore_ascii_case(SHOWMATCH) {
        return Err(InvalidMatch::Showmatch);
    }
    if !context.status.trim().eq_ignore_ascii_case(FINAL_STATUS) {
        return Err(InvalidMatch::NotFinal(context.status.clone()));
    }

    Ok(())
}

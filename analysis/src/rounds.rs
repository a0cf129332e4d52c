//! Round timeline extraction.
//!
//! The round strip of a match page lists the rounds of every map back to back.
//! Maps are separated only by the round counter starting over, so the timeline
//! is rebuilt with [`crate::boundary::CounterReset`] while attributing every
//! round to the side that won it.

use common::{MatchContext, RoundBlock, RoundPerspectiveRecord, Side, WinCondition};

use crate::boundary::CounterReset;

/// Icon file stems used by the round strip.
pub static WIN_CONDITION_ICONS: phf::Map<&'static str, WinCondition> = phf::phf_map! {
    "elim" => WinCondition::Elimination,
    "defuse" => WinCondition::Defusal,
    "boom" => WinCondition::Detonation,
    "time" => WinCondition::TimeExpired,
};

/// Outcome of one team slot of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideOutcome {
    WonAsAttack,
    WonAsDefense,
    Unclassified,
}

/// Classifies the class list of an outcome square, e.g. `"rnd-sq mod-win mod-ct"`.
pub fn classify_marker(class: &str) -> SideOutcome {
    let mut won = false;
    let mut attack = false;
    let mut defense = false;

    for class in class.split_whitespace() {
        match class {
            "mod-win" => won = true,
            "mod-t" => attack = true,
            "mod-ct" => defense = true,
            _ => {}
        }
    }

    match (won, attack, defense) {
        (true, true, false) => SideOutcome::WonAsAttack,
        (true, false, true) => SideOutcome::WonAsDefense,
        _ => SideOutcome::Unclassified,
    }
}

/// Resolves the `src` of a win-condition icon, e.g. `/img/vlr/game/round/elim.webp`.
///
/// Returns `None` if there is no file name to look at. Unrecognised icons are
/// [`WinCondition::Unknown`].
pub fn win_condition_from_icon(src: &str) -> Option<WinCondition> {
    let file = src.trim().rsplit('/').next()?;
    let file = file.split(['?', '#']).next()?;
    let stem = file.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file);
    if stem.is_empty() {
        return None;
    }

    let stem = stem.to_ascii_lowercase();
    Some(
        WIN_CONDITION_ICONS
            .get(stem.as_str())
            .copied()
            .unwrap_or(WinCondition::Unknown),
    )
}

/// Why a round block was left out of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
pub enum RoundBlockSkipped {
    #[error("round number {text:?} is not a positive integer")]
    BadRoundNumber { text: String },
    #[error("expected 2 outcome markers, found {found}")]
    MissingMarkers { found: usize },
    #[error("win condition icon {icon:?} could not be resolved")]
    MissingWinCondition { icon: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SkippedBlock {
    /// Position of the block in the input stream.
    pub index: usize,
    pub reason: RoundBlockSkipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedRound {
    pub number: u32,
    /// Team A first.
    pub slots: [SideOutcome; 2],
    pub win_condition: WinCondition,
}

impl ClassifiedRound {
    pub fn parse(block: &RoundBlock) -> Result<Self, RoundBlockSkipped> {
        let number = block
            .number
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| RoundBlockSkipped::BadRoundNumber {
                text: block.number.clone(),
            })?;

        let slots = match block.markers.as_slice() {
            [a, b, ..] => [classify_marker(a), classify_marker(b)],
            _ => {
                return Err(RoundBlockSkipped::MissingMarkers {
                    found: block.markers.len(),
                })
            }
        };

        let win_condition = block
            .win_icon
            .as_deref()
            .and_then(win_condition_from_icon)
            .ok_or_else(|| RoundBlockSkipped::MissingWinCondition {
                icon: block.win_icon.clone(),
            })?;

        Ok(Self {
            number,
            slots,
            win_condition,
        })
    }
}

/// All rounds of one map, seen from both teams. `team_a[i]` and `team_b[i]`
/// describe the same round.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MapRounds {
    pub map: String,
    pub map_order: usize,
    pub team_a: Vec<RoundPerspectiveRecord>,
    pub team_b: Vec<RoundPerspectiveRecord>,
}

impl MapRounds {
    pub fn round_count(&self) -> usize {
        self.team_a.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &RoundPerspectiveRecord> {
        self.team_a.iter().chain(self.team_b.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct MatchRounds {
    pub maps: Vec<MapRounds>,
    pub skipped: Vec<SkippedBlock>,
}

#[derive(Debug, Clone, Copy)]
struct AttributedRound {
    round: u32,
    team_a_won: u8,
    team_b_won: u8,
    win_condition: WinCondition,
}

/// The map currently being accumulated. Sides are team A's.
#[derive(Debug)]
struct MapTimeline {
    map: String,
    map_order: usize,
    attack: Vec<AttributedRound>,
    defense: Vec<AttributedRound>,
}

impl MapTimeline {
    fn new(map: String, map_order: usize) -> Self {
        Self {
            map,
            map_order,
            attack: Vec::new(),
            defense: Vec::new(),
        }
    }

    fn attribute(&mut self, round: &ClassifiedRound) {
        let entry = |team_a_won, team_b_won| AttributedRound {
            round: round.number,
            team_a_won,
            team_b_won,
            win_condition: round.win_condition,
        };

        match round.slots[0] {
            SideOutcome::WonAsAttack => self.attack.push(entry(1, 0)),
            SideOutcome::WonAsDefense => self.defense.push(entry(1, 0)),
            SideOutcome::Unclassified => {}
        }
        // Team B winning a side means team A held the other one.
        match round.slots[1] {
            SideOutcome::WonAsAttack => self.defense.push(entry(0, 1)),
            SideOutcome::WonAsDefense => self.attack.push(entry(0, 1)),
            SideOutcome::Unclassified => {}
        }
    }

    fn flush(self, context: &MatchContext) -> MapRounds {
        let row = |side: Side, r: &AttributedRound| RoundPerspectiveRecord {
            team_self: context.team_a_code.clone(),
            team_opponent: context.team_b_code.clone(),
            map: self.map.clone(),
            side,
            self_won: r.team_a_won,
            opponent_won: r.team_b_won,
            round: r.round,
            win_condition: r.win_condition,
            date: context.date.clone(),
            map_order: self.map_order,
            event: context.event.clone(),
        };

        let team_a: Vec<_> = self
            .attack
            .iter()
            .map(|r| row(Side::Attack, r))
            .chain(self.defense.iter().map(|r| row(Side::Defense, r)))
            .collect();
        let team_b = team_a.iter().map(RoundPerspectiveRecord::mirrored).collect();

        MapRounds {
            map: self.map,
            map_order: self.map_order,
            team_a,
            team_b,
        }
    }
}

fn map_name(map_names: &[String], index: usize) -> String {
    match map_names.get(index) {
        Some(name) => name.clone(),
        None => {
            tracing::warn!(
                "Round strip has more maps than the {} named on the page",
                map_names.len()
            );
            crate::UNKNOWN_MAP.to_owned()
        }
    }
}

/// Accumulator for one match. Feed every block in document order with
/// [`RoundTimeline::push`], then call [`RoundTimeline::finish`].
#[derive(Debug)]
pub struct RoundTimeline<'m> {
    context: &'m MatchContext,
    map_names: &'m [String],
    boundary: CounterReset,
    current: Option<MapTimeline>,
    consumed: usize,
    maps: Vec<MapRounds>,
    skipped: Vec<SkippedBlock>,
}

impl<'m> RoundTimeline<'m> {
    pub fn new(context: &'m MatchContext, map_names: &'m [String]) -> Self {
        Self {
            context,
            map_names,
            boundary: CounterReset::new(),
            current: None,
            consumed: 0,
            maps: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn push(&mut self, block: &RoundBlock) {
        let index = self.consumed;
        self.consumed += 1;

        let round = match ClassifiedRound::parse(block) {
            Ok(r) => r,
            Err(reason) => {
                tracing::warn!(index, %reason, "Skipping round block");
                self.skipped.push(SkippedBlock { index, reason });
                return;
            }
        };

        let segment = self.boundary.next(round.number);
        if segment.starts_new {
            if let Some(done) = self.current.take() {
                self.maps.push(done.flush(self.context));
            }
        }

        let map_names = self.map_names;
        self.current
            .get_or_insert_with(|| MapTimeline::new(map_name(map_names, segment.index), segment.index))
            .attribute(&round);
    }

    pub fn finish(mut self) -> MatchRounds {
        if let Some(done) = self.current.take() {
            self.maps.push(done.flush(self.context));
        }

        MatchRounds {
            maps: self.maps,
            skipped: self.skipped,
        }
    }
}

/// Runs the whole round strip of a match through a fresh [`RoundTimeline`].
#[tracing::instrument(skip_all, fields(match_id = %context.match_id()))]
pub fn extract(context: &MatchContext, map_names: &[String], blocks: &[RoundBlock]) -> MatchRounds {
    let mut timeline = RoundTimeline::new(context, map_names);
    for block in blocks {
        timeline.push(block);
    }

    let result = timeline.finish();
    tracing::debug!(
        "Extracted {} maps, skipped {} round blocks",
        result.maps.len(),
        result.skipped.len()
    );
    result
}

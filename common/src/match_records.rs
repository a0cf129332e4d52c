#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Perspective {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    #[serde(rename = "atk")]
    Attack,
    #[serde(rename = "def")]
    Defense,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Attack => Self::Defense,
            Self::Defense => Self::Attack,
        }
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    Elimination,
    Defusal,
    Detonation,
    TimeExpired,
    Unknown,
}

/// One team's view of the map draft.
///
/// `maps` holds the seven draft slots in protocol order (two bans, four
/// picks/bans alternating between the teams, then the decider). The record for
/// the other team is the pairwise swap of the first six slots.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DraftRecord {
    pub team_self: String,
    pub team_opponent: String,
    pub maps: [String; 7],
    pub perspective: Perspective,
    pub best_of: u8,
    pub date: String,
    pub event: String,
}

impl DraftRecord {
    pub fn decider(&self) -> &str {
        &self.maps[6]
    }
}

/// One round of one map, seen from `team_self`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoundPerspectiveRecord {
    pub team_self: String,
    pub team_opponent: String,
    pub map: String,
    pub side: Side,
    pub self_won: u8,
    pub opponent_won: u8,
    pub round: u32,
    pub win_condition: WinCondition,
    pub date: String,
    pub map_order: usize,
    pub event: String,
}

impl RoundPerspectiveRecord {
    /// The same round seen from the opponent.
    pub fn mirrored(&self) -> Self {
        Self {
            team_self: self.team_opponent.clone(),
            team_opponent: self.team_self.clone(),
            map: self.map.clone(),
            side: self.side.opposite(),
            self_won: self.opponent_won,
            opponent_won: self.self_won,
            round: self.round,
            win_condition: self.win_condition,
            date: self.date.clone(),
            map_order: self.map_order,
            event: self.event.clone(),
        }
    }
}

/// A match that could not be (fully) extracted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchFailure {
    pub event: String,
    pub url: String,
    pub error: String,
}

/// A player stat row labelled with the map table it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerMapRow {
    pub player: String,
    pub team: String,
    pub map: String,
    pub date: String,
    pub event: String,
}

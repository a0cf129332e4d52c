pub mod match_records;
pub use match_records::{
    DraftRecord, MatchFailure, Perspective, PlayerMapRow, RoundPerspectiveRecord, Side,
    WinCondition,
};

/// Per-match metadata as located on the match page. Read-only for every
/// extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct MatchContext {
    pub source_url: String,
    #[serde(default)]
    pub team_a: String,
    #[serde(default)]
    pub team_b: String,
    pub team_a_code: String,
    pub team_b_code: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub series_type: String,
    pub status: String,
    #[serde(default)]
    pub best_of: u8,
    /// Opaque UTC timestamp string, passed through untouched.
    pub date: String,
    #[serde(default)]
    pub patch: Option<String>,
}

impl MatchContext {
    /// Identifier used in failure records. Falls back to the team codes when
    /// the page url is unknown.
    pub fn match_id(&self) -> String {
        if self.source_url.is_empty() {
            format!("{} vs {} ({})", self.team_a_code, self.team_b_code, self.event)
        } else {
            self.source_url.clone()
        }
    }
}

/// One raw round marker from the round strip of a map.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct RoundBlock {
    /// Text of the round number cell.
    pub number: String,
    /// Class attribute of each team slot's outcome square, team A first.
    pub markers: Vec<String>,
    /// `src` of the win-condition icon, if the block had one.
    pub win_icon: Option<String>,
}

impl RoundBlock {
    pub fn new<N, M, S>(number: N, markers: M, win_icon: Option<&str>) -> Self
    where
        N: Into<String>,
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            number: number.into(),
            markers: markers.into_iter().map(Into::into).collect(),
            win_icon: win_icon.map(str::to_owned),
        }
    }
}

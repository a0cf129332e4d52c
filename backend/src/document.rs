//! Match documents as handed over by the page-access layer: one JSON array of
//! [`MatchDocument`]s per match-list page.

use common::{MatchContext, RoundBlock};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchDocument {
    pub context: MatchContext,
    #[serde(default)]
    pub draft_note: Option<String>,
    /// Maps in play order, as named above the round strip.
    #[serde(default)]
    pub map_names: Vec<String>,
    #[serde(default)]
    pub rounds: Vec<RoundBlock>,
    #[serde(default)]
    pub stat_rows: Vec<StatRow>,
    /// Map names of the stats tab navigation, without the combined table.
    #[serde(default)]
    pub stat_nav_maps: Vec<String>,
    /// Raw page title, e.g. `"PRX vs. FNC | Masters Madrid | Playoffs | Lower Round 1 | VLR.gg"`.
    #[serde(default)]
    pub page_title: Option<String>,
    /// Series length note such as `"Bo3"`.
    #[serde(default)]
    pub best_of_note: Option<String>,
}

impl MatchDocument {
    /// Fills header fields the context left empty from the page title and the
    /// best-of note. Fields that are already set win.
    pub fn complete_header(&mut self) {
        let context = &mut self.context;

        if let Some(title) = self.page_title.as_deref() {
            match analysis::matchinfo::parse_title(title) {
                Some(parts) => {
                    let fill = |field: &mut String, value: String| {
                        if field.is_empty() {
                            *field = value;
                        }
                    };
                    fill(&mut context.team_a, parts.team_a);
                    fill(&mut context.team_b, parts.team_b);
                    fill(&mut context.event, parts.event);
                    fill(&mut context.stage, parts.stage);
                    fill(&mut context.series_type, parts.series_type);
                }
                None => tracing::debug!(title, "Unrecognised page title"),
            }
        }

        if context.best_of == 0 {
            if let Some(best_of) = self.best_of_note.as_deref().and_then(analysis::matchinfo::parse_best_of) {
                context.best_of = best_of;
            }
        }
    }
}

/// Player column of one stat table row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatRow {
    pub player: String,
    pub team: String,
}

pub async fn load_page(path: &std::path::Path) -> Result<Vec<MatchDocument>, crate::BackendError> {
    let raw = tokio::fs::read(path).await?;
    let mut documents: Vec<MatchDocument> = serde_json::from_slice(&raw)?;
    for document in documents.iter_mut() {
        document.complete_header();
    }
    Ok(documents)
}

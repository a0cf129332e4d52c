use std::collections::HashSet;

use futures::StreamExt;

use analysis::draft::DraftParseError;
use analysis::matchinfo::InvalidMatch;
use analysis::rounds::MatchRounds;
use common::{DraftRecord, MatchFailure, PlayerMapRow};

use crate::document::MatchDocument;
use crate::storage::RecordStorage;
use crate::BackendError;

/// Everything extracted from one match page.
#[derive(Debug)]
pub struct Extraction {
    pub draft: Result<[DraftRecord; 2], DraftParseError>,
    pub rounds: MatchRounds,
    pub player_maps: Vec<PlayerMapRow>,
}

/// Runs every extraction step over one document. A failing draft does not
/// prevent the round timeline from being extracted.
pub fn extract(document: &MatchDocument) -> Extraction {
    let context = &document.context;

    let draft = analysis::draft::reconstruct_optional(document.draft_note.as_deref(), context);
    let rounds = analysis::rounds::extract(context, &document.map_names, &document.rounds);

    let table_order = analysis::player_maps::stats_table_order(&document.stat_nav_maps);
    let labels: Vec<&str> = document.stat_rows.iter().map(|r| r.team.as_str()).collect();
    let player_maps = analysis::player_maps::label_rows(&labels, &table_order)
        .into_iter()
        .zip(document.stat_rows.iter())
        .map(|(map, row)| PlayerMapRow {
            player: row.player.clone(),
            team: row.team.clone(),
            map,
            date: context.date.clone(),
            event: context.event.clone(),
        })
        .collect();

    Extraction {
        draft,
        rounds,
        player_maps,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Stored {
        draft_failed: bool,
        maps: usize,
        skipped_rounds: usize,
    },
    AlreadyProcessed,
    Invalid(InvalidMatch),
}

#[tracing::instrument(skip_all, fields(url = %document.context.source_url))]
pub async fn process_match(
    document: MatchDocument,
    storage: &dyn RecordStorage,
) -> Result<MatchOutcome, BackendError> {
    if let Err(reason) = analysis::matchinfo::check_valid(&document.context) {
        tracing::info!("Not extracting: {}", reason);
        return Ok(MatchOutcome::Invalid(reason));
    }

    let event = document.context.event.clone();
    let url = document.context.match_id();

    if storage.is_processed(event.clone(), url.clone()).await? {
        tracing::info!("Already processed");
        return Ok(MatchOutcome::AlreadyProcessed);
    }

    let extraction = tokio::task::spawn_blocking(move || extract(&document)).await?;

    let maps = extraction.rounds.maps.len();
    let skipped_rounds = extraction.rounds.skipped.len();
    for map in extraction.rounds.maps.iter() {
        storage
            .store_rounds(event.clone(), map.records().cloned().collect())
            .await?;
    }

    storage
        .store_player_maps(event.clone(), extraction.player_maps)
        .await?;

    // The draft or failure row marks the match as processed, so it goes last.
    let draft_failed = match extraction.draft {
        Ok(drafts) => {
            storage.store_drafts(event.clone(), drafts, url.clone()).await?;
            false
        }
        Err(e) => {
            tracing::warn!("Draft: {}", e);
            storage
                .store_failure(MatchFailure {
                    event: event.clone(),
                    url: url.clone(),
                    error: e.to_string(),
                })
                .await?;
            true
        }
    };

    Ok(MatchOutcome::Stored {
        draft_failed,
        maps,
        skipped_rounds,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub stored: usize,
    pub draft_failures: usize,
    pub already_processed: usize,
    pub invalid: usize,
    pub failed: usize,
}

/// Processes the matches of one page, at most `workers` at a time. A match
/// that fails does not stop the others and is left unmarked, so a later run
/// retries it. A match listed more than once on the page is processed once.
pub async fn process_page(
    documents: Vec<MatchDocument>,
    storage: &dyn RecordStorage,
    workers: usize,
) -> PageSummary {
    let mut summary = PageSummary::default();

    let mut seen = HashSet::new();
    let documents: Vec<_> = documents
        .into_iter()
        .filter(|document| {
            let id = document.context.match_id();
            if seen.contains(&id) {
                tracing::info!("Skipping repeated match {}", id);
                summary.already_processed += 1;
                return false;
            }
            seen.insert(id);
            true
        })
        .collect();

    let outcomes: Vec<_> = futures::stream::iter(documents)
        .map(|document| {
            let url = document.context.match_id();
            async move { (url, process_match(document, storage).await) }
        })
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    for (url, outcome) in outcomes {
        match outcome {
            Ok(MatchOutcome::Stored { draft_failed, .. }) => {
                summary.stored += 1;
                if draft_failed {
                    summary.draft_failures += 1;
                }
            }
            Ok(MatchOutcome::AlreadyProcessed) => summary.already_processed += 1,
            Ok(MatchOutcome::Invalid(_)) => summary.invalid += 1,
            Err(e) => {
                tracing::error!("Error processing {}: {}", url, e);
                summary.failed += 1;
            }
        }
    }

    summary
}

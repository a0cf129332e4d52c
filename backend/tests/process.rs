use std::sync::Mutex;

use backend::document::{MatchDocument, StatRow};
use backend::process::{self, MatchOutcome, PageSummary};
use backend::storage::{FileStorage, RecordStorage};
use backend::BackendError;
use common::{
    DraftRecord, MatchContext, MatchFailure, Perspective, PlayerMapRow, RoundBlock,
    RoundPerspectiveRecord,
};
use futures::FutureExt;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

#[derive(Default)]
struct MemoryStorage {
    drafts: Mutex<Vec<(DraftRecord, String)>>,
    rounds: Mutex<Vec<RoundPerspectiveRecord>>,
    player_maps: Mutex<Vec<PlayerMapRow>>,
    failures: Mutex<Vec<MatchFailure>>,
    fail_rounds: bool,
}

impl RecordStorage for MemoryStorage {
    fn is_processed<'f, 'own>(
        &'own self,
        _event: String,
        url: String,
    ) -> futures::future::BoxFuture<'f, Result<bool, BackendError>>
    where
        'own: 'f,
    {
        let done = self.drafts.lock().unwrap().iter().any(|(_, u)| *u == url)
            || self.failures.lock().unwrap().iter().any(|f| f.url == url);
        async move { Ok(done) }.boxed()
    }

    fn store_drafts<'f, 'own>(
        &'own self,
        _event: String,
        drafts: [DraftRecord; 2],
        url: String,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f,
    {
        self.drafts
            .lock()
            .unwrap()
            .extend(drafts.into_iter().map(|d| (d, url.clone())));
        async { Ok(()) }.boxed()
    }

    fn store_rounds<'f, 'own>(
        &'own self,
        _event: String,
        rounds: Vec<RoundPerspectiveRecord>,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f,
    {
        if self.fail_rounds {
            let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
            return async move { Err(BackendError::from(err)) }.boxed();
        }
        self.rounds.lock().unwrap().extend(rounds);
        async { Ok(()) }.boxed()
    }

    fn store_player_maps<'f, 'own>(
        &'own self,
        _event: String,
        rows: Vec<PlayerMapRow>,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f,
    {
        self.player_maps.lock().unwrap().extend(rows);
        async { Ok(()) }.boxed()
    }

    fn store_failure<'f, 'own>(
        &'own self,
        failure: MatchFailure,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f,
    {
        self.failures.lock().unwrap().push(failure);
        async { Ok(()) }.boxed()
    }
}

const NOTE: &str = "PRX ban Split; FNC ban Icebox; PRX pick Ascent; FNC pick Bind; PRX ban Breeze; FNC ban Sunset; Lotus remains";

fn document(id: u32) -> MatchDocument {
    let round = |n: u32, markers: [&str; 2]| {
        RoundBlock::new(n.to_string(), markers, Some("/img/vlr/game/round/elim.webp"))
    };

    MatchDocument {
        context: MatchContext {
            source_url: format!("https://www.vlr.gg/{id}/prx-vs-fnc"),
            team_a: "Paper Rex".to_owned(),
            team_b: "FNATIC".to_owned(),
            team_a_code: "PRX".to_owned(),
            team_b_code: "FNC".to_owned(),
            event: "Champions Tour 2024: Masters Madrid".to_owned(),
            stage: "Playoffs".to_owned(),
            series_type: "Lower Round 1".to_owned(),
            status: "final".to_owned(),
            best_of: 3,
            date: "2024-03-18 12:00:00".to_owned(),
            patch: None,
        },
        draft_note: Some(NOTE.to_owned()),
        map_names: vec!["Ascent".to_owned(), "Bind".to_owned()],
        rounds: vec![
            round(1, ["rnd-sq mod-win mod-t", "rnd-sq"]),
            round(2, ["rnd-sq", "rnd-sq mod-win mod-ct"]),
            round(1, ["rnd-sq mod-win mod-ct", "rnd-sq"]),
        ],
        stat_rows: ["PRX", "FNC", "PRX", "FNC"]
            .iter()
            .enumerate()
            .map(|(i, team)| StatRow {
                player: format!("player{i}"),
                team: team.to_string(),
            })
            .collect(),
        stat_nav_maps: vec!["Ascent".to_owned(), "Bind".to_owned()],
        page_title: None,
        best_of_note: None,
    }
}

#[test]
fn extract_labels_stat_rows() {
    let extraction = process::extract(&document(1));

    let maps: Vec<_> = extraction.player_maps.iter().map(|r| r.map.as_str()).collect();
    assert_eq!(vec!["Ascent", "Ascent", "all", "all"], maps);
    assert_eq!(2, extraction.rounds.maps.len());
    assert!(extraction.draft.is_ok());
}

#[tokio::test]
async fn stores_both_perspectives() {
    let storage = MemoryStorage::default();

    let outcome = process::process_match(document(1), &storage).await.unwrap();

    assert_eq!(
        MatchOutcome::Stored {
            draft_failed: false,
            maps: 2,
            skipped_rounds: 0,
        },
        outcome
    );

    let drafts = storage.drafts.lock().unwrap();
    assert_eq!(2, drafts.len());
    assert_eq!(Perspective::A, drafts[0].0.perspective);
    assert_eq!(Perspective::B, drafts[1].0.perspective);
    assert_eq!("https://www.vlr.gg/1/prx-vs-fnc", drafts[0].1);

    // 3 rounds, each stored once per team.
    assert_eq!(6, storage.rounds.lock().unwrap().len());
    assert_eq!(4, storage.player_maps.lock().unwrap().len());
    assert!(storage.failures.lock().unwrap().is_empty());
}

#[tokio::test]
#[traced_test]
async fn draft_failure_keeps_rounds() {
    let storage = MemoryStorage::default();
    let mut doc = document(2);
    doc.draft_note = Some("PRX ban Split; FNC ban Icebox".to_owned());

    let outcome = process::process_match(doc, &storage).await.unwrap();

    assert!(matches!(outcome, MatchOutcome::Stored { draft_failed: true, .. }));
    assert!(storage.drafts.lock().unwrap().is_empty());
    assert_eq!(6, storage.rounds.lock().unwrap().len());

    let failures = storage.failures.lock().unwrap();
    assert_eq!(1, failures.len());
    assert_eq!("https://www.vlr.gg/2/prx-vs-fnc", failures[0].url);
    assert_eq!("Champions Tour 2024: Masters Madrid", failures[0].event);
    assert!(failures[0].error.contains("2 map slots"));
    assert!(logs_contain("Draft:"));
}

#[tokio::test]
async fn second_run_is_deduplicated() {
    let storage = MemoryStorage::default();

    process::process_match(document(3), &storage).await.unwrap();
    let outcome = process::process_match(document(3), &storage).await.unwrap();

    assert_eq!(MatchOutcome::AlreadyProcessed, outcome);
    assert_eq!(2, storage.drafts.lock().unwrap().len());
    assert_eq!(6, storage.rounds.lock().unwrap().len());
}

#[tokio::test]
async fn showmatches_and_live_matches_are_not_extracted() {
    let storage = MemoryStorage::default();
    let mut showmatch = document(4);
    showmatch.context.series_type = "Showmatch".to_owned();
    let mut live = document(5);
    live.context.status = "LIVE".to_owned();

    let showmatch = process::process_match(showmatch, &storage).await.unwrap();
    let live = process::process_match(live, &storage).await.unwrap();

    assert!(matches!(showmatch, MatchOutcome::Invalid(_)));
    assert!(matches!(live, MatchOutcome::Invalid(_)));
    assert!(storage.rounds.lock().unwrap().is_empty());
}

#[tokio::test]
async fn page_summary() {
    let storage = MemoryStorage::default();

    let mut no_note = document(11);
    no_note.draft_note = None;
    let mut live = document(12);
    live.context.status = "live".to_owned();
    let documents = vec![document(10), no_note, live, document(10)];

    let summary = process::process_page(documents, &storage, 1).await;

    assert_eq!(
        PageSummary {
            stored: 2,
            draft_failures: 1,
            already_processed: 1,
            invalid: 1,
            failed: 0,
        },
        summary
    );
}

#[tokio::test]
async fn failed_round_write_leaves_match_unprocessed() {
    let storage = MemoryStorage {
        fail_rounds: true,
        ..MemoryStorage::default()
    };

    let result = process::process_match(document(20), &storage).await;

    assert!(result.is_err());
    assert!(storage.drafts.lock().unwrap().is_empty());
    assert!(storage.failures.lock().unwrap().is_empty());
    assert!(!storage
        .is_processed(
            "Champions Tour 2024: Masters Madrid".to_owned(),
            "https://www.vlr.gg/20/prx-vs-fnc".to_owned()
        )
        .await
        .unwrap());
}

#[tokio::test]
async fn failed_match_is_counted_not_recorded() {
    let storage = MemoryStorage {
        fail_rounds: true,
        ..MemoryStorage::default()
    };

    let summary = process::process_page(vec![document(21)], &storage, 2).await;

    assert_eq!(1, summary.failed);
    assert_eq!(0, summary.stored);
    assert!(storage.failures.lock().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_match_on_page_is_stored_once() {
    let dir = std::env::temp_dir().join(format!("backend-process-repeat-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let storage = FileStorage::new(&dir);

    let summary = process::process_page(vec![document(7), document(7)], &storage, 4).await;

    assert_eq!(1, summary.stored);
    assert_eq!(1, summary.already_processed);

    let lines = |kind: &str| {
        let path = storage.path_for("Champions Tour 2024: Masters Madrid", kind);
        std::fs::read_to_string(path).unwrap().lines().count()
    };
    assert_eq!(2, lines("draft"));
    assert_eq!(6, lines("round_detail"));

    let _ = std::fs::remove_dir_all(&dir);
}

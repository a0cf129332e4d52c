use futures::FutureExt;

use common::{DraftRecord, MatchFailure, PlayerMapRow, RoundPerspectiveRecord};

use crate::BackendError;

pub trait RecordStorage: Send + Sync {
    /// Whether records (or a failure) were already stored for this match.
    fn is_processed<'f, 'own>(
        &'own self,
        event: String,
        url: String,
    ) -> futures::future::BoxFuture<'f, Result<bool, BackendError>>
    where
        'own: 'f;

    fn store_drafts<'f, 'own>(
        &'own self,
        event: String,
        drafts: [DraftRecord; 2],
        url: String,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f;

    fn store_rounds<'f, 'own>(
        &'own self,
        event: String,
        rounds: Vec<RoundPerspectiveRecord>,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f;

    fn store_player_maps<'f, 'own>(
        &'own self,
        event: String,
        rows: Vec<PlayerMapRow>,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f;

    fn store_failure<'f, 'own>(
        &'own self,
        failure: MatchFailure,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f;
}

/// Draft row as written to disk, tagged with the page it came from.
#[derive(Debug, serde::Serialize)]
struct StoredDraft<'r> {
    #[serde(flatten)]
    record: &'r DraftRecord,
    source_url: &'r str,
}

#[derive(Debug, serde::Deserialize)]
struct SourceOnly {
    #[serde(alias = "url")]
    source_url: String,
}

#[derive(Debug, Clone, Copy)]
enum RecordKind {
    Draft,
    RoundDetail,
    PlayerMaps,
    ErrorMatch,
}

impl RecordKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::RoundDetail => "round_detail",
            Self::PlayerMaps => "player_maps",
            Self::ErrorMatch => "error_match",
        }
    }
}

/// Lowercases an event name into something usable as a file name,
/// e.g. `"Champions Tour 2024: Masters Madrid"` -> `"champions_tour_2024_masters_madrid"`.
pub fn normalize_filename(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('_')
        .to_owned()
}

/// Appends JSON lines to `<folder>/<event>/<kind>_<event>.jsonl`.
pub struct FileStorage {
    folder: std::sync::Arc<std::path::PathBuf>,
    write_lock: std::sync::Arc<tokio::sync::Mutex<()>>,
}

impl FileStorage {
    pub fn new<P>(folder: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self {
            folder: std::sync::Arc::new(folder.into()),
            write_lock: std::sync::Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn path_for(&self, event: &str, kind_prefix: &str) -> std::path::PathBuf {
        let event = normalize_filename(event);
        self.folder
            .join(&event)
            .join(format!("{}_{}.jsonl", kind_prefix, event))
    }

    fn path(&self, event: &str, kind: RecordKind) -> std::path::PathBuf {
        self.path_for(event, kind.prefix())
    }

    async fn append<T>(&self, path: std::path::PathBuf, rows: &[T]) -> Result<(), BackendError>
    where
        T: serde::Serialize,
    {
        use tokio::io::AsyncWriteExt;

        if rows.is_empty() {
            return Ok(());
        }

        let mut buffer = Vec::new();
        for row in rows {
            serde_json::to_writer(&mut buffer, row)?;
            buffer.push(b'\n');
        }

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&buffer).await?;
        file.flush().await?;

        tracing::trace!("Appended {} rows to {:?}", rows.len(), path);

        Ok(())
    }

    async fn contains_source(&self, path: std::path::PathBuf, url: &str) -> Result<bool, BackendError> {
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let row: SourceOnly = match serde_json::from_str(line) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable line in {:?}: {}", path, e);
                    continue;
                }
            };
            if row.source_url == url {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl RecordStorage for FileStorage {
    fn is_processed<'f, 'own>(
        &'own self,
        event: String,
        url: String,
    ) -> futures::future::BoxFuture<'f, Result<bool, BackendError>>
    where
        'own: 'f,
    {
        async move {
            if self.contains_source(self.path(&event, RecordKind::Draft), &url).await? {
                return Ok(true);
            }
            self.contains_source(self.path(&event, RecordKind::ErrorMatch), &url)
                .await
        }
        .boxed()
    }

    fn store_drafts<'f, 'own>(
        &'own self,
        event: String,
        drafts: [DraftRecord; 2],
        url: String,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f,
    {
        async move {
            let rows: Vec<_> = drafts
                .iter()
                .map(|record| StoredDraft {
                    record,
                    source_url: &url,
                })
                .collect();
            self.append(self.path(&event, RecordKind::Draft), &rows).await
        }
        .boxed()
    }

    fn store_rounds<'f, 'own>(
        &'own self,
        event: String,
        rounds: Vec<RoundPerspectiveRecord>,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f,
    {
        async move {
            self.append(self.path(&event, RecordKind::RoundDetail), &rounds)
                .await
        }
        .boxed()
    }

    fn store_player_maps<'f, 'own>(
        &'own self,
        event: String,
        rows: Vec<PlayerMapRow>,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f,
    {
        async move {
            self.append(self.path(&event, RecordKind::PlayerMaps), &rows)
                .await
        }
        .boxed()
    }

    fn store_failure<'f, 'own>(
        &'own self,
        failure: MatchFailure,
    ) -> futures::future::BoxFuture<'f, Result<(), BackendError>>
    where
        'own: 'f,
    {
        async move {
            let path = self.path(&failure.event, RecordKind::ErrorMatch);
            self.append(path, std::slice::from_ref(&failure)).await
        }
        .boxed()
    }
}

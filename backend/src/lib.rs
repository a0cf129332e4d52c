pub mod config;
pub mod document;
pub mod process;
pub mod storage;

mod error;
pub use error::BackendError;

/// Processes every pending source of the configuration, saving the
/// configuration after each one so an interrupted run resumes where it
/// stopped.
pub async fn run(args: config::Args) -> Result<(), BackendError> {
    let mut config = config::Config::load(&args.config).await?;
    let storage = storage::FileStorage::new(config.folder.clone());

    for source in config.pending() {
        tracing::info!("Processing {:?}", source);

        let documents = match document::load_page(&source).await {
            Ok(d) => d,
            Err(e) => {
                tracing::error!("Loading {:?}: {}", source, e);
                continue;
            }
        };

        let summary = process::process_page(documents, &storage, args.workers).await;
        tracing::info!(?summary, "Finished {:?}", source);

        if summary.failed > 0 {
            tracing::warn!("{} matches of {:?} failed, keeping it pending", summary.failed, source);
            continue;
        }

        config.mark_processed(&source);
        config.save(&args.config).await?;
    }

    tracing::info!("Done processing");
    Ok(())
}

use clap::Parser;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().starts_with("backend") || meta.target().starts_with("analysis")
        }));
    if let Err(e) = tracing::subscriber::set_global_default(registry) {
        eprintln!("Installing tracing subscriber: {}", e);
    }

    let args = backend::config::Args::parse();

    tracing::info!("Starting with {:?}", args.config);

    match backend::run(args).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

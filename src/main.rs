use anyhow::{Context, Result};
use docvault::config::{AppConfig, Command};
use docvault::models::document::FilePayload;
use docvault::services::repository::DocumentRepository;
use docvault::store::ObjectStore;
use docvault::store::http::HttpObjectStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + command ---
    let (cfg, command) = AppConfig::from_env_and_args()?;
    tracing::debug!("starting docvault with config: {:?}", cfg);

    if cfg.storage.is_none() {
        tracing::warn!("storage backend is not configured; only precondition checks will run");
    }

    // --- Build the repository over the configured store (if any) ---
    let store: Option<Arc<dyn ObjectStore>> = cfg
        .storage
        .as_ref()
        .map(|s| Arc::new(HttpObjectStore::new(&s.base_url, &s.api_key)) as Arc<dyn ObjectStore>);
    let mut repo =
        DocumentRepository::new(store, cfg.namespace.clone()).with_list_limit(cfg.list_limit);

    match command {
        Command::List => {
            let documents = repo.list_documents().await;
            if documents.is_empty() {
                println!("no documents stored");
            }
            for doc in documents {
                match doc.size_bytes {
                    Some(size) => {
                        println!("{}\t{} ({} bytes)", doc.storage_key, doc.display_name(), size)
                    }
                    None => println!("{}\t{}", doc.storage_key, doc.display_name()),
                }
            }
        }
        Command::Upload { file } => {
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned)
                .with_context(|| format!("invalid file name: {}", file.display()))?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;

            let payload = FilePayload {
                name,
                bytes: bytes.into(),
            };
            let document = repo.upload_document(Some(payload)).await?;
            println!(
                "uploaded {} as {}",
                document.display_name(),
                document.storage_key
            );
        }
        Command::Download {
            storage_key,
            output,
        } => {
            let path = repo.download_document(&storage_key, &output).await?;
            println!("saved {}", path.display());
        }
    }

    Ok(())
}

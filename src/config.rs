use crate::services::repository::DEFAULT_LIST_LIMIT;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Present only when both the storage URL and API key are configured.
    pub storage: Option<StorageConfig>,
    pub namespace: String,
    pub list_limit: usize,
}

/// Connection settings for the remote storage service.
#[derive(Clone)]
pub struct StorageConfig {
    pub base_url: String,
    pub api_key: String,
}

// Keep the API key out of logs.
impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Document repository client for remote object storage")]
pub struct Args {
    /// Storage service base URL (overrides DOCVAULT_STORAGE_URL)
    #[arg(long)]
    pub storage_url: Option<String>,

    /// Storage service API key (overrides DOCVAULT_STORAGE_KEY)
    #[arg(long)]
    pub storage_key: Option<String>,

    /// Storage namespace holding the documents (overrides DOCVAULT_NAMESPACE)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Maximum entries per listing call (overrides DOCVAULT_LIST_LIMIT)
    #[arg(long)]
    pub list_limit: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the stored documents
    List,

    /// Upload a document
    Upload {
        /// Path of the file to upload
        file: PathBuf,
    },

    /// Download a document by its storage key
    Download {
        /// Storage key as shown by `list`
        storage_key: String,

        /// Directory to save the document into
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the
    /// requested command.
    pub fn from_env_and_args() -> Result<(Self, Command)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_url = env::var("DOCVAULT_STORAGE_URL").ok();
        let env_key = env::var("DOCVAULT_STORAGE_KEY").ok();
        let env_namespace = env::var("DOCVAULT_NAMESPACE").unwrap_or_else(|_| "resumes".into());
        let env_limit = match env::var("DOCVAULT_LIST_LIMIT") {
            Ok(value) => Some(
                value
                    .parse::<usize>()
                    .with_context(|| format!("parsing DOCVAULT_LIST_LIMIT value `{}`", value))?,
            ),
            Err(env::VarError::NotPresent) => None,
            Err(err) => return Err(err).context("reading DOCVAULT_LIST_LIMIT"),
        };

        // --- Merge ---
        // The storage backend is configured only when both halves are
        // present; otherwise the repository runs without a store.
        let base_url = args.storage_url.or(env_url);
        let api_key = args.storage_key.or(env_key);
        let storage = match (base_url, api_key) {
            (Some(base_url), Some(api_key)) => Some(StorageConfig { base_url, api_key }),
            _ => None,
        };

        let cfg = Self {
            storage,
            namespace: args.namespace.unwrap_or(env_namespace),
            list_limit: args.list_limit.or(env_limit).unwrap_or(DEFAULT_LIST_LIMIT),
        };

        Ok((cfg, args.command))
    }
}

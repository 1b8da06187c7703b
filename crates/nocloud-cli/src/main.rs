//! NoCloud CLI: command-line client for the NoCloud storage API.
//!
//! Set NOCLOUD_API_KEY and optionally NOCLOUD_API_URL (or API_URL).

use anyhow::Context;
use clap::{Parser, Subcommand};
use nocloud_cli::{build_metadata, init_tracing, parse_metadata_pair};
use nocloud_client::NoCloudClient;
use nocloud_core::MetadataValue;
use serde::Serialize;
use tokio_util::io::ReaderStream;

#[derive(Parser)]
#[command(name = "nocloud", about = "NoCloud storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a local file (content type sniffed from its bytes)
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Metadata entries as key=value
        #[arg(long = "meta", value_parser = parse_metadata_pair)]
        metadata: Vec<(String, MetadataValue)>,
    },
    /// Stream a local file without loading it into memory
    UploadStream {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// MIME type of the file
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
        /// Metadata entries as key=value
        #[arg(long = "meta", value_parser = parse_metadata_pair)]
        metadata: Vec<(String, MetadataValue)>,
    },
    /// Download a remote file and upload it
    UploadUrl {
        /// URL of the file to download
        url: String,
        /// Metadata entries as key=value
        #[arg(long = "meta", value_parser = parse_metadata_pair)]
        metadata: Vec<(String, MetadataValue)>,
    },
    /// Request a signed upload URL without uploading
    Sign {
        /// MIME type of the content
        #[arg(long)]
        content_type: String,
        /// Exact size in bytes
        #[arg(long)]
        size: u64,
    },
    /// Delete one or more media items by ID
    Delete {
        /// Media IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = NoCloudClient::from_env()
        .context("Failed to create client. Set NOCLOUD_API_KEY and NOCLOUD_API_URL (or API_URL)")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { file, metadata } => {
            let metadata = build_metadata(metadata);
            let response = client
                .upload_file(&file, metadata.as_ref())
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;
            print_json(&response)?;
        }
        Commands::UploadStream {
            file,
            content_type,
            metadata,
        } => {
            let metadata = build_metadata(metadata);
            let handle = tokio::fs::File::open(&file)
                .await
                .with_context(|| format!("Failed to open file: {}", file.display()))?;
            let length = handle
                .metadata()
                .await
                .with_context(|| format!("Failed to stat file: {}", file.display()))?
                .len();

            let response = client
                .upload_stream(
                    ReaderStream::new(handle),
                    &content_type,
                    length,
                    metadata.as_ref(),
                )
                .await
                .with_context(|| format!("Failed to stream {}", file.display()))?;
            print_json(&response)?;
        }
        Commands::UploadUrl { url, metadata } => {
            let metadata = build_metadata(metadata);
            let response = client.upload_from_url(&url, metadata.as_ref()).await?;
            print_json(&response)?;
        }
        Commands::Sign { content_type, size } => {
            let response = client.generate_signed_url(&content_type, size, None).await?;
            print_json(&response)?;
        }
        Commands::Delete { ids } => {
            let count = ids.len();
            client.delete(ids).await?;
            print_json(&serde_json::json!({ "success": true, "deleted": count }))?;
        }
    }

    Ok(())
}

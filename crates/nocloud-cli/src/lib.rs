use nocloud_core::{FileMetadata, MetadataValue};

/// Parse a `key=value` pair into a metadata entry.
///
/// `true`/`false` become booleans and integers or decimals become numbers;
/// everything else stays a string. Quote-wrapped values are always strings.
pub fn parse_metadata_pair(raw: &str) -> Result<(String, MetadataValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty metadata key in '{}'", raw));
    }

    let value = if let Some(quoted) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        MetadataValue::String(quoted.to_string())
    } else if let Ok(flag) = value.parse::<bool>() {
        MetadataValue::Bool(flag)
    } else if let Ok(number) = value.parse::<serde_json::Number>() {
        MetadataValue::Number(number)
    } else {
        MetadataValue::String(value.to_string())
    };

    Ok((key.to_string(), value))
}

/// Collect parsed pairs, or `None` when no metadata was given.
pub fn build_metadata(pairs: Vec<(String, MetadataValue)>) -> Option<FileMetadata> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.into_iter().collect())
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

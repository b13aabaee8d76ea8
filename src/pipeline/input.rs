//! Input resolution: load a [`ContractInput`] from a JSON file or stdin.
//!
//! Only syntax is checked here. A well-formed document with missing or bad
//! values still loads; the validator reports those.

use crate::contract::ContractInput;
use crate::error::LeaseGenError;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Marker for "read from standard input".
pub const STDIN_MARKER: &str = "-";

/// Load contract data from `input`: a file path, or `-` for stdin.
pub async fn load_input(input: &str) -> Result<ContractInput, LeaseGenError> {
    let json = if input == STDIN_MARKER {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .map_err(|e| LeaseGenError::InvalidInput {
                origin: "<stdin>".to_string(),
                detail: e.to_string(),
            })?;
        buf
    } else {
        read_file(input).await?
    };

    let origin = if input == STDIN_MARKER { "<stdin>" } else { input };
    parse_input(&json, origin)
}

/// Parse contract data from a JSON string. `origin` names the source in errors.
pub fn parse_input(json: &str, origin: &str) -> Result<ContractInput, LeaseGenError> {
    let parsed = serde_json::from_str(json).map_err(|e| LeaseGenError::InvalidInput {
        origin: origin.to_string(),
        detail: e.to_string(),
    })?;
    debug!("Loaded contract data from {}", origin);
    Ok(parsed)
}

async fn read_file(path_str: &str) -> Result<String, LeaseGenError> {
    let path = PathBuf::from(path_str);
    match tokio::fs::read_to_string(&path).await {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(LeaseGenError::InputNotFound { path })
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(LeaseGenError::PermissionDenied { path })
        }
        Err(e) => Err(LeaseGenError::InvalidInput {
            origin: path_str.to_string(),
            detail: e.to_string(),
        }),
    }
}

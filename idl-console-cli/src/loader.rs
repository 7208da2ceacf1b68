//! IDL sources: a file, an HTTP(S) URL, pasted text, or stdin.

use std::fmt;
use std::path::PathBuf;

use idl_console_core::error::ConsoleError;
use idl_console_core::idl::InterfaceDefinition;
use tokio::io::AsyncReadExt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdlSource {
    Path(PathBuf),
    Url(String),
    Text(String),
    Stdin,
}

impl IdlSource {
    /// `-` is stdin, `http(s)://` a URL, anything else a path.
    pub fn parse(input: &str) -> Self {
        if input == "-" {
            IdlSource::Stdin
        } else if input.starts_with("http://") || input.starts_with("https://") {
            IdlSource::Url(input.to_string())
        } else {
            IdlSource::Path(PathBuf::from(input))
        }
    }
}

impl fmt::Display for IdlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdlSource::Path(path) => write!(f, "{}", path.display()),
            IdlSource::Url(url) => write!(f, "{}", url),
            IdlSource::Text(_) => write!(f, "pasted text"),
            IdlSource::Stdin => write!(f, "stdin"),
        }
    }
}

async fn read_source(source: &IdlSource) -> Result<String, String> {
    match source {
        IdlSource::Path(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string()),
        IdlSource::Url(url) => {
            let response = reqwest::get(url).await.map_err(|e| e.to_string())?;
            let response = response.error_for_status().map_err(|e| e.to_string())?;
            response.text().await.map_err(|e| e.to_string())
        }
        IdlSource::Text(text) => Ok(text.clone()),
        IdlSource::Stdin => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|e| e.to_string())?;
            Ok(text)
        }
    }
}

/// Fetch and validate an IDL document.
pub async fn load_idl(source: &IdlSource) -> Result<InterfaceDefinition, ConsoleError> {
    let text = read_source(source).await.map_err(|message| ConsoleError::IdlLoad {
        source_name: source.to_string(),
        message,
    })?;
    debug!(%source, bytes = text.len(), "read IDL document");
    InterfaceDefinition::from_json(&text)
}

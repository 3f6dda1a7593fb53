//! Document acquisition and HTML flattening.

pub mod fetch;
pub mod html;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::config::Settings;

/// Where a command reads its HTML document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Url(String),
    Inline(String),
    Stdin,
}

impl DocumentSource {
    /// Read the raw HTML for this source.
    pub async fn load(&self, settings: &Settings) -> Result<String> {
        match self {
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("read {}", path.display())),
            Self::Url(url) => fetch::fetch_html(url, settings).await,
            Self::Inline(html) => Ok(html.clone()),
            Self::Stdin => {
                let mut html = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut html)
                    .await
                    .context("read HTML from stdin")?;
                Ok(html)
            }
        }
    }
}

impl std::fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Url(url) => f.write_str(url),
            Self::Inline(_) => f.write_str("inline"),
            Self::Stdin => f.write_str("stdin"),
        }
    }
}

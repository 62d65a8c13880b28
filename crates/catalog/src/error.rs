use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not build rental api client: {0}")]
    Client(reqwest::Error),
    #[error("rental api request to `{url}` failed: {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("rental api returned status {status} for `{url}`")]
    Status { url: String, status: u16 },
    #[error("could not access catalog cache `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog cache `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("could not encode catalog cache `{path}`: {source}")]
    Encode { path: PathBuf, source: serde_json::Error },
}

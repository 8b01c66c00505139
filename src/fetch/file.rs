use crate::feed::RawFeed;
use crate::fetch::{FeedSource, FetchError, FetchRequest};
use log::info;
use std::path::{Path, PathBuf};

/// Serves a feed document stored on disk.
///
/// The request is ignored; date filtering happens downstream. The format is
/// taken from the file extension (`.xml` / `.json`) and otherwise detected from
/// the content.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedSource for FileFeedSource {
    async fn fetch(&self, _request: &FetchRequest) -> Result<RawFeed, FetchError> {
        info!("Reading feed from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::FileRead(self.path.clone(), e))?;

        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("xml") => RawFeed::Xml(text),
            Some("json") => RawFeed::Json(text),
            _ => RawFeed::detect(text),
        })
    }
}

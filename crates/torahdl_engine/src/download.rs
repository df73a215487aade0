use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use torahdl_logging::{torahdl_debug, torahdl_info};

use crate::client::map_reqwest_error;
use crate::filename::safe_file_name;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{ApiError, FailureKind, SavedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    pub request_timeout: Duration,
    pub output_dir: PathBuf,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Stores the media behind a resolved download link. With a `target` the
/// media is written to that path (or into it, when it is a directory);
/// otherwise it lands in the output directory under `file_name`.
#[async_trait::async_trait]
pub trait MediaSaver: Send + Sync {
    async fn save(
        &self,
        download_url: &str,
        file_name: &str,
        target: Option<&Path>,
    ) -> Result<SavedFile, ApiError>;
}

#[derive(Debug, Clone)]
pub struct MediaDownloader {
    output_dir: PathBuf,
    client: reqwest::Client,
}

impl MediaDownloader {
    pub fn new(settings: DownloadSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            output_dir: settings.output_dir,
            client,
        })
    }

    /// Directory and file name the media is written to.
    fn destination(&self, file_name: &str, target: Option<&Path>) -> (PathBuf, String) {
        let Some(target) = target else {
            return (self.output_dir.clone(), safe_file_name(file_name));
        };
        if target.is_dir() {
            return (target.to_path_buf(), safe_file_name(file_name));
        }
        match target.file_name() {
            Some(name) => {
                let dir = match target.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                (dir, name.to_string_lossy().into_owned())
            }
            None => (target.to_path_buf(), safe_file_name(file_name)),
        }
    }
}

#[async_trait::async_trait]
impl MediaSaver for MediaDownloader {
    async fn save(
        &self,
        download_url: &str,
        file_name: &str,
        target: Option<&Path>,
    ) -> Result<SavedFile, ApiError> {
        let parsed = reqwest::Url::parse(download_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let (dir, target_name) = self.destination(file_name, target);
        torahdl_debug!("saving {} as {} in {:?}", download_url, target_name, dir);
        let writer = AtomicFileWriter::new(dir);
        let mut pending = writer.begin(&target_name).map_err(map_persist_error)?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            pending.write_chunk(&chunk).map_err(map_persist_error)?;
        }

        let bytes = pending.written();
        let path = pending.commit().map_err(map_persist_error)?;
        torahdl_info!("saved {} bytes to {:?}", bytes, path);
        Ok(SavedFile { path, bytes })
    }
}

fn map_persist_error(err: PersistError) -> ApiError {
    ApiError::new(FailureKind::Io, err.to_string())
}

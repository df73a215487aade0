//! torahdl engine: remote API client, media download and effect execution.
mod client;
mod download;
mod engine;
mod filename;
mod persist;
mod types;

pub use client::{ApiSettings, LinkApi, ReqwestLinkApi, DEFAULT_API_BASE_URL};
pub use download::{DownloadSettings, MediaDownloader, MediaSaver};
pub use engine::{EngineHandle, EngineSettings};
pub use filename::safe_file_name;
pub use persist::{ensure_output_dir, AtomicFileWriter, PendingFile, PersistError};
pub use types::{
    ApiError, EngineEvent, ExtractionRecord, FailureKind, RequestId, SavedFile, SiteRecord,
};

use std::path::PathBuf;

use crate::RequestId;

/// IO the front end must perform on behalf of the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the supported-sites catalog.
    LoadCatalog,
    /// Ask the remote API to resolve `url`.
    Extract { request_id: RequestId, url: String },
    /// Save the media behind the current preview to local storage. Without a
    /// `target` the file lands in the output directory under `file_name`.
    SaveMedia {
        download_url: String,
        file_name: String,
        target: Option<PathBuf>,
    },
}

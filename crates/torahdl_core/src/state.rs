use std::path::PathBuf;

use url::Url;

use crate::view_model::{AppViewModel, PreviewView};
use crate::FailureCause;

pub type RequestId = u64;

/// One entry of the supported-sites catalog. `url` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub url: String,
}

/// A resolved media reference returned by a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewResult {
    pub title: String,
    pub download_url: String,
    pub file_format: String,
    pub file_name: String,
}

impl PreviewResult {
    pub fn is_audio(&self) -> bool {
        self.file_format.contains("audio")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(PreviewResult),
    Failure(String),
}

/// Where a saved media file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedMedia {
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    InProgress {
        file_name: String,
    },
    Saved(SavedMedia),
    Failed(String),
}

/// Session state. Owned by the front-end loop and mutated only through
/// [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    url_input: String,
    request: RequestState,
    in_flight: Option<RequestId>,
    next_request_id: RequestId,
    catalog: Vec<Site>,
    catalog_loading: bool,
    catalog_started: bool,
    download: DownloadState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url_input: self.url_input.clone(),
            submit_enabled: !self.is_loading() && !self.url_input.is_empty(),
            loading: self.is_loading(),
            preview: match &self.request {
                RequestState::Success(preview) => Some(PreviewView::from(preview)),
                _ => None,
            },
            error: match &self.request {
                RequestState::Failure(message) => Some(message.clone()),
                _ => None,
            },
            sites: self.catalog.clone(),
            sites_loading: self.catalog_loading,
            matching_site: self.site_for(&self.url_input).cloned(),
            download: self.download.clone(),
            dirty: self.dirty,
        }
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn catalog(&self) -> &[Site] {
        &self.catalog
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.request, RequestState::Loading)
    }

    pub fn is_catalog_loading(&self) -> bool {
        self.catalog_loading
    }

    pub fn catalog_started(&self) -> bool {
        self.catalog_started
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Catalog entry hosted on the same site as `input`, ignoring `www.`.
    pub fn site_for(&self, input: &str) -> Option<&Site> {
        let host = host_key(input)?;
        self.catalog
            .iter()
            .find(|site| host_key(&site.url).as_deref() == Some(host.as_str()))
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.url_input != input {
            self.url_input = input;
            self.dirty = true;
        }
    }

    /// Marks the catalog as loading. Refuses while a load is in flight.
    pub(crate) fn begin_load(&mut self) -> bool {
        if self.catalog_loading {
            return false;
        }
        self.catalog_loading = true;
        self.catalog_started = true;
        self.dirty = true;
        true
    }

    pub(crate) fn apply_catalog(&mut self, sites: Vec<Site>) {
        self.catalog = sites;
        self.catalog_loading = false;
        self.dirty = true;
    }

    pub(crate) fn fail_catalog(&mut self) {
        self.catalog_loading = false;
        self.dirty = true;
    }

    /// Enters `Loading` for the current input and hands out the request to
    /// issue. Refuses empty input and a second submission while loading.
    /// The input is sent exactly as typed.
    pub(crate) fn begin_submit(&mut self) -> Option<(RequestId, String)> {
        if self.url_input.is_empty() || self.is_loading() {
            return None;
        }
        let url = self.url_input.clone();
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.in_flight = Some(request_id);
        self.request = RequestState::Loading;
        self.download = DownloadState::Idle;
        self.dirty = true;
        Some((request_id, url))
    }

    /// Applies a successful response. Responses for anything but the
    /// in-flight request are discarded and `false` is returned.
    pub(crate) fn apply_success(&mut self, request_id: RequestId, preview: PreviewResult) -> bool {
        if !self.take_in_flight(request_id) {
            return false;
        }
        self.request = RequestState::Success(preview);
        self.dirty = true;
        true
    }

    pub(crate) fn apply_failure(&mut self, request_id: RequestId, cause: &FailureCause) -> bool {
        if !self.take_in_flight(request_id) {
            return false;
        }
        self.request = RequestState::Failure(cause.user_message().to_string());
        self.dirty = true;
        true
    }

    /// Moves the download to `InProgress` for the current preview.
    pub(crate) fn begin_save(&mut self) -> Option<(String, String)> {
        if matches!(self.download, DownloadState::InProgress { .. }) {
            return None;
        }
        let RequestState::Success(preview) = &self.request else {
            return None;
        };
        let download_url = preview.download_url.clone();
        let file_name = preview.file_name.clone();
        self.download = DownloadState::InProgress {
            file_name: file_name.clone(),
        };
        self.dirty = true;
        Some((download_url, file_name))
    }

    pub(crate) fn apply_saved(&mut self, saved: SavedMedia) {
        if matches!(self.download, DownloadState::InProgress { .. }) {
            self.download = DownloadState::Saved(saved);
            self.dirty = true;
        }
    }

    pub(crate) fn fail_save(&mut self, cause: &FailureCause) {
        if let DownloadState::InProgress { file_name } = &self.download {
            let message = match cause {
                FailureCause::Storage => {
                    format!("Failed to save {file_name}. {}", cause.user_message())
                }
                _ => format!("Failed to save {file_name}"),
            };
            self.download = DownloadState::Failed(message);
            self.dirty = true;
        }
    }

    fn take_in_flight(&mut self, request_id: RequestId) -> bool {
        if self.in_flight != Some(request_id) {
            return false;
        }
        self.in_flight = None;
        true
    }
}

fn host_key(input: &str) -> Option<String> {
    let parsed = Url::parse(input.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    if let Some(rest) = host.strip_prefix("www.") {
        return Some(rest.to_string());
    }
    Some(host)
}

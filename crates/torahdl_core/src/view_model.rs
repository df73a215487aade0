use crate::{DownloadState, PreviewResult, Site};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url_input: String,
    pub submit_enabled: bool,
    pub loading: bool,
    pub preview: Option<PreviewView>,
    pub error: Option<String>,
    pub sites: Vec<Site>,
    pub sites_loading: bool,
    pub matching_site: Option<Site>,
    pub download: DownloadState,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub title: String,
    pub file_format: String,
    pub download_url: String,
    pub file_name: String,
    pub download_label: &'static str,
}

impl From<&PreviewResult> for PreviewView {
    fn from(preview: &PreviewResult) -> Self {
        Self {
            title: preview.title.clone(),
            file_format: preview.file_format.clone(),
            download_url: preview.download_url.clone(),
            file_name: preview.file_name.clone(),
            download_label: if preview.is_audio() {
                "Download Audio"
            } else {
                "Download Video"
            },
        }
    }
}

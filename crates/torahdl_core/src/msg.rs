use std::path::PathBuf;

use crate::{FailureCause, PreviewResult, RequestId, SavedMedia, Site};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The interactive session began; kicks off the catalog loader once.
    SessionStarted,
    /// User edited the URL input.
    InputChanged(String),
    /// User submitted the current URL input for extraction.
    SubmitClicked,
    /// User asked for the catalog to be fetched again.
    RefreshCatalog,
    /// Catalog request finished.
    CatalogLoaded(Result<Vec<Site>, FailureCause>),
    /// Extraction request finished.
    ExtractCompleted {
        request_id: RequestId,
        result: Result<PreviewResult, FailureCause>,
    },
    /// User asked to save the previewed media locally, optionally to an
    /// explicit file path instead of the configured output directory.
    SaveClicked { target: Option<PathBuf> },
    /// Media save finished.
    SaveCompleted(Result<SavedMedia, FailureCause>),
}

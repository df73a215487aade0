//! torahdl core: pure session state machine and view-model helpers.
mod effect;
mod error;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{FailureCause, GENERIC_FAILURE_MESSAGE, STORAGE_FAILURE_MESSAGE};
pub use msg::Msg;
pub use state::{AppState, DownloadState, PreviewResult, RequestId, RequestState, SavedMedia, Site};
pub use update::update;
pub use view_model::{AppViewModel, PreviewView};

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use torahdl_logging::torahdl_debug;

use crate::client::{ApiSettings, LinkApi, ReqwestLinkApi};
use crate::download::{DownloadSettings, MediaDownloader, MediaSaver};
use crate::{ApiError, EngineEvent, FailureKind, RequestId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub api: ApiSettings,
    pub download: DownloadSettings,
}

enum EngineCommand {
    LoadCatalog,
    Extract { request_id: RequestId, url: String },
    Save {
        download_url: String,
        file_name: String,
        target: Option<PathBuf>,
    },
}

/// Runs remote calls on a background tokio runtime and reports completions
/// as [`EngineEvent`]s. Dropping the handle cancels everything in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestLinkApi::new(settings.api)?);
        let saver = Arc::new(MediaDownloader::new(settings.download)?);
        Self::with_services(api, saver)
    }

    pub fn with_services(
        api: Arc<dyn LinkApi>,
        saver: Arc<dyn MediaSaver>,
    ) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        thread::Builder::new()
            .name("torahdl-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let api = api.clone();
                    let saver = saver.clone();
                    let event_tx = event_tx.clone();
                    let cancel = task_cancel.clone();
                    runtime.spawn(async move {
                        tokio::select! {
                            _ = cancel.cancelled() => {
                                torahdl_debug!("engine task cancelled");
                            }
                            event = handle_command(api.as_ref(), saver.as_ref(), command) => {
                                let _ = event_tx.send(event);
                            }
                        }
                    });
                }
            })
            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;

        Ok(Self {
            cmd_tx,
            event_rx,
            cancel,
        })
    }

    pub fn load_catalog(&self) {
        self.send(EngineCommand::LoadCatalog);
    }

    pub fn extract(&self, request_id: RequestId, url: impl Into<String>) {
        self.send(EngineCommand::Extract {
            request_id,
            url: url.into(),
        });
    }

    pub fn save(
        &self,
        download_url: impl Into<String>,
        file_name: impl Into<String>,
        target: Option<PathBuf>,
    ) {
        self.send(EngineCommand::Save {
            download_url: download_url.into(),
            file_name: file_name.into(),
            target,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Disconnected` means the
    /// engine thread is gone and nothing will ever arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }

    /// Cancels every in-flight task; cancelled tasks report nothing.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn send(&self, command: EngineCommand) {
        if self.cancel.is_cancelled() {
            return;
        }
        let _ = self.cmd_tx.send(command);
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn handle_command(
    api: &dyn LinkApi,
    saver: &dyn MediaSaver,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::LoadCatalog => EngineEvent::CatalogCompleted {
            result: api.list_sites().await,
        },
        EngineCommand::Extract { request_id, url } => EngineEvent::ExtractCompleted {
            request_id,
            result: api.extract(&url).await,
        },
        EngineCommand::Save {
            download_url,
            file_name,
            target,
        } => {
            let result = saver
                .save(&download_url, &file_name, target.as_deref())
                .await;
            EngineEvent::SaveCompleted { file_name, result }
        }
    }
}

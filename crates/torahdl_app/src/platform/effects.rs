use std::io;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use torahdl_core::{Effect, FailureCause, Msg, PreviewResult, SavedMedia, Site};
use torahdl_engine::{
    ApiError, EngineEvent, EngineHandle, ExtractionRecord, FailureKind, SavedFile, SiteRecord,
};
use torahdl_logging::{torahdl_info, torahdl_warn};

/// Executes core effects on the engine and turns engine events back into
/// core messages. Failure details end up in the log and nowhere else.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadCatalog => {
                    torahdl_info!("LoadCatalog");
                    self.engine.load_catalog();
                }
                Effect::Extract { request_id, url } => {
                    torahdl_info!(
                        "Extract request_id={} url_len={} url={}",
                        request_id,
                        url.len(),
                        url
                    );
                    self.engine.extract(request_id, url);
                }
                Effect::SaveMedia {
                    download_url,
                    file_name,
                    target,
                } => {
                    torahdl_info!(
                        "SaveMedia file_name={} target={:?} url={}",
                        file_name,
                        target,
                        download_url
                    );
                    self.engine.save(download_url, file_name, target);
                }
            }
        }
    }

    /// Waits briefly for the next engine result; errors once the engine is gone.
    pub fn next_msg(&self, timeout: Duration) -> io::Result<Option<Msg>> {
        match self.engine.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event_to_msg(event))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::other("engine stopped")),
        }
    }

    pub fn try_next_msg(&self) -> Option<Msg> {
        self.engine.try_recv().map(event_to_msg)
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CatalogCompleted { result } => match result {
            Ok(records) => {
                torahdl_info!("Catalog loaded with {} sites", records.len());
                Msg::CatalogLoaded(Ok(records.into_iter().map(map_site).collect()))
            }
            Err(err) => {
                torahdl_warn!("Catalog load failed: {}", err);
                Msg::CatalogLoaded(Err(map_cause(&err)))
            }
        },
        EngineEvent::ExtractCompleted { request_id, result } => Msg::ExtractCompleted {
            request_id,
            result: match result {
                Ok(record) => {
                    torahdl_info!(
                        "Extract request_id={} resolved format={}",
                        request_id,
                        record.file_format
                    );
                    Ok(map_preview(record))
                }
                Err(err) => {
                    torahdl_warn!("Extract request_id={} failed: {}", request_id, err);
                    Err(map_cause(&err))
                }
            },
        },
        EngineEvent::SaveCompleted { file_name, result } => Msg::SaveCompleted(match result {
            Ok(saved) => Ok(map_saved(saved)),
            Err(err) => {
                torahdl_warn!("Saving {} failed: {}", file_name, err);
                Err(map_cause(&err))
            }
        }),
    }
}

fn map_site(record: SiteRecord) -> Site {
    Site {
        name: record.name,
        url: record.url,
    }
}

fn map_preview(record: ExtractionRecord) -> PreviewResult {
    PreviewResult {
        title: record.title,
        download_url: record.download_url,
        file_format: record.file_format,
        file_name: record.file_name,
    }
}

fn map_saved(saved: SavedFile) -> SavedMedia {
    SavedMedia {
        path: saved.path,
        bytes: saved.bytes,
    }
}

fn map_cause(err: &ApiError) -> FailureCause {
    match err.kind {
        FailureKind::HttpStatus(code) => FailureCause::HttpStatus(code),
        FailureKind::Decode => FailureCause::Decode,
        FailureKind::Io => FailureCause::Storage,
        FailureKind::InvalidUrl | FailureKind::Timeout | FailureKind::Network => {
            FailureCause::Transport
        }
    }
}

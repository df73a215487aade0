use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use torahdl_core::{update, AppState, AppViewModel, DownloadState, Msg, RequestState};

use super::effects::EffectRunner;
use super::ui;
use super::ui::input::{parse_line, Command};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Options for resolving a single URL from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneShot {
    /// Print only the download link instead of the preview.
    pub url_only: bool,
    pub save: bool,
    /// Explicit save destination; `None` uses the output directory.
    pub target: Option<PathBuf>,
}

/// Owns the session state and drives it from user lines and engine events.
pub struct Session<W: Write> {
    state: AppState,
    last_view: AppViewModel,
    runner: EffectRunner,
    out: W,
    quiet: bool,
}

impl<W: Write> Session<W> {
    pub fn new(runner: EffectRunner, out: W) -> Self {
        let state = AppState::new();
        let last_view = state.view();
        Self {
            state,
            last_view,
            runner,
            out,
            quiet: false,
        }
    }

    /// Interactive session: loads the catalog, then serves lines until
    /// `:quit` or the input closes.
    pub fn run_interactive(mut self, lines: mpsc::Receiver<String>) -> io::Result<()> {
        self.write_lines(ui::render::help_lines())?;
        self.dispatch(Msg::SessionStarted)?;

        loop {
            match lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => {
                    if !self.handle_line(&line)? {
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
            while let Some(msg) = self.runner.try_next_msg() {
                self.dispatch(msg)?;
            }
        }

        self.runner.shutdown();
        Ok(())
    }

    /// Resolves one URL (and optionally saves it). Returns whether it worked.
    pub fn run_once(&mut self, url: &str, options: &OneShot) -> io::Result<bool> {
        self.quiet = options.url_only;
        self.dispatch(Msg::InputChanged(url.to_string()))?;
        self.dispatch(Msg::SubmitClicked)?;
        if !self.state.is_loading() {
            self.write_lines(vec!["Enter a URL to resolve.".to_string()])?;
            return Ok(false);
        }
        self.wait_until(|state| !state.is_loading())?;

        let request = self.state.request().clone();
        if options.url_only {
            match &request {
                RequestState::Success(preview) => {
                    self.write_lines(vec![preview.download_url.clone()])?
                }
                RequestState::Failure(message) => {
                    self.write_lines(vec![format!("Error: {message}")])?
                }
                RequestState::Idle | RequestState::Loading => {}
            }
        }

        let resolved = matches!(request, RequestState::Success(_));
        if !resolved || !options.save {
            return Ok(resolved);
        }

        self.dispatch(Msg::SaveClicked {
            target: options.target.clone(),
        })?;
        self.wait_until(|state| !matches!(state.view().download, DownloadState::InProgress { .. }))?;
        Ok(matches!(self.state.view().download, DownloadState::Saved(_)))
    }

    /// Loads the catalog and prints it.
    pub fn list_sites_once(mut self) -> io::Result<()> {
        self.dispatch(Msg::SessionStarted)?;
        self.wait_until(|state| !state.is_catalog_loading())?;
        let lines = ui::render::render_sites(&self.state.view());
        self.write_lines(lines)
    }

    /// Returns `false` when the session should end.
    fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        match parse_line(line) {
            Command::Submit(url) => {
                if self.state.is_loading() {
                    // The input belongs to the in-flight request until it resolves.
                    self.write_lines(vec![
                        "Still processing the previous link, please wait.".to_string()
                    ])?;
                    return Ok(true);
                }
                self.dispatch(Msg::InputChanged(url))?;
                self.dispatch(Msg::SubmitClicked)?;
            }
            Command::Empty => {
                self.dispatch(Msg::InputChanged(String::new()))?;
                self.dispatch(Msg::SubmitClicked)?;
            }
            Command::ListSites => {
                let lines = ui::render::render_sites(&self.state.view());
                self.write_lines(lines)?;
            }
            Command::RefreshSites => self.dispatch(Msg::RefreshCatalog)?,
            Command::Save => {
                if self.state.view().preview.is_none() {
                    self.write_lines(vec!["Nothing to save yet.".to_string()])?;
                }
                self.dispatch(Msg::SaveClicked { target: None })?;
            }
            Command::Help => self.write_lines(ui::render::help_lines())?,
            Command::Quit => return Ok(false),
            Command::Unknown(text) => {
                self.write_lines(vec![format!("Unknown command {text}; :help lists commands.")])?;
            }
        }
        Ok(true)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.run(effects);

        if was_dirty && !self.quiet {
            let view = self.state.view();
            let lines = ui::render::render(&self.last_view, &view);
            self.last_view = view;
            self.write_lines(lines)?;
        }
        Ok(())
    }

    fn wait_until(&mut self, done: impl Fn(&AppState) -> bool) -> io::Result<()> {
        while !done(&self.state) {
            if let Some(msg) = self.runner.next_msg(POLL_INTERVAL)? {
                self.dispatch(msg)?;
            }
        }
        Ok(())
    }

    fn write_lines(&mut self, lines: Vec<String>) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use torahdl_core::GENERIC_FAILURE_MESSAGE;
    use torahdl_engine::{
        ApiError, EngineHandle, ExtractionRecord, FailureKind, LinkApi, MediaSaver, SavedFile,
        SiteRecord,
    };

    use super::*;

    struct FakeApi {
        extract_calls: AtomicUsize,
        delay: Duration,
        fail_with: Option<FailureKind>,
    }

    impl FakeApi {
        fn ok() -> Self {
            Self {
                extract_calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail_with: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl LinkApi for FakeApi {
        async fn list_sites(&self) -> Result<Vec<SiteRecord>, ApiError> {
            Ok(vec![SiteRecord {
                name: "AllDaf".to_string(),
                url: "https://alldaf.org".to_string(),
            }])
        }

        async fn extract(&self, _url: &str) -> Result<ExtractionRecord, ApiError> {
            self.extract_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if let Some(kind) = self.fail_with.clone() {
                return Err(ApiError {
                    kind,
                    message: "status 422 from upstream".to_string(),
                });
            }
            Ok(ExtractionRecord {
                title: "Daf Yomi".to_string(),
                download_url: "https://cdn.example/a.mp3".to_string(),
                file_format: "audio/mpeg".to_string(),
                file_name: "daf.mp3".to_string(),
            })
        }
    }

    struct FakeSaver;

    #[async_trait::async_trait]
    impl MediaSaver for FakeSaver {
        async fn save(
            &self,
            _download_url: &str,
            file_name: &str,
            target: Option<&Path>,
        ) -> Result<SavedFile, ApiError> {
            Ok(SavedFile {
                path: target.map_or_else(|| PathBuf::from(file_name), Path::to_path_buf),
                bytes: 2048,
            })
        }
    }

    fn session_with(api: Arc<FakeApi>) -> Session<Vec<u8>> {
        let engine = EngineHandle::with_services(api, Arc::new(FakeSaver)).unwrap();
        Session::new(EffectRunner::new(engine), Vec::new())
    }

    fn printed(session: &Session<Vec<u8>>) -> String {
        String::from_utf8(session.output().clone()).unwrap()
    }

    #[test]
    fn one_shot_success_prints_preview() {
        let mut session = session_with(Arc::new(FakeApi::ok()));
        session.dispatch(Msg::InputChanged("https://alldaf.org/p/225726".to_string())).unwrap();
        session.dispatch(Msg::SubmitClicked).unwrap();
        session.wait_until(|state| !state.is_loading()).unwrap();

        let text = printed(&session);
        assert!(text.contains("Processing..."));
        assert!(text.contains("Daf Yomi"));
        assert!(text.contains("Download Audio: https://cdn.example/a.mp3"));
    }

    #[test]
    fn one_shot_failure_hides_technical_detail() {
        let api = Arc::new(FakeApi {
            fail_with: Some(FailureKind::HttpStatus(422)),
            ..FakeApi::ok()
        });
        let mut session = session_with(api);
        session.dispatch(Msg::InputChanged("https://not-supported.example/x".to_string())).unwrap();
        session.dispatch(Msg::SubmitClicked).unwrap();
        session.wait_until(|state| !state.is_loading()).unwrap();

        let text = printed(&session);
        assert!(text.contains(GENERIC_FAILURE_MESSAGE));
        assert!(!text.contains("422"));
    }

    #[test]
    fn run_once_with_save_reports_saved_file() {
        let mut session = session_with(Arc::new(FakeApi::ok()));
        let options = OneShot {
            save: true,
            ..OneShot::default()
        };
        assert!(session.run_once("https://alldaf.org/p/225726", &options).unwrap());
        assert!(printed(&session).contains("Saved 2,048 bytes to daf.mp3"));
    }

    #[test]
    fn run_once_saves_to_explicit_target() {
        let mut session = session_with(Arc::new(FakeApi::ok()));
        let options = OneShot {
            save: true,
            target: Some(PathBuf::from("shiurim/today.mp3")),
            ..OneShot::default()
        };
        assert!(session.run_once("https://alldaf.org/p/225726", &options).unwrap());
        let expected = format!("Saved 2,048 bytes to {}", Path::new("shiurim/today.mp3").display());
        assert!(printed(&session).contains(&expected));
    }

    #[test]
    fn url_only_prints_just_the_download_link() {
        let mut session = session_with(Arc::new(FakeApi::ok()));
        let options = OneShot {
            url_only: true,
            ..OneShot::default()
        };
        assert!(session.run_once("https://alldaf.org/p/225726", &options).unwrap());
        assert_eq!(printed(&session), "https://cdn.example/a.mp3\n");
    }

    #[test]
    fn url_only_failure_prints_only_the_generic_error() {
        let api = Arc::new(FakeApi {
            fail_with: Some(FailureKind::Network),
            ..FakeApi::ok()
        });
        let mut session = session_with(api);
        let options = OneShot {
            url_only: true,
            ..OneShot::default()
        };
        assert!(!session.run_once("https://not-supported.example/x", &options).unwrap());
        assert_eq!(printed(&session), format!("Error: {GENERIC_FAILURE_MESSAGE}\n"));
    }

    #[test]
    fn empty_url_prints_a_notice_and_sends_nothing() {
        let api = Arc::new(FakeApi::ok());
        let mut session = session_with(api.clone());
        assert!(!session.run_once("", &OneShot::default()).unwrap());
        assert!(printed(&session).contains("Enter a URL to resolve."));
        assert_eq!(api.extract_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn second_submission_while_busy_is_refused() {
        let api = Arc::new(FakeApi {
            delay: Duration::from_millis(200),
            ..FakeApi::ok()
        });
        let mut session = session_with(api.clone());

        assert!(session.handle_line("https://alldaf.org/p/1").unwrap());
        assert!(session.handle_line("https://alldaf.org/p/2").unwrap());
        assert_eq!(session.state.view().url_input, "https://alldaf.org/p/1");
        session.wait_until(|state| !state.is_loading()).unwrap();

        assert!(printed(&session).contains("Still processing the previous link"));
        assert_eq!(session.state.view().url_input, "https://alldaf.org/p/1");
        assert_eq!(api.extract_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut session = session_with(Arc::new(FakeApi::ok()));
        assert!(session.handle_line(":bogus").unwrap());
        assert!(printed(&session).contains("Unknown command :bogus"));
        assert!(!session.handle_line(":quit").unwrap());
    }

    #[test]
    fn interactive_session_loads_catalog_on_start() {
        let mut session = session_with(Arc::new(FakeApi::ok()));
        session.dispatch(Msg::SessionStarted).unwrap();
        session.wait_until(|state| !state.is_catalog_loading()).unwrap();
        assert!(session.handle_line(":sites").unwrap());
        assert!(printed(&session).contains("AllDaf - https://alldaf.org"));
    }
}

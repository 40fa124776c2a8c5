use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{FileSessionStore, SessionConfig, SessionStore};
use crate::countdown::{CountdownEngine, EngineState};
use crate::error::{Error, Result};
use crate::store::{Field, RowId, TimerRowStore};
use crate::timer_file::{read_document, write_document};

/// Where the session pushes what the user should see.
pub trait DisplaySink {
    fn show_time(&mut self, text: &str);
    fn report_error(&mut self, error: &Error);

    /// Drop whatever error is on display. Called before each user action.
    fn clear_error(&mut self) {}
}

/// Label-like sink: keeps the latest clock text and the most recent error.
#[derive(Debug, Clone)]
pub struct ClockLabel {
    pub text: String,
    pub error: Option<String>,
}

impl ClockLabel {
    pub fn new() -> Self {
        Self {
            text: "0.000".to_string(),
            error: None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Default for ClockLabel {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for ClockLabel {
    fn show_time(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
        }
    }

    fn report_error(&mut self, error: &Error) {
        self.error = Some(error.to_string());
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Everything the UI layer can ask of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RowAdded,
    RowDeleted(RowId),
    RowEdited {
        id: RowId,
        field: Field,
        value: String,
    },
    RowSelected(RowId),
    RowDeselected,
    StartPressed,
    StopPressed,
    Tick,
    /// Result of the load picker; `None` when cancelled.
    LoadRequested(Option<PathBuf>),
    /// Result of the save picker; `None` when cancelled.
    SaveRequested(Option<PathBuf>),
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub config_path: PathBuf,
    pub allow_delete_first_row: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(crate::config::DEFAULT_CONFIG_FILE),
            allow_delete_first_row: true,
        }
    }
}

/// One running timer window: the rows, the selection, and the countdown.
pub struct Session<S: DisplaySink, C: SessionStore = FileSessionStore> {
    store: TimerRowStore,
    engine: CountdownEngine,
    selected: Option<RowId>,
    current_file: Option<PathBuf>,
    config: C,
    sink: S,
}

impl<S: DisplaySink> Session<S> {
    pub fn new(options: SessionOptions, sink: S) -> Self {
        Self::with_store(
            FileSessionStore::with_path(&options.config_path),
            options.allow_delete_first_row,
            sink,
        )
    }
}

impl<S: DisplaySink, C: SessionStore> Session<S, C> {
    pub fn with_store(config: C, allow_delete_first_row: bool, sink: S) -> Self {
        let mut session = Self {
            store: TimerRowStore::new(allow_delete_first_row),
            engine: CountdownEngine::new(),
            selected: None,
            current_file: None,
            config,
            sink,
        };
        session.refresh();
        session
    }

    pub fn store(&self) -> &TimerRowStore {
        &self.store
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn selected(&self) -> Option<RowId> {
        self.selected
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Startup: reload the remembered timer file, or begin with one blank row.
    pub fn restore(&mut self) {
        self.restore_from(None);
    }

    /// Like `restore`, but `file` wins over the remembered one when given.
    pub fn restore_from(&mut self, file: Option<&Path>) {
        let remembered = match file {
            Some(path) => Some(path.to_path_buf()),
            None => self.config.load().existing_last_file().map(Path::to_path_buf),
        };
        match remembered {
            Some(path) => {
                let result = self.load(&path);
                if self.report_err(result).is_none() {
                    self.store.add_blank_row();
                }
            }
            None => {
                debug!("no previous timer file, starting blank");
                self.store.add_blank_row();
            }
        }
    }

    /// Apply one UI event. Failures are delivered to the sink, never returned.
    pub fn handle(&mut self, event: SessionEvent) {
        if event != SessionEvent::Tick {
            self.sink.clear_error();
        }
        match event {
            SessionEvent::RowAdded => {
                self.add_row();
            }
            SessionEvent::RowDeleted(id) => {
                self.delete_row(id);
            }
            SessionEvent::RowEdited { id, field, value } => {
                self.edit_row(id, field, value);
            }
            SessionEvent::RowSelected(id) => self.select(id),
            SessionEvent::RowDeselected => self.deselect(),
            SessionEvent::StartPressed => {
                let result = self.start();
                self.report_err(result);
            }
            SessionEvent::StopPressed => self.stop(),
            SessionEvent::Tick => {
                self.tick();
            }
            SessionEvent::LoadRequested(Some(path)) => {
                let result = self.load(&path);
                self.report_err(result);
            }
            SessionEvent::SaveRequested(Some(path)) => {
                let result = self.save(&path);
                self.report_err(result);
            }
            SessionEvent::LoadRequested(None) | SessionEvent::SaveRequested(None) => {
                debug!("file picker cancelled");
            }
        }
    }

    pub fn add_row(&mut self) -> RowId {
        self.store.add_blank_row()
    }

    pub fn delete_row(&mut self, id: RowId) -> bool {
        let removed = self.store.delete_row(id);
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    pub fn edit_row(&mut self, id: RowId, field: Field, value: String) -> bool {
        debug!(%id, %field, value = value.as_str(), "editing row");
        self.store.set_field(id, field, value)
    }

    /// Radio-style selection: stops the countdown and arms from the row.
    pub fn select(&mut self, id: RowId) {
        if self.selected == Some(id) {
            return;
        }
        let Some(row) = self.store.get(id) else {
            warn!(%id, "select of unknown row ignored");
            return;
        };
        let offsets = row.offsets.clone();

        self.selected = Some(id);
        self.engine.stop();
        debug!(%id, offsets = offsets.as_str(), "updating timer from offsets");
        if let Err(e) = self.engine.arm(&offsets) {
            self.report(e.into());
        }
        self.refresh();
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn start(&mut self) -> Result<()> {
        self.engine.start()?;
        self.refresh();
        Ok(())
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.refresh();
    }

    pub fn tick(&mut self) -> bool {
        let ticked = self.engine.tick();
        if ticked {
            self.refresh();
        }
        ticked
    }

    /// Replace the rows with a timer file. On failure nothing changes.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        let doc = read_document(path)?;

        let count = doc.timers.len();
        self.store.load_document(doc);
        if self.store.is_empty() {
            self.store.add_blank_row();
        }
        self.selected = None;
        self.engine.stop();
        self.refresh();
        self.current_file = Some(path.to_path_buf());
        info!(path = %path.display(), timers = count, "loaded timers");

        self.remember(path);
        Ok(count)
    }

    /// Write the non-blank rows to a timer file.
    pub fn save(&mut self, path: &Path) -> Result<usize> {
        let doc = self.store.to_document();
        let count = doc.timers.len();
        write_document(path, &doc)?;
        self.current_file = Some(path.to_path_buf());
        info!(path = %path.display(), timers = count, "saved timers");

        self.remember(path);
        Ok(count)
    }

    fn remember(&mut self, path: &Path) {
        let cfg = SessionConfig::with_last_file(path);
        if let Err(source) = self.config.save(&cfg) {
            let path = self.config.path().to_path_buf();
            self.report(Error::SessionWrite { path, source });
        }
    }

    fn refresh(&mut self) {
        let text = self.engine.display();
        self.sink.show_time(&text);
    }

    fn report_err<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    fn report(&mut self, error: Error) {
        warn!("{error}");
        self.sink.report_error(&error);
    }
}

mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flowtimer::{
    app_dirs::AppDirs,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, TermEvent, Ticker},
    store::{Field, RowId},
    ClockLabel, Session, SessionEvent, SessionOptions,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

/// Minimum time between redraws while the countdown runs.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// countdown timer tui with named offset timers
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A countdown timer TUI. Pick a timer row, and the clock arms from the last value of its slash-separated offsets (in milliseconds). Timer lists are saved as JSON and the last file is reopened on the next start."
)]
pub struct Cli {
    /// timer file to open instead of the remembered one
    file: Option<PathBuf>,

    /// where to remember the last used timer file
    #[clap(short = 'c', long, default_value = flowtimer::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// refuse to delete the first timer row
    #[clap(long)]
    protect_first_row: bool,

    /// log at debug level
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn to_session_options(&self) -> SessionOptions {
        SessionOptions {
            config_path: self.config.clone(),
            allow_delete_first_row: !self.protect_first_row,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileAction {
    Load,
    Save,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Editing { buffer: String },
    PathPrompt { action: FileAction, buffer: String },
}

pub struct App {
    pub session: Session<ClockLabel>,
    pub cursor_row: usize,
    pub cursor_field: Field,
    pub mode: Mode,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let mut session = Session::new(cli.to_session_options(), ClockLabel::new());
        session.restore_from(cli.file.as_deref());

        Self::from_session(session)
    }

    pub fn from_session(session: Session<ClockLabel>) -> Self {
        Self {
            session,
            cursor_row: 0,
            cursor_field: Field::Name,
            mode: Mode::Normal,
        }
    }

    fn cursor_id(&self) -> Option<RowId> {
        self.session.store().id_at(self.cursor_row)
    }

    fn clamp_cursor(&mut self) {
        let len = self.session.store().len();
        self.cursor_row = self.cursor_row.min(len.saturating_sub(1));
    }

    fn shift_field(&mut self, forward: bool) {
        let idx = Field::ALL
            .iter()
            .position(|f| *f == self.cursor_field)
            .unwrap_or(0);
        let len = Field::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.cursor_field = Field::ALL[next];
    }

    fn prompt_default(&self) -> String {
        self.session
            .current_file()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    /// Apply a key press. Returns false when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => return self.on_normal_key(key),
            Mode::Editing { mut buffer } => match key.code {
                KeyCode::Enter => {
                    if let Some(id) = self.cursor_id() {
                        self.session.handle(SessionEvent::RowEdited {
                            id,
                            field: self.cursor_field,
                            value: buffer,
                        });
                    }
                }
                KeyCode::Esc => {}
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = Mode::Editing { buffer };
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.mode = Mode::Editing { buffer };
                }
                _ => self.mode = Mode::Editing { buffer },
            },
            Mode::PathPrompt { action, mut buffer } => match key.code {
                KeyCode::Enter => {
                    let trimmed = buffer.trim();
                    let path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
                    self.session.handle(match action {
                        FileAction::Load => SessionEvent::LoadRequested(path),
                        FileAction::Save => SessionEvent::SaveRequested(path),
                    });
                    self.clamp_cursor();
                }
                KeyCode::Esc => self.session.handle(match action {
                    FileAction::Load => SessionEvent::LoadRequested(None),
                    FileAction::Save => SessionEvent::SaveRequested(None),
                }),
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = Mode::PathPrompt { action, buffer };
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.mode = Mode::PathPrompt { action, buffer };
                }
                _ => self.mode = Mode::PathPrompt { action, buffer },
            },
        }
        true
    }

    fn on_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return false,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor_row += 1;
                self.clamp_cursor();
            }
            KeyCode::Left | KeyCode::BackTab => self.shift_field(false),
            KeyCode::Right | KeyCode::Tab => self.shift_field(true),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(row) = self.cursor_id().and_then(|id| self.session.store().get(id)) {
                    self.mode = Mode::Editing {
                        buffer: row.field(self.cursor_field).to_string(),
                    };
                }
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_id() {
                    self.session.handle(SessionEvent::RowSelected(id));
                }
            }
            KeyCode::Char('x') => self.session.handle(SessionEvent::RowDeselected),
            KeyCode::Char('a') => {
                self.session.handle(SessionEvent::RowAdded);
                self.cursor_row = self.session.store().len().saturating_sub(1);
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.cursor_id() {
                    self.session.handle(SessionEvent::RowDeleted(id));
                    self.clamp_cursor();
                }
            }
            KeyCode::Char('s') => self.session.handle(SessionEvent::StartPressed),
            KeyCode::Char('t') => self.session.handle(SessionEvent::StopPressed),
            KeyCode::Char('l') => {
                self.mode = Mode::PathPrompt {
                    action: FileAction::Load,
                    buffer: self.prompt_default(),
                };
            }
            KeyCode::Char('w') => {
                self.mode = Mode::PathPrompt {
                    action: FileAction::Save,
                    buffer: self.prompt_default(),
                };
            }
            _ => {}
        }
        true
    }
}

/// Initialize logging into the log file. The terminal belongs to the UI, so
/// when the file cannot be opened log output is dropped.
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(path) = AppDirs::log_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::sink)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.verbose);
    info!("starting flowtimer {}", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(&cli);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut runner: Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;
    let mut last_draw = Instant::now();

    loop {
        runner.set_active(app.session.engine().is_running());
        match runner.step() {
            TermEvent::Tick => {
                if !app.session.engine().is_running() {
                    continue;
                }
                app.session.handle(SessionEvent::Tick);

                // always paint the final frame so the label settles on 0.000
                if last_draw.elapsed() >= FRAME_INTERVAL || !app.session.engine().is_running() {
                    terminal.draw(|f| ui(app, f))?;
                    last_draw = Instant::now();
                }
            }
            TermEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
                last_draw = Instant::now();
            }
            TermEvent::Key(key) => {
                if !app.on_key(key) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
                last_draw = Instant::now();
            }
        }
    }

    info!("quitting");
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

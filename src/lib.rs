// Library surface for headless/integration tests and reuse.
// The terminal frontend lives in main.rs and only talks to `Session`.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod error;
pub mod offsets;
pub mod runtime;
pub mod session;
pub mod store;
pub mod timer_file;

pub use error::{Error, ParseError, Result};
pub use session::{ClockLabel, DisplaySink, Session, SessionEvent, SessionOptions};

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Nominal countdown period. Each tick takes exactly one millisecond off the
/// clock; how often ticks actually arrive depends on the platform.
pub const TICK_RATE_MS: u64 = 1;

/// Wake-up period while nothing is counting down.
pub const IDLE_TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TermEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<TermEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // key release/repeat reports would double every press on some terminals
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(TermEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(TermEvent::Resize),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;

    fn idle_interval(&self) -> Duration {
        Duration::from_millis(IDLE_TICK_RATE_MS)
    }
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<TermEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TermEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// A tick is due once a full interval has passed since the previous one, so
/// a steady stream of key events cannot starve the countdown. While inactive
/// the runner ticks at the ticker's idle interval instead.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    active: bool,
    next_tick: Instant,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            active: true,
            next_tick,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switch between the countdown rate and the idle rate. The next tick is
    /// rescheduled only when the rate actually changes.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            self.next_tick = Instant::now() + self.interval();
        }
    }

    fn interval(&self) -> Duration {
        if self.active {
            self.ticker.interval()
        } else {
            self.ticker.idle_interval()
        }
    }

    /// Blocks up to the next tick deadline and returns the next event, or Tick
    pub fn step(&mut self) -> TermEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            self.next_tick = now + self.interval();
            return TermEvent::Tick;
        }

        let wait = self.next_tick - now;
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(e) => {
                if e == RecvTimeoutError::Disconnected {
                    std::thread::sleep(wait);
                }
                self.next_tick = Instant::now() + self.interval();
                TermEvent::Tick
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            TermEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(TermEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(50));
        let mut runner = Runner::new(es, ticker);

        match runner.step() {
            TermEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn ticks_still_arrive_under_steady_input() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..1000 {
            tx.send(TermEvent::Resize).unwrap();
        }
        let es = TestEventSource::new(rx);
        let mut runner = Runner::new(es, FixedTicker::new(Duration::from_millis(1)));

        std::thread::sleep(Duration::from_millis(5));
        let saw_tick = (0..1000).any(|_| matches!(runner.step(), TermEvent::Tick));
        assert!(saw_tick, "a due tick should preempt queued input");
    }

    #[test]
    fn default_ticker_uses_tick_rate() {
        assert_eq!(
            FixedTicker::default().interval(),
            Duration::from_millis(TICK_RATE_MS)
        );
    }

    #[test]
    fn idle_runner_wakes_at_idle_rate() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());
        runner.set_active(false);

        let started = Instant::now();
        let mut ticks = 0;
        while started.elapsed() < Duration::from_millis(300) {
            if let TermEvent::Tick = runner.step() {
                ticks += 1;
            }
        }
        assert!(ticks <= 4, "idle runner ticked {ticks} times in 300ms");
    }

    #[test]
    fn reactivated_runner_returns_to_tick_rate() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());
        runner.set_active(false);
        runner.set_active(true);
        assert!(runner.is_active());

        let started = Instant::now();
        assert!(matches!(runner.step(), TermEvent::Tick));
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}

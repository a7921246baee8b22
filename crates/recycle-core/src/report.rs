use std::io::{self, Write};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// The two user-facing output channels.
///
/// Each call emits exactly one newline-terminated line. Operators rebuild the
/// event sequence from the channels independently, so implementations must
/// not reorder or batch. A write failure (e.g. a closed pipe) is returned to
/// the caller, which stops before touching the backend again.
pub trait Reporter {
    /// Progress line on standard output.
    fn progress(&mut self, line: &str) -> io::Result<()>;

    /// Error line on standard error.
    fn error(&mut self, line: &str) -> io::Result<()>;
}

/// Writes to the process's standard output and standard error.
#[derive(Debug, Default)]
pub struct StdReporter;

impl Reporter for StdReporter {
    fn progress(&mut self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()
    }

    fn error(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{line}")
    }
}

// ---------------------------------------------------------------------------
// MemoryReporter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdout,
    Stderr,
}

/// Records every line in emission order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub events: Vec<(Channel, String)>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(&self) -> Vec<&str> {
        self.lines(Channel::Stdout)
    }

    pub fn stderr(&self) -> Vec<&str> {
        self.lines(Channel::Stderr)
    }

    fn lines(&self, channel: Channel) -> Vec<&str> {
        self.events
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, l)| l.as_str())
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn progress(&mut self, line: &str) -> io::Result<()> {
        self.events.push((Channel::Stdout, line.to_string()));
        Ok(())
    }

    fn error(&mut self, line: &str) -> io::Result<()> {
        self.events.push((Channel::Stderr, line.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pause
// ---------------------------------------------------------------------------

/// Blocking wait between migration attempts.
///
/// Injected so callers can substitute a cancellable or instant wait.
pub trait Pause {
    fn pause(&self, duration: Duration);
}

#[derive(Debug, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reporter_keeps_channels_apart_and_ordered() {
        let mut r = MemoryReporter::new();
        r.progress("one").unwrap();
        r.error("oops").unwrap();
        r.progress("two").unwrap();
        assert_eq!(r.stdout(), vec!["one", "two"]);
        assert_eq!(r.stderr(), vec!["oops"]);
        assert_eq!(r.events[1], (Channel::Stderr, "oops".to_string()));
    }
}

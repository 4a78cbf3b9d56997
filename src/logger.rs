//! Leveled, timestamped console logging
//!
//! Every line has the layout
//! `<timestamp>[ <marker>]: <LEVEL> - <message>`, where the marker names the
//! unit currently executing (or the report section).

use crate::unit::TestResult;
use std::fmt;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};
use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Marker shown while the summary report is written
pub const REPORT_MARKER: &str = "TEST RESULTS";

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    /// Informational
    #[default]
    Log,
    Warning,
    Error,
}

impl Level {
    fn color(self) -> Option<Color> {
        match self {
            Level::Log => None,
            Level::Warning => Some(Color::Cyan),
            Level::Error => Some(Color::Red),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Log => "LOG",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// What the harness is doing right now, as shown in the line prefix
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Marker {
    /// Nothing is executing
    #[default]
    Idle,
    /// The named unit is executing
    Unit(String),
    /// The summary report is being written
    Report,
}

impl Marker {
    /// Whether no unit or report is active
    pub fn is_idle(&self) -> bool {
        matches!(self, Marker::Idle)
    }
}

enum Sink {
    Stdout(StandardStream),
    Memory(Buffer),
}

impl Sink {
    fn writer(&mut self) -> &mut dyn WriteColor {
        match self {
            Sink::Stdout(stream) => stream,
            Sink::Memory(buffer) => buffer,
        }
    }
}

/// Console logger carrying the current-test marker.
///
/// The logger is the one piece of state shared between the harness and the
/// units it runs, and it is passed around explicitly rather than kept in a
/// global.
pub struct Logger {
    sink: Sink,
    marker: Marker,
}

impl Logger {
    /// Log to standard output
    pub fn stdout(color: ColorChoice) -> Self {
        Self::with_sink(Sink::Stdout(StandardStream::stdout(color)))
    }

    /// Log into memory without escape codes; read back with [`Logger::contents`]
    pub fn buffered() -> Self {
        Self::with_sink(Sink::Memory(Buffer::no_color()))
    }

    /// Log into memory with ANSI escape codes
    pub fn buffered_ansi() -> Self {
        Self::with_sink(Sink::Memory(Buffer::ansi()))
    }

    fn with_sink(sink: Sink) -> Self {
        Logger {
            sink,
            marker: Marker::Idle,
        }
    }

    /// Everything written so far, for in-memory loggers.
    /// Always empty for stdout.
    pub fn contents(&self) -> String {
        match &self.sink {
            Sink::Memory(buffer) => String::from_utf8_lossy(buffer.as_slice()).into_owned(),
            Sink::Stdout(_) => String::new(),
        }
    }

    /// The current-test marker
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub(crate) fn set_marker(&mut self, marker: Marker) {
        self.marker = marker;
    }

    /// Write an informational message
    pub fn log(&mut self, message: impl AsRef<str>) {
        self.emit(Level::Log, message.as_ref());
    }

    /// Write a warning message
    pub fn warning(&mut self, message: impl AsRef<str>) {
        self.emit(Level::Warning, message.as_ref());
    }

    /// Write an error message
    pub fn error(&mut self, message: impl AsRef<str>) {
        self.emit(Level::Error, message.as_ref());
    }

    /// Write a message at the given level, one prefixed line per input line
    pub fn emit(&mut self, level: Level, message: &str) {
        for line in message.split('\n') {
            // A broken console must not fail the run
            let _ = self.write_line(level, |w| {
                w.set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
                write!(w, "{}", line)?;
                w.reset()
            });
        }
    }

    /// Write one report line: `<RESULT> in test '<name>'`
    pub(crate) fn emit_result(&mut self, level: Level, name: &str, result: TestResult) {
        let _ = self.write_line(level, |w| {
            let mut spec = ColorSpec::new();
            match result {
                TestResult::Pass => spec.set_fg(Some(Color::Green)).set_bold(true),
                TestResult::Warn => spec.set_fg(Some(Color::Cyan)),
                TestResult::Fail => spec.set_fg(Some(Color::Red)),
            };
            w.set_color(&spec)?;
            write!(w, "{}", result)?;
            w.set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
            write!(w, " in test '{}'", name)?;
            w.reset()
        });
    }

    fn write_line<F>(&mut self, level: Level, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut dyn WriteColor) -> io::Result<()>,
    {
        let Logger { sink, marker } = self;
        let w = sink.writer();

        write!(w, "{}", timestamp())?;
        match marker {
            Marker::Idle => {}
            Marker::Unit(name) => {
                w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
                write!(w, " {}", name)?;
                w.reset()?;
            }
            Marker::Report => write!(w, " {}", REPORT_MARKER)?,
        }
        write!(w, ": ")?;

        match level.color() {
            Some(color) => {
                w.set_color(ColorSpec::new().set_fg(Some(color)))?;
                write!(w, "{}", level)?;
                w.reset()?;
            }
            None => write!(w, "{}", level)?,
        }
        write!(w, " - ")?;

        body(&mut *w)?;
        writeln!(w)?;
        w.flush()
    }
}

/// Unix time in seconds with four fractional digits
fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:04}", now.as_secs(), now.subsec_micros() / 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strip the timestamp so lines can be compared exactly
    fn untimed(contents: &str) -> Vec<String> {
        contents
            .lines()
            .map(|line| {
                let start = line
                    .find(|c: char| c != '.' && !c.is_ascii_digit())
                    .unwrap_or(line.len());
                line[start..].to_string()
            })
            .collect()
    }

    #[test]
    fn test_idle_line_layout() {
        let mut log = Logger::buffered();
        log.log("hello");
        log.warning("careful");
        log.error("broken");

        assert_eq!(
            untimed(&log.contents()),
            vec![": LOG - hello", ": WARNING - careful", ": ERROR - broken"]
        );
    }

    #[test]
    fn test_marker_tags_lines() {
        let mut log = Logger::buffered();
        log.set_marker(Marker::Unit("ExampleTest".to_string()));
        log.log("inside");
        log.set_marker(Marker::Report);
        log.log("summary");

        assert_eq!(
            untimed(&log.contents()),
            vec![" ExampleTest: LOG - inside", " TEST RESULTS: LOG - summary"]
        );
    }

    #[test]
    fn test_multiline_messages_split() {
        let mut log = Logger::buffered();
        log.error("first\nsecond\nthird");

        let lines = untimed(&log.contents());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], ": ERROR - second");
    }

    #[test]
    fn test_timestamp_prefix() {
        let mut log = Logger::buffered();
        log.log("x");

        let contents = log.contents();
        let (stamp, _) = contents.split_once(':').unwrap();
        let (secs, frac) = stamp.split_once('.').unwrap();
        assert!(secs.parse::<u64>().is_ok());
        assert_eq!(frac.len(), 4);
    }

    #[test]
    fn test_ansi_colors() {
        let mut log = Logger::buffered_ansi();
        log.set_marker(Marker::Unit("Colored".to_string()));
        log.error("red");
        let contents = log.contents();
        // red level, bold cyan marker
        assert!(contents.contains("\x1b[0m\x1b[31mERROR"));
        assert!(contents.contains("\x1b[1m"));
        assert!(contents.contains("Colored"));
    }

    #[test]
    fn test_ansi_level_and_message_colors() {
        let mut log = Logger::buffered_ansi();
        log.warning("w");
        log.log("l");
        let contents = log.contents();
        let lines: Vec<_> = contents.lines().collect();

        // cyan level, white message
        assert!(lines[0].contains("\x1b[0m\x1b[36mWARNING\x1b[0m - \x1b[0m\x1b[37mw\x1b[0m"));
        // informational level keeps the default color
        assert!(lines[1].contains(": LOG - \x1b[0m\x1b[37ml\x1b[0m"));
    }

    #[test]
    fn test_ansi_result_colors() {
        let mut log = Logger::buffered_ansi();
        log.set_marker(Marker::Report);
        log.emit_result(Level::Log, "Good", TestResult::Pass);
        log.emit_result(Level::Warning, "Iffy", TestResult::Warn);
        log.emit_result(Level::Error, "Bad", TestResult::Fail);
        let contents = log.contents();
        let lines: Vec<_> = contents.lines().collect();

        // bold green, cyan, red; the name follows in white
        assert!(lines[0].contains("\x1b[0m\x1b[1m\x1b[32mPASS\x1b[0m\x1b[37m in test 'Good'"));
        assert!(lines[1].contains("\x1b[0m\x1b[36mWARNING\x1b[0m\x1b[37m in test 'Iffy'"));
        assert!(lines[2].contains("\x1b[0m\x1b[31mFAILURE\x1b[0m\x1b[37m in test 'Bad'"));
    }

    #[test]
    fn test_report_marker_is_not_highlighted() {
        let mut log = Logger::buffered_ansi();
        log.set_marker(Marker::Report);
        log.log("done");
        let contents = log.contents();
        let prefix = contents.split(": ").next().unwrap();
        assert!(prefix.ends_with(" TEST RESULTS"));
        assert!(!prefix.contains('\x1b'));
    }

    #[test]
    fn test_result_line() {
        let mut log = Logger::buffered();
        log.set_marker(Marker::Report);
        log.emit_result(Level::Warning, "Flaky", TestResult::Warn);
        assert_eq!(
            untimed(&log.contents()),
            vec![" TEST RESULTS: WARNING - WARNING in test 'Flaky'"]
        );
    }
}

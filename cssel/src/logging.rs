use std::fmt::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Installs a global subscriber printing events at `level` and above to stderr.
/// Returns false if a global subscriber was already set.
pub fn tracing_init(level: LevelFilter) -> bool {
    return tracing_subscriber::registry()
        .with(level)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .is_ok();
}

/// Keeps every event as a single line, `LEVEL file:line { field = value; }`.
/// Used to look at what the parser reports without a terminal.
#[derive(Debug, Clone, Default)]
pub struct CaptureLayer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<S>) {
        let metadata = event.metadata();
        let mut line = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => format!("{} {file}:{line} {{", level_name(*metadata.level())),
            (Some(file), None) => format!("{} {file} {{", level_name(*metadata.level())),
            (None, _) => format!("{} {{", level_name(*metadata.level())),
        };
        event.record(&mut FieldVisit::with_string(&mut line));
        line.push_str(" }");

        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

struct FieldVisit<'a> {
    line: &'a mut String,
}

impl<'a> FieldVisit<'a> {
    fn with_string(line: &'a mut String) -> Self {
        Self { line }
    }
}

impl<'a> Visit for FieldVisit<'a> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let _ = write!(self.line, " {} = {:?};", field.name(), value);
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

#[cfg(test)]
mod test_logging {
    use super::*;
    use crate::parser::{parse_selector, MAX_NESTING_DEPTH};

    fn captured(level: LevelFilter, run: impl FnOnce()) -> Vec<String> {
        let capture = CaptureLayer::new();
        let subscriber = tracing_subscriber::registry()
            .with(level)
            .with(capture.clone());
        tracing::subscriber::with_default(subscriber, run);
        capture.lines()
    }

    #[test]
    fn deep_nesting_is_reported() {
        let source = format!(
            "{}a{}",
            ":is(".repeat(MAX_NESTING_DEPTH + 2),
            ")".repeat(MAX_NESTING_DEPTH + 2)
        );
        let lines = captured(LevelFilter::WARN, || {
            parse_selector(&source);
        });
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|line| line.starts_with("WARN ")));
    }

    #[test]
    fn level_filter_applies() {
        let lines = captured(LevelFilter::WARN, || {
            parse_selector(".a > .b");
        });
        assert!(lines.is_empty());

        let lines = captured(LevelFilter::TRACE, || {
            parse_selector(".a > .b");
        });
        assert!(lines.iter().any(|line| line.contains("parsed selector list")));
    }

    #[test]
    fn fields_are_recorded() {
        let lines = captured(LevelFilter::TRACE, || {
            tracing::info!(answer = 42, "hello");
        });
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("INFO "));
        assert!(lines[0].ends_with("{ message = hello; answer = 42; }"));
    }
}

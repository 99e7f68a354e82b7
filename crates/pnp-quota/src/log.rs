use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

///
/// Level
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Level {
    Debug, // least severe
    Info,
    Ok,
    Warn,
    Error, // most severe
}

///
/// Topic
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum Topic {
    Auth,
    Handler,
    KeyVersion,
    Response,
    Session,
    Validation,
}

///
/// LogEntry
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEntry {
    pub level: Level,
    pub topic: Option<Topic>,
    pub context: String,
    pub message: String,
}

///
/// LogSink
/// Destination for entries produced by per-call loggers.
///

pub trait LogSink: Send + Sync {
    fn append(&self, entry: LogEntry);
}

///
/// CallLogger
///
/// Per-call logging handle. Travels with the response sink so every gate of
/// the request lifecycle logs against the same call context.
///

#[derive(Clone)]
pub struct CallLogger {
    sink: Arc<dyn LogSink>,
    context: String,
}

impl CallLogger {
    pub fn new(sink: Arc<dyn LogSink>, context: impl Into<String>) -> Self {
        Self {
            sink,
            context: context.into(),
        }
    }

    /// Logger writing coloured lines to stdout.
    pub fn stdout(context: impl Into<String>) -> Self {
        Self::new(Arc::new(StdoutLogSink::default()), context)
    }

    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[doc(hidden)]
    pub fn __append(&self, topic: Option<Topic>, level: Level, message: String) {
        self.sink.append(LogEntry {
            level,
            topic,
            context: self.context.clone(),
            message,
        });
    }
}

impl fmt::Debug for CallLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallLogger")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[macro_export]
macro_rules! log {
    // =========================================
    // (1) With topic (normal + trailing comma)
    // =========================================
    ($logger:expr, $topic:expr, $level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $logger.__append(Some($topic), $crate::log::Level::$level, format!($fmt $(, $arg)*));
    }};

    // =========================================
    // (2) No topic (normal + trailing comma)
    // =========================================
    ($logger:expr, $level:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $logger.__append(None, $crate::log::Level::$level, format!($fmt $(, $arg)*));
    }};
}

///
/// StdoutLogSink
///

#[derive(Clone, Copy, Debug)]
pub struct StdoutLogSink {
    pub min_level: Level,
}

impl Default for StdoutLogSink {
    fn default() -> Self {
        Self {
            min_level: Level::Info,
        }
    }
}

impl StdoutLogSink {
    /// Rendered line for `entry`, or `None` when it is below `min_level`.
    #[must_use]
    pub fn render(&self, entry: &LogEntry) -> Option<String> {
        (entry.level >= self.min_level).then(|| render_line(entry))
    }
}

impl LogSink for StdoutLogSink {
    fn append(&self, entry: LogEntry) {
        if let Some(line) = self.render(&entry) {
            println!("{line}");
        }
    }
}

fn render_line(entry: &LogEntry) -> String {
    let ctx_disp = ellipsize_middle(&entry.context, 9, 4, 4);
    let ctx_centered = format!("{ctx_disp:^9}");

    let final_msg = match entry.topic {
        Some(t) => format!("[{t}] {}", entry.message),
        None => entry.message.clone(),
    };

    let (color, reset) = match entry.level {
        Level::Ok => ("\x1b[32m", "\x1b[0m"),
        Level::Info => ("\x1b[34m", "\x1b[0m"),
        Level::Warn => ("\x1b[33m", "\x1b[0m"),
        Level::Error => ("\x1b[31m", "\x1b[0m"),
        Level::Debug => ("", ""),
    };

    let label = format!("{color}{:^5}{reset}", entry.level.to_string().to_uppercase());

    format!("{label}|{ctx_centered}| {final_msg}")
}

fn ellipsize_middle(s: &str, threshold: usize, head: usize, tail: usize) -> String {
    let len = s.chars().count();
    if len > threshold && head + 1 + tail < len {
        let prefix: String = s.chars().take(head).collect();
        let suffix: String = s.chars().skip(len - tail).collect();

        format!("{prefix}…{suffix}")
    } else {
        s.to_string()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::MemorySink;

    #[test]
    fn macro_routes_topic_and_level_to_sink() {
        let sink = Arc::new(MemorySink::default());
        let logger = CallLogger::new(sink.clone(), "call-1");
        let account = "0xabc";

        log!(logger, Topic::Auth, Warn, "denied account={account}");
        log!(logger, Info, "plain {}", 7);

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].topic, Some(Topic::Auth));
        assert_eq!(entries[0].level, Level::Warn);
        assert_eq!(entries[0].message, "denied account=0xabc");
        assert_eq!(entries[0].context, "call-1");
        assert_eq!(entries[1].topic, None);
        assert_eq!(entries[1].message, "plain 7");
    }

    #[test]
    fn rendered_line_includes_topic_and_short_context() {
        let line = render_line(&LogEntry {
            level: Level::Debug,
            topic: Some(Topic::KeyVersion),
            context: "quotaStatus-0123456789".to_string(),
            message: "resolved".to_string(),
        });

        assert_eq!(line, "DEBUG|quot…6789| [KeyVersion] resolved");
    }

    #[test]
    fn stdout_sink_drops_entries_below_min_level() {
        let sink = StdoutLogSink {
            min_level: Level::Warn,
        };
        let entry = |level| LogEntry {
            level,
            topic: None,
            context: "call".to_string(),
            message: "m".to_string(),
        };

        assert_eq!(sink.render(&entry(Level::Info)), None);
        assert_eq!(sink.render(&entry(Level::Ok)), None);
        assert!(sink.render(&entry(Level::Warn)).is_some());
        assert!(sink.render(&entry(Level::Error)).is_some());
        assert!(StdoutLogSink::default().render(&entry(Level::Debug)).is_none());
        assert!(StdoutLogSink::default().render(&entry(Level::Info)).is_some());
    }

    #[test]
    fn stdout_logger_carries_its_context() {
        let logger = CallLogger::stdout("quota-42");

        assert_eq!(logger.context(), "quota-42");
        assert!(format!("{logger:?}").contains("quota-42"));

        log!(logger, Topic::Session, Debug, "filtered out by the default level");
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
    }
}

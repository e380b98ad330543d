//! Structured compiler event stream (spec §4.5), rendered at one of two
//! verbosities. Rendering happens at the call site so the globally
//! installed [`Logger`] — which implements [`log::Log`] the same way the
//! teacher's `simple_logger` does — only has to write an already-formatted
//! line to stderr. This keeps ordinary `log::{error,warn,info,debug,trace}`
//! call sites elsewhere in the crate (file I/O errors, the `cc` invocation)
//! working unmodified alongside the per-line structured events.

use std::fmt;

use log::{Level, Log, Metadata, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    None,
    /// ANSI-colored category tag + prose with the source line number.
    Human,
    /// Colon-separated fields, with `\n`/`:` escaped inside code snippets.
    Machine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    VarDecl,
    BlockOpen,
    BlockClose,
    BlockChain,
    FuncDecl,
    FuncCall,
    Print,
    ForIn,
    Stmt,
    Parse,
    Emit,
    GccCmd,
    RunStart,
    RunEnd,
    Error,
    Warning,
}

impl EventKind {
    fn tag(self) -> &'static str {
        match self {
            EventKind::VarDecl => "VAR_DECL",
            EventKind::BlockOpen => "BLOCK_OPEN",
            EventKind::BlockClose => "BLOCK_CLOSE",
            EventKind::BlockChain => "BLOCK_CHAIN",
            EventKind::FuncDecl => "FUNC_DECL",
            EventKind::FuncCall => "FUNC_CALL",
            EventKind::Print => "PRINT",
            EventKind::ForIn => "FOR_IN",
            EventKind::Stmt => "STMT",
            EventKind::Parse => "PARSE",
            EventKind::Emit => "EMIT",
            EventKind::GccCmd => "GCC_CMD",
            EventKind::RunStart => "RUN_START",
            EventKind::RunEnd => "RUN_END",
            EventKind::Error => "ERROR",
            EventKind::Warning => "WARNING",
        }
    }

    fn level(self) -> Level {
        match self {
            EventKind::Error => Level::Error,
            EventKind::Warning => Level::Warn,
            EventKind::GccCmd | EventKind::RunStart | EventKind::RunEnd => Level::Info,
            _ => Level::Debug,
        }
    }

    fn color(self) -> &'static str {
        match self {
            EventKind::Error => RED,
            EventKind::Warning => YELLOW,
            EventKind::GccCmd | EventKind::RunStart | EventKind::RunEnd => CYAN,
            EventKind::BlockOpen | EventKind::BlockClose | EventKind::BlockChain => BLUE,
            _ => GREEN,
        }
    }
}

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

pub struct Event {
    pub kind: EventKind,
    pub line: usize,
    pub detail: String,
}

impl Event {
    pub fn new(kind: EventKind, line: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            detail: detail.into(),
        }
    }

    pub fn level(&self) -> Level {
        self.kind.level()
    }

    fn render_human(&self) -> String {
        format!(
            "{color}[{tag}]{reset} line {line}: {detail}",
            color = self.kind.color(),
            tag = self.kind.tag(),
            reset = RESET,
            line = self.line,
            detail = self.detail,
        )
    }

    fn render_machine(&self) -> String {
        let escaped = self.detail.replace('\\', "\\\\").replace(':', "\\:").replace('\n', "\\n");
        format!("{}:{}:{}", self.kind.tag(), self.line, escaped)
    }

    pub fn render(&self, mode: LogMode) -> Option<String> {
        match mode {
            LogMode::None => None,
            LogMode::Human => Some(self.render_human()),
            LogMode::Machine => Some(self.render_machine()),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_human())
    }
}

/// Thin [`log::Log`] implementation: the heavy per-mode formatting already
/// happened at the `Event::render` call site (or in an ordinary
/// `log::info!`-style call), so this just writes to stderr.
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs [`Logger`] as the global `log` backend. Call once from `main`.
pub fn install(max_level: Level) {
    let _ = log::set_boxed_logger(Box::new(Logger)).map(|()| log::set_max_level(max_level.to_level_filter()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_rendering_includes_line_and_tag() {
        let event = Event::new(EventKind::BlockOpen, 3, "if (x > 0)");
        let rendered = event.render(LogMode::Human).unwrap();
        assert!(rendered.contains("BLOCK_OPEN"));
        assert!(rendered.contains("line 3"));
        assert!(rendered.contains("if (x > 0)"));
    }

    #[test]
    fn machine_rendering_escapes_colons_and_newlines() {
        let event = Event::new(EventKind::Emit, 1, "a:b\nc");
        let rendered = event.render(LogMode::Machine).unwrap();
        assert_eq!(rendered, "EMIT:1:a\\:b\\nc");
    }

    #[test]
    fn none_mode_renders_nothing() {
        let event = Event::new(EventKind::Stmt, 1, "x");
        assert!(event.render(LogMode::None).is_none());
    }
}

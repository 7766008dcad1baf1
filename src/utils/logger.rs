use crossterm::style::{Attribute, Color, Stylize};
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    fn color(self) -> Color {
        match self {
            Level::Debug => Color::Cyan,
            Level::Info => Color::White,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
        }
    }
}

/// Sink for log lines. Handed by reference to everything that reports progress.
pub trait Log {
    fn log(&self, level: Level, msg: &str);

    fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.log(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.log(Level::Warning, msg);
    }

    fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }
}

fn append_line(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", line);
    }
}

/// Colored stderr logger with an optional plain-text copy in a file.
pub struct ConsoleLogger {
    min_level: Level,
    file: Option<PathBuf>,
}

impl ConsoleLogger {
    pub fn new(min_level: Level, file: Option<PathBuf>) -> Self {
        if let Some(path) = &file {
            append_line(
                path,
                &format!("=== {} log started: {} ===", crate::shared::constants::APP_NAME, chrono::Local::now()),
            );
        }
        Self { min_level, file }
    }
}

impl Log for ConsoleLogger {
    fn log(&self, level: Level, msg: &str) {
        if level < self.min_level {
            return;
        }

        let now = chrono::Local::now();
        let line = format!(
            "{} [{}] {}: {}",
            now.format("%H:%M:%S"),
            crate::shared::constants::APP_NAME,
            level.label(),
            msg
        );

        let styled = line.as_str().with(level.color());
        if level == Level::Error {
            eprintln!("{}", styled.attribute(Attribute::Bold));
        } else {
            eprintln!("{}", styled);
        }

        if let Some(path) = &self.file {
            append_line(
                path,
                &format!("{} [{}] {}", now.format("%Y-%m-%d %H:%M:%S%.3f"), level.label(), msg),
            );
        }
    }
}

/// Records panics (location, message, backtrace) before the process dies.
pub fn install_panic_hook(log_file: Option<PathBuf>) {
    panic::set_hook(Box::new(move |info| {
        let backtrace = Backtrace::capture();
        let msg = match info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &s[..],
                None => "Box<Any>",
            },
        };

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());

        let error_msg = format!(
            "\nCRITICAL PANIC at {}:\nMessage: {}\nBacktrace:\n{:?}\n",
            location, msg, backtrace
        );

        match &log_file {
            Some(path) => {
                append_line(path, &error_msg);
                eprintln!("Application crashed. See {} for details.", path.display());
            }
            None => eprintln!("{}", error_msg),
        }
    }));
}

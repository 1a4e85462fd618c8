use std::fmt;
use std::io;

use owo_colors::{OwoColorize, Stream};

use crate::board::{ParseError, SerializeError};
use crate::settings::SettingsError;

/// Application error with context for single-line error reports.
#[derive(Debug)]
pub enum AppError {
    /// Wrong arguments; carries the usage text to show
    Usage(String),
    /// Input path does not exist
    InputNotFound(String),
    /// The board has no images; nothing was written
    EmptyBoard,
    /// IO error with context
    Io { context: String, source: io::Error },
    /// Input could not be decoded
    Parse {
        file_path: String,
        source: ParseError,
    },
    /// Board could not be encoded
    Serialize {
        file_path: String,
        source: SerializeError,
    },
    /// Settings file could not be loaded
    Settings {
        path: String,
        source: SettingsError,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Usage(usage) => write!(f, "{}", usage.trim_end()),
            AppError::InputNotFound(path) => write!(f, "Input file '{}' not found", path),
            AppError::EmptyBoard => write!(f, "No images found in PureRef file"),
            AppError::Io { context, source } => write!(f, "{}: {}", context, source),
            AppError::Parse { file_path, source } => {
                write!(f, "failed to read board {}: {}", file_path, source)
            }
            AppError::Serialize { file_path, source } => {
                write!(f, "failed to encode board for {}: {}", file_path, source)
            }
            AppError::Settings { path, source } => write!(f, "{}: {}", path, source),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Stream the report is printed on.
    ///
    /// Only clap's usage text goes to stderr. Every other report, `Error:`
    /// lines included, goes to stdout so callers reading stdout see it.
    pub fn stream(&self) -> Stream {
        match self {
            AppError::Usage(_) => Stream::Stderr,
            _ => Stream::Stdout,
        }
    }

    /// The full line shown to the user, with an `Error:` prefix where one applies.
    ///
    /// The prefix is colored only when `stream` is a terminal.
    pub fn report(&self, stream: Stream) -> String {
        match self {
            AppError::Usage(_) | AppError::EmptyBoard => self.to_string(),
            _ => format!(
                "{}: {}",
                "Error".if_supports_color(stream, |t| t.red().bold().to_string()),
                self
            ),
        }
    }
}

/// Extension trait to add file path context to parse results.
pub trait ParseResultExt<T> {
    fn with_path(self, path: &str) -> Result<T, AppError>;
}

impl<T> ParseResultExt<T> for Result<T, ParseError> {
    fn with_path(self, path: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Parse {
            file_path: path.to_string(),
            source: e,
        })
    }
}

/// Extension trait to add output path context to serialize results.
pub trait SerializeResultExt<T> {
    fn with_path(self, path: &str) -> Result<T, AppError>;
}

impl<T> SerializeResultExt<T> for Result<T, SerializeError> {
    fn with_path(self, path: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Serialize {
            file_path: path.to_string(),
            source: e,
        })
    }
}

/// Extension trait to add the settings path to settings results.
pub trait SettingsResultExt<T> {
    fn with_path(self, path: &str) -> Result<T, AppError>;
}

impl<T> SettingsResultExt<T> for Result<T, SettingsError> {
    fn with_path(self, path: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Settings {
            path: path.to_string(),
            source: e,
        })
    }
}

/// Extension trait to add context to IO results.
pub trait IoResultExt<T> {
    fn with_context(self, context: &str) -> Result<T, AppError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn with_context(self, context: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Io {
            context: context.to_string(),
            source: e,
        })
    }
}

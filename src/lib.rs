pub mod board;
pub mod commands;
pub mod error_fmt;
pub mod grid;
pub mod settings;

// Re-export commonly used types for convenience
pub use board::{
    Board, BoardReader, BoardWriter, ImageElement, ParseError, PurCodec, SerializeError,
};
pub use error_fmt::AppError;
pub use grid::{GridLayout, GridSummary, reorganize};
pub use settings::{Settings, SettingsError};

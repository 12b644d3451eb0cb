use std::path::PathBuf;

/// Contract violations raised by the board engine.
///
/// None of these occur during normal play if the caller pre-checks
/// `is_column_available` / `is_computer_turn`; they indicate an illegal
/// argument or an operation invoked outside its preconditions. A failed call
/// never leaves the engine partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("board must be at least 7x6, got {columns}x{rows}")]
    InvalidDimension { columns: usize, rows: usize },

    #[error("an empty chip cannot be played")]
    InvalidChip,

    #[error("column {column} is outside 0..{columns}")]
    OutOfRange { column: usize, columns: usize },

    #[error("column {column} is completely filled")]
    ColumnFull { column: usize },

    #[error("the opponent is not a computer or it is not the computer's turn")]
    NotComputerTurn,
}

/// Errors that can occur when loading or saving persisted settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

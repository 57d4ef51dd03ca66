use thiserror::Error;

/// Failures surfaced by the loaders and the configuration layer.
///
/// The genome operators themselves are infallible; only file I/O, text
/// parsing and config validation report errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed genome on line {line}: {reason}")]
    ParseGenome { line: usize, reason: String },

    #[error("Malformed scene on line {line}: {reason}")]
    ParseScene { line: usize, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

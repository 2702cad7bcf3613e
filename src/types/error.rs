use derive_more::{Display, From};

/// Request-level and I/O-level export failures.
///
/// Malformed section content is not represented here: formatters recover
/// locally and render the section empty.
#[derive(Debug, Display, From)]
pub enum Error {
    #[from]
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
    #[display("section \"{_0}\" not found")]
    SectionNotFound(String),
    #[display("unsupported export format: {_0}")]
    UnsupportedFormat(String),
    #[display("no output path given and the project has no default export directory")]
    MissingOutputPath,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use std::error;
use std::fmt;
use std::io;
use std::path::Path;

use nom::{Err, error::ErrorKind};

#[derive(PartialEq, Eq, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    ParseError(String),
    InputError(String),
    OutputError(String),
}

impl Error {
    /// Describe a failure to read the trace dump at `path`.
    pub(crate) fn input(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => {
                Error::InputError(format!("File not found at '{}'", path.display()))
            }
            _ => Error::InputError(format!("Could not read '{}': {err}", path.display())),
        }
    }

    /// Describe a failure to write the report back to `path`.
    pub(crate) fn output(path: &Path, err: &io::Error) -> Self {
        Error::OutputError(format!(
            "Could not write to file '{}': {err}",
            path.display()
        ))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseError(s) | Error::InputError(s) | Error::OutputError(s) => {
                write!(f, "{s}")
            }
        }
    }
}

impl error::Error for Error {}

impl From<nom::error::Error<&str>> for Error {
    fn from(err: nom::error::Error<&str>) -> Self {
        Error::ParseError(format!("Parsing error: {err:?}"))
    }
}

impl From<Err<nom::error::Error<&str>>> for Error {
    fn from(err: Err<nom::error::Error<&str>>) -> Self {
        Error::ParseError(format!("Parsing error: {err:?}"))
    }
}

impl From<(&'_ str, ErrorKind)> for Error {
    fn from(err: (&str, ErrorKind)) -> Self {
        let string = format!("Parsing error: {:?}\n {:?}", err.1, err.0);
        Error::ParseError(string)
    }
}

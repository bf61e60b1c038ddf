//
// Errors
//
use std::io;
use std::result;
use std::error;
use std::fmt;

/// Type alias for tinytawc errors
pub type Result<X> = result::Result<X, Error>;

/// Wrapper for the kinds of errors that can stop a counting run
///
/// Everything here is fatal. Classifying a word never fails; a word that matches no rule simply
/// counts toward nothing but the total.
#[derive(Debug)]
pub enum Error {
    /// A dictionary line could not be compiled into a rule
    Load {
        line: usize,
        text: String,
        reason: String,
    },
    /// Bad configuration, caught before the dictionary is read
    Config(String),
    IOError(io::Error),
    Other(String),
}

impl Error {
    pub fn load<T: Into<String>, R: Into<String>>(line: usize, text: T, reason: R) -> Self {
        Error::Load {
            line: line,
            text: text.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Load { line, ref text, ref reason } => {
                write!(f, "Dictionary line {} could not be loaded ({}): {:?}", line, reason, text)
            }
            Error::Config(ref info) => write!(f, "Invalid configuration: {}", info),
            Error::IOError(ref err) => write!(f, "IO error: {}", err),
            Error::Other(ref info) => write!(f, "{}", info),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Load { .. } => None,
            Error::Config(_) => None,
            Error::IOError(ref err) => Some(err),
            Error::Other(_) => None,
        }
    }
}

//
// Convert everything else into Error
//
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IOError(err)
    }
}

//
// Convert Error into a general io Error
//
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

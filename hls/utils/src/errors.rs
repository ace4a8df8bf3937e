//! Errors generated by the compiler.
use crate::Id;
use thiserror::Error as ThisError;

/// Convinience wrapper to represent success or meaningul compiler error.
pub type HlsResult<T> = std::result::Result<T, Error>;

/// Errors generated by the compiler
#[derive(Clone)]
pub struct Error {
    kind: Box<ErrorKind>,
    post_msg: Option<String>,
}

/// Standard error type for HLS errors.
#[derive(ThisError, Clone, Debug)]
pub enum ErrorKind {
    /// The IR violates a structural invariant.
    #[error("Malformed Structure: {0}")]
    MalformedStructure(String),
    /// A name or index that was never defined.
    #[error("Undefined {kind} name: {name}")]
    Undefined { name: Id, kind: String },
    /// The name has already been bound.
    #[error("Name `{name}' already bound by {bound_by}")]
    AlreadyBound { name: Id, bound_by: String },
    /// A pass assumption was violated by its input.
    #[error("Pass `{pass}` assumption violated: {msg}")]
    PassAssumption { pass: String, msg: String },
    /// Channel resolution entered a recursive call cycle.
    #[error("Channel `{channel}' flows through a recursive call cycle: {msg}")]
    RecursiveChannel { channel: String, msg: String },
    /// The input file is invalid (does not exist or cannot be parsed).
    #[error("Invalid file: {0}")]
    InvalidFile(String),
    /// Failed to write the output
    #[error("Failed to write output: {0}")]
    WriteError(String),
    /// Miscellaneous error message
    #[error("{0}")]
    Misc(String),
}

impl Error {
    pub fn malformed_structure<S: ToString>(msg: S) -> Self {
        Self::from_kind(ErrorKind::MalformedStructure(msg.to_string()))
    }

    pub fn undefined<S: ToString>(name: Id, kind: S) -> Self {
        Self::from_kind(ErrorKind::Undefined {
            name,
            kind: kind.to_string(),
        })
    }

    pub fn already_bound<S: ToString>(name: Id, bound_by: S) -> Self {
        Self::from_kind(ErrorKind::AlreadyBound {
            name,
            bound_by: bound_by.to_string(),
        })
    }

    pub fn pass_assumption<S: ToString, M: ToString>(pass: S, msg: M) -> Self {
        Self::from_kind(ErrorKind::PassAssumption {
            pass: pass.to_string(),
            msg: msg.to_string(),
        })
    }

    pub fn recursive_channel<S: ToString, M: ToString>(
        channel: S,
        msg: M,
    ) -> Self {
        Self::from_kind(ErrorKind::RecursiveChannel {
            channel: channel.to_string(),
            msg: msg.to_string(),
        })
    }

    pub fn invalid_file<S: ToString>(msg: S) -> Self {
        Self::from_kind(ErrorKind::InvalidFile(msg.to_string()))
    }

    pub fn write_error<S: ToString>(msg: S) -> Self {
        Self::from_kind(ErrorKind::WriteError(msg.to_string()))
    }

    pub fn misc<S: ToString>(msg: S) -> Self {
        Self::from_kind(ErrorKind::Misc(msg.to_string()))
    }

    fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            post_msg: None,
        }
    }

    /// Attach a message that is printed after the error.
    pub fn with_post_msg(mut self, msg: Option<String>) -> Self {
        self.post_msg = msg;
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(post) = &self.post_msg {
            write!(f, "\n{post}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::write_error(format!("IO Error: {e}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::invalid_file(format!("JSON Error: {e}"))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::write_error(e.to_string())
    }
}

/// A collection of errors reported together, usually by a diagnostic pass.
#[derive(Clone, Default)]
pub struct MultiError {
    errors: Vec<Error>,
}

impl MultiError {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter()
    }
}

impl From<Error> for MultiError {
    fn from(e: Error) -> Self {
        Self { errors: vec![e] }
    }
}

impl From<Vec<Error>> for MultiError {
    fn from(errors: Vec<Error>) -> Self {
        Self { errors }
    }
}

impl From<std::io::Error> for MultiError {
    fn from(e: std::io::Error) -> Self {
        Error::from(e).into()
    }
}

impl From<serde_json::Error> for MultiError {
    fn from(e: serde_json::Error) -> Self {
        Error::from(e).into()
    }
}

impl std::fmt::Display for MultiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MultiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for MultiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_msg_is_printed_after_kind() {
        let err = Error::malformed_structure("bad node")
            .with_post_msg(Some("in function `top'".to_string()));
        assert_eq!(
            err.to_string(),
            "Malformed Structure: bad node\nin function `top'"
        );
    }

    #[test]
    fn multi_error_joins_lines() {
        let errs: MultiError =
            vec![Error::misc("first"), Error::misc("second")].into();
        assert_eq!(errs.len(), 2);
        assert_eq!(errs.to_string(), "first\nsecond");
    }

    #[test]
    fn undefined_names_kind() {
        let err = Error::undefined(Id::from("foo"), "function");
        assert!(matches!(err.kind(), ErrorKind::Undefined { .. }));
        assert_eq!(err.message(), "Undefined function name: foo");
    }
}

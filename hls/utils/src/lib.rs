//! Shared utilities for the HLS compiler.
mod errors;
mod id;
mod out_file;

pub use errors::{Error, ErrorKind, HlsResult, MultiError};
pub use id::{GSym, GetName, Id};
pub use out_file::OutputFile;

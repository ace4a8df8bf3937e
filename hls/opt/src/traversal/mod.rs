//! Traits implemented by passes.
mod diagnostics;
mod pass;

pub use diagnostics::{DiagnosticPass, Diagnostics};
pub use pass::{ConstructPass, Named, Pass};

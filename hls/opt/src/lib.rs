//! Analyses and passes over the HLS IR.
//!
//! Passes are registered with a [pass_manager::PassManager] which runs them
//! in the order requested on the command line. Diagnostic passes accumulate
//! every problem they find before failing so that a single run reports all
//! structural violations of a program.
pub mod analysis;
pub mod default_passes;
pub mod pass_manager;
pub mod passes;
pub mod traversal;

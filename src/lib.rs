//! # The HLS IR driver
//!
//! This crate plumbs together the HLS IR crates and provides a command-line
//! interface that loads a program, runs passes over it and reports the
//! resolved stream channel topology.
//! Depend on [`hls_ir`] and [`hls_opt`] directly to use the IR as a library.
pub mod cmdline;
pub mod driver;
pub mod report;

//! Per-module diagnostic reporting.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels
//! and error codes. The thread-safe [`DiagnosticSink`] accumulates diagnostics
//! while modules are processed, and [`DiagnosticRenderer`] implementations
//! format them for the terminal or as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;

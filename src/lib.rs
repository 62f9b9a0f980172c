//! Core library for the tpu-tools command line application.
//!
//! The library consolidates the CNJ class sheets (HTML tables saved as `.xls`)
//! into a single JSON collection. IO adapters live under [`tpu::tools::io`],
//! record types inside [`tpu::tools::model`], header inference in
//! [`tpu::tools::schema`], per-sheet extraction in [`tpu::tools::extract`], and
//! the directory-level orchestration under [`tpu::tools::consolidate`].

pub mod tpu;

pub use tpu::tools::{Result, ToolError, consolidate, error, extract, io, model, schema};

//! Core library for the producao-tools command line application.
//!
//! The library aggregates the productivity indicators recorded in one
//! workbook per research group into a consolidated report. IO adapters live
//! under [`io`], data representations inside [`model`], the per-table
//! summation in [`aggregate`], the multi-table merge in [`batch`], the sheet
//! layouts in [`report`], and the end-to-end orchestration under [`sync`].

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod report;
pub mod source;
pub mod sync;

pub use error::{Result, ToolError};

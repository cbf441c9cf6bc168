//! Nivasa library - rolling capture buffer that keeps the most recent snaps.
//!
//! This library exposes the core functionality of the `nivasa` CLI for use in
//! tests and potentially other applications.
//!
//! # Modules
//!
//! - `gallery`: Fixed-capacity rolling buffer and its observable store
//! - `session`: Capture coordination between camera, storage, and gallery
//! - `camera`: Camera abstraction with synthetic and mock implementations
//! - `storage`: Output directory selection and snap file naming
//! - `share`: Multi-image share requests
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
//! - `config`: Configuration file handling
#![forbid(unsafe_code)]

pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod gallery;
pub mod image_ops;
pub mod logging;
pub mod output;
pub mod session;
pub mod share;
pub mod snap;
pub mod storage;
pub mod theme;

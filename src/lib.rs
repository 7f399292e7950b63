//! makeip - Dreamcast IP.BIN bootstrap builder
//!
//! This crate validates and writes the bootstrap meta header, keeps its
//! checksum current, converts boot logos to the MR format and inspects
//! existing bootstrap images.

#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod api;
pub mod exceptions;
pub mod exit_codes;
pub mod ip;
pub mod logger;
pub mod mr;
pub mod utils;
pub mod version;

// Re-export main API functions
pub use api::{BuildOptions, build_bootstrap, export_logo, inspect_bootstrap_file};
pub use exceptions::{MakeipError, Result};
pub use ip::{Bootstrap, BootstrapBuilder, BootstrapInfo, FieldKind, FieldRegistry};
pub use mr::MrLogo;

//! Test helpers for the preview pipeline
//!
//! This crate provides common utilities for tests: small but well-formed FITS
//! files with a chosen extension header, and a tracing layer that records log
//! events so tests can assert on what was reported.

pub mod fits_fixture;
pub mod log_capture;

pub use fits_fixture::{ExtensionKind, ExtensionSpec, FitsFixture};
pub use log_capture::{CapturedEvent, LogCapture};

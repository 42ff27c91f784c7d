//! In-memory workbooks and the builders that fill them.
//!
//! Builders are pure: same input, same sheets. Writing to disk lives in
//! `export`.

pub mod book;
pub mod fusion;
pub mod kimai;

pub use book::{Cell, ReportBook, Sheet};

//! hexgen-compiler
//!
//! This crate implements:
//!  1) Extraction of print event field descriptors from the C label arrays,
//!  2) A reader for the fixed-stride text event table,
//!  3) Extraction of typed global preferences from the preference table,
//!  4) Code generation of `print_event!` and `pref!` lines (`compile_events`, `compile_prefs`),
//!  5) Rewriting of raw `unsafe fn` vtable declarations into forwarding wrappers,
//!  6) Error types (`GenError`), generator settings and atomic output writing.

pub mod error;
pub mod types;
pub mod config;
pub mod utils;
pub mod descriptors;
pub mod event_specs;
pub mod prefs;
pub mod signatures;
pub mod compiler;
pub mod gen_rust;
pub mod output;
pub mod traits;

pub use compiler::compile_events;
pub use compiler::compile_prefs;
pub use compiler::rewrite_signatures;
pub use config::GeneratorConfig;
pub use error::GenError;
pub use output::{check_output, write_output};

//! Command-line front end for Kringle.
//!
//! The binary in `main.rs` is a thin shell over these modules: settings
//! loading, the async generate pipeline and output writing.

pub mod output;
pub mod pipeline;
pub mod settings;

pub use settings::Settings;

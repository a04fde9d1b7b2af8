//! Core types and the assignment engine for Kringle.
//!
//! This crate knows nothing about files, encryption or the command line. It
//! holds the participant roster, the partner exclusion index and the
//! rejection-sampling derangement engine; every other crate builds on it.

pub mod assignment;
pub mod derangement;
pub mod error;
pub mod exclusion;
pub mod participant;
pub mod sample;

pub use error::{Error, Result};

//! Error types for ApexCoach
//!
//! The analysis core (channel resolution, reshaping, segmentation, feature
//! extraction, comparison and coaching) is total: missing channels, empty
//! selections and out-of-range corners degrade to zeros or empty collections.
//! Errors only exist at the edges of the system, where datasets and
//! configuration are read and user input is validated.
//!
//! # Architecture
//!
//! - [`dataset`]: Dataset loading errors (missing files, malformed rows)
//! - [`validation`]: Input and configuration validation errors
//!
//! # Example
//!
//! ```
//! use apexcoach_errors::ValidationError;
//!
//! fn check_threshold(value: f64) -> Result<f64, ValidationError> {
//!     if !(0.0..=100.0).contains(&value) {
//!         return Err(ValidationError::out_of_range(
//!             "throttle_threshold",
//!             value,
//!             0.0,
//!             100.0,
//!         ));
//!     }
//!     Ok(value)
//! }
//!
//! assert!(matches!(check_threshold(150.0), Err(ValidationError::OutOfRange { .. })));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod dataset;
pub mod validation;

pub use dataset::DatasetError;
pub use validation::ValidationError;

//! # qfmatch-types
//!
//! Shared types, errors, and configuration for the **qfmatch** Quadratic
//! Funding engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Amounts**: [`Amount`] (arbitrary-precision fixed-point) and unit conversion
//! - **Identifiers**: [`RecipientId`], [`ContributorId`]
//! - **Input**: [`Contribution`]
//! - **Output**: [`Calculation`], [`RecipientsCalculations`], [`SaturationMode`],
//!   [`RoundSummary`], [`RoundOutcome`]
//! - **Configuration**: [`LinearQfOptions`], [`RoundConfig`]
//! - **Errors**: [`QfError`] with `QF_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod amount;
pub mod calculation;
pub mod config;
pub mod constants;
pub mod contribution;
pub mod error;
#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use qfmatch_types::{Contribution, Calculation, LinearQfOptions, ...};

pub use amount::{Amount, scale_factor, to_decimal, to_units};
pub use calculation::*;
pub use config::*;
pub use contribution::*;
pub use error::*;
pub use ids::*;

// Constants are accessed via `qfmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).

//! # qfmatch-matchcore
//!
//! **Pure deterministic Quadratic Funding matching engine.**
//!
//! MatchCore takes an in-memory batch of contributions and a matching pool
//! and returns how much of the pool each recipient receives. It has:
//!
//! - **Exact arithmetic**: arbitrary-precision integers, no floating point
//! - **Deterministic output**: same input -> same output, regardless of input order
//! - **Bounded rounding**: every division floors; leftover dust is reported
//! - **Zero side effects**: no I/O, no state between calls
//!
//! Pipeline: aggregation -> raw QF weights -> saturation -> cap redistribution.

pub mod aggregation;
pub mod cap;
pub mod determinism;
pub mod engine;
pub mod isqrt;
pub mod linear;
pub mod observer;

pub use aggregation::{AggregatedRecipient, Aggregation, aggregate_contributions};
pub use cap::{CapReport, apply_cap};
pub use determinism::{compute_result_root, summarize, verify_result_root};
pub use engine::{MatchWeights, apply_saturation, compute_weights, saturation_mode};
pub use isqrt::floor_sqrt;
pub use linear::{linear_qf, linear_qf_observed, run_round};
pub use observer::{CapPass, MatchObserver, NoopObserver, TracingObserver};

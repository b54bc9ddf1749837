//! System-wide constants for the qfmatch engine.

/// Default fixed-point precision (stablecoin-style 6 decimal places).
pub const DEFAULT_DECIMALS_PRECISION: u32 = 6;

/// Upper bound on `decimals_precision`.
///
/// Matches the widest token precision seen in practice (18) with room to
/// spare, and keeps the rounding scale factor a reasonable size.
pub const MAX_DECIMALS_PRECISION: u32 = 36;

/// Largest scale `rust_decimal::Decimal` can represent.
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// Domain separator for the calculation result root.
pub const RESULT_ROOT_DOMAIN: &[u8] = b"qfmatch:result_root:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "qfmatch";

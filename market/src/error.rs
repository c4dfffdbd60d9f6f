use thiserror::Error;

/// Precondition failures of the cost engine.
///
/// Every variant is local to one tick: the caller skips that tick and keeps
/// whatever it displayed last.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImpactError {
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("insufficient liquidity: total book size is {0}")]
    InsufficientLiquidity(f64),

    #[error("invalid quantity: {0} (must be a positive finite number)")]
    InvalidQuantity(f64),
}

pub type Result<T> = std::result::Result<T, ImpactError>;

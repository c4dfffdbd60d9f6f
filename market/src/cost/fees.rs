use crate::types::FeeTier;

pub const TIER1_RATE: f64 = 0.001;
pub const TIER2_RATE: f64 = 0.0008;
pub const TIER3_RATE: f64 = 0.0006;

/// Fee rate charged on notional for a tier. Unknown tiers pay the Tier1 rate.
pub fn fee_rate(tier: &FeeTier) -> f64 {
    match tier {
        FeeTier::Tier1 => TIER1_RATE,
        FeeTier::Tier2 => TIER2_RATE,
        FeeTier::Tier3 => TIER3_RATE,
        FeeTier::Unrecognized(_) => TIER1_RATE,
    }
}

/// Absolute fee for an order of `quantity` notional.
pub fn fees(quantity: f64, tier: &FeeTier) -> f64 {
    quantity * fee_rate(tier)
}

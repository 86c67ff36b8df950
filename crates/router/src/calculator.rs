//! Constant-product swap math
//!
//! Output formula with fee in basis points:
//! `out = (reserve_out * in * (10000 - fee)) / (reserve_in * 10000 + in * (10000 - fee))`
//! with integer division truncating toward zero.

use num_bigint::BigInt;

use voiswap_core::constants::BPS_DENOM;

/// Calculate swap output using the constant product formula.
///
/// Returns 0 for non-positive inputs, empty reserves, or a fee at or above
/// 100%.
pub fn compute_output(reserve_in: u64, reserve_out: u64, amount_in: u64, fee_bps: u32) -> u64 {
    if reserve_in == 0 || reserve_out == 0 || amount_in == 0 || fee_bps as u64 >= BPS_DENOM {
        return 0;
    }

    let fee_factor = BigInt::from(BPS_DENOM - fee_bps as u64);
    let numerator = BigInt::from(reserve_out) * BigInt::from(amount_in) * &fee_factor;
    let denominator =
        BigInt::from(reserve_in) * BigInt::from(BPS_DENOM) + BigInt::from(amount_in) * fee_factor;

    (numerator / denominator).try_into().unwrap_or(0)
}

/// Spot price (reserve_out / reserve_in)
pub fn spot_price(reserve_in: u64, reserve_out: u64) -> f64 {
    if reserve_in == 0 {
        return 0.0;
    }
    reserve_out as f64 / reserve_in as f64
}

/// Price impact: relative movement of the spot price caused by the trade.
///
/// Returns 0 when inputs are non-positive or the trade would leave a reserve
/// non-positive.
pub fn price_impact(reserve_in: u64, reserve_out: u64, amount_in: u64, amount_out: u64) -> f64 {
    if amount_in == 0 || reserve_in == 0 || reserve_out == 0 {
        return 0.0;
    }
    if amount_out >= reserve_out {
        return 0.0;
    }

    let before = spot_price(reserve_in, reserve_out);
    let after = spot_price(reserve_in.saturating_add(amount_in), reserve_out - amount_out);
    if before == 0.0 {
        return 0.0;
    }
    ((after - before) / before).abs()
}

/// Minimum acceptable output after slippage tolerance, in integer units:
/// `out * floor((1 - slippage) * 10000) / 10000`.
pub fn min_out_with_slippage(amount_out: u64, slippage: f64) -> u64 {
    let slippage = slippage.clamp(0.0, 1.0);
    let factor = ((1.0 - slippage) * BPS_DENOM as f64).floor() as u64;
    (amount_out as u128 * factor as u128 / BPS_DENOM as u128) as u64
}

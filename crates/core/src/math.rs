use alloy::primitives::U256;
use rust_decimal::Decimal;

/// `ceil(amount * rate)` computed exactly from the decimal's mantissa and
/// scale. Negative rates count as zero; results past `u128::MAX` saturate.
pub fn ceil_mul(amount: u128, rate: Decimal) -> u128 {
    if rate.is_sign_negative() || rate.is_zero() {
        return 0;
    }

    let numerator = U256::from(amount) * U256::from(rate.mantissa().unsigned_abs());
    let denominator = U256::from(10u128.pow(rate.scale()));

    let quotient = numerator / denominator;
    let quotient = if (numerator % denominator).is_zero() {
        quotient
    } else {
        quotient + U256::from(1u8)
    };

    u128::try_from(quotient).unwrap_or(u128::MAX)
}

/// Smallest step a bid may move by: the percentage increment of `amount`,
/// rounded up, and never less than one base unit.
pub fn min_increment(amount: u128, rate: Decimal) -> u128 {
    ceil_mul(amount, rate).max(1)
}

/// Floors each pro rata share of `total` and credits the rounding remainder to
/// index 0. An all-zero weight list yields nothing but the remainder.
pub fn split_weighted(total: u128, weights: &[u128]) -> Vec<u128> {
    if weights.is_empty() {
        return Vec::new();
    }

    let total_weight = weights
        .iter()
        .fold(U256::ZERO, |acc, weight| acc + U256::from(*weight));

    let mut shares: Vec<u128> = if total_weight.is_zero() {
        vec![0; weights.len()]
    } else {
        weights
            .iter()
            .map(|weight| {
                let share = U256::from(total) * U256::from(*weight) / total_weight;
                // share <= total, always fits
                u128::try_from(share).unwrap_or(total)
            })
            .collect()
    };

    let distributed: u128 = shares.iter().sum();
    shares[0] += total - distributed;
    shares
}

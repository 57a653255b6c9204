//! Fixed-point math utilities for deterministic simulation.
//!
//! All fractional game math (multipliers, growth rates, grant
//! amounts) uses fixed-point arithmetic to ensure deterministic
//! behavior across platforms. Floating-point operations can produce
//! different results on different CPUs.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Serde support for `Option<Fixed>`.
///
/// Serializes optional fixed-point numbers via their raw bit representation,
/// preserving `None` as a serialized `None` value.
pub mod option_fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize an optional fixed-point number.
    pub fn serialize<S>(value: &Option<Fixed>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => v.to_bits().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional fixed-point number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Fixed>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<i64>::deserialize(deserializer)?;
        Ok(opt.map(Fixed::from_bits))
    }
}

/// Coerce a fixed-point amount to a non-negative whole number.
///
/// Returns `None` if the amount floors to zero or below. This is the
/// single coercion rule for all resource-grant amounts.
#[must_use]
pub fn coerce_amount(amount: Fixed) -> Option<u64> {
    let floored: i64 = amount.floor().to_num();
    if floored <= 0 {
        None
    } else {
        Some(floored as u64)
    }
}

/// Scale an integer quantity by a fixed-point multiplier, flooring.
///
/// Saturates at `u64::MAX` rather than wrapping.
#[must_use]
pub fn scale_u64(value: u64, multiplier: Fixed) -> u64 {
    if multiplier <= Fixed::ZERO {
        return 0;
    }
    // Split into whole and fractional parts so large values can't
    // overflow the 32-bit integer half of the fixed-point type. The
    // fractional contribution is computed in integer space: the frac
    // bits are in [0, 2^32), so value * bits / 2^32 fits in u128 and
    // floors back into u64.
    let whole: u64 = multiplier.int().to_num::<i64>() as u64;
    let frac_bits = u128::from(multiplier.frac().to_bits() as u64);

    let whole_part = value.saturating_mul(whole);
    let frac_part = ((u128::from(value) * frac_bits) >> 32) as u64;

    whole_part.saturating_add(frac_part)
}

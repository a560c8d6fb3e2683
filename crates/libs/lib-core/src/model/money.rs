//! # Money
//!
//! Amounts cross the API as [`Decimal`] and are stored as `i64` minor units with
//! [`SCALE`] fractional digits, so balance arithmetic in SQL stays exact.

use crate::error::{AppError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Number of fractional digits kept in storage.
pub const SCALE: u32 = 8;

/// Minor units per whole unit (10^SCALE).
pub const MINOR_PER_UNIT: i64 = 100_000_000;

/// Starting balance of every provisioned wallet.
pub const DEFAULT_BALANCE: Decimal = dec!(100);

/// Fraction of each transfer withheld as commission.
pub const COMMISSION_RATE: Decimal = dec!(0.01);

/// Convert an amount to minor units.
///
/// Fails with `InvalidRequest` when the amount has more than [`SCALE`] fractional digits
/// or does not fit in `i64` minor units.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    let normalized = amount.normalize();
    if normalized.scale() > SCALE {
        return Err(AppError::InvalidRequest(format!(
            "amount supports at most {} decimal places",
            SCALE
        )));
    }

    normalized
        .checked_mul(Decimal::from(MINOR_PER_UNIT))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| AppError::InvalidRequest("amount is out of range".to_string()))
}

/// Convert a transfer amount to minor units, requiring it to be strictly positive.
pub fn transfer_amount_minor(amount: Decimal) -> Result<i64> {
    let minor = to_minor_units(amount)?;
    if minor <= 0 {
        return Err(AppError::InvalidRequest(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(minor)
}

/// Convert stored minor units back to a decimal amount.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, SCALE).normalize()
}

/// Commission in minor units for a transfer of `amount_minor`, rounded down.
pub fn commission_minor(amount_minor: i64, rate: Decimal) -> Result<i64> {
    Decimal::from(amount_minor)
        .checked_mul(rate)
        .map(|c| c.floor())
        .and_then(|c| c.to_i64())
        .ok_or_else(|| AppError::Internal("commission overflow".to_string()))
}

/// Default wallet balance in minor units.
pub fn default_balance_minor() -> Result<i64> {
    to_minor_units(DEFAULT_BALANCE)
}

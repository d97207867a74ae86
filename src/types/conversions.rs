// src/types/conversions.rs
// Exact scaling between base and display denominations

use rust_decimal::Decimal;
use std::str::FromStr;

use super::assets::{AssetInfo, Coin};

/// Scales a base-denom amount string down by `exponent` decimal places.
///
/// Chain amounts arrive as integer strings in the minimal denom; the display
/// value is `amount * 10^-exponent`, computed exactly.
pub fn base_to_display(amount: &str, exponent: u32) -> Result<Decimal, ConversionError> {
    let value = Decimal::from_str(amount.trim())
        .map_err(|e| ConversionError::InvalidAmount(format!("{}: {}", amount, e)))?;
    let factor =
        Decimal::try_new(1, exponent).map_err(|_| ConversionError::ExponentOutOfRange(exponent))?;
    Ok(value * factor)
}

/// Scales a bank balance into its display denomination using the asset's
/// denom unit table.
pub fn display_amount(coin: &Coin, asset: &AssetInfo) -> Result<Decimal, ConversionError> {
    let exponent = asset
        .display_exponent()
        .ok_or_else(|| ConversionError::MissingDisplayUnit(asset.display.clone()))?;
    base_to_display(&coin.amount, exponent)
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("No denom unit matches display denom '{0}'")]
    MissingDisplayUnit(String),
    #[error("Exponent {0} exceeds supported precision")]
    ExponentOutOfRange(u32),
}

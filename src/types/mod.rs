// Shared domain types for the Interchain Query SDK
// Coins, asset metadata and display-denomination conversions

pub mod assets;
pub mod conversions;

pub use assets::{AssetInfo, Coin, DenomUnit};
pub use conversions::{base_to_display, display_amount, ConversionError};

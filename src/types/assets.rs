// src/types/assets.rs
// Coin amounts and asset list metadata as published by chain registries

use serde::{Deserialize, Serialize};

/// A single coin amount as returned by bank queries.
///
/// The amount stays a decimal string end to end. On-chain balances can exceed
/// `u64` and must never round-trip through floats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// One denomination unit of an asset, e.g. `uatom` at exponent 0 and `atom`
/// at exponent 6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomUnit {
    pub denom: String,
    #[serde(default)]
    pub exponent: u32,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Asset metadata needed to render balances: the base (minimal) denom, the
/// human-facing display denom, and the unit table linking the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub base: String,
    pub display: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub denom_units: Vec<DenomUnit>,
}

impl AssetInfo {
    /// Exponent of the display unit, i.e. the denom unit whose denom matches
    /// `display`. Returns `None` when the asset list omits that unit.
    pub fn display_exponent(&self) -> Option<u32> {
        self.denom_units
            .iter()
            .find(|unit| unit.denom == self.display)
            .map(|unit| unit.exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom() -> AssetInfo {
        AssetInfo {
            base: "uatom".to_string(),
            display: "atom".to_string(),
            symbol: Some("ATOM".to_string()),
            denom_units: vec![
                DenomUnit {
                    denom: "uatom".to_string(),
                    exponent: 0,
                    aliases: vec!["microatom".to_string()],
                },
                DenomUnit {
                    denom: "atom".to_string(),
                    exponent: 6,
                    aliases: vec![],
                },
            ],
        }
    }

    #[test]
    fn finds_display_exponent() {
        assert_eq!(atom().display_exponent(), Some(6));
    }

    #[test]
    fn missing_display_unit_yields_none() {
        let mut asset = atom();
        asset.denom_units.retain(|u| u.denom != "atom");
        assert_eq!(asset.display_exponent(), None);
    }

    #[test]
    fn coin_renders_amount_then_denom() {
        let coin = Coin::new("uatom", "1500000");
        assert_eq!(coin.to_string(), "1500000uatom");
    }
}

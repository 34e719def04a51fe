use std::collections::BTreeSet;
use std::fmt;

use super::model::RentTable;

// ---------------------------------------------------------------------------
// Fixed column names of the published sheet (after header normalization)
// ---------------------------------------------------------------------------

/// Postal-code identifier column.
pub const ZIP_COLUMN: &str = "ZIP Code";
/// Compound area name, e.g. `"Abilene, TX MSA"`.
pub const AREA_NAME_COLUMN: &str = "HUD Fair Market Rent Area Name";
/// Two-letter region code, derived at load time when the sheet lacks it.
pub const REGION_COLUMN: &str = "State";

// ---------------------------------------------------------------------------
// BedroomTier
// ---------------------------------------------------------------------------

/// Unit size, from efficiency (0BR) to 4BR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BedroomTier {
    Efficiency,
    One,
    #[default]
    Two,
    Three,
    Four,
}

impl BedroomTier {
    pub const ALL: [BedroomTier; 5] = [
        BedroomTier::Efficiency,
        BedroomTier::One,
        BedroomTier::Two,
        BedroomTier::Three,
        BedroomTier::Four,
    ];

    /// Tier for a bedroom count; `None` above 4.
    pub fn from_count(count: u8) -> Option<Self> {
        Self::ALL.get(usize::from(count)).copied()
    }

    /// Number of bedrooms (0 for efficiency).
    pub fn count(self) -> u8 {
        match self {
            BedroomTier::Efficiency => 0,
            BedroomTier::One => 1,
            BedroomTier::Two => 2,
            BedroomTier::Three => 3,
            BedroomTier::Four => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BedroomTier::Efficiency => "Efficiency (0BR)",
            BedroomTier::One => "1BR",
            BedroomTier::Two => "2BR (Standard)",
            BedroomTier::Three => "3BR",
            BedroomTier::Four => "4BR",
        }
    }
}

impl fmt::Display for BedroomTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RentTier
// ---------------------------------------------------------------------------

/// Which of the three published figures to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RentTier {
    #[default]
    Standard,
    Payment90,
    Payment110,
}

impl RentTier {
    pub const ALL: [RentTier; 3] = [RentTier::Standard, RentTier::Payment90, RentTier::Payment110];

    pub fn label(self) -> &'static str {
        match self {
            RentTier::Standard => "Standard FMR",
            RentTier::Payment90 => "90% Payment",
            RentTier::Payment110 => "110% Payment",
        }
    }
}

impl fmt::Display for RentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// The three rent columns of one bedroom tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierColumns {
    pub standard: &'static str,
    pub payment_90: &'static str,
    pub payment_110: &'static str,
}

impl TierColumns {
    pub fn get(&self, tier: RentTier) -> &'static str {
        match tier {
            RentTier::Standard => self.standard,
            RentTier::Payment90 => self.payment_90,
            RentTier::Payment110 => self.payment_110,
        }
    }
}

// Indexed by `BedroomTier::count()`.
const COLUMN_TABLE: [TierColumns; 5] = [
    TierColumns {
        standard: "SAFMR 0BR",
        payment_90: "SAFMR 0BR - 90% Payment Standard",
        payment_110: "SAFMR 0BR - 110% Payment Standard",
    },
    TierColumns {
        standard: "SAFMR 1BR",
        payment_90: "SAFMR 1BR - 90% Payment Standard",
        payment_110: "SAFMR 1BR - 110% Payment Standard",
    },
    TierColumns {
        standard: "SAFMR 2BR",
        payment_90: "SAFMR 2BR - 90% Payment Standard",
        payment_110: "SAFMR 2BR - 110% Payment Standard",
    },
    TierColumns {
        standard: "SAFMR 3BR",
        payment_90: "SAFMR 3BR - 90% Payment Standard",
        payment_110: "SAFMR 3BR - 110% Payment Standard",
    },
    TierColumns {
        standard: "SAFMR 4BR",
        payment_90: "SAFMR 4BR - 90% Payment Standard",
        payment_110: "SAFMR 4BR - 110% Payment Standard",
    },
];

/// Standard, 90% and 110% column names for a bedroom tier.
pub fn columns_for(bedroom: BedroomTier) -> TierColumns {
    COLUMN_TABLE[usize::from(bedroom.count())]
}

/// Single rent column for a (bedroom, tier) pair.
pub fn column_for(bedroom: BedroomTier, tier: RentTier) -> &'static str {
    columns_for(bedroom).get(tier)
}

/// Sorted distinct region codes present in the table. Null and empty codes
/// are skipped.
pub fn region_list(table: &RentTable) -> BTreeSet<String> {
    table
        .rows
        .iter()
        .filter_map(|row| row.get(REGION_COLUMN).as_key_text())
        .filter(|code| !code.is_empty())
        .collect()
}

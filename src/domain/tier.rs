//! Tier Catalog - Listing Tiers and Their Business Rules
//!
//! Each tier maps to an immutable `TierInfo` record: price, listing
//! duration, whether a tier password is required, and the advertised
//! feature list. The set of tiers is closed: four variants ordered
//! from the free tier up to the top paid tier.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Service level of a listing.
///
/// Serialized with the display names used in stored collections
/// (`"Small"`, `"Medium"`, `"Big"`, `"Massive"`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Tier {
    /// Free tier, expires after two days.
    #[default]
    Small,
    /// First paid tier.
    Medium,
    /// Second paid tier.
    Big,
    /// Top paid tier.
    Massive,
}

/// Configuration record for a single tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierInfo {
    /// Tier this record describes.
    pub tier: Tier,
    /// Price in AUD. `None` means the tier is free.
    pub price: Option<Decimal>,
    /// Listing lifetime in whole days.
    pub duration_days: u32,
    /// Human-readable duration shown next to the price.
    pub duration_label: &'static str,
    /// Whether submissions at this tier need a tier password.
    pub requires_password: bool,
    /// Advertised perks.
    pub features: &'static [&'static str],
}

impl TierInfo {
    /// Price label as shown on the pricing table.
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => format!("${price}"),
            None => "Free".to_string(),
        }
    }
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Big, Self::Massive];

    /// The free tier. Never password-gated and the only tier whose
    /// expiry is enforced when listing approved entries.
    pub const fn lowest() -> Self {
        Self::Small
    }

    /// Whether this is the free tier.
    pub const fn is_lowest(self) -> bool {
        matches!(self, Self::Small)
    }

    /// Fixed business rules for this tier.
    pub fn info(self) -> TierInfo {
        match self {
            Self::Small => TierInfo {
                tier: self,
                price: None,
                duration_days: 2,
                duration_label: "2 days",
                requires_password: false,
                features: &[
                    "Name",
                    "Logo",
                    "Short Description",
                    "Contact Email",
                    "Appears in search",
                ],
            },
            Self::Medium => TierInfo {
                tier: self,
                price: Some(dec!(5)),
                duration_days: 30,
                duration_label: "1 month",
                requires_password: true,
                features: &[
                    "Everything in Small",
                    "Featured Listing",
                    "Larger Logo",
                    "Social Links",
                    "Priority Search",
                ],
            },
            Self::Big => TierInfo {
                tier: self,
                price: Some(dec!(10)),
                duration_days: 90,
                duration_label: "3 months",
                requires_password: true,
                features: &[
                    "Everything in Medium",
                    "Top Category Placement",
                    "Weekly Newsletter Highlight",
                    "Custom Banner",
                ],
            },
            Self::Massive => TierInfo {
                tier: self,
                price: Some(dec!(21)),
                duration_days: 180,
                duration_label: "6 months",
                requires_password: true,
                features: &[
                    "Everything in Big",
                    "Homepage Rotation",
                    "Analytics",
                    "Special Badge/Icon",
                ],
            },
        }
    }

    /// Offset from `createdAt` to `expiresAt`.
    pub fn duration(self) -> Duration {
        Duration::days(i64::from(self.info().duration_days))
    }

    /// Whether submissions at this tier need a tier password.
    pub fn requires_password(self) -> bool {
        self.info().requires_password
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "Small"),
            Self::Medium => write!(f, "Medium"),
            Self::Big => write!(f, "Big"),
            Self::Massive => write!(f, "Massive"),
        }
    }
}

//! Domain Layer - Listings, Tiers and Tier Passwords
//!
//! Pure business types and rules. Nothing in here touches storage or
//! the clock; callers pass `now` in explicitly.

pub mod access;
pub mod listing;
pub mod rules;
pub mod tier;

pub use access::{NewTierPassword, PasswordId, PasswordStatus, TierPassword};
pub use listing::{Listing, ListingDraft, ListingId, ListingStatus, TierFilter};
pub use rules::POSTING_RULES;
pub use tier::{Tier, TierInfo};

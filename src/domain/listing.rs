//! Listings - Business Listings and Read-Time Visibility
//!
//! A listing is stored with its absolute expiry, but expiry is never
//! written back as a status: it is evaluated against the current time
//! whenever a view is built. Only free-tier listings are hidden once
//! expired; paid tiers stay listed past `expires_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tier::Tier;

/// Opaque listing identifier.
pub type ListingId = String;

/// Review state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Submitted, awaiting admin review.
    Pending,
    /// Approved by admin.
    Approved,
    /// Rejected by admin. Rejection deletes the record, so this is only
    /// ever seen in collections written by other tools.
    Rejected,
}

/// Fields supplied by a submitter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingDraft {
    pub name: String,
    pub logo: String,
    pub description: String,
    pub email: String,
    pub address: String,
    pub tier: Tier,
    pub social_links: Option<String>,
    pub banner: Option<String>,
}

/// A stored business listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub logo: String,
    pub description: String,
    pub email: String,
    pub address: String,
    pub tier: Tier,
    /// Submission time (Unix ms on disk).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Always `created_at + tier.duration()`.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
    pub status: ListingStatus,
    /// Hidden from the public view while still approved.
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl Listing {
    /// Build a fresh pending, public listing from a draft.
    pub fn from_draft(draft: ListingDraft, id: ListingId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            expires_at: created_at + draft.tier.duration(),
            name: draft.name,
            logo: draft.logo,
            description: draft.description,
            email: draft.email,
            address: draft.address,
            tier: draft.tier,
            created_at,
            status: ListingStatus::Pending,
            is_private: false,
            social_links: draft.social_links,
            banner: draft.banner,
        }
    }

    /// Whether `expires_at` lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether expiry removes this listing from the approved view.
    ///
    /// Only the free tier is subject to auto-expiry.
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.tier.is_lowest() && self.is_expired(now)
    }

    /// Whether this listing belongs in the approved view.
    pub fn is_listed(&self, now: DateTime<Utc>, include_private: bool) -> bool {
        self.status == ListingStatus::Approved
            && (include_private || !self.is_private)
            && !self.is_lapsed(now)
    }
}

/// Approved listings visible at `now`, in storage order.
pub fn approved_view(
    listings: &[Listing],
    now: DateTime<Utc>,
    include_private: bool,
) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.is_listed(now, include_private))
        .cloned()
        .collect()
}

/// Approved listings hidden by auto-expiry at `now`.
pub fn expired_view(listings: &[Listing], now: DateTime<Utc>) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.status == ListingStatus::Approved && l.is_lapsed(now))
        .cloned()
        .collect()
}

/// Tier selector used when browsing the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierFilter {
    #[default]
    All,
    Only(Tier),
}

impl TierFilter {
    pub fn matches(self, listing: &Listing) -> bool {
        match self {
            Self::All => true,
            Self::Only(tier) => listing.tier == tier,
        }
    }

    /// Keep the listings matching this filter, preserving order.
    pub fn apply<'a>(self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn listing(tier: Tier, status: ListingStatus, is_private: bool) -> Listing {
        let draft = ListingDraft {
            name: "Albury Bakery".to_string(),
            tier,
            ..ListingDraft::default()
        };
        let mut l = Listing::from_draft(draft, format!("{tier}-{status:?}"), t0());
        l.status = status;
        l.is_private = is_private;
        l
    }

    #[test]
    fn test_from_draft_defaults() {
        let l = listing(Tier::Big, ListingStatus::Pending, false);
        let fresh = Listing::from_draft(
            ListingDraft { tier: Tier::Big, ..ListingDraft::default() },
            "x".to_string(),
            t0(),
        );
        assert_eq!(fresh.status, ListingStatus::Pending);
        assert!(!fresh.is_private);
        assert_eq!(l.expires_at - l.created_at, Duration::days(90));
    }

    #[test]
    fn test_expiry_only_hides_free_tier() {
        let later = t0() + Duration::days(365);
        let free = listing(Tier::Small, ListingStatus::Approved, false);
        let paid = listing(Tier::Medium, ListingStatus::Approved, false);

        assert!(free.is_expired(later) && paid.is_expired(later));
        assert!(!free.is_listed(later, false));
        assert!(paid.is_listed(later, false));
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let free = listing(Tier::Small, ListingStatus::Approved, false);
        assert!(free.is_listed(free.expires_at, false));
        assert!(!free.is_listed(free.expires_at + Duration::milliseconds(1), false));
    }

    #[test]
    fn test_approved_view_respects_private_flag() {
        let all = vec![
            listing(Tier::Medium, ListingStatus::Approved, true),
            listing(Tier::Big, ListingStatus::Approved, false),
            listing(Tier::Massive, ListingStatus::Pending, false),
        ];
        let public = approved_view(&all, t0(), false);
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].tier, Tier::Big);

        let admin = approved_view(&all, t0(), true);
        assert_eq!(admin.len(), 2);
    }

    #[test]
    fn test_expired_view() {
        let later = t0() + Duration::days(3);
        let all = vec![
            listing(Tier::Small, ListingStatus::Approved, false),
            listing(Tier::Small, ListingStatus::Pending, false),
            listing(Tier::Medium, ListingStatus::Approved, false),
        ];
        let expired = expired_view(&all, later);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].tier, Tier::Small);
        assert!(expired_view(&all, t0()).is_empty());
    }

    #[test]
    fn test_tier_filter() {
        let all = vec![
            listing(Tier::Small, ListingStatus::Approved, false),
            listing(Tier::Massive, ListingStatus::Approved, false),
        ];
        assert_eq!(TierFilter::All.apply(&all).len(), 2);
        let massive = TierFilter::Only(Tier::Massive).apply(&all);
        assert_eq!(massive.len(), 1);
        assert_eq!(massive[0].tier, Tier::Massive);
    }

    #[test]
    fn test_stored_shape() {
        let l = listing(Tier::Small, ListingStatus::Approved, false);
        let json = serde_json::to_value(&l).unwrap();
        assert_eq!(json["status"], "approved");
        assert_eq!(json["tier"], "Small");
        assert_eq!(json["createdAt"], t0().timestamp_millis());
        assert!(json.get("socialLinks").is_none());

        // Collections written without `isPrivate` read back as public.
        let mut raw = json;
        raw.as_object_mut().unwrap().remove("isPrivate");
        let parsed: Listing = serde_json::from_value(raw).unwrap();
        assert!(!parsed.is_private);
    }
}

//! Posting Rules - Terms Every Submitter Must Accept

/// Rules shown next to the submission form, in display order.
pub const POSTING_RULES: [&str; 19] = [
    "Accurate Info",
    "Respectful Content",
    "No Spam/Ads Outside Listing",
    "Relevant Categories",
    "Images Reflect Business Only",
    "One Listing per Business",
    "Free Tier Limitations (2 days)",
    "Clear Description Guidelines",
    "Accurate Pricing & Offers",
    "No Illegal Services",
    "No Porn or NSFW Content",
    "Respect Privacy",
    "Update Listings When Needed",
    "Follow Tier Perks Rules",
    "Compliance: Violations may lead to removal/banning",
    "Report Issues to Admins",
    "Posting Frequency: Limit free tier",
    "Focus on Albury Businesses Only",
    "Professional Tone",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_are_distinct_and_non_empty() {
        let unique: std::collections::HashSet<_> = POSTING_RULES.iter().collect();
        assert_eq!(unique.len(), POSTING_RULES.len());
        assert!(POSTING_RULES.iter().all(|r| !r.trim().is_empty()));
    }
}

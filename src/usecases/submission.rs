//! Submission Workflow - Tier-Gated Listing Submission
//!
//! Runs the checks a submitter goes through before a listing reaches
//! the review queue:
//! - the posting rules must have been accepted
//! - paid tiers need a valid tier password
//! - an empty logo is replaced by a generated placeholder
//!
//! Required-field checks belong to whatever front end collects the
//! form; this workflow trusts the fields it is given.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::listing::{Listing, ListingDraft};
use crate::ports::storage::KeyValueStore;
use crate::usecases::access_store::AccessControlStore;
use crate::usecases::listing_store::ListingStore;

/// A completed submission form.
#[derive(Clone)]
pub struct SubmissionForm {
    pub draft: ListingDraft,
    /// Tier password. Ignored for the free tier.
    pub password: String,
    /// Whether the submitter accepted the posting rules.
    pub agreed_to_rules: bool,
}

impl std::fmt::Debug for SubmissionForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionForm")
            .field("draft", &self.draft)
            .field("agreed_to_rules", &self.agreed_to_rules)
            .finish_non_exhaustive()
    }
}

/// Result of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Stored as pending.
    Accepted(Listing),
    /// Posting rules not accepted; nothing stored.
    RulesNotAccepted,
    /// Wrong or missing tier password; nothing stored.
    AccessDenied,
}

impl SubmissionOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "accepted",
            Self::RulesNotAccepted => "rules_not_accepted",
            Self::AccessDenied => "access_denied",
        }
    }
}

/// Placeholder image used when a submitter leaves the logo empty.
pub fn placeholder_logo(name: &str) -> String {
    format!("https://picsum.photos/seed/{name}/200")
}

/// Submission use case over both stores.
pub struct SubmissionService<S: KeyValueStore + ?Sized> {
    listings: Arc<ListingStore<S>>,
    access: Arc<AccessControlStore<S>>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S: KeyValueStore + ?Sized> SubmissionService<S> {
    pub fn new(listings: Arc<ListingStore<S>>, access: Arc<AccessControlStore<S>>) -> Self {
        Self {
            listings,
            access,
            metrics: None,
        }
    }

    /// Count outcomes in the given registry.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Check and store a submission.
    ///
    /// The listing store is only touched once both the rules check and
    /// the tier password check have passed.
    #[instrument(skip(self, form), fields(tier = %form.draft.tier, name = %form.draft.name))]
    pub async fn submit(&self, form: SubmissionForm) -> Result<SubmissionOutcome> {
        let tier = form.draft.tier;
        let outcome = self.evaluate(form).await?;

        match &outcome {
            SubmissionOutcome::Accepted(listing) => {
                info!(id = %listing.id, "Submission accepted");
            }
            SubmissionOutcome::RulesNotAccepted => {
                warn!("Submission refused: posting rules not accepted");
            }
            SubmissionOutcome::AccessDenied => {
                warn!("Submission refused: tier password rejected");
            }
        }

        if let Some(metrics) = &self.metrics {
            let tier_label = tier.to_string();
            metrics
                .submissions
                .with_label_values(&[tier_label.as_str(), outcome.label()])
                .inc();
        }

        Ok(outcome)
    }

    async fn evaluate(&self, form: SubmissionForm) -> Result<SubmissionOutcome> {
        if !form.agreed_to_rules {
            return Ok(SubmissionOutcome::RulesNotAccepted);
        }

        let mut draft = form.draft;
        let granted = self
            .access
            .verify(draft.tier, &form.password)
            .await
            .context("Failed to verify tier password")?;
        if !granted {
            return Ok(SubmissionOutcome::AccessDenied);
        }

        if draft.logo.is_empty() {
            draft.logo = placeholder_logo(&draft.name);
        }

        let listing = self
            .listings
            .submit(draft)
            .await
            .context("Failed to store listing")?;
        Ok(SubmissionOutcome::Accepted(listing))
    }
}

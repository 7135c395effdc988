//! Stateful job search screen model.

use std::collections::BTreeSet;

use tracing::debug;

use super::{FacetSelection, filter, parse_pay_bound};
use crate::domain::{JobListing, JobType, PayType};

/// Base listings plus the user's facets, with results recomputed after every
/// change.
#[derive(Debug, Clone, Default)]
pub struct JobSearch {
    listings: Vec<JobListing>,
    facets: FacetSelection,
    results: Vec<JobListing>,
}

impl JobSearch {
    /// Start a search over `listings` with no facets active.
    pub fn new(listings: Vec<JobListing>) -> Self {
        Self {
            results: listings.clone(),
            listings,
            facets: FacetSelection::default(),
        }
    }

    /// Base listings.
    pub fn listings(&self) -> &[JobListing] {
        &self.listings
    }

    /// Current facets.
    pub fn facets(&self) -> &FacetSelection {
        &self.facets
    }

    /// Listings passing the current facets, in base order.
    pub fn results(&self) -> &[JobListing] {
        &self.results
    }

    /// Replace the free-text term.
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.facets.term = term.into();
        self.recompute();
    }

    /// Replace the location fragment.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.facets.location = location.into();
        self.recompute();
    }

    /// Add or remove `job_type`; returns whether it is now selected.
    pub fn toggle_job_type(&mut self, job_type: JobType) -> bool {
        let selected = toggle(&mut self.facets.job_types, job_type);
        self.recompute();
        selected
    }

    /// Add or remove `pay_type`; returns whether it is now selected.
    pub fn toggle_pay_type(&mut self, pay_type: PayType) -> bool {
        let selected = toggle(&mut self.facets.pay_types, pay_type);
        self.recompute();
        selected
    }

    /// Add or remove a skill fragment; returns whether it is now selected.
    /// Empty input is ignored; other text is kept verbatim.
    pub fn toggle_skill(&mut self, skill: &str) -> bool {
        if skill.is_empty() {
            return false;
        }
        let selected = toggle(&mut self.facets.skills, skill.to_owned());
        self.recompute();
        selected
    }

    /// Replace both pay bounds.
    pub fn set_pay_range(&mut self, min_pay: Option<u64>, max_pay: Option<u64>) {
        self.facets.min_pay = min_pay;
        self.facets.max_pay = max_pay;
        self.recompute();
    }

    /// Replace both pay bounds from raw input; unparsable text clears the
    /// bound.
    pub fn set_pay_bounds_from_input(&mut self, min_pay: &str, max_pay: &str) {
        self.set_pay_range(parse_pay_bound(min_pay), parse_pay_bound(max_pay));
    }

    /// Replace every facet at once.
    pub fn apply(&mut self, facets: FacetSelection) {
        self.facets = facets;
        self.recompute();
    }

    /// Clear every facet, restoring the full listing set.
    pub fn clear(&mut self) {
        self.apply(FacetSelection::default());
    }

    /// Swap in a freshly fetched listing set, keeping the facets.
    pub fn replace_listings(&mut self, listings: Vec<JobListing>) {
        self.listings = listings;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.results = filter(&self.listings, &self.facets);
        debug!(
            listings = self.listings.len(),
            results = self.results.len(),
            active_facets = self.facets.active_facet_count(),
            "job search recomputed"
        );
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value)
    }
}

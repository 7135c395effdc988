//! Client-side faceted filtering of job listings.
//!
//! A listing passes [`filter`] only if it satisfies every active facet
//! category. Within a multi-value category (job types, pay types, skills) one
//! matching value is enough. Text comparisons are case-insensitive substring
//! matches with no further normalisation. Empty categories impose no
//! constraint, and the input order is always preserved.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{JobListing, JobType, PayType};

mod screen;

pub use screen::JobSearch;

/// The user's current facet choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSelection {
    /// Free text matched against title, description, and skills.
    pub term: String,
    /// Substring of the listing location.
    pub location: String,
    /// Accepted job types; empty accepts all.
    pub job_types: BTreeSet<JobType>,
    /// Accepted pay types; empty accepts all.
    pub pay_types: BTreeSet<PayType>,
    /// Inclusive lower pay bound.
    pub min_pay: Option<u64>,
    /// Inclusive upper pay bound.
    pub max_pay: Option<u64>,
    /// Skill fragments; a listing needs any one of them.
    pub skills: BTreeSet<String>,
}

impl FacetSelection {
    /// Selection with no active facets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text term.
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Set the location fragment.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Accept `job_type`.
    #[must_use]
    pub fn with_job_type(mut self, job_type: JobType) -> Self {
        self.job_types.insert(job_type);
        self
    }

    /// Accept `pay_type`.
    #[must_use]
    pub fn with_pay_type(mut self, pay_type: PayType) -> Self {
        self.pay_types.insert(pay_type);
        self
    }

    /// Set the inclusive lower pay bound.
    #[must_use]
    pub fn with_min_pay(mut self, min_pay: u64) -> Self {
        self.min_pay = Some(min_pay);
        self
    }

    /// Set the inclusive upper pay bound.
    #[must_use]
    pub fn with_max_pay(mut self, max_pay: u64) -> Self {
        self.max_pay = Some(max_pay);
        self
    }

    /// Add a skill fragment.
    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.insert(skill.into());
        self
    }

    /// Whether no facet constrains the result.
    pub fn is_empty(&self) -> bool {
        self.active_facet_count() == 0
    }

    /// Number of facet categories currently constraining the result. Both pay
    /// bounds together count as one category.
    pub fn active_facet_count(&self) -> usize {
        let compiled = CompiledFacets::new(self);
        [
            compiled.term.is_some(),
            compiled.location.is_some(),
            !self.job_types.is_empty(),
            !self.pay_types.is_empty(),
            self.min_pay.is_some() || self.max_pay.is_some(),
            !compiled.skills.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Whether `listing` passes every active facet.
    pub fn matches(&self, listing: &JobListing) -> bool {
        CompiledFacets::new(self).matches(listing)
    }
}

/// Facets with text lower-cased once and empty values dropped.
struct CompiledFacets<'a> {
    term: Option<String>,
    location: Option<String>,
    job_types: &'a BTreeSet<JobType>,
    pay_types: &'a BTreeSet<PayType>,
    min_pay: Option<u64>,
    max_pay: Option<u64>,
    skills: Vec<String>,
}

impl<'a> CompiledFacets<'a> {
    fn new(facets: &'a FacetSelection) -> Self {
        Self {
            term: needle(&facets.term),
            location: needle(&facets.location),
            job_types: &facets.job_types,
            pay_types: &facets.pay_types,
            min_pay: facets.min_pay,
            max_pay: facets.max_pay,
            skills: facets.skills.iter().filter_map(|skill| needle(skill)).collect(),
        }
    }

    fn matches(&self, listing: &JobListing) -> bool {
        self.matches_term(listing)
            && self.matches_location(listing)
            && (self.job_types.is_empty() || self.job_types.contains(&listing.job_type))
            && (self.pay_types.is_empty() || self.pay_types.contains(&listing.pay_type))
            && self.min_pay.is_none_or(|min| listing.pay_amount >= min)
            && self.max_pay.is_none_or(|max| listing.pay_amount <= max)
            && self.matches_skills(listing)
    }

    fn matches_term(&self, listing: &JobListing) -> bool {
        let Some(term) = self.term.as_deref() else {
            return true;
        };
        contains(&listing.title, term)
            || contains(&listing.description, term)
            || listing
                .required_skills
                .iter()
                .any(|skill| contains(skill, term))
    }

    fn matches_location(&self, listing: &JobListing) -> bool {
        self.location
            .as_deref()
            .is_none_or(|location| contains(&listing.location, location))
    }

    fn matches_skills(&self, listing: &JobListing) -> bool {
        self.skills.is_empty()
            || self.skills.iter().any(|wanted| {
                listing
                    .required_skills
                    .iter()
                    .any(|skill| contains(skill, wanted))
            })
    }
}

fn needle(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_lowercase())
}

fn contains(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Listings passing every active facet, in their original order.
///
/// # Examples
/// ```
/// use marketplace::domain::{FacetSelection, JobListing, JobType, filter};
///
/// let listings = vec![
///     JobListing::builder("a", "Barista").job_type(JobType::PartTime).build(),
///     JobListing::builder("b", "Logo").job_type(JobType::Freelance).build(),
/// ];
/// let facets = FacetSelection::new().with_job_type(JobType::Freelance);
/// let ids: Vec<_> = filter(&listings, &facets)
///     .into_iter()
///     .map(|listing| listing.id.to_string())
///     .collect();
/// assert_eq!(ids, ["b"]);
/// ```
pub fn filter(listings: &[JobListing], facets: &FacetSelection) -> Vec<JobListing> {
    let compiled = CompiledFacets::new(facets);
    listings
        .iter()
        .filter(|listing| compiled.matches(listing))
        .cloned()
        .collect()
}

/// Parse user-entered pay bound text.
///
/// Surrounding whitespace is ignored and a fractional part is truncated.
/// Anything else that is not a non-negative whole number yields `None`, which
/// callers treat as "no bound".
///
/// # Examples
/// ```
/// use marketplace::domain::parse_pay_bound;
///
/// assert_eq!(parse_pay_bound(" 500 "), Some(500));
/// assert_eq!(parse_pay_bound("499.99"), Some(499));
/// assert_eq!(parse_pay_bound("-3"), None);
/// assert_eq!(parse_pay_bound("lots"), None);
/// ```
pub fn parse_pay_bound(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    whole.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_listings;
    use rstest::{fixture, rstest};

    #[fixture]
    fn listings() -> Vec<JobListing> {
        sample_listings()
    }

    fn ids(listings: &[JobListing]) -> Vec<&str> {
        listings.iter().map(|listing| listing.id.as_str()).collect()
    }

    fn priced(id: &str, amount: u64) -> JobListing {
        JobListing::builder(id, "Priced")
            .job_type(JobType::Freelance)
            .pay_amount(amount)
            .build()
    }

    #[rstest]
    fn empty_input_yields_empty_output() {
        let facets = FacetSelection::new()
            .with_term("react")
            .with_job_type(JobType::Freelance);
        assert!(filter(&[], &facets).is_empty());
        assert!(filter(&[], &FacetSelection::new()).is_empty());
    }

    #[rstest]
    fn empty_selection_is_identity(listings: Vec<JobListing>) {
        assert_eq!(filter(&listings, &FacetSelection::new()), listings);
    }

    #[rstest]
    fn text_facets_match_literally_apart_from_case() {
        let listing = JobListing::builder("job", "Frontend role")
            .skills(["JavaScript"])
            .build();
        let listings = [listing];

        let padded = FacetSelection::new().with_skill(" Java");
        assert!(filter(&listings, &padded).is_empty());

        let bare = FacetSelection::new().with_skill("java");
        assert_eq!(ids(&filter(&listings, &bare)), ["job"]);
    }

    #[rstest]
    fn whitespace_only_text_is_still_a_constraint(listings: Vec<JobListing>) {
        let facets = FacetSelection::new().with_term("   ");
        assert_eq!(facets.active_facet_count(), 1);
        assert!(filter(&listings, &facets).is_empty());

        let empty = FacetSelection::new().with_term("").with_location("");
        assert!(empty.is_empty());
        assert_eq!(filter(&listings, &empty), listings);
    }

    #[rstest]
    #[case::both_selected(&[JobType::PartTime, JobType::Freelance], true)]
    #[case::other_only(&[JobType::PartTime], false)]
    #[case::none_selected(&[], true)]
    fn job_types_are_or_matched(#[case] selected: &[JobType], #[case] passes: bool) {
        let facets = selected
            .iter()
            .fold(FacetSelection::new(), |facets, job_type| facets.with_job_type(*job_type));
        assert_eq!(facets.matches(&priced("job", 100)), passes);
    }

    #[rstest]
    #[case::at_min(Some(1000), None, true)]
    #[case::above_min(Some(1001), None, false)]
    #[case::at_max(None, Some(1000), true)]
    #[case::below_max(None, Some(999), false)]
    #[case::exact_window(Some(1000), Some(1000), true)]
    #[case::inverted_window(Some(1001), Some(999), false)]
    fn pay_bounds_are_inclusive(
        #[case] min_pay: Option<u64>,
        #[case] max_pay: Option<u64>,
        #[case] passes: bool,
    ) {
        let facets = FacetSelection {
            min_pay,
            max_pay,
            ..FacetSelection::default()
        };
        assert_eq!(facets.matches(&priced("job", 1000)), passes);
    }

    #[rstest]
    fn pay_bounds_ignore_pay_type(listings: Vec<JobListing>) {
        let facets = FacetSelection::new().with_max_pay(300);
        assert_eq!(ids(&filter(&listings, &facets)), ["job-2", "job-6"]);
    }

    #[rstest]
    #[case::title("DASHBOARD", &["job-3"])]
    #[case::description("charity", &["job-3"])]
    #[case::skill("typescript", &["job-3"])]
    #[case::fragment("edit", &["job-5"])]
    #[case::no_match("plumbing", &[])]
    fn term_matches_title_description_or_skill(
        listings: Vec<JobListing>,
        #[case] term: &str,
        #[case] expected: &[&str],
    ) {
        let facets = FacetSelection::new().with_term(term);
        assert_eq!(ids(&filter(&listings, &facets)), expected);
    }

    #[rstest]
    fn location_is_case_insensitive_substring(listings: Vec<JobListing>) {
        let facets = FacetSelection::new().with_location("LEEDS");
        assert_eq!(ids(&filter(&listings, &facets)), ["job-2", "job-6"]);
    }

    #[rstest]
    fn any_selected_skill_is_enough(listings: Vec<JobListing>) {
        let facets = FacetSelection::new().with_skill("python").with_skill("dart");
        assert_eq!(ids(&filter(&listings, &facets)), ["job-4", "job-7"]);
    }

    #[rstest]
    fn categories_combine_with_and(listings: Vec<JobListing>) {
        let facets = FacetSelection::new()
            .with_job_type(JobType::Freelance)
            .with_location("remote")
            .with_pay_type(PayType::Fixed)
            .with_min_pay(1500);
        assert_eq!(ids(&filter(&listings, &facets)), ["job-1", "job-3"]);
    }

    #[rstest]
    fn freelance_over_five_hundred_keeps_source_order(listings: Vec<JobListing>) {
        let facets = FacetSelection::new()
            .with_job_type(JobType::Freelance)
            .with_min_pay(500);
        assert_eq!(
            ids(&filter(&listings, &facets)),
            ["job-1", "job-3", "job-5", "job-8"]
        );
    }

    #[rstest]
    fn filtering_is_idempotent(listings: Vec<JobListing>) {
        let facets = FacetSelection::new()
            .with_skill("a")
            .with_max_pay(3000);
        let once = filter(&listings, &facets);
        assert_eq!(filter(&once, &facets), once);
    }

    #[rstest]
    fn counts_active_categories() {
        let facets = FacetSelection::new()
            .with_term("design")
            .with_job_type(JobType::Freelance)
            .with_job_type(JobType::PartTime)
            .with_min_pay(10)
            .with_max_pay(20);
        assert_eq!(facets.active_facet_count(), 3);
    }

    #[rstest]
    #[case("1000", Some(1000))]
    #[case("  42\n", Some(42))]
    #[case("12.50", Some(12))]
    #[case("7.", Some(7))]
    #[case("", None)]
    #[case(".5", None)]
    #[case("1e3", None)]
    #[case("-10", None)]
    #[case("99999999999999999999999", None)]
    fn parses_pay_bounds(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_pay_bound(raw), expected);
    }
}

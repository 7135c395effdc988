//! Job listing read model.
//!
//! Listings are immutable snapshots returned by the job source. Search and
//! dashboard code only ever narrows or counts them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SubjectId;

/// Backend identifier of a job listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wrap a backend identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Error returned when a job or pay type string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJobAttributeError {
    /// Attribute being parsed.
    pub attribute: &'static str,
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseJobAttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.attribute, self.input)
    }
}

impl std::error::Error for ParseJobAttributeError {}

fn normalise_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// How the advertised pay amount accrues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayType {
    /// Paid per hour.
    Hourly,
    /// Paid per day.
    Daily,
    /// Paid per week.
    Weekly,
    /// Paid per month.
    Monthly,
    /// One fixed amount for the whole job.
    Fixed,
}

impl PayType {
    /// Every pay type in display order.
    pub const ALL: [Self; 5] = [
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Fixed,
    ];

    /// Wire name of the pay type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for PayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayType {
    type Err = ParseJobAttributeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == normalise_token(value))
            .ok_or_else(|| ParseJobAttributeError {
                attribute: "pay type",
                input: value.to_owned(),
            })
    }
}

/// Engagement model of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    /// Full-time position.
    FullTime,
    /// Part-time position.
    PartTime,
    /// Bounded project with a deliverable.
    ProjectBased,
    /// Freelance engagement.
    Freelance,
}

impl JobType {
    /// Every job type in display order.
    pub const ALL: [Self; 4] = [
        Self::FullTime,
        Self::PartTime,
        Self::ProjectBased,
        Self::Freelance,
    ];

    /// Wire name of the job type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::ProjectBased => "project-based",
            Self::Freelance => "freelance",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ParseJobAttributeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalise_token(value);
        Self::ALL
            .into_iter()
            .find(|candidate| normalise_token(candidate.as_str()) == wanted)
            .ok_or_else(|| ParseJobAttributeError {
                attribute: "job type",
                input: value.to_owned(),
            })
    }
}

/// Publication state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingStatus {
    /// Open for applications.
    #[default]
    Active,
    /// Closed by the employer.
    Closed,
    /// Position filled.
    Filled,
    /// Not yet published.
    Draft,
}

/// Immutable job listing snapshot.
///
/// `applicant_cap == 0` means the listing accepts unlimited applicants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    /// Listing identifier.
    pub id: JobId,
    /// Employer that owns the listing, when the source reports it.
    #[serde(default)]
    pub owner_id: Option<SubjectId>,
    /// Listing headline.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Advertised pay in whole currency units.
    pub pay_amount: u64,
    /// How the pay amount accrues.
    pub pay_type: PayType,
    /// Engagement model.
    pub job_type: JobType,
    /// Free-form location text.
    pub location: String,
    /// Required skills in source order; duplicates are tolerated.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Application deadline.
    pub deadline: DateTime<Utc>,
    /// Applications received so far.
    #[serde(default)]
    pub applicant_count: u32,
    /// Maximum applications accepted; zero means uncapped.
    #[serde(default)]
    pub applicant_cap: u32,
    /// Publication state.
    #[serde(default)]
    pub status: ListingStatus,
    /// Creation timestamp, when reported.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl JobListing {
    /// Start building a listing with neutral defaults.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::{JobListing, JobType};
    ///
    /// let listing = JobListing::builder("job-1", "Logo refresh")
    ///     .job_type(JobType::Freelance)
    ///     .pay_amount(2500)
    ///     .build();
    /// assert_eq!(listing.pay_amount, 2500);
    /// ```
    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> JobListingBuilder {
        JobListingBuilder::new(id, title)
    }

    /// Whether the applicant cap has been reached.
    pub fn is_full(&self) -> bool {
        self.applicant_cap > 0 && self.applicant_count >= self.applicant_cap
    }

    /// Whether the listing still accepts applications at `now`.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ListingStatus::Active && self.deadline > now && !self.is_full()
    }
}

/// Builder for [`JobListing`], used by fixtures and adapters.
#[derive(Debug, Clone)]
pub struct JobListingBuilder {
    listing: JobListing,
}

impl JobListingBuilder {
    fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            listing: JobListing {
                id: JobId::new(id),
                owner_id: None,
                title: title.into(),
                description: String::new(),
                pay_amount: 0,
                pay_type: PayType::Fixed,
                job_type: JobType::Freelance,
                location: String::new(),
                required_skills: Vec::new(),
                deadline: DateTime::<Utc>::MAX_UTC,
                applicant_count: 0,
                applicant_cap: 0,
                status: ListingStatus::Active,
                created_at: None,
            },
        }
    }

    /// Set the owning employer.
    pub fn owner(mut self, owner: SubjectId) -> Self {
        self.listing.owner_id = Some(owner);
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.listing.description = description.into();
        self
    }

    /// Set the advertised pay.
    pub fn pay_amount(mut self, amount: u64) -> Self {
        self.listing.pay_amount = amount;
        self
    }

    /// Set the pay type.
    pub fn pay_type(mut self, pay_type: PayType) -> Self {
        self.listing.pay_type = pay_type;
        self
    }

    /// Set the job type.
    pub fn job_type(mut self, job_type: JobType) -> Self {
        self.listing.job_type = job_type;
        self
    }

    /// Set the location text.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.listing.location = location.into();
        self
    }

    /// Replace the required skills.
    pub fn skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listing.required_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Set the application deadline.
    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.listing.deadline = deadline;
        self
    }

    /// Set applicant count and cap.
    pub fn applicants(mut self, count: u32, cap: u32) -> Self {
        self.listing.applicant_count = count;
        self.listing.applicant_cap = cap;
        self
    }

    /// Set the publication state.
    pub fn status(mut self, status: ListingStatus) -> Self {
        self.listing.status = status;
        self
    }

    /// Finish the listing.
    pub fn build(self) -> JobListing {
        self.listing
    }
}

//! Test utilities for the marketplace crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`; compiled
//! only for tests or with the `test-support` feature.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::aggregator::DataSource;
use crate::domain::ports::{
    ApplicationSource, JobSource, MessageSource, NotificationSource, Page, PageRequest,
    PaymentSource, RatingSource, SourceError,
};
use crate::domain::{
    Application, ApplicationStatus, JobId, JobListing, JobType, ListingStatus, Message,
    Notification, PayType, Payment, PaymentStatus, Rating, RatingStats, SourceKey, SourcePayload,
    SubjectId, count_unread,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("test support mutex poisoned"),
    }
}

/// Reference instant used by the sample data: 2026-03-01T09:00:00Z.
pub fn sample_time() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single() {
        Some(time) => time,
        None => panic!("sample time is unambiguous"),
    }
}

/// Build a subject id, panicking on malformed input.
pub fn subject_id(raw: &str) -> SubjectId {
    match SubjectId::new(raw) {
        Ok(id) => id,
        Err(error) => panic!("invalid test subject id {raw:?}: {error}"),
    }
}

/// Student who owns the sample applications.
pub fn sample_student() -> SubjectId {
    subject_id("student-1")
}

/// Employer who owns `job-1`, `job-3`, `job-5`, and `job-7`.
pub fn sample_employer() -> SubjectId {
    subject_id("employer-1")
}

/// Eight listings, newest first.
///
/// Five are freelance, priced 2500, 3500, 1200, 300, and 900 in that order.
pub fn sample_listings() -> Vec<JobListing> {
    let now = sample_time();
    let open_until = now + TimeDelta::days(30);
    let primary = sample_employer();
    let other = subject_id("employer-2");

    vec![
        JobListing::builder("job-1", "Logo design for campus cafe")
            .owner(primary.clone())
            .description("Fresh brand mark for a student-run coffee shop")
            .job_type(JobType::Freelance)
            .pay_type(PayType::Fixed)
            .pay_amount(2500)
            .location("Remote")
            .skills(["Illustrator", "Branding"])
            .deadline(open_until)
            .applicants(3, 10)
            .build(),
        JobListing::builder("job-2", "Weekend barista")
            .owner(other.clone())
            .description("Saturday and Sunday shifts")
            .job_type(JobType::PartTime)
            .pay_type(PayType::Hourly)
            .pay_amount(18)
            .location("Leeds")
            .skills(["Customer service"])
            .deadline(open_until)
            .applicants(5, 5)
            .build(),
        JobListing::builder("job-3", "React dashboard build")
            .owner(primary.clone())
            .description("Internal analytics screens for a charity")
            .job_type(JobType::Freelance)
            .pay_type(PayType::Fixed)
            .pay_amount(3500)
            .location("Remote")
            .skills(["React", "TypeScript"])
            .deadline(open_until)
            .applicants(7, 0)
            .build(),
        JobListing::builder("job-4", "Graduate data analyst")
            .owner(other.clone())
            .description("Reporting on retail footfall")
            .job_type(JobType::FullTime)
            .pay_type(PayType::Monthly)
            .pay_amount(2200)
            .location("Manchester")
            .skills(["SQL", "Python"])
            .deadline(open_until)
            .applicants(12, 50)
            .build(),
        JobListing::builder("job-5", "Podcast audio editing")
            .owner(primary.clone())
            .description("Clean up and master six interview episodes")
            .job_type(JobType::Freelance)
            .pay_type(PayType::Fixed)
            .pay_amount(1200)
            .location("Remote")
            .skills(["Audio editing"])
            .deadline(open_until)
            .applicants(4, 4)
            .build(),
        JobListing::builder("job-6", "Flyer distribution")
            .owner(other.clone())
            .description("Hand out flyers for a gig night")
            .job_type(JobType::Freelance)
            .pay_type(PayType::Daily)
            .pay_amount(300)
            .location("Leeds city centre")
            .skills(["Local knowledge"])
            .deadline(now - TimeDelta::days(1))
            .applicants(1, 0)
            .build(),
        JobListing::builder("job-7", "Mobile app prototype")
            .owner(primary)
            .description("Clickable prototype for a study planner")
            .job_type(JobType::ProjectBased)
            .pay_type(PayType::Fixed)
            .pay_amount(4000)
            .location("Hybrid - London")
            .skills(["Flutter", "Dart"])
            .deadline(open_until)
            .applicants(1, 0)
            .status(ListingStatus::Closed)
            .build(),
        JobListing::builder("job-8", "Social media captions")
            .owner(other)
            .description("Weekly captions for a fitness studio")
            .job_type(JobType::Freelance)
            .pay_type(PayType::Weekly)
            .pay_amount(900)
            .location("Remote")
            .skills(["Copywriting", "Social media"])
            .deadline(open_until)
            .applicants(0, 0)
            .build(),
    ]
}

/// Applications by the sample student: two submitted, one under review, one
/// selected.
pub fn sample_applications() -> Vec<Application> {
    let student = sample_student();
    [
        ("app-1", "job-1", ApplicationStatus::Submitted),
        ("app-2", "job-3", ApplicationStatus::Submitted),
        ("app-3", "job-4", ApplicationStatus::UnderReview),
        ("app-4", "job-5", ApplicationStatus::Selected),
    ]
    .into_iter()
    .map(|(id, job, status)| Application {
        id: id.to_owned(),
        job_id: JobId::new(job),
        student_id: student.clone(),
        status,
        applied_at: sample_time() - TimeDelta::days(2),
        cover_note: None,
    })
    .collect()
}

/// Three notifications, two unread.
pub fn sample_notifications() -> Vec<Notification> {
    [("n-1", false), ("n-2", true), ("n-3", false)]
        .into_iter()
        .map(|(id, read)| Notification {
            id: id.to_owned(),
            title: "Application update".to_owned(),
            message: "One of your applications changed status".to_owned(),
            kind: "application".to_owned(),
            read,
            created_at: sample_time(),
        })
        .collect()
}

/// Two unread messages for the student, one for the employer, and one read.
pub fn sample_messages() -> Vec<Message> {
    let student = sample_student();
    let employer = sample_employer();
    [
        ("m-1", &employer, &student, false),
        ("m-2", &employer, &student, false),
        ("m-3", &student, &employer, false),
        ("m-4", &employer, &student, true),
    ]
    .into_iter()
    .map(|(id, from, to, read)| Message {
        id: id.to_owned(),
        sender_id: from.clone(),
        recipient_id: to.clone(),
        body: "Are you free for a call this week?".to_owned(),
        read,
        sent_at: sample_time(),
    })
    .collect()
}

/// Student rated 5 and 4; employer rated 3.
pub fn sample_ratings() -> Vec<Rating> {
    let student = sample_student();
    let employer = sample_employer();
    [
        ("r-1", &employer, &student, 5),
        ("r-2", &employer, &student, 4),
        ("r-3", &student, &employer, 3),
    ]
    .into_iter()
    .map(|(id, rater, ratee, score)| Rating {
        id: id.to_owned(),
        rater_id: rater.clone(),
        ratee_id: ratee.clone(),
        score,
        comment: None,
        created_at: sample_time(),
    })
    .collect()
}

/// Employer-to-student payments: 1200 completed, 300 pending, 500 completed.
pub fn sample_payments() -> Vec<Payment> {
    let student = sample_student();
    let employer = sample_employer();
    [
        ("p-1", 1200, PaymentStatus::Completed),
        ("p-2", 300, PaymentStatus::Pending),
        ("p-3", 500, PaymentStatus::Completed),
    ]
    .into_iter()
    .map(|(id, amount, status)| Payment {
        id: id.to_owned(),
        job_id: Some(JobId::new("job-5")),
        payer_id: employer.clone(),
        payee_id: student.clone(),
        amount,
        status,
        created_at: sample_time(),
    })
    .collect()
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    /// Clock reading `now` until moved.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        *lock(&self.0) += delta;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// [`DataSource`] returning a canned outcome, optionally after a delay.
#[derive(Debug)]
pub struct StaticDataSource {
    key: SourceKey,
    outcome: Result<SourcePayload, SourceError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticDataSource {
    /// Source that succeeds with `payload`.
    pub fn ok(key: SourceKey, payload: impl Into<SourcePayload>) -> Self {
        Self::with_outcome(key, Ok(payload.into()))
    }

    /// Source that fails with `error`.
    pub fn failing(key: SourceKey, error: SourceError) -> Self {
        Self::with_outcome(key, Err(error))
    }

    fn with_outcome(key: SourceKey, outcome: Result<SourcePayload, SourceError>) -> Self {
        Self {
            key,
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times [`DataSource::fetch`] ran.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    fn key(&self) -> SourceKey {
        self.key
    }

    async fn fetch(&self, _subject: &SubjectId) -> Result<SourcePayload, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

#[derive(Debug, Default)]
struct MarketplaceData {
    jobs: Vec<JobListing>,
    applications: Vec<Application>,
    notifications: Vec<Notification>,
    messages: Vec<Message>,
    ratings: Vec<Rating>,
    payments: Vec<Payment>,
}

/// In-memory implementation of every read port.
///
/// Each port can be switched to failing by [`SourceKey`]; calls are counted
/// per operation name (for example `"list_recent"` or `"unread_count"`).
#[derive(Debug, Default)]
pub struct InMemoryMarketplace {
    data: Mutex<MarketplaceData>,
    failing: Mutex<HashSet<SourceKey>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    latency: Option<Duration>,
}

impl InMemoryMarketplace {
    /// Empty marketplace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marketplace populated with every `sample_*` collection.
    pub fn sample() -> Self {
        Self {
            data: Mutex::new(MarketplaceData {
                jobs: sample_listings(),
                applications: sample_applications(),
                notifications: sample_notifications(),
                messages: sample_messages(),
                ratings: sample_ratings(),
                payments: sample_payments(),
            }),
            ..Self::default()
        }
    }

    /// Delay every port call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replace the stored listings.
    pub fn set_jobs(&self, jobs: Vec<JobListing>) {
        lock(&self.data).jobs = jobs;
    }

    /// Make calls backing `key` fail with [`SourceError::Unavailable`].
    pub fn fail(&self, key: SourceKey) {
        lock(&self.failing).insert(key);
    }

    /// Undo [`Self::fail`].
    pub fn recover(&self, key: SourceKey) {
        lock(&self.failing).remove(&key);
    }

    /// Number of calls made to `operation`.
    pub fn calls(&self, operation: &str) -> usize {
        lock(&self.calls).get(operation).copied().unwrap_or(0)
    }

    async fn enter(&self, operation: &'static str, key: SourceKey) -> Result<(), SourceError> {
        *lock(&self.calls).entry(operation).or_insert(0) += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if lock(&self.failing).contains(&key) {
            return Err(SourceError::unavailable(format!("{operation} is offline")));
        }
        Ok(())
    }
}

fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
    let skip = usize::try_from(request.page.saturating_sub(1))
        .unwrap_or(usize::MAX)
        .saturating_mul(limit);
    Page {
        items: items.iter().skip(skip).take(limit).cloned().collect(),
        page: request.page,
        limit: request.limit,
        total: items.len() as u64,
    }
}

#[async_trait]
impl JobSource for InMemoryMarketplace {
    async fn list_recent(&self, limit: u32) -> Result<Vec<JobListing>, SourceError> {
        self.enter("list_recent", SourceKey::RecentJobs).await?;
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(lock(&self.data).jobs.iter().take(take).cloned().collect())
    }

    async fn get(&self, id: &JobId) -> Result<Option<JobListing>, SourceError> {
        self.enter("get_job", SourceKey::RecentJobs).await?;
        Ok(lock(&self.data).jobs.iter().find(|job| &job.id == id).cloned())
    }

    async fn list_by_owner(&self, owner: &SubjectId) -> Result<Vec<JobListing>, SourceError> {
        self.enter("list_by_owner", SourceKey::MyJobs).await?;
        Ok(lock(&self.data)
            .jobs
            .iter()
            .filter(|job| job.owner_id.as_ref() == Some(owner))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ApplicationSource for InMemoryMarketplace {
    async fn list_for_student(
        &self,
        student: &SubjectId,
    ) -> Result<Vec<Application>, SourceError> {
        self.enter("list_for_student", SourceKey::Applications).await?;
        Ok(lock(&self.data)
            .applications
            .iter()
            .filter(|application| &application.student_id == student)
            .cloned()
            .collect())
    }

    async fn list_for_listing(&self, listing: &JobId) -> Result<Vec<Application>, SourceError> {
        self.enter("list_for_listing", SourceKey::Applications).await?;
        Ok(lock(&self.data)
            .applications
            .iter()
            .filter(|application| &application.job_id == listing)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationSource for InMemoryMarketplace {
    async fn list(
        &self,
        _subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Notification>, SourceError> {
        self.enter("list_notifications", SourceKey::Notifications)
            .await?;
        Ok(paginate(&lock(&self.data).notifications, page))
    }

    async fn unread_count(&self, _subject: &SubjectId) -> Result<u32, SourceError> {
        self.enter("unread_count", SourceKey::Notifications).await?;
        let unread = count_unread(&lock(&self.data).notifications);
        Ok(u32::try_from(unread).unwrap_or(u32::MAX))
    }
}

#[async_trait]
impl MessageSource for InMemoryMarketplace {
    async fn list_unread(&self, subject: &SubjectId) -> Result<Vec<Message>, SourceError> {
        self.enter("list_unread", SourceKey::UnreadMessages).await?;
        Ok(lock(&self.data)
            .messages
            .iter()
            .filter(|message| &message.recipient_id == subject && !message.read)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RatingSource for InMemoryMarketplace {
    async fn list(
        &self,
        subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Rating>, SourceError> {
        self.enter("list_ratings", SourceKey::Ratings).await?;
        let received: Vec<Rating> = lock(&self.data)
            .ratings
            .iter()
            .filter(|rating| &rating.ratee_id == subject)
            .cloned()
            .collect();
        Ok(paginate(&received, page))
    }

    async fn stats(&self, subject: &SubjectId) -> Result<RatingStats, SourceError> {
        self.enter("rating_stats", SourceKey::Ratings).await?;
        let data = lock(&self.data);
        Ok(RatingStats::from_scores(
            data.ratings
                .iter()
                .filter(|rating| &rating.ratee_id == subject)
                .map(|rating| rating.score),
        ))
    }
}

#[async_trait]
impl PaymentSource for InMemoryMarketplace {
    async fn list(
        &self,
        subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Payment>, SourceError> {
        self.enter("list_payments", SourceKey::Payments).await?;
        let involved: Vec<Payment> = lock(&self.data)
            .payments
            .iter()
            .filter(|payment| &payment.payer_id == subject || &payment.payee_id == subject)
            .cloned()
            .collect();
        Ok(paginate(&involved, page))
    }
}

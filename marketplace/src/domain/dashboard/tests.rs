//! Service-level coverage for dashboard assembly.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockRatingSource;
use crate::domain::{ApplicationStatus, FailureKind, RatingStats, SourceKey};
use crate::test_support::{
    FixedClock, InMemoryMarketplace, sample_employer, sample_student, sample_time,
};

fn ports_over(marketplace: &Arc<InMemoryMarketplace>) -> DashboardPorts {
    DashboardPorts {
        jobs: marketplace.clone(),
        applications: marketplace.clone(),
        notifications: marketplace.clone(),
        messages: marketplace.clone(),
        ratings: marketplace.clone(),
        payments: marketplace.clone(),
    }
}

fn service_over(marketplace: &Arc<InMemoryMarketplace>) -> DashboardService {
    DashboardService::new(
        ports_over(marketplace),
        DashboardSettings::default(),
        Arc::new(FixedClock::new(sample_time())),
    )
}

#[fixture]
fn marketplace() -> Arc<InMemoryMarketplace> {
    Arc::new(InMemoryMarketplace::sample())
}

#[rstest]
fn sources_follow_role_order(marketplace: Arc<InMemoryMarketplace>) {
    let service = service_over(&marketplace);

    let student: Vec<_> = service
        .sources_for(Role::Student)
        .iter()
        .map(|source| source.key())
        .collect();
    let employer: Vec<_> = service
        .sources_for(Role::Employer)
        .iter()
        .map(|source| source.key())
        .collect();

    assert_eq!(student, STUDENT_SOURCES);
    assert_eq!(employer, EMPLOYER_SOURCES);
}

#[rstest]
#[tokio::test]
async fn student_dashboard_derives_every_metric(marketplace: Arc<InMemoryMarketplace>) {
    let model = service_over(&marketplace)
        .build_student_dashboard(&sample_student())
        .await
        .expect("dashboard builds");

    assert_eq!(model.recent_jobs.len(), 5);
    assert_eq!(model.open_recent_job_count, 3);
    assert_eq!(model.application_counts.get(ApplicationStatus::Submitted), 2);
    assert_eq!(model.application_counts.get(ApplicationStatus::UnderReview), 1);
    assert_eq!(model.application_counts.get(ApplicationStatus::Selected), 1);
    assert_eq!(model.application_counts.total(), 4);
    assert_eq!(model.unread_notification_count, 2);
    assert_eq!(model.unread_message_count, 2);
    assert_eq!(model.rating_stats, RatingStats {
        count: 2,
        average_tenths: 45
    });
    assert_eq!(model.payments_total, 2000);
    assert!(model.warnings.is_empty());
}

#[rstest]
#[tokio::test]
async fn employer_dashboard_derives_every_metric(marketplace: Arc<InMemoryMarketplace>) {
    let model = service_over(&marketplace)
        .build_employer_dashboard(&sample_employer())
        .await
        .expect("dashboard builds");

    assert_eq!(model.total_job_count, 4);
    assert_eq!(model.active_job_count, 3);
    assert_eq!(model.full_job_count, 1);
    assert_eq!(model.total_applicants, 15);
    assert_eq!(model.unread_message_count, 1);
    assert_eq!(model.rating_stats.to_string(), "3.0");
    assert_eq!(model.completed_payments_total, 1700);
    assert!(model.warnings.is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_payments_leave_application_counts_intact(marketplace: Arc<InMemoryMarketplace>) {
    marketplace.fail(SourceKey::Payments);

    let model = service_over(&marketplace)
        .build_student_dashboard(&sample_student())
        .await
        .expect("dashboard builds");

    assert_eq!(model.application_counts.total(), 4);
    assert!(model.payments.is_empty());
    assert_eq!(model.payments_total, 0);
    assert_eq!(model.warnings.len(), 1);
    assert_eq!(model.warnings[0].key, SourceKey::Payments);
    assert_eq!(model.warnings[0].kind, FailureKind::Unavailable);
    assert_eq!(model.warning_notices(), ["payments are currently unavailable"]);
}

#[rstest]
#[tokio::test]
async fn failed_owned_jobs_zero_job_metrics_only(marketplace: Arc<InMemoryMarketplace>) {
    marketplace.fail(SourceKey::MyJobs);

    let model = service_over(&marketplace)
        .build_employer_dashboard(&sample_employer())
        .await
        .expect("dashboard builds");

    assert_eq!(model.total_job_count, 0);
    assert_eq!(model.total_applicants, 0);
    assert_eq!(model.completed_payments_total, 1700);
    assert_eq!(model.warning_notices(), ["your job postings are currently unavailable"]);
}

#[rstest]
#[tokio::test]
async fn role_dispatch_tags_the_model(marketplace: Arc<InMemoryMarketplace>) {
    let service = service_over(&marketplace);

    let employer = service
        .build(&Subject::employer(sample_employer()))
        .await
        .expect("dashboard builds");

    assert_eq!(employer.role(), Role::Employer);
    let json = serde_json::to_value(&employer).expect("serialise");
    assert_eq!(json["role"], "employer");
    assert_eq!(json["totalApplicants"], 15);
}

#[tokio::test]
async fn fixture_ports_build_an_empty_dashboard() {
    let service = DashboardService::new(
        DashboardPorts::fixtures(),
        DashboardSettings::default(),
        Arc::new(FixedClock::new(sample_time())),
    );

    let model = service
        .build_student_dashboard(&sample_student())
        .await
        .expect("dashboard builds");

    assert!(model.recent_jobs.is_empty());
    assert_eq!(model.application_counts.total(), 0);
    assert!(model.warnings.is_empty());
}

#[tokio::test]
async fn ratings_are_read_from_the_first_page() {
    let mut ratings = MockRatingSource::new();
    ratings
        .expect_list()
        .withf(|_, page| page.page == 1 && page.limit == 7)
        .times(1)
        .returning(|_, page| Ok(crate::domain::ports::Page::empty(page)));
    ratings.expect_stats().never();
    let ports = DashboardPorts {
        ratings: Arc::new(ratings),
        ..DashboardPorts::fixtures()
    };
    let settings = DashboardSettings {
        page_size: 7,
        ..DashboardSettings::default()
    };
    let service = DashboardService::new(ports, settings, Arc::new(FixedClock::new(sample_time())));

    let model = service
        .build_employer_dashboard(&sample_employer())
        .await
        .expect("dashboard builds");

    assert_eq!(model.rating_stats, RatingStats::default());
}

#[rstest]
#[tokio::test]
async fn unread_poll_keeps_previous_value_for_failed_count(marketplace: Arc<InMemoryMarketplace>) {
    let service = service_over(&marketplace);
    let first = service
        .poll_unread(&sample_student(), UnreadCounts::default())
        .await;
    assert_eq!(first, UnreadCounts {
        notifications: 2,
        messages: 2,
        polled_at: Some(sample_time()),
    });

    marketplace.fail(SourceKey::Notifications);
    marketplace.fail(SourceKey::UnreadMessages);
    let previous = UnreadCounts {
        notifications: 9,
        messages: 4,
        polled_at: None,
    };
    let second = service.poll_unread(&sample_student(), previous).await;

    assert_eq!(second.notifications, 9);
    assert_eq!(second.messages, 4);
    assert_eq!(second.polled_at, Some(sample_time()));
}

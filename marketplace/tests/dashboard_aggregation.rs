//! Integration tests for dashboard aggregation and the view lifecycle.
//!
//! Uses the in-memory marketplace from `test_support` with paused Tokio time
//! so latency and polling intervals are deterministic.

use std::sync::Arc;
use std::time::Duration;

use marketplace::domain::ports::SourceError;
use marketplace::domain::{
    DashboardError, DashboardModel, DashboardPorts, DashboardService, DashboardSettings,
    DashboardView, DataSource, FailureKind, JobListing, Notification, PartialFailureAggregator,
    SourceKey, Subject,
};
use marketplace::test_support::{
    FixedClock, InMemoryMarketplace, StaticDataSource, sample_employer, sample_listings,
    sample_notifications, sample_student, sample_time,
};

fn service_over(marketplace: &Arc<InMemoryMarketplace>) -> Arc<DashboardService> {
    let ports = DashboardPorts {
        jobs: marketplace.clone(),
        applications: marketplace.clone(),
        notifications: marketplace.clone(),
        messages: marketplace.clone(),
        ratings: marketplace.clone(),
        payments: marketplace.clone(),
    };
    Arc::new(DashboardService::new(
        ports,
        DashboardSettings::default(),
        Arc::new(FixedClock::new(sample_time())),
    ))
}

#[tokio::test]
async fn failing_middle_source_leaves_neighbours_intact() {
    let jobs = Arc::new(StaticDataSource::ok(SourceKey::RecentJobs, sample_listings()));
    let applications = Arc::new(StaticDataSource::failing(
        SourceKey::Applications,
        SourceError::unavailable("applications service down"),
    ));
    let notifications = Arc::new(StaticDataSource::ok(
        SourceKey::Notifications,
        sample_notifications(),
    ));
    let sources: Vec<Arc<dyn DataSource>> =
        vec![jobs.clone(), applications.clone(), notifications.clone()];

    let composite = PartialFailureAggregator::default()
        .aggregate(&sample_student(), &sources)
        .await
        .expect("aggregation should succeed");

    let keys: Vec<SourceKey> = composite.entries().iter().map(|entry| entry.key).collect();
    assert_eq!(keys, [
        SourceKey::RecentJobs,
        SourceKey::Applications,
        SourceKey::Notifications
    ]);
    assert_eq!(composite.items::<JobListing>(SourceKey::RecentJobs).len(), 8);
    assert_eq!(
        composite
            .items::<Notification>(SourceKey::Notifications)
            .len(),
        3
    );

    let failures: Vec<_> = composite.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].key, SourceKey::Applications);
    assert_eq!(failures[0].kind, FailureKind::Unavailable);
    assert!(!composite.is_complete());

    assert_eq!(
        (jobs.calls(), applications.calls(), notifications.calls()),
        (1, 1, 1)
    );
}

#[tokio::test]
async fn employer_metrics_survive_a_failing_ratings_source() {
    let marketplace = Arc::new(InMemoryMarketplace::sample());
    marketplace.fail(SourceKey::Ratings);
    let service = service_over(&marketplace);

    let model = service
        .build(&Subject::employer(sample_employer()))
        .await
        .expect("dashboard should build");

    let DashboardModel::Employer(employer) = model else {
        panic!("expected an employer dashboard");
    };
    assert_eq!(employer.total_applicants, 15);
    assert_eq!(employer.total_job_count, 4);
    assert_eq!(employer.rating_stats.count, 0);
    let notices: Vec<String> = employer.warnings.iter().map(|w| w.notice()).collect();
    assert_eq!(notices, ["ratings are currently unavailable"]);
}

#[tokio::test(start_paused = true)]
async fn concurrent_refreshes_collapse_into_one_follow_up() {
    let marketplace =
        Arc::new(InMemoryMarketplace::sample().with_latency(Duration::from_millis(200)));
    let view = DashboardView::new(
        service_over(&marketplace),
        Subject::student(sample_student()),
    );

    let (first, second, third) = tokio::join!(view.refresh(), view.refresh(), view.refresh());

    let generations = [
        first.expect("first refresh").generation,
        second.expect("second refresh").generation,
        third.expect("third refresh").generation,
    ];
    assert_eq!(generations, [1, 3, 3]);
    assert_eq!(marketplace.calls("list_recent"), 2);
    assert_eq!(view.current().map(|snapshot| snapshot.generation), Some(3));
}

#[tokio::test(start_paused = true)]
async fn load_reuses_the_published_snapshot() {
    let marketplace = Arc::new(InMemoryMarketplace::sample());
    let view = DashboardView::new(
        service_over(&marketplace),
        Subject::student(sample_student()),
    );

    let loaded = view.load().await.expect("initial load");
    let again = view.load().await.expect("second load");

    assert!(Arc::ptr_eq(&loaded, &again));
    assert_eq!(marketplace.calls("list_recent"), 1);
}

#[tokio::test(start_paused = true)]
async fn dispose_discards_an_in_flight_refresh() {
    let marketplace =
        Arc::new(InMemoryMarketplace::sample().with_latency(Duration::from_millis(500)));
    let view = DashboardView::new(
        service_over(&marketplace),
        Subject::student(sample_student()),
    );

    let (outcome, ()) = tokio::join!(view.refresh(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        view.dispose();
    });

    assert_eq!(outcome, Err(DashboardError::Disposed));
    assert!(view.current().is_none());
    assert_eq!(view.refresh().await, Err(DashboardError::Disposed));
}

#[tokio::test(start_paused = true)]
async fn polling_stops_after_dispose() {
    let marketplace = Arc::new(InMemoryMarketplace::sample());
    let view = DashboardView::new(
        service_over(&marketplace),
        Subject::student(sample_student()),
    );

    view.start_polling(Duration::from_secs(30))
        .expect("polling should start");
    tokio::time::sleep(Duration::from_secs(65)).await;

    let polls_before_dispose = marketplace.calls("unread_count");
    assert!(polls_before_dispose >= 2, "got {polls_before_dispose} polls");
    let counts = view.unread_counts();
    assert_eq!((counts.notifications, counts.messages), (2, 2));

    view.dispose();
    view.dispose();
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert!(!view.is_polling());
    assert_eq!(marketplace.calls("unread_count"), polls_before_dispose);
    assert_eq!(
        view.start_polling(Duration::from_secs(30)),
        Err(DashboardError::Disposed)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dispose_racing_start_polling_leaves_no_poller() {
    let marketplace = Arc::new(InMemoryMarketplace::sample());
    let service = service_over(&marketplace);

    for _ in 0..200 {
        let view = Arc::new(DashboardView::new(
            Arc::clone(&service),
            Subject::student(sample_student()),
        ));
        let starter = {
            let view = Arc::clone(&view);
            tokio::spawn(async move { view.start_polling(Duration::from_secs(3600)) })
        };
        let disposer = {
            let view = Arc::clone(&view);
            tokio::spawn(async move { view.dispose() })
        };

        let started = starter.await.expect("start task should finish");
        disposer.await.expect("dispose task should finish");

        assert!(view.is_disposed());
        assert!(!view.is_polling(), "poller survived dispose: {started:?}");
    }
}

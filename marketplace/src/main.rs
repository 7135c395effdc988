//! Command-line entry point: renders dashboards, runs job searches, and
//! toggles saved listings against the configured backend.

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::config::ClientSettings;
use marketplace::domain::ports::JobSource;
use marketplace::domain::{
    DashboardPorts, DashboardService, DashboardView, FacetSelection, JobId, JobType, PayType,
    Role, SavedSelectionStore, Subject, SubjectId, filter, parse_pay_bound,
};
use marketplace::outbound::http::HttpMarketplaceClient;
use marketplace::outbound::storage::FileKeyValueStore;

#[derive(Debug, Parser)]
#[command(name = "marketplace-dashboard", about = "Marketplace dashboard client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Aggregate and print the dashboard for a subject.
    Dashboard {
        #[arg(long)]
        subject_id: SubjectId,
        #[arg(long, default_value = "student")]
        role: Role,
        /// Keep polling unread counts until interrupted.
        #[arg(long)]
        poll: bool,
    },
    /// Filter recent listings by facet.
    Search {
        #[arg(long, default_value = "")]
        term: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long = "job-type")]
        job_types: Vec<JobType>,
        #[arg(long = "pay-type")]
        pay_types: Vec<PayType>,
        #[arg(long = "skill")]
        skills: Vec<String>,
        #[arg(long, default_value = "")]
        min_pay: String,
        #[arg(long, default_value = "")]
        max_pay: String,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Save or unsave a listing for a subject.
    ToggleSaved {
        #[arg(long)]
        subject_id: SubjectId,
        #[arg(long)]
        job_id: String,
    },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("marketplace-dashboard")])
        .map_err(|e| io::Error::other(format!("failed to load configuration: {e}")))?;

    let runtime = Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(cli.command, settings))
}

async fn run(command: Command, settings: ClientSettings) -> io::Result<()> {
    match command {
        Command::Dashboard {
            subject_id,
            role,
            poll,
        } => show_dashboard(&settings, Subject::new(subject_id, role), poll).await,
        Command::Search {
            term,
            location,
            job_types,
            pay_types,
            skills,
            min_pay,
            max_pay,
            limit,
        } => {
            let mut facets = FacetSelection::new()
                .with_term(term)
                .with_location(location);
            facets.job_types.extend(job_types);
            facets.pay_types.extend(pay_types);
            for skill in skills {
                facets = facets.with_skill(skill);
            }
            facets.min_pay = parse_pay_bound(&min_pay);
            facets.max_pay = parse_pay_bound(&max_pay);
            search(&settings, &facets, limit).await
        }
        Command::ToggleSaved { subject_id, job_id } => {
            toggle_saved(&settings, &subject_id, &JobId::new(job_id))
        }
    }
}

fn http_client(settings: &ClientSettings) -> io::Result<Arc<HttpMarketplaceClient>> {
    let base_url = settings.api_base_url().map_err(io::Error::other)?;
    let client =
        HttpMarketplaceClient::new(base_url, settings.request_timeout(), settings.api_token())
            .map_err(|e| io::Error::other(format!("failed to build HTTP client: {e}")))?;
    Ok(Arc::new(client))
}

async fn show_dashboard(settings: &ClientSettings, subject: Subject, poll: bool) -> io::Result<()> {
    let client = http_client(settings)?;
    let ports = DashboardPorts {
        jobs: client.clone(),
        applications: client.clone(),
        notifications: client.clone(),
        messages: client.clone(),
        ratings: client.clone(),
        payments: client,
    };
    let service = Arc::new(DashboardService::new(
        ports,
        settings.dashboard_settings(),
        Arc::new(DefaultClock),
    ));
    let view = DashboardView::new(service, subject);

    let snapshot = view.load().await.map_err(io::Error::other)?;
    for failure in snapshot.model.warnings() {
        warn!(source = failure.key.as_str(), notice = %failure.notice(), "dashboard source failed");
    }
    print_json(&*snapshot)?;

    if poll {
        view.start_polling(settings.unread_poll_interval())
            .map_err(io::Error::other)?;
        let mut unread = view.subscribe_unread();
        loop {
            tokio::select! {
                changed = unread.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let counts = *unread.borrow_and_update();
                    print_json(&counts)?;
                }
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    info!("interrupted; stopping unread polling");
                    break;
                }
            }
        }
    }
    view.dispose();
    Ok(())
}

async fn search(settings: &ClientSettings, facets: &FacetSelection, limit: u32) -> io::Result<()> {
    let client = http_client(settings)?;
    let listings = client
        .list_recent(limit)
        .await
        .map_err(io::Error::other)?;
    let results = filter(&listings, facets);
    info!(
        candidates = listings.len(),
        matched = results.len(),
        facets = facets.active_facet_count(),
        "job search complete"
    );
    print_json(&results)
}

fn toggle_saved(settings: &ClientSettings, subject: &SubjectId, listing: &JobId) -> io::Result<()> {
    let dir = settings.storage_dir().map_err(io::Error::other)?;
    let storage = Arc::new(FileKeyValueStore::open(&dir).map_err(io::Error::other)?);
    let store = SavedSelectionStore::new(storage);
    let saved = store
        .toggle(subject, listing)
        .map_err(io::Error::other)?;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ToggleOutcome<'a> {
        job_id: &'a JobId,
        saved: bool,
    }
    print_json(&ToggleOutcome {
        job_id: listing,
        saved,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{rendered}");
    Ok(())
}

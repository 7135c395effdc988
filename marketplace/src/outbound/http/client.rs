//! Reqwest-backed adapter for the marketplace REST backend.
//!
//! This adapter owns transport details only: URL building, bearer
//! authentication, HTTP error mapping, and envelope decoding. It never retries;
//! a failed call surfaces as a [`SourceError`] and the dashboard records it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{ApiEnvelope, CountDto, PageDto, RatingStatsDto};
use crate::domain::ports::{
    ApplicationSource, JobSource, MessageSource, NotificationSource, Page, PageRequest,
    PaymentSource, RatingSource, SourceError,
};
use crate::domain::{
    Application, JobId, JobListing, Message, Notification, Payment, Rating, RatingStats, SubjectId,
};

/// Marketplace client implementing every read port over HTTP.
pub struct HttpMarketplaceClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpMarketplaceClient {
    /// Build a client rooted at `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::rejected(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_raw(&self, url: Url) -> Result<(StatusCode, Vec<u8>), SourceError> {
        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "marketplace request failed");
        }
        Ok((status, body.to_vec()))
    }

    async fn get_data<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let (status, body) = self.get_raw(url).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        decode_data(&body)
    }

    async fn get_optional_data<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>, SourceError> {
        let (status, body) = self.get_raw(url).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        decode_data(&body).map(Some)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        subject: &SubjectId,
        request: PageRequest,
    ) -> Result<Page<T>, SourceError> {
        let url = self.endpoint(&[resource], &[
            ("userId", subject.to_string()),
            ("page", request.page.to_string()),
            ("limit", request.limit.to_string()),
        ])?;
        let page: PageDto<T> = self.get_data(url).await?;
        Ok(page.into_page(request))
    }
}

#[async_trait]
impl JobSource for HttpMarketplaceClient {
    async fn list_recent(&self, limit: u32) -> Result<Vec<JobListing>, SourceError> {
        let url = self.endpoint(&["jobs"], &[
            ("sort", "newest".to_owned()),
            ("limit", limit.to_string()),
        ])?;
        self.get_data(url).await
    }

    async fn get(&self, id: &JobId) -> Result<Option<JobListing>, SourceError> {
        let url = self.endpoint(&["jobs", id.as_str()], &[])?;
        self.get_optional_data(url).await
    }

    async fn list_by_owner(&self, owner: &SubjectId) -> Result<Vec<JobListing>, SourceError> {
        let url = self.endpoint(&["jobs"], &[("employerId", owner.to_string())])?;
        self.get_data(url).await
    }
}

#[async_trait]
impl ApplicationSource for HttpMarketplaceClient {
    async fn list_for_student(
        &self,
        student: &SubjectId,
    ) -> Result<Vec<Application>, SourceError> {
        let url = self.endpoint(&["applications"], &[("studentId", student.to_string())])?;
        self.get_data(url).await
    }

    async fn list_for_listing(&self, listing: &JobId) -> Result<Vec<Application>, SourceError> {
        let url = self.endpoint(&["jobs", listing.as_str(), "applications"], &[])?;
        self.get_data(url).await
    }
}

#[async_trait]
impl NotificationSource for HttpMarketplaceClient {
    async fn list(
        &self,
        subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Notification>, SourceError> {
        self.get_page("notifications", subject, page).await
    }

    async fn unread_count(&self, subject: &SubjectId) -> Result<u32, SourceError> {
        let url = self.endpoint(&["notifications", "unread-count"], &[(
            "userId",
            subject.to_string(),
        )])?;
        let count: CountDto = self.get_data(url).await?;
        Ok(count.count)
    }
}

#[async_trait]
impl MessageSource for HttpMarketplaceClient {
    async fn list_unread(&self, subject: &SubjectId) -> Result<Vec<Message>, SourceError> {
        let url = self.endpoint(&["messages", "unread"], &[("userId", subject.to_string())])?;
        self.get_data(url).await
    }
}

#[async_trait]
impl RatingSource for HttpMarketplaceClient {
    async fn list(
        &self,
        subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Rating>, SourceError> {
        self.get_page("ratings", subject, page).await
    }

    async fn stats(&self, subject: &SubjectId) -> Result<RatingStats, SourceError> {
        let url = self.endpoint(&["ratings", "stats"], &[("userId", subject.to_string())])?;
        let stats: RatingStatsDto = self.get_data(url).await?;
        Ok(stats.into_domain())
    }
}

#[async_trait]
impl PaymentSource for HttpMarketplaceClient {
    async fn list(
        &self,
        subject: &SubjectId,
        page: PageRequest,
    ) -> Result<Page<Payment>, SourceError> {
        self.get_page("payments", subject, page).await
    }
}

fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<T, SourceError> {
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body).map_err(|error| {
        SourceError::decode(format!("invalid marketplace JSON payload: {error}"))
    })?;
    Ok(envelope.data)
}

fn map_transport_error(error: reqwest::Error) -> SourceError {
    if error.is_timeout() {
        SourceError::timeout(error.to_string())
    } else if error.is_decode() {
        SourceError::decode(error.to_string())
    } else {
        SourceError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> SourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SourceError::unauthorized(message),
        StatusCode::NOT_FOUND => SourceError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => SourceError::timeout(message),
        _ if status.is_client_error() => SourceError::rejected(message),
        _ => SourceError::unavailable(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

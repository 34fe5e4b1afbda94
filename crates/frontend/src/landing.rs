use std::sync::Arc;
use std::time::Duration;

use api_client::{ApiClient, ClientError, HttpTransport, Transport};
use async_trait::async_trait;
use models::{HelpRequestPayload, LandingContributionPayload, SubscribePayload, VotePayload};
use render::landing::{LANDING_LEDGER_LOADING, REQUESTS_LOADING};
use render::{render_help_requests, render_landing_ledger, stat_tiles, Formatter, LandingLimits};

use crate::input::{parse_float, positive_amount};
use crate::page::{Alerts, Container, FormData, TextCell};
use crate::poll::{spawn_poll, PollHandle, Refresh};

/// The four `data-stat` tiles.
#[derive(Debug, Clone, Default)]
pub struct StatCells {
    pub balance: TextCell,
    pub distributed: TextCell,
    pub stories: TextCell,
    pub contributors: TextCell,
}

/// Signal bank landing page: stats, live ledger, help requests and the three
/// forms, kept fresh by a poll loop.
pub struct LandingPage<T = HttpTransport> {
    api: ApiClient<T>,
    fmt: Formatter,
    limits: LandingLimits,
    stats: StatCells,
    ledger: Container,
    requests: Container,
    alerts: Alerts,
}

impl<T: Transport> LandingPage<T> {
    pub fn new(api: ApiClient<T>, fmt: Formatter, limits: LandingLimits) -> Self {
        Self {
            api,
            fmt,
            limits,
            stats: StatCells::default(),
            ledger: Container::new(),
            requests: Container::new(),
            alerts: Alerts::new(),
        }
    }

    pub fn stats(&self) -> &StatCells {
        &self.stats
    }

    pub fn ledger(&self) -> &Container {
        &self.ledger
    }

    pub fn requests(&self) -> &Container {
        &self.requests
    }

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    /// Stats are optional: on any failure the tiles keep their text.
    pub async fn load_stats(&self) {
        match self.api.fetch_stats().await {
            Ok(stats) => {
                let tiles = stat_tiles(&stats, &self.fmt);
                self.stats.balance.set(tiles.balance).await;
                self.stats.distributed.set(tiles.distributed).await;
                self.stats.stories.set(tiles.stories).await;
                self.stats.contributors.set(tiles.contributors).await;
            }
            Err(err) => {
                tracing::debug!(error = %err, "Stats service not available yet");
            }
        }
    }

    pub async fn load_ledger(&self) {
        let ticket = self.ledger.ticket();
        match self.api.list_landing_contributions().await {
            Ok(contributions) => {
                let html = render_landing_ledger(&contributions, &self.limits, &self.fmt);
                self.ledger.commit(ticket, html).await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Error loading ledger");
                self.ledger.commit_placeholder(ticket, LANDING_LEDGER_LOADING).await;
            }
        }
    }

    pub async fn load_requests(&self) {
        let ticket = self.requests.ticket();
        match self.api.list_help_requests().await {
            Ok(requests) => {
                let html = render_help_requests(&requests, &self.limits, &self.fmt);
                self.requests.commit(ticket, html).await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Error loading requests");
                self.requests.commit_placeholder(ticket, REQUESTS_LOADING).await;
            }
        }
    }

    /// Stats, then ledger, then requests, one after the other.
    pub async fn refresh_all(&self) {
        self.load_stats().await;
        self.load_ledger().await;
        self.load_requests().await;
    }

    pub async fn contribute(&self, form: &mut FormData) {
        let Some(amount) = positive_amount(form.get("amount")) else {
            self.alerts.show("Please enter a valid amount").await;
            return;
        };

        let payload = LandingContributionPayload {
            email: form.get("email").unwrap_or_default().to_string(),
            amount,
            message: form.get("message").unwrap_or_default().to_string(),
        };

        match self.api.contribute(&payload).await {
            Ok(()) => {
                self.alerts.show("Thank you for your contribution! 🎉").await;
                form.reset();
                self.load_stats().await;
            }
            Err(err) => {
                self.report(&err, "Error submitting contribution").await;
            }
        }
    }

    pub async fn submit_request(&self, form: &mut FormData) {
        let required = |name: &str| form.get(name).filter(|v| !v.is_empty()).map(str::to_string);
        let (Some(name), Some(email), Some(story)) =
            (required("name"), required("email"), required("story"))
        else {
            self.alerts.show("Please fill in all required fields").await;
            return;
        };

        let payload = HelpRequestPayload {
            name,
            email,
            story,
            video_url: form.get("videoUrl").unwrap_or_default().to_string(),
            amount: parse_float(form.get("amount")).unwrap_or(0.0),
        };

        match self.api.submit_help_request(&payload).await {
            Ok(()) => {
                self.alerts
                    .show("Your request has been submitted! Our team will review it shortly.")
                    .await;
                form.reset();
                self.load_stats().await;
            }
            Err(err) => {
                self.report(&err, "Error submitting request").await;
            }
        }
    }

    pub async fn subscribe(&self, form: &mut FormData) {
        let email = form.get("email").unwrap_or_default().to_string();
        if email.is_empty() {
            self.alerts.show("Please enter an email").await;
            return;
        }

        match self.api.subscribe(&SubscribePayload { email }).await {
            Ok(()) => {
                self.alerts.show("Successfully subscribed! ✨").await;
                form.reset();
            }
            Err(err @ ClientError::Status { .. }) => {
                tracing::warn!(error = %err, "subscribe rejected");
                self.alerts.show("Subscription failed. Please try again.").await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "subscribe failed");
                self.alerts.show("Error subscribing").await;
            }
        }
    }

    pub async fn vote(&self, request_id: &str) {
        let payload = VotePayload { request_id: request_id.to_string() };
        match self.api.vote(&payload).await {
            Ok(()) => {
                self.alerts.show("Vote recorded! Thank you.").await;
                self.load_stats().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, request_id, "Error voting");
            }
        }
    }

    /// Non-OK answers get the retry text; transport failures get `failed`.
    async fn report(&self, err: &ClientError, failed: &str) {
        tracing::warn!(error = %err, "landing form submission failed");
        if err.status().is_some() {
            self.alerts.show("Something went wrong. Please try again.").await;
        } else {
            self.alerts.show(failed).await;
        }
    }
}

impl<T: Transport + 'static> LandingPage<T> {
    /// Initial population, then polling every `period` until the handle is stopped.
    pub async fn start(page: Arc<Self>, period: Duration) -> PollHandle {
        page.refresh_all().await;
        spawn_poll(page, period)
    }
}

#[async_trait]
impl<T: Transport + 'static> Refresh for LandingPage<T> {
    async fn refresh(&self) {
        self.refresh_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::{ApiBase, Method, MockTransport};
    use serde_json::json;

    fn page(mock: Arc<MockTransport>) -> LandingPage<MockTransport> {
        let base = ApiBase::parse("http://localhost:8081/api").unwrap();
        LandingPage::new(
            ApiClient::new(mock, base),
            Formatter::default(),
            LandingLimits::default(),
        )
    }

    const STATS: &str = r#"{"totalBalance":12500,"distributedPercent":40,"storiesFunded":7,"totalContributors":1234}"#;

    #[tokio::test]
    async fn test_stats_fill_tiles() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(Method::Get, "/api/stats", 200, STATS);
        let landing = page(mock);

        landing.load_stats().await;

        assert_eq!(landing.stats().balance.get().await, "$12,500");
        assert_eq!(landing.stats().distributed.get().await, "40%");
        assert_eq!(landing.stats().stories.get().await, "7");
        assert_eq!(landing.stats().contributors.get().await, "1,234");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_ledger_reply_cannot_overwrite_newer_one() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_after(
            Duration::from_secs(5),
            Method::Get,
            "/api/contribute",
            200,
            r#"[{"email":"old@x.org","amount":1,"timestamp":"2024-03-01T00:00:00Z"}]"#,
        );
        mock.respond_after(
            Duration::from_secs(1),
            Method::Get,
            "/api/contribute",
            200,
            r#"[{"email":"new@x.org","amount":2,"timestamp":"2024-03-02T00:00:00Z"}]"#,
        );
        let landing = page(mock.clone());

        tokio::join!(landing.load_ledger(), landing.load_ledger());

        let html = landing.ledger().html().await;
        assert!(html.contains("@new"));
        assert!(!html.contains("@old"));
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_stats_failure_leaves_tiles() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(Method::Get, "/api/stats", 200, STATS);
        mock.fail(Method::Get, "/api/stats", "connection refused");
        let landing = page(mock);

        landing.load_stats().await;
        landing.load_stats().await;
        assert_eq!(landing.stats().balance.get().await, "$12,500");
    }

    #[tokio::test]
    async fn test_first_failure_shows_loading_placeholders() {
        let mock = Arc::new(MockTransport::new());
        mock.fail(Method::Get, "/api/contribute", "offline");
        mock.respond(Method::Get, "/api/requests", 500, "boom");
        let landing = page(mock);

        landing.refresh_all().await;

        assert_eq!(landing.ledger().html().await, LANDING_LEDGER_LOADING);
        assert_eq!(landing.requests().html().await, REQUESTS_LOADING);
    }

    #[tokio::test]
    async fn test_later_failure_keeps_rendered_lists() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(Method::Get, "/api/contribute", 200, "[]");
        mock.respond(Method::Get, "/api/contribute", 500, "");
        let landing = page(mock);

        landing.load_ledger().await;
        landing.load_ledger().await;

        assert_eq!(
            landing.ledger().html().await,
            r#"<div class="ledger-loading">No contributions yet. Be the first!</div>"#
        );
    }

    #[tokio::test]
    async fn test_invalid_contribution_amount_makes_no_call() {
        let mock = Arc::new(MockTransport::new());
        let landing = page(mock.clone());

        for raw in ["0", "-10", "nope"] {
            let mut form = FormData::new().with("email", "a@b.c").with("amount", raw);
            landing.contribute(&mut form).await;
            assert_eq!(landing.alerts().last().await.as_deref(), Some("Please enter a valid amount"));
        }
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_contribution_posts_and_reloads_stats() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(Method::Post, "/api/contribute", 201, "{}");
        mock.respond(Method::Get, "/api/stats", 200, STATS);
        let landing = page(mock.clone());

        let mut form = FormData::new().with("email", "ada@x.io").with("amount", "50");
        landing.contribute(&mut form).await;

        assert_eq!(
            landing.alerts().last().await.as_deref(),
            Some("Thank you for your contribution! 🎉")
        );
        let sent = mock.requests();
        assert_eq!(sent[0].body, Some(json!({"email": "ada@x.io", "amount": 50.0, "message": ""})));
        assert_eq!(sent[1].url.path(), "/api/stats");
        assert!(form.is_pristine());
    }

    #[tokio::test]
    async fn test_contribution_rejected_vs_unreachable() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(Method::Post, "/api/contribute", 400, "Invalid request");
        mock.fail(Method::Post, "/api/contribute", "offline");
        let landing = page(mock);

        let mut form = FormData::new().with("email", "a@b.c").with("amount", "5");
        landing.contribute(&mut form).await;
        landing.contribute(&mut form).await;

        assert_eq!(
            landing.alerts().all().await,
            vec![
                "Something went wrong. Please try again.".to_string(),
                "Error submitting contribution".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_help_request_requires_fields() {
        let mock = Arc::new(MockTransport::new());
        let landing = page(mock.clone());

        let mut form = FormData::new().with("name", "N").with("email", "").with("story", "s");
        landing.submit_request(&mut form).await;

        assert_eq!(
            landing.alerts().last().await.as_deref(),
            Some("Please fill in all required fields")
        );
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_help_request_defaults_amount_to_zero() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(Method::Post, "/api/requests", 201, "{}");
        let landing = page(mock.clone());

        let mut form = FormData::new()
            .with("name", "N")
            .with("email", "n@x")
            .with("story", "please")
            .with("amount", "lots");
        landing.submit_request(&mut form).await;

        assert_eq!(
            mock.requests()[0].body,
            Some(json!({"name": "N", "email": "n@x", "story": "please", "videoUrl": "", "amount": 0.0}))
        );
        assert_eq!(
            landing.alerts().last().await.as_deref(),
            Some("Your request has been submitted! Our team will review it shortly.")
        );
    }

    #[tokio::test]
    async fn test_subscribe_paths() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(Method::Post, "/api/subscribe", 200, "");
        mock.respond(Method::Post, "/api/subscribe", 409, "");
        let landing = page(mock.clone());

        landing.subscribe(&mut FormData::new().with("email", "")).await;
        assert_eq!(landing.alerts().last().await.as_deref(), Some("Please enter an email"));
        assert_eq!(mock.request_count(), 0);

        let mut form = FormData::new().with("email", "a@b.c");
        landing.subscribe(&mut form).await;
        assert_eq!(landing.alerts().last().await.as_deref(), Some("Successfully subscribed! ✨"));

        form.set("email", "a@b.c");
        landing.subscribe(&mut form).await;
        assert_eq!(
            landing.alerts().last().await.as_deref(),
            Some("Subscription failed. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_vote_success_and_silent_rejection() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(Method::Post, "/api/vote", 200, "");
        mock.respond(Method::Post, "/api/vote", 404, "");
        let landing = page(mock.clone());

        landing.vote("r1").await;
        assert_eq!(landing.alerts().all().await, vec!["Vote recorded! Thank you.".to_string()]);
        assert_eq!(mock.requests()[0].body, Some(json!({"requestId": "r1"})));

        landing.vote("r1").await;
        assert_eq!(landing.alerts().all().await.len(), 1);
    }
}

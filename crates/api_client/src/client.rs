use std::sync::Arc;
use std::time::Duration;

use models::{
    AuditionPayload, AuditionQuery, AuditionReceipt, ContributionPayload, ContributionStats,
    HelpRequest, HelpRequestPayload, LandingContribution, LandingContributionPayload, LedgerEntry,
    Submission, SubscribePayload, VotePayload,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::base::ApiBase;
use crate::error::Result;
use crate::transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};

/// Typed access to every endpoint the front ends call.
///
/// Cloning is cheap; clones share the transport.
#[derive(Debug)]
pub struct ApiClient<T = HttpTransport> {
    transport: Arc<T>,
    base: ApiBase,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base: self.base.clone(),
        }
    }
}

impl ApiClient<HttpTransport> {
    pub fn http(base: ApiBase, timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(timeout)?), base))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: Arc<T>, base: ApiBase) -> Self {
        Self { transport, base }
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        let mut url = self.base.endpoint(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let request = ApiRequest { method: Method::Get, url, body: None };
        self.transport.send(request).await?.error_for_status()
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<R> {
        let response = self.get(path, query).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<RawResponse> {
        let request = ApiRequest {
            method: Method::Post,
            url: self.base.endpoint(path)?,
            body: Some(serde_json::to_value(body)?),
        };
        self.transport.send(request).await?.error_for_status()
    }

    // Audition site

    /// GET /auditions?token&country&limit
    pub async fn list_auditions(&self, query: &AuditionQuery) -> Result<Vec<Submission>> {
        self.get_json("auditions", &query.to_pairs()).await
    }

    /// POST /auditions
    pub async fn submit_audition(&self, payload: &AuditionPayload) -> Result<AuditionReceipt> {
        let response = self.post("auditions", payload).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    // Signal bank

    /// GET /signal-bank/contributions
    pub async fn list_contributions(&self) -> Result<Vec<LedgerEntry>> {
        self.get_json("signal-bank/contributions", &[]).await
    }

    /// POST /signal-bank/contributions
    pub async fn record_contribution(&self, payload: &ContributionPayload) -> Result<()> {
        self.post("signal-bank/contributions", payload).await.map(drop)
    }

    // Landing page

    /// GET /stats
    pub async fn fetch_stats(&self) -> Result<ContributionStats> {
        self.get_json("stats", &[]).await
    }

    /// GET /contribute
    pub async fn list_landing_contributions(&self) -> Result<Vec<LandingContribution>> {
        self.get_json::<Option<Vec<LandingContribution>>>("contribute", &[])
            .await
            .map(Option::unwrap_or_default)
    }

    /// POST /contribute
    pub async fn contribute(&self, payload: &LandingContributionPayload) -> Result<()> {
        self.post("contribute", payload).await.map(drop)
    }

    /// GET /requests
    pub async fn list_help_requests(&self) -> Result<Vec<HelpRequest>> {
        self.get_json::<Option<Vec<HelpRequest>>>("requests", &[])
            .await
            .map(Option::unwrap_or_default)
    }

    /// POST /requests
    pub async fn submit_help_request(&self, payload: &HelpRequestPayload) -> Result<()> {
        self.post("requests", payload).await.map(drop)
    }

    /// POST /vote
    pub async fn vote(&self, payload: &VotePayload) -> Result<()> {
        self.post("vote", payload).await.map(drop)
    }

    /// POST /subscribe
    pub async fn subscribe(&self, payload: &SubscribePayload) -> Result<()> {
        self.post("subscribe", payload).await.map(drop)
    }
}

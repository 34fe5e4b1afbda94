use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use models::{
    ContributionPayload, ContributionStats, HelpRequest, HelpRequestPayload, LandingContribution,
    LandingContributionPayload, LedgerEntry, Submission,
};
use std::collections::BTreeSet;
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};

/// Fixed numbers added on top of the live aggregates in `/stats`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsBaseline {
    pub balance: f64,
    pub contributors: u64,
    pub stories_funded: u64,
    pub distributed_percent: f64,
}

impl StatsBaseline {
    /// The figures the public landing page launched with.
    pub fn launch() -> Self {
        Self {
            balance: 48_320.0,
            contributors: 2_847,
            stories_funded: 311,
            distributed_percent: 92.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// When set, listing auditions requires `?token=` to match.
    pub admin_token: Option<String>,
    pub baseline: StatsBaseline,
}

/// Storage behind the mock endpoints.
#[async_trait]
pub trait SignalRepository: Send + Sync {
    async fn add_submission(&self, submission: Submission) -> Result<Submission>;
    async fn list_submissions(&self) -> Result<Vec<Submission>>;
    async fn add_ledger_entry(&self, payload: ContributionPayload) -> Result<LedgerEntry>;
    async fn list_ledger(&self) -> Result<Vec<LedgerEntry>>;
    async fn add_landing_contribution(&self, payload: LandingContributionPayload) -> Result<LandingContribution>;
    async fn list_landing_contributions(&self) -> Result<Vec<LandingContribution>>;
    async fn add_help_request(&self, payload: HelpRequestPayload) -> Result<HelpRequest>;
    async fn list_help_requests(&self) -> Result<Vec<HelpRequest>>;
    async fn record_vote(&self, request_id: &str) -> Result<HelpRequest>;
    async fn add_subscriber(&self, email: &str) -> Result<()>;
    async fn stats(&self) -> Result<ContributionStats>;
}

#[derive(Debug, Default)]
struct Tables {
    submissions: Vec<Submission>,
    ledger: Vec<LedgerEntry>,
    landing: Vec<LandingContribution>,
    requests: Vec<HelpRequest>,
    subscribers: BTreeSet<String>,
}

/// Everything lives in one lock; the mock never holds it across I/O.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
    baseline: StatsBaseline,
}

impl InMemoryRepository {
    pub fn new(baseline: StatsBaseline) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            baseline,
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl SignalRepository for InMemoryRepository {
    async fn add_submission(&self, mut submission: Submission) -> Result<Submission> {
        submission.id = new_id();
        submission.created_at = now();
        self.tables.write().await.submissions.push(submission.clone());
        Ok(submission)
    }

    /// Newest first.
    async fn list_submissions(&self) -> Result<Vec<Submission>> {
        let tables = self.tables.read().await;
        Ok(tables.submissions.iter().rev().cloned().collect())
    }

    async fn add_ledger_entry(&self, payload: ContributionPayload) -> Result<LedgerEntry> {
        let entry = LedgerEntry {
            id: new_id(),
            name: Some(payload.name),
            amount: Some(payload.amount),
            message: Some(payload.message),
            created_at: now(),
        };
        self.tables.write().await.ledger.push(entry.clone());
        Ok(entry)
    }

    /// Newest first.
    async fn list_ledger(&self) -> Result<Vec<LedgerEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.ledger.iter().rev().cloned().collect())
    }

    async fn add_landing_contribution(&self, payload: LandingContributionPayload) -> Result<LandingContribution> {
        let contribution = LandingContribution {
            id: Some(new_id()),
            email: payload.email,
            amount: payload.amount,
            message: Some(payload.message),
            timestamp: Some(now()),
            created_at: None,
        };
        self.tables.write().await.landing.push(contribution.clone());
        Ok(contribution)
    }

    async fn list_landing_contributions(&self) -> Result<Vec<LandingContribution>> {
        Ok(self.tables.read().await.landing.clone())
    }

    async fn add_help_request(&self, payload: HelpRequestPayload) -> Result<HelpRequest> {
        let request = HelpRequest {
            id: new_id(),
            name: payload.name,
            email: payload.email,
            story: payload.story,
            amount: payload.amount,
            video_url: Some(payload.video_url).filter(|url| !url.is_empty()),
            timestamp: Some(now()),
            created_at: None,
            votes: 0,
            verified: false,
        };
        self.tables.write().await.requests.push(request.clone());
        Ok(request)
    }

    async fn list_help_requests(&self) -> Result<Vec<HelpRequest>> {
        Ok(self.tables.read().await.requests.clone())
    }

    async fn record_vote(&self, request_id: &str) -> Result<HelpRequest> {
        let mut tables = self.tables.write().await;
        let request = tables
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;
        request.votes += 1;
        Ok(request.clone())
    }

    async fn add_subscriber(&self, email: &str) -> Result<()> {
        self.tables.write().await.subscribers.insert(email.to_string());
        Ok(())
    }

    async fn stats(&self) -> Result<ContributionStats> {
        let tables = self.tables.read().await;
        let today = Utc::now().date_naive();

        let total: f64 = tables.landing.iter().map(|c| c.amount).sum();
        let daily: f64 = tables
            .landing
            .iter()
            .filter(|c| {
                chrono::DateTime::parse_from_rfc3339(c.posted_at())
                    .map(|at| at.with_timezone(&Utc).date_naive() == today)
                    .unwrap_or(false)
            })
            .map(|c| c.amount)
            .sum();

        Ok(ContributionStats {
            total_balance: self.baseline.balance + total,
            distributed_percent: self.baseline.distributed_percent,
            stories_funded: self.baseline.stories_funded + tables.requests.len() as u64,
            total_contributors: self.baseline.contributors + tables.landing.len() as u64,
            active_requests: Some(tables.requests.len() as u64),
            daily_contributions: Some(daily),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn help(name: &str) -> HelpRequestPayload {
        HelpRequestPayload {
            name: name.into(),
            email: "e@x".into(),
            story: "story".into(),
            video_url: String::new(),
            amount: 100.0,
        }
    }

    #[tokio::test]
    async fn test_votes_are_tallied() {
        let repo = InMemoryRepository::default();
        let created = repo.add_help_request(help("a")).await.unwrap();

        repo.record_vote(&created.id).await.unwrap();
        let voted = repo.record_vote(&created.id).await.unwrap();

        assert_eq!(voted.votes, 2);
        assert!(matches!(repo.record_vote("missing").await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_add_baseline() {
        let repo = InMemoryRepository::new(StatsBaseline::launch());
        repo.add_landing_contribution(LandingContributionPayload {
            email: "a@b.c".into(),
            amount: 80.0,
            message: String::new(),
        })
        .await
        .unwrap();
        repo.add_help_request(help("a")).await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_balance, 48_400.0);
        assert_eq!(stats.total_contributors, 2_848);
        assert_eq!(stats.stories_funded, 312);
        assert_eq!(stats.active_requests, Some(1));
        assert_eq!(stats.daily_contributions, Some(80.0));
    }

    #[tokio::test]
    async fn test_ledger_lists_newest_first() {
        let repo = InMemoryRepository::default();
        for name in ["first", "second"] {
            repo.add_ledger_entry(ContributionPayload {
                name: name.into(),
                amount: 1.0,
                message: String::new(),
            })
            .await
            .unwrap();
        }

        let names: Vec<_> = repo
            .list_ledger()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }
}


use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Audition site

/// A submitted audition as listed on the admin review page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
	#[serde(default)]
	pub id: String,
	pub name: String,
	pub country: String,
	#[serde(default)]
	pub social_handle: Option<String>,
	pub video_url: String,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub created_at: String,
}

/// Every named field of the audition form, in form order.
pub type AuditionPayload = Map<String, Value>;

/// The server answers an accepted audition with (at least) its new id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditionReceipt {
	pub id: String,
}

/// Filter sent with the admin listing. The token is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditionQuery {
	pub token: String,
	pub country: Option<String>,
	pub limit: Option<String>,
}

impl AuditionQuery {
	pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = vec![("token", self.token.clone())];
		if let Some(country) = &self.country {
			pairs.push(("country", country.clone()));
		}
		if let Some(limit) = &self.limit {
			pairs.push(("limit", limit.clone()));
		}
		pairs
	}
}

// Signal bank (audition server)

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub amount: Option<f64>,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub created_at: String,
}

impl LedgerEntry {
	/// Missing amounts count as zero.
	pub fn amount(&self) -> f64 {
		self.amount.unwrap_or(0.0)
	}

	pub fn display_name(&self) -> &str {
		match self.name.as_deref() {
			Some(name) if !name.is_empty() => name,
			_ => "Anonymous",
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionPayload {
	pub name: String,
	pub amount: f64,
	pub message: String,
}

// Signal bank landing page

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContributionStats {
	pub total_balance: f64,
	pub distributed_percent: f64,
	pub stories_funded: u64,
	pub total_contributors: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub active_requests: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub daily_contributions: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LandingContribution {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub amount: f64,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<String>,
	/// Sent by servers that name the field `createdAt`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
}

impl LandingContribution {
	/// The part of the email before the `@`.
	pub fn handle(&self) -> &str {
		self.email.split('@').next().unwrap_or_default()
	}

	pub fn posted_at(&self) -> &str {
		posted_at(&self.timestamp, &self.created_at)
	}
}

/// `timestamp` when present, else `createdAt`, else empty.
fn posted_at<'a>(timestamp: &'a Option<String>, created_at: &'a Option<String>) -> &'a str {
	timestamp
		.as_deref()
		.or(created_at.as_deref())
		.unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandingContributionPayload {
	pub email: String,
	pub amount: f64,
	pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub story: String,
	#[serde(default)]
	pub amount: f64,
	#[serde(default)]
	pub video_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<String>,
	/// Sent by servers that name the field `createdAt`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	/// Server tally. The landing page always displays zero.
	#[serde(default)]
	pub votes: u32,
	#[serde(default)]
	pub verified: bool,
}

impl HelpRequest {
	pub fn posted_at(&self) -> &str {
		posted_at(&self.timestamp, &self.created_at)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequestPayload {
	pub name: String,
	pub email: String,
	pub story: String,
	pub video_url: String,
	pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
	pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscribePayload {
	pub email: String,
}

// Settings

/// Client configuration. Every field has a default so partial files load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrontendSettings {
	/// Origin of the page the components act for, e.g. `https://signal.example`.
	pub origin: String,
	pub poll_interval_secs: u64,
	pub request_timeout_secs: u64,
	/// Offset applied when displaying timestamps.
	pub utc_offset_minutes: i32,
	pub landing_ledger_limit: usize,
	pub landing_request_limit: usize,
	pub story_preview_chars: usize,
}

impl Default for FrontendSettings {
	fn default() -> Self {
		Self {
			origin: "http://localhost:8081".to_string(),
			poll_interval_secs: 30,
			request_timeout_secs: 10,
			utc_offset_minutes: 0,
			landing_ledger_limit: 20,
			landing_request_limit: 9,
			story_preview_chars: 120,
		}
	}
}

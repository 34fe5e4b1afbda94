use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use models::{
    ContributionPayload, HelpRequestPayload, LandingContributionPayload, Submission,
    SubscribePayload, VotePayload,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, router::AppState, Result};

/// Incoming audition fields. Missing fields read as empty so the
/// required-field check can report them together.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditionFields {
    pub name: String,
    pub country: String,
    pub social_handle: String,
    pub video_url: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub token: Option<String>,
    pub country: Option<String>,
    pub limit: Option<String>,
}

/// Non-negative limits below the list length truncate; anything else is ignored.
fn apply_limit<T>(items: &mut Vec<T>, limit: Option<&str>) {
    let Some(raw) = limit.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return;
    };
    if let Ok(limit) = raw.parse::<usize>() {
        items.truncate(limit);
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// GET /healthz
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// POST /api/auditions
pub async fn create_audition(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AuditionFields>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(form) = payload.map_err(|_| ApiError::bad_request("invalid JSON"))?;

    let name = form.name.trim();
    let country = form.country.trim();
    let video_url = form.video_url.trim();
    if name.is_empty() || country.is_empty() || video_url.is_empty() {
        return Err(ApiError::bad_request("name, country, and videoUrl are required"));
    }
    if !(video_url.starts_with("http://") || video_url.starts_with("https://")) {
        return Err(ApiError::bad_request("videoUrl must be a valid http(s) link"));
    }

    let created = state
        .repo
        .add_submission(Submission {
            id: String::new(),
            name: name.to_string(),
            country: country.to_string(),
            social_handle: non_empty(&form.social_handle),
            video_url: video_url.to_string(),
            message: non_empty(&form.message),
            created_at: String::new(),
        })
        .await?;

    tracing::info!(id = %created.id, country = %created.country, "audition recorded");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/auditions?token&country&limit
pub async fn list_auditions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    if let Some(expected) = state.admin_token.as_deref() {
        if params.token.as_deref() != Some(expected) {
            return Err(ApiError::Unauthorized);
        }
    }

    let mut submissions = state.repo.list_submissions().await?;
    if let Some(country) = params.country.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        submissions.retain(|s| s.country.eq_ignore_ascii_case(country));
    }
    apply_limit(&mut submissions, params.limit.as_deref());

    Ok(Json(submissions))
}

/// POST /api/signal-bank/contributions
pub async fn create_ledger_entry(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContributionPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("invalid JSON"))?;
    if payload.amount <= 0.0 || payload.amount.is_nan() {
        return Err(ApiError::bad_request("amount must be greater than zero"));
    }

    let entry = state
        .repo
        .add_ledger_entry(ContributionPayload {
            name: payload.name.trim().to_string(),
            amount: payload.amount,
            message: payload.message.trim().to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/signal-bank/contributions?limit
pub async fn list_ledger(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let mut entries = state.repo.list_ledger().await?;
    apply_limit(&mut entries, params.limit.as_deref());
    Ok(Json(entries))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.repo.stats().await?))
}

/// POST /api/contribute
pub async fn create_landing_contribution(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LandingContributionPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("Invalid request"))?;
    let created = state.repo.add_landing_contribution(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/contribute
pub async fn list_landing_contributions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.repo.list_landing_contributions().await?))
}

/// POST /api/requests
pub async fn create_help_request(
    State(state): State<AppState>,
    payload: std::result::Result<Json<HelpRequestPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("Invalid request"))?;
    let created = state.repo.add_help_request(payload).await?;
    tracing::info!(id = %created.id, "help request recorded");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/requests
pub async fn list_help_requests(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.repo.list_help_requests().await?))
}

/// POST /api/vote
pub async fn vote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<VotePayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("Invalid request"))?;
    let updated = state.repo.record_vote(&payload.request_id).await?;
    Ok(Json(updated))
}

/// POST /api/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SubscribePayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("Invalid request"))?;
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Invalid request"));
    }

    state.repo.add_subscriber(email).await?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "subscribed" }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_limit() {
        let mut items = vec![1, 2, 3];
        apply_limit(&mut items, Some(" 2 "));
        assert_eq!(items, vec![1, 2]);

        let mut items = vec![1, 2, 3];
        apply_limit(&mut items, Some("-1"));
        assert_eq!(items, vec![1, 2, 3]);

        apply_limit(&mut items, Some("ten"));
        apply_limit(&mut items, Some(""));
        apply_limit(&mut items, None);
        assert_eq!(items.len(), 3);

        apply_limit(&mut items, Some("0"));
        assert!(items.is_empty());
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  @me "), Some("@me".to_string()));
        assert_eq!(non_empty("   "), None);
    }
}

use api_client::{ApiClient, HttpTransport, Transport};
use models::AuditionQuery;
use render::{render_submissions, Formatter};

use crate::page::{Container, FormData, StatusClass, StatusLine};

/// Admin review page: a filter form, a status line and the results list.
pub struct AdminPage<T = HttpTransport> {
    api: ApiClient<T>,
    status: StatusLine,
    results: Container,
    fmt: Formatter,
}

impl<T: Transport> AdminPage<T> {
    pub fn new(api: ApiClient<T>, status: StatusLine, results: Container, fmt: Formatter) -> Self {
        Self { api, status, results, fmt }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn results(&self) -> &Container {
        &self.results
    }

    /// Reads `token`, `country` and `limit` from the form and reloads the list.
    pub async fn submit(&self, form: &FormData) {
        self.status.set("Loading submissions...", StatusClass::None).await;
        let ticket = self.results.ticket();
        self.results.commit(ticket, String::new()).await;

        let Some(token) = form.trimmed("token") else {
            self.status.set("Admin token is required.", StatusClass::None).await;
            return;
        };

        let query = AuditionQuery {
            token: token.to_string(),
            country: form.trimmed("country").map(str::to_string),
            limit: form.trimmed("limit").map(str::to_string),
        };

        match self.api.list_auditions(&query).await {
            Ok(items) => {
                let html = render_submissions(&items, &self.fmt);
                if self.results.commit(ticket, html).await {
                    self.status
                        .set(format!("Loaded {} submission(s).", items.len()), StatusClass::None)
                        .await;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading submissions failed");
                let message = err.to_string();
                let message = if message.trim().is_empty() {
                    "Failed to load submissions.".to_string()
                } else {
                    message
                };
                self.status.set(message, StatusClass::None).await;
            }
        }
    }
}

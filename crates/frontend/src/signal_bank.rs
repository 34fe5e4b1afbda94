use api_client::{ApiClient, HttpTransport, Transport};
use async_trait::async_trait;
use models::ContributionPayload;
use render::{render_ledger, Formatter};

use crate::failure_text;
use crate::input::positive_amount;
use crate::page::{Container, FormData, StatusClass, StatusLine, TextCell};
use crate::poll::Refresh;

/// Signal bank page: contribution form, ledger list and running total.
pub struct SignalBankPage<T = HttpTransport> {
    api: ApiClient<T>,
    status: StatusLine,
    ledger: Container,
    total: TextCell,
    fmt: Formatter,
}

impl<T: Transport> SignalBankPage<T> {
    pub fn new(
        api: ApiClient<T>,
        status: StatusLine,
        ledger: Container,
        total: TextCell,
        fmt: Formatter,
    ) -> Self {
        Self { api, status, ledger, total, fmt }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn ledger(&self) -> &Container {
        &self.ledger
    }

    pub fn total(&self) -> &TextCell {
        &self.total
    }

    /// Rebuilds the ledger and total. A failed fetch leaves both as they were.
    pub async fn load_ledger(&self) {
        let ticket = self.ledger.ticket();
        match self.api.list_contributions().await {
            Ok(entries) => {
                let view = render_ledger(&entries, &self.fmt);
                if self.ledger.commit(ticket, view.html).await {
                    self.total.set(view.total).await;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading ledger failed");
                let message = match err.status() {
                    Some(status) => format!("Failed to load ledger ({status})"),
                    None => failure_text(&err, "", "Unable to load ledger."),
                };
                self.status.set(message, StatusClass::Error).await;
            }
        }
    }

    /// The refresh control.
    pub async fn refresh_ledger(&self) {
        self.status.set("Ledger refreshed.", StatusClass::Success).await;
        self.load_ledger().await;
    }

    pub async fn submit(&self, form: &mut FormData) {
        self.status.set("Submitting contribution...", StatusClass::None).await;

        let Some(amount) = positive_amount(form.get("amount")) else {
            self.status
                .set("Amount must be greater than zero.", StatusClass::Error)
                .await;
            return;
        };

        let payload = ContributionPayload {
            name: form.trimmed("name").unwrap_or_default().to_string(),
            amount,
            message: form.trimmed("message").unwrap_or_default().to_string(),
        };

        match self.api.record_contribution(&payload).await {
            Ok(()) => {
                form.reset();
                self.status
                    .set("Contribution logged. Thank you!", StatusClass::Success)
                    .await;
                self.load_ledger().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "recording contribution failed");
                let message = failure_text(
                    &err,
                    "Failed to record contribution",
                    "Failed to record contribution.",
                );
                self.status.set(message, StatusClass::Error).await;
            }
        }
    }
}

#[async_trait]
impl<T: Transport + 'static> Refresh for SignalBankPage<T> {
    async fn refresh(&self) {
        self.load_ledger().await;
    }
}

use api_client::{ApiClient, HttpTransport, Transport};
use models::AuditionPayload;
use serde_json::Value;

use crate::failure_text;
use crate::page::{FormData, StatusClass, StatusLine};

/// The public audition form. Posts every field as-is; the server validates.
pub struct AuditionForm<T = HttpTransport> {
    api: ApiClient<T>,
    status: StatusLine,
}

impl<T: Transport> AuditionForm<T> {
    pub fn new(api: ApiClient<T>, status: StatusLine) -> Self {
        Self { api, status }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub async fn submit(&self, form: &mut FormData) {
        self.status.set("Submitting...", StatusClass::None).await;

        let payload: AuditionPayload = form
            .entries()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();

        match self.api.submit_audition(&payload).await {
            Ok(receipt) => {
                form.reset();
                self.status
                    .set(
                        format!("Audition received! Your reference ID is {}.", receipt.id),
                        StatusClass::Success,
                    )
                    .await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "audition submission failed");
                self.status
                    .set(
                        failure_text(&err, "Submission failed", "Something went wrong"),
                        StatusClass::Error,
                    )
                    .await;
            }
        }
    }
}

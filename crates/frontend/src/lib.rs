//! Form submitters, list renderers and the poll loop for the audition and
//! signal-bank front ends.
//!
//! Each component owns its page elements ([`page`]) and an
//! [`api_client::ApiClient`]. Failures never escape a component: they end up
//! as status text, an alert, or a log line.

pub mod admin;
pub mod audition;
pub mod input;
pub mod landing;
pub mod page;
pub mod poll;
pub mod signal_bank;

pub use admin::AdminPage;
pub use audition::AuditionForm;
pub use landing::{LandingPage, StatCells};
pub use page::{Alerts, Container, FormData, RenderTicket, Status, StatusClass, StatusLine, TextCell};
pub use poll::{spawn_poll, PollHandle, Refresh};
pub use signal_bank::SignalBankPage;

use api_client::ClientError;

/// Status text for a failed call, never empty.
pub(crate) fn failure_text(err: &ClientError, empty_body: &str, generic: &str) -> String {
    let message = err.user_message(empty_body);
    if message.trim().is_empty() {
        generic.to_string()
    } else {
        message
    }
}

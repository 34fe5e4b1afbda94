//! In-memory stand-ins for the page elements each component owns.
//!
//! Handles are cheap to clone and share their state, so a poll task and a
//! user action can hold the same container.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

/// Position of a fetch in the order fetches were started against one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderTicket(u64);

#[derive(Debug, Default)]
struct Slot {
    html: String,
    committed: u64,
    rendered: bool,
}

#[derive(Debug, Default)]
struct ContainerState {
    issued: AtomicU64,
    slot: RwLock<Slot>,
}

/// An element whose inner HTML is replaced wholesale on every render.
///
/// Writers take a [`RenderTicket`] before their request goes out. A commit
/// carrying an older ticket than the last committed one is dropped, so a slow
/// response can never overwrite the result of a fetch started after it.
#[derive(Debug, Clone, Default)]
pub struct Container {
    inner: Arc<ContainerState>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> RenderTicket {
        RenderTicket(self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replaces the contents unless a newer ticket has already committed.
    /// Returns whether the write happened.
    pub async fn commit(&self, ticket: RenderTicket, html: String) -> bool {
        let mut slot = self.inner.slot.write().await;
        if ticket.0 < slot.committed {
            tracing::debug!(ticket = ticket.0, committed = slot.committed, "dropping stale render");
            return false;
        }
        slot.html = html;
        slot.committed = ticket.0;
        slot.rendered = true;
        true
    }

    /// Shows `html` only if nothing has ever been rendered here.
    pub async fn commit_placeholder(&self, ticket: RenderTicket, html: &str) -> bool {
        let mut slot = self.inner.slot.write().await;
        if slot.rendered || ticket.0 < slot.committed {
            return false;
        }
        slot.html = html.to_string();
        slot.committed = ticket.0;
        true
    }

    pub async fn html(&self) -> String {
        self.inner.slot.read().await.html.clone()
    }

    pub async fn has_rendered(&self) -> bool {
        self.inner.slot.read().await.rendered
    }
}

/// An element whose text content is set directly.
#[derive(Debug, Clone, Default)]
pub struct TextCell {
    text: Arc<RwLock<String>>,
}

impl TextCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, text: impl Into<String>) {
        *self.text.write().await = text.into();
    }

    pub async fn get(&self) -> String {
        self.text.read().await.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusClass {
    #[default]
    None,
    Success,
    Error,
}

impl StatusClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::None => "",
            StatusClass::Success => "success",
            StatusClass::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub class: StatusClass,
}

/// A one-line status box with a CSS class.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    status: Arc<RwLock<Status>>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, message: impl Into<String>, class: StatusClass) {
        *self.status.write().await = Status { message: message.into(), class };
    }

    pub async fn get(&self) -> Status {
        self.status.read().await.clone()
    }

    pub async fn message(&self) -> String {
        self.status.read().await.message.clone()
    }
}

/// Modal notices, kept in the order they were raised.
#[derive(Debug, Clone, Default)]
pub struct Alerts {
    shown: Arc<RwLock<Vec<String>>>,
}

impl Alerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn show(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(%message, "alert");
        self.shown.write().await.push(message);
    }

    pub async fn last(&self) -> Option<String> {
        self.shown.read().await.last().cloned()
    }

    pub async fn all(&self) -> Vec<String> {
        self.shown.read().await.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    name: String,
    value: String,
    initial: String,
}

/// Named form fields in document order. `reset` restores initial values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<Field>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: a field that starts empty and currently holds `value`.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    /// Builder: a field whose initial (and current) value is `initial`.
    pub fn with_initial(mut self, name: &str, initial: &str) -> Self {
        self.fields.retain(|f| f.name != name);
        self.fields.push(Field {
            name: name.to_string(),
            value: initial.to_string(),
            initial: initial.to_string(),
        });
        self
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |form, (k, v)| form.with(k.as_ref(), v.as_ref()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Trimmed value, `None` when missing or blank.
    pub fn trimmed(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value.to_string(),
            None => self.fields.push(Field {
                name: name.to_string(),
                value: value.to_string(),
                initial: String::new(),
            }),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|f| (f.name.as_str(), f.value.as_str()))
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = field.initial.clone();
        }
    }

    pub fn is_pristine(&self) -> bool {
        self.fields.iter().all(|f| f.value == f.initial)
    }
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use api_client::{ApiBase, ApiClient, PageLocation};
use frontend::{
    AdminPage, AuditionForm, Container, FormData, LandingPage, SignalBankPage, Status, StatusLine,
    TextCell,
};
use models::FrontendSettings;
use render::{Formatter, LandingLimits};

use crate::LandingAction;

/// Everything the commands share, derived once from settings.
pub struct Context {
    settings: FrontendSettings,
    fmt: Formatter,
}

impl Context {
    pub fn new(settings: FrontendSettings) -> Self {
        let fmt = Formatter::from_offset_minutes(settings.utc_offset_minutes);
        Self { settings, fmt }
    }

    fn location(&self) -> Result<PageLocation> {
        PageLocation::parse(&self.settings.origin)
            .with_context(|| format!("Invalid origin: {}", self.settings.origin))
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    /// Client for the audition and signal-bank pages, which call `/api` on their own origin.
    fn site_api(&self) -> Result<ApiClient> {
        let base = ApiBase::same_origin(&self.location()?)?;
        Ok(ApiClient::http(base, self.timeout())?)
    }

    fn landing_api(&self) -> Result<ApiClient> {
        let base = ApiBase::for_landing(&self.location()?)?;
        Ok(ApiClient::http(base, self.timeout())?)
    }

    fn limits(&self) -> LandingLimits {
        LandingLimits {
            ledger_rows: self.settings.landing_ledger_limit,
            request_cards: self.settings.landing_request_limit,
            story_chars: self.settings.story_preview_chars,
        }
    }
}

fn print_status(status: &Status) {
    match status.class.as_str() {
        "" => println!("{}", status.message),
        class => println!("[{class}] {}", status.message),
    }
}

pub async fn audition(ctx: &Context, fields: Vec<(&str, String)>) -> Result<()> {
    let form_component = AuditionForm::new(ctx.site_api()?, StatusLine::new());
    let mut form = FormData::from_pairs(fields);
    form_component.submit(&mut form).await;
    print_status(&form_component.status().get().await);
    Ok(())
}

pub async fn admin(
    ctx: &Context,
    token: String,
    country: Option<String>,
    limit: Option<String>,
) -> Result<()> {
    let page = AdminPage::new(ctx.site_api()?, StatusLine::new(), Container::new(), ctx.fmt);

    let mut form = FormData::new().with("token", &token);
    if let Some(country) = country {
        form.set("country", &country);
    }
    if let Some(limit) = limit {
        form.set("limit", &limit);
    }

    page.submit(&form).await;
    print_status(&page.status().get().await);
    let html = page.results().html().await;
    if !html.is_empty() {
        println!("{html}");
    }
    Ok(())
}

fn signal_bank(ctx: &Context) -> Result<SignalBankPage> {
    Ok(SignalBankPage::new(
        ctx.site_api()?,
        StatusLine::new(),
        Container::new(),
        TextCell::new(),
        ctx.fmt,
    ))
}

async fn print_ledger(page: &SignalBankPage) {
    let status = page.status().get().await;
    if !status.message.is_empty() {
        print_status(&status);
    }
    println!("{}", page.ledger().html().await);
    println!("{}", page.total().get().await);
}

pub async fn ledger(ctx: &Context) -> Result<()> {
    let page = signal_bank(ctx)?;
    page.load_ledger().await;
    print_ledger(&page).await;
    Ok(())
}

pub async fn contribute(ctx: &Context, name: String, amount: String, message: String) -> Result<()> {
    let page = signal_bank(ctx)?;
    let mut form = FormData::from_pairs([("name", name), ("amount", amount), ("message", message)]);
    page.submit(&mut form).await;
    print_ledger(&page).await;
    Ok(())
}

async fn print_landing(page: &LandingPage) {
    let stats = page.stats();
    println!(
        "balance {} · distributed {} · stories {} · contributors {}",
        stats.balance.get().await,
        stats.distributed.get().await,
        stats.stories.get().await,
        stats.contributors.get().await,
    );
    println!("{}", page.ledger().html().await);
    println!("{}", page.requests().html().await);
}

async fn print_alerts(page: &LandingPage) {
    for alert in page.alerts().all().await {
        println!("{alert}");
    }
}

pub async fn landing(ctx: &Context, action: LandingAction) -> Result<()> {
    let page = Arc::new(LandingPage::new(ctx.landing_api()?, ctx.fmt, ctx.limits()));

    match action {
        LandingAction::Show => {
            page.refresh_all().await;
            print_landing(&page).await;
        }
        LandingAction::Watch => {
            let period = Duration::from_secs(ctx.settings.poll_interval_secs).max(frontend::poll::MIN_PERIOD);
            let handle = LandingPage::start(page.clone(), period).await;
            print_landing(&page).await;

            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = ticker.tick() => print_landing(&page).await,
                }
            }

            tracing::info!("stopping poll loop");
            handle.stop().await;
        }
        LandingAction::Contribute { email, amount, message } => {
            let mut form =
                FormData::from_pairs([("email", email), ("amount", amount), ("message", message)]);
            page.contribute(&mut form).await;
            print_alerts(&page).await;
        }
        LandingAction::Request { name, email, story, video_url, amount } => {
            let mut form = FormData::from_pairs([
                ("name", name),
                ("email", email),
                ("story", story),
                ("videoUrl", video_url),
                ("amount", amount),
            ]);
            page.submit_request(&mut form).await;
            print_alerts(&page).await;
        }
        LandingAction::Subscribe { email } => {
            let mut form = FormData::from_pairs([("email", email)]);
            page.subscribe(&mut form).await;
            print_alerts(&page).await;
        }
        LandingAction::Vote { request_id } => {
            page.vote(&request_id).await;
            print_alerts(&page).await;
        }
    }

    Ok(())
}

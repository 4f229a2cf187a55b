// src/fetch/mod.rs
//! Fetches the season-to-date team totals page through a logged-in session.

pub mod login;

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Credentials;

pub const LOGIN_URL: &str = "https://www.cbssports.com/login";

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

/// Team totals, year to date, scoring categories.
pub fn stats_url(league: &str) -> Result<Url> {
    let raw = format!(
        "http://{}.baseball.cbssports.com/stats/stats-main/teamtotals/ytd:f/scoring/stats",
        league
    );
    Url::parse(&raw).with_context(|| format!("bad league name {:?}", league))
}

/// A cookie-carrying client bound to one login endpoint.
pub struct Session {
    client: Client,
    login_url: Url,
}

impl Session {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(concat!("rotoranks/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            login_url: Url::parse(LOGIN_URL)?,
        })
    }

    /// Replay the login form with our user and password filled in.
    pub async fn login(&self, creds: &Credentials) -> Result<()> {
        let page = get_text_with_retry(&self.client, &self.login_url).await?;
        let mut form = login::form_fields(&page);
        debug!(fields = form.len(), "login form");
        form.insert("userid".to_string(), creds.user.clone());
        form.insert("password".to_string(), creds.password.clone());

        let resp = self
            .client
            .post(self.login_url.clone())
            .form(&form)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.login_url))?
            .error_for_status()
            .with_context(|| format!("login rejected by {}", self.login_url))?;
        info!(user = %creds.user, status = %resp.status(), "logged in");
        Ok(())
    }

    pub async fn stats_page(&self, league: &str) -> Result<String> {
        let url = stats_url(league)?;
        let body = get_text_with_retry(&self.client, &url).await?;
        if login::looks_like_login(&body) {
            warn!(%url, "stats page still shows a login form; credentials may be wrong");
        }
        info!(%url, bytes = body.len(), "fetched stats page");
        Ok(body)
    }
}

/// Log in and return the raw standings document.
pub async fn download_document(creds: &Credentials) -> Result<String> {
    let session = Session::new()?;
    session.login(creds).await?;
    session.stats_page(&creds.league).await
}

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

async fn get_text_with_retry(client: &Client, url: &Url) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_core(client, url).await {
            Ok(t) => return Ok(t),
            Err(e) if attempts < MAX_RETRIES => {
                attempts += 1;
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempts - 1);
                warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => {
                error!(%url, error = %e, "Exhausted retries");
                return Err(e);
            }
        }
    }
}

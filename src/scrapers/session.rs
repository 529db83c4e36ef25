//! Authenticated session handling.
//!
//! A crawl signs in once up front ([`SessionManager::establish`], fatal on
//! failure) and then re-checks before every protected page fetch
//! ([`SessionManager::ensure`], best-effort).

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::browser::{html_has, text_of, wait_for, wait_until, Driver, ElementLocator};
use super::config::CrawlTimings;
use super::error::AuthError;
use super::site::SiteProfile;

/// Account credentials for the retail site.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// State of an authenticated browsing session, scoped to one crawl.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub origin: String,
    pub return_url: String,
    pub established_at: DateTime<Utc>,
    pub reauthentications: u32,
    pub challenge_encountered: bool,
}

/// Drives the sign-in flow against a [`Driver`].
pub struct SessionManager<'a> {
    credentials: &'a Credentials,
    profile: &'a SiteProfile,
    timings: &'a CrawlTimings,
}

impl<'a> SessionManager<'a> {
    pub fn new(
        credentials: &'a Credentials,
        profile: &'a SiteProfile,
        timings: &'a CrawlTimings,
    ) -> Self {
        Self {
            credentials,
            profile,
            timings,
        }
    }

    /// Sign in and return the session state.
    ///
    /// The site redirects to `return_url` after a successful sign-in.
    pub async fn establish(
        &self,
        driver: &mut dyn Driver,
        origin: &str,
        return_url: &str,
    ) -> Result<SessionContext, AuthError> {
        let profile = self.profile;
        let sign_in_url = profile.sign_in_url(origin, return_url);
        info!("Signing in as {}", self.credentials.email);
        driver.navigate(&sign_in_url).await?;

        if !self.wait_for_field(driver, &profile.email_field).await? {
            return Err(AuthError::FormUnavailable("email field"));
        }
        driver
            .fill(&ElementLocator::first(&profile.email_field), &self.credentials.email)
            .await?;
        if !driver
            .click(&ElementLocator::first(&profile.continue_button))
            .await?
        {
            debug!("No continue button; assuming single-step sign-in form");
        }

        if !self.wait_for_field(driver, &profile.password_field).await? {
            return Err(AuthError::FormUnavailable("password field"));
        }
        self.submit_password(driver).await?;

        let mut challenge_encountered = false;
        let page = driver.page_source().await?;
        self.check_rejected(&page)?;

        if page.contains(&profile.challenge_marker) {
            challenge_encountered = true;
            warn!("Bot challenge shown after sign-in; waiting for it to clear");
            if !self.wait_for_challenge(driver).await? {
                info!("Challenge still present, retrying submission once");
                if html_has(&driver.page_source().await?, &profile.password_field) {
                    self.submit_password(driver).await?;
                } else {
                    driver
                        .click(&ElementLocator::first(&profile.submit_button))
                        .await?;
                    tokio::time::sleep(self.timings.sign_in_settle()).await;
                }
                if !self.wait_for_challenge(driver).await? {
                    return Err(AuthError::ChallengeUnresolved);
                }
            }
            self.check_rejected(&driver.page_source().await?)?;
        }

        info!("Signed in");
        Ok(SessionContext {
            origin: origin.to_string(),
            return_url: return_url.to_string(),
            established_at: Utc::now(),
            reauthentications: 0,
            challenge_encountered,
        })
    }

    /// Re-authenticate if the current page is the sign-in surface, then
    /// return to `target_url`. Returns whether a re-authentication happened.
    ///
    /// Failures are logged and absorbed; the caller carries on with whatever
    /// page is loaded.
    pub async fn ensure(
        &self,
        driver: &mut dyn Driver,
        context: &mut SessionContext,
        target_url: &str,
    ) -> bool {
        let page = match driver.page_source().await {
            Ok(page) => page,
            Err(e) => {
                warn!("Could not inspect page for session state: {}", e);
                return false;
            }
        };
        if !self.on_sign_in_page(&page) {
            return false;
        }

        info!("Session lapsed; signing in again");
        match self.establish(driver, &context.origin, target_url).await {
            Ok(renewed) => {
                context.reauthentications += 1;
                context.challenge_encountered |= renewed.challenge_encountered;
                if let Err(e) = driver.navigate(target_url).await {
                    warn!("Could not return to {} after sign-in: {}", target_url, e);
                }
                tokio::time::sleep(self.timings.settle()).await;
                true
            }
            Err(e) => {
                warn!("Re-authentication failed: {}", e);
                false
            }
        }
    }

    fn on_sign_in_page(&self, html: &str) -> bool {
        html_has(html, &self.profile.email_field) || html_has(html, &self.profile.password_field)
    }

    async fn wait_for_field(
        &self,
        driver: &mut dyn Driver,
        selector: &str,
    ) -> Result<bool, AuthError> {
        Ok(wait_for(
            driver,
            selector,
            self.timings.element_wait(),
            self.timings.poll_interval(),
        )
        .await?)
    }

    async fn submit_password(&self, driver: &mut dyn Driver) -> Result<(), AuthError> {
        driver
            .fill(
                &ElementLocator::first(&self.profile.password_field),
                &self.credentials.password,
            )
            .await?;
        driver
            .click(&ElementLocator::first(&self.profile.submit_button))
            .await?;
        tokio::time::sleep(self.timings.sign_in_settle()).await;
        Ok(())
    }

    async fn wait_for_challenge(&self, driver: &mut dyn Driver) -> Result<bool, AuthError> {
        let marker = self.profile.challenge_marker.as_str();
        Ok(wait_until(
            driver,
            self.timings.challenge_wait(),
            self.timings.poll_interval(),
            |html| !html.contains(marker),
        )
        .await?)
    }

    fn check_rejected(&self, html: &str) -> Result<(), AuthError> {
        if !html_has(html, &self.profile.auth_error) {
            return Ok(());
        }
        let message =
            text_of(html, &self.profile.auth_error).unwrap_or_else(|| "sign-in error".to_string());
        Err(AuthError::Rejected(message))
    }
}

//! Subscriber digests.
//!
//! Composes one digest per subscribed category and per subscribed repository
//! that trends today, and sends each subscriber an individual copy carrying
//! their own unsubscribe link. A failure for one recipient never stops
//! delivery to the rest.

mod error;

pub use error::NotifyError;

use crate::history::{Analysis, TodayEntry};
use crate::mail::{Mailer, OutgoingMail};
use crate::subscriptions::{SubscriptionRequest, Subscriptions};
use crate::summary::DeliveryResult;
use crate::templates::views::{
    CategoryDigestView, RepoView, RepositoryDigestView, WelcomeView,
};
use crate::templates::{
    category_digest_subject, repository_digest_subject, SiteLinks, TemplateRenderer,
    WELCOME_SUBJECT,
};
use chrono::NaiveDate;
use tracing::{info, info_span, warn, Instrument};

/// Sends digests and confirmation emails.
pub struct Notifier<'a, M: Mailer> {
    mailer: &'a M,
    renderer: &'a TemplateRenderer,
    links: &'a SiteLinks,
}

impl<'a, M: Mailer> Notifier<'a, M> {
    /// Creates a notifier.
    pub fn new(mailer: &'a M, renderer: &'a TemplateRenderer, links: &'a SiteLinks) -> Self {
        Self {
            mailer,
            renderer,
            links,
        }
    }

    /// Sends today's category and repository digests.
    ///
    /// Returns one [`DeliveryResult`] per attempted email.
    pub async fn send_daily(
        &self,
        analysis: &Analysis,
        subscriptions: &Subscriptions,
        date: NaiveDate,
    ) -> Vec<DeliveryResult> {
        let span = info_span!("send_daily", date = %date);

        async {
            let date = date.to_string();
            let mut results = Vec::new();

            for (category, subscribers) in &subscriptions.categories {
                if subscribers.is_empty() {
                    continue;
                }
                let repos: Vec<RepoView> = analysis
                    .today_in_category(category)
                    .map(RepoView::from)
                    .collect();
                if repos.is_empty() {
                    continue;
                }

                info!(
                    category = %category,
                    repositories = repos.len(),
                    subscribers = subscribers.len(),
                    "Sending category digest"
                );
                let subject = category_digest_subject(category, &date);
                for email in subscribers {
                    let body = self.links.unsubscribe(email).and_then(|unsubscribe_url| {
                        self.renderer.render_category_digest(&CategoryDigestView {
                            category: category.clone(),
                            date: date.clone(),
                            count: repos.len(),
                            repos: repos.clone(),
                            site_url: self.links.home().to_string(),
                            unsubscribe_url,
                        })
                    });
                    results.push(self.deliver(email, &subject, body).await);
                }
            }

            for (repository, subscribers) in &subscriptions.repositories {
                let Some(entry) = analysis.today_entry(repository) else {
                    continue;
                };
                if subscribers.is_empty() {
                    continue;
                }

                info!(
                    repository = %repository,
                    subscribers = subscribers.len(),
                    "Sending repository digest"
                );
                let subject = repository_digest_subject(repository, &date);
                for email in subscribers {
                    let body = self.render_repository(entry, &date, email);
                    results.push(self.deliver(email, &subject, body).await);
                }
            }

            let sent = results.iter().filter(|r| r.is_sent()).count();
            info!(sent, failed = results.len() - sent, "Daily digests complete");
            results
        }
        .instrument(span)
        .await
    }

    /// Sends the subscription confirmation email.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the email can't be rendered or sent.
    pub async fn send_welcome(&self, request: &SubscriptionRequest) -> Result<(), NotifyError> {
        let email = request.email.trim();
        let html = self.renderer.render_welcome(&WelcomeView {
            categories: request.categories.clone(),
            repositories: request.repositories.clone(),
            site_url: self.links.home().to_string(),
            unsubscribe_url: self.links.unsubscribe(email)?,
        })?;

        self.mailer
            .send(&OutgoingMail {
                to: email.to_string(),
                subject: WELCOME_SUBJECT.to_string(),
                html,
            })
            .await?;
        Ok(())
    }

    fn render_repository(
        &self,
        entry: &TodayEntry,
        date: &str,
        email: &str,
    ) -> Result<String, crate::templates::TemplateError> {
        let unsubscribe_url = self.links.unsubscribe(email)?;
        self.renderer
            .render_repository_digest(&RepositoryDigestView {
                date: date.to_string(),
                repo: RepoView::from(entry),
                site_url: self.links.home().to_string(),
                unsubscribe_url,
            })
    }

    /// Sends one rendered digest; failures are logged and reported, not raised.
    async fn deliver(
        &self,
        email: &str,
        subject: &str,
        body: Result<String, crate::templates::TemplateError>,
    ) -> DeliveryResult {
        let outcome = match body {
            Ok(html) => self
                .mailer
                .send(&OutgoingMail {
                    to: email.to_string(),
                    subject: subject.to_string(),
                    html,
                })
                .await
                .map_err(NotifyError::from),
            Err(e) => Err(NotifyError::from(e)),
        };

        match outcome {
            Ok(()) => DeliveryResult::Sent {
                recipient: email.to_string(),
                subject: subject.to_string(),
            },
            Err(e) => {
                warn!(to = %email, subject = %subject, error = %e, "Failed to send email");
                DeliveryResult::Failed {
                    recipient: email.to_string(),
                    subject: subject.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}

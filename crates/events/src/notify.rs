//! Fan-out of response-submitted notifications.

use cocosurvey_db::models::form::Form;
use cocosurvey_db::models::response::Response;

use crate::delivery::email::{EmailConfig, EmailDelivery};
use crate::delivery::slack::SlackDelivery;
use crate::delivery::webhook::WebhookDelivery;

/// Sends a submitted response to every notification channel the owning form
/// has configured. All channels are best-effort: failures are logged and
/// never propagated to the submission path.
pub struct ResponseNotifier {
    webhook: WebhookDelivery,
    slack: SlackDelivery,
    email: Option<EmailDelivery>,
}

impl ResponseNotifier {
    /// Build a notifier; email delivery is enabled only when SMTP is
    /// configured in the environment.
    pub fn from_env() -> Self {
        Self {
            webhook: WebhookDelivery::new(),
            slack: SlackDelivery::new(),
            email: EmailConfig::from_env().map(EmailDelivery::new),
        }
    }

    /// Deliver a response-submitted event to all configured channels.
    pub async fn response_submitted(&self, form: &Form, response: &Response) {
        let payload = serde_json::json!({
            "event": "response.submitted",
            "formId": form.id,
            "formTitle": form.title,
            "responseId": response.id,
            "submittedAt": response.submitted_at,
            "answers": response.answers,
            "analysis": response.analysis,
        });

        let webhook_task = async {
            if let Some(url) = form.webhook_url.as_deref().filter(|u| !u.is_empty()) {
                if let Err(error) = self.webhook.deliver(url, &payload).await {
                    tracing::error!(form_id = form.id, %error, "Webhook notification failed");
                }
            }
        };

        let slack_task = async {
            if let Some(url) = form.slack_webhook_url.as_deref().filter(|u| !u.is_empty()) {
                let text = format!(
                    "New response for \"{}\" (response #{})",
                    form.title, response.id
                );
                if let Err(error) = self.slack.deliver(url, &text).await {
                    tracing::error!(form_id = form.id, %error, "Slack notification failed");
                }
            }
        };

        let email_task = async {
            let (Some(mailer), Some(to)) = (
                self.email.as_ref(),
                form.notification_email.as_deref().filter(|e| !e.is_empty()),
            ) else {
                return;
            };
            let subject = format!("[CoCoSurvey] New response: {}", form.title);
            let body = format!(
                "A new response was submitted to \"{}\" at {}.\nResponse id: {}",
                form.title, response.submitted_at, response.id
            );
            if let Err(error) = mailer.deliver(to, &subject, &body).await {
                tracing::error!(form_id = form.id, %error, "Email notification failed");
            }
        };

        futures::join!(webhook_task, slack_task, email_task);
    }
}

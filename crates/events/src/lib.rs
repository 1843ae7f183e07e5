//! Outbound notification infrastructure.
//!
//! When a response is submitted, the owning form may be configured with a
//! notification email, a generic webhook, and/or a Slack incoming webhook.
//! [`ResponseNotifier`] fans the event out to every configured channel in
//! the background; delivery failures are logged and retried but never
//! surface to the respondent.

pub mod delivery;
pub mod notify;

pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::slack::SlackDelivery;
pub use delivery::webhook::WebhookDelivery;
pub use notify::ResponseNotifier;

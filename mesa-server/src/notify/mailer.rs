//! Delivery transport seam
//!
//! 真实部署接 SMTP/网关；仓库内置的实现只写结构化日志。

use async_trait::async_trait;

use super::message::{Notification, Recipient};

/// Outbound transport for notifications
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), anyhow::Error>;
}

/// Transport that records deliveries in the log stream
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, notification: &Notification) -> Result<(), anyhow::Error> {
        let to = match &notification.recipient {
            Recipient::Customer(email) => email.as_str(),
            Recipient::Operator => "operator",
        };
        tracing::info!(
            target: "notify",
            to,
            subject = %notification.subject,
            body = %notification.body,
            "Notification delivered"
        );
        Ok(())
    }
}

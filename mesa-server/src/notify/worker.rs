//! 通知后台 Worker
//!
//! 从 mpsc 通道消费 Notification，经 Mailer 投递。
//! 投递失败只记日志——尽力而为，不重试。

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::mailer::Mailer;
use super::message::Notification;

/// Notification delivery worker
pub struct NotificationWorker {
    mailer: Arc<dyn Mailer>,
}

impl NotificationWorker {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// 运行 worker（阻塞直到通道关闭或收到停机信号）
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>, shutdown: CancellationToken) {
        tracing::info!("Notification worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Notification worker received shutdown signal");
                    break;
                }
                notification = rx.recv() => {
                    let Some(notification) = notification else {
                        tracing::info!("Notification channel closed, worker stopping");
                        break;
                    };
                    if let Err(e) = self.mailer.deliver(&notification).await {
                        tracing::error!(
                            subject = %notification.subject,
                            "Failed to deliver notification: {e:?}"
                        );
                    }
                }
            }
        }
    }
}

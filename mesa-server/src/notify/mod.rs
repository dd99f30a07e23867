//! 通知分发
//!
//! 业务状态变更后给客人/店家发确认消息。发送是 fire-and-forget：
//! handler 侧 `try_send` 进有界通道立即返回，投递结果永远不影响
//! 业务事务；通道满了就丢弃并记 warn（at-most-once，无重试，无 outbox）。

mod mailer;
mod message;
mod worker;

pub use mailer::{LogMailer, Mailer};
pub use message::{Notification, Recipient};
pub use worker::NotificationWorker;

use std::sync::Arc;
use tokio::sync::mpsc;

/// Default channel capacity
const DEFAULT_BUFFER: usize = 256;

/// Handle used by business code to dispatch notifications
///
/// Cloneable; all clones feed the same worker.
#[derive(Clone)]
pub struct NotificationService {
    tx: mpsc::Sender<Notification>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Create the service and the receiver end for the worker
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    /// Service wired to a started worker with the default transport
    pub fn start(shutdown: tokio_util::sync::CancellationToken) -> Self {
        let (service, rx) = Self::new(DEFAULT_BUFFER);
        let worker = NotificationWorker::new(Arc::new(LogMailer));
        tokio::spawn(worker.run(rx, shutdown));
        service
    }

    /// Non-blocking dispatch, never fails the caller.
    ///
    /// 满/关的通道直接丢消息，业务状态已经提交，不回滚。
    pub fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.tx.try_send(notification) {
            tracing::warn!("Notification dropped: {e}");
        }
    }

    /// Dispatch a batch (customer + operator pairs, etc.)
    pub fn dispatch_all(&self, notifications: impl IntoIterator<Item = Notification>) {
        for n in notifications {
            self.dispatch(n);
        }
    }
}

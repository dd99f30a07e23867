//! 自助取消 OTP 流程
//!
//! 预订实体用公开的预订号 + 类型定位。请求取消 → 下发 6 位数字码
//! （10 分钟有效），验证通过 → 走正常取消流转（级联删除预点单、
//! 发取消确认）。查询接口只返回打码后的邮箱。

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::repository;
use crate::notify::{Notification, NotificationService};
use crate::reservations;
use crate::utils::{AppError, AppResult};
use shared::models::{Booking, Event, ReservationStatus};

/// Code validity window
pub const OTP_TTL_MS: i64 = 10 * 60 * 1000;

/// Which kind of reservation the code addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationKind {
    Booking,
    Event,
}

/// Outcome of a pure code check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    Valid,
    Mismatch,
    Expired,
}

/// Compare a presented code against the stored one.
///
/// Exact match first, then expiry; `stored = None` means no code was ever
/// issued and counts as a mismatch. No retry limit.
pub fn check_code(
    stored: Option<&str>,
    expires_at: Option<i64>,
    presented: &str,
    now: i64,
) -> OtpCheck {
    let Some(stored) = stored else {
        return OtpCheck::Mismatch;
    };
    if stored != presented {
        return OtpCheck::Mismatch;
    }
    match expires_at {
        Some(expiry) if now <= expiry => OtpCheck::Valid,
        _ => OtpCheck::Expired,
    }
}

/// Generate a 6-digit numeric code
pub fn generate_code() -> String {
    use rand::Rng;
    format!("{}", rand::thread_rng().gen_range(100_000..1_000_000))
}

/// Mask an email for display: keep the first two characters of the local
/// part when it is longer than two characters.
///
/// `abcdef@x.com` → `ab***@x.com`, `ab@x.com` → `***@x.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            if local.chars().count() > 2 {
                let head: String = local.chars().take(2).collect();
                format!("{head}***@{domain}")
            } else {
                format!("***@{domain}")
            }
        }
        None => "***".to_string(),
    }
}

/// Challenge issued to the caller after requesting cancellation
#[derive(Debug, Clone, Serialize)]
pub struct OtpChallenge {
    pub code: String,
    pub masked_email: String,
    pub status: ReservationStatus,
}

/// Result of a verified cancellation
#[derive(Debug, Clone, Serialize)]
pub struct CancellationResult {
    pub code: String,
    pub status: ReservationStatus,
}

enum Target {
    Booking(Booking),
    Event(Event),
}

impl Target {
    fn email(&self) -> &str {
        match self {
            Target::Booking(b) => &b.customer_email,
            Target::Event(e) => &e.contact_email,
        }
    }

    fn name(&self) -> &str {
        match self {
            Target::Booking(b) => &b.customer_name,
            Target::Event(e) => &e.contact_name,
        }
    }

    fn code(&self) -> &str {
        match self {
            Target::Booking(b) => &b.code,
            Target::Event(e) => &e.code,
        }
    }

    fn id(&self) -> i64 {
        match self {
            Target::Booking(b) => b.id,
            Target::Event(e) => e.id,
        }
    }

    fn status(&self) -> ReservationStatus {
        match self {
            Target::Booking(b) => b.status,
            Target::Event(e) => e.status,
        }
    }

    fn otp(&self) -> (Option<&str>, Option<i64>) {
        match self {
            Target::Booking(b) => (b.otp_code.as_deref(), b.otp_expires_at),
            Target::Event(e) => (e.otp_code.as_deref(), e.otp_expires_at),
        }
    }
}

async fn load(pool: &SqlitePool, kind: ReservationKind, code: &str) -> AppResult<Target> {
    match kind {
        ReservationKind::Booking => {
            let booking = repository::booking::find_by_code(pool, code)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Reservation {code}")))?;
            Ok(Target::Booking(booking))
        }
        ReservationKind::Event => {
            let event = repository::event::find_by_code(pool, code)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Reservation {code}")))?;
            Ok(Target::Event(event))
        }
    }
}

/// Issue (or re-issue) a cancellation code and dispatch it to the
/// contact email. Responds with the masked address only.
pub async fn request(
    pool: &SqlitePool,
    notifications: &NotificationService,
    kind: ReservationKind,
    code: &str,
) -> AppResult<OtpChallenge> {
    let target = load(pool, kind, code).await?;

    if target.status().is_terminal() {
        return Err(AppError::business_rule(
            "Reservation is already cancelled or rejected",
        ));
    }

    let otp = generate_code();
    let expires_at = shared::util::now_millis() + OTP_TTL_MS;
    match &target {
        Target::Booking(b) => repository::booking::set_otp(pool, b.id, &otp, expires_at).await?,
        Target::Event(e) => repository::event::set_otp(pool, e.id, &otp, expires_at).await?,
    }

    notifications.dispatch(Notification::otp_code(
        target.email(),
        target.name(),
        target.code(),
        &otp,
    ));
    tracing::info!(code = %target.code(), "Cancellation code issued");

    Ok(OtpChallenge {
        code: target.code().to_string(),
        masked_email: mask_email(target.email()),
        status: target.status(),
    })
}

/// Verify a presented code and, on success, cancel the reservation
/// through the normal lifecycle (cascades + confirmation notifications).
pub async fn verify(
    pool: &SqlitePool,
    notifications: &NotificationService,
    kind: ReservationKind,
    code: &str,
    presented: &str,
) -> AppResult<CancellationResult> {
    let target = load(pool, kind, code).await?;
    let (stored, expires_at) = target.otp();

    match check_code(stored, expires_at, presented, shared::util::now_millis()) {
        OtpCheck::Mismatch => return Err(AppError::InvalidOtp),
        OtpCheck::Expired => return Err(AppError::OtpExpired),
        OtpCheck::Valid => {}
    }

    let status = match kind {
        ReservationKind::Booking => {
            reservations::booking::set_status(
                pool,
                notifications,
                target.id(),
                ReservationStatus::Cancelled,
            )
            .await?
            .status
        }
        ReservationKind::Event => {
            reservations::event::set_status(
                pool,
                notifications,
                target.id(),
                ReservationStatus::Cancelled,
            )
            .await?
            .status
        }
    };

    tracing::info!(code = %target.code(), "Reservation cancelled via OTP");
    Ok(CancellationResult {
        code: target.code().to_string(),
        status,
    })
}

/// Public lookup by code: returns the masked contact email so the flow
/// never reveals a full address to an unauthenticated caller.
pub async fn lookup(
    pool: &SqlitePool,
    kind: ReservationKind,
    code: &str,
) -> AppResult<OtpChallenge> {
    let target = load(pool, kind, code).await?;
    Ok(OtpChallenge {
        code: target.code().to_string(),
        masked_email: mask_email(target.email()),
        status: target.status(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_email_short_local_part() {
        assert_eq!(mask_email("ab@x.com"), "***@x.com");
        assert_eq!(mask_email("a@x.com"), "***@x.com");
    }

    #[test]
    fn mask_email_long_local_part() {
        assert_eq!(mask_email("abcdef@x.com"), "ab***@x.com");
        assert_eq!(mask_email("abc@x.com"), "ab***@x.com");
    }

    #[test]
    fn check_code_round_trip_within_ttl() {
        let issued_at = 1_700_000_000_000_i64;
        let expires_at = issued_at + OTP_TTL_MS;
        assert_eq!(
            check_code(Some("123456"), Some(expires_at), "123456", expires_at),
            OtpCheck::Valid
        );
    }

    #[test]
    fn check_code_expired_one_second_late() {
        let issued_at = 1_700_000_000_000_i64;
        let expires_at = issued_at + OTP_TTL_MS;
        assert_eq!(
            check_code(Some("123456"), Some(expires_at), "123456", expires_at + 1_000),
            OtpCheck::Expired
        );
    }

    #[test]
    fn check_code_mismatch_wins_over_expiry() {
        assert_eq!(
            check_code(Some("123456"), Some(0), "654321", 1),
            OtpCheck::Mismatch
        );
        assert_eq!(check_code(None, None, "123456", 1), OtpCheck::Mismatch);
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}

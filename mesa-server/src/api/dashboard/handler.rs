//! Dashboard API Handlers
//!
//! 看板是纯聚合读：当日订位、待审包场、近七天已确认包场、
//! 预点单营收、反馈均分。报表接口输出按天的序列。

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::ServerState;
use crate::db::repository::{booking, feedback, report};
use crate::utils::{AppError, AppResult, time};
use shared::models::Event;

/// Reports 查询最大跨度（天）
const MAX_REPORT_SPAN_DAYS: i64 = 366;

// ============================================================================
// Response Types
// ============================================================================

/// Today's booking counts by status
#[derive(Debug, Clone, Serialize)]
pub struct BookingCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub cancelled: i64,
    pub total: i64,
}

/// Revenue block (pre-order grand totals)
#[derive(Debug, Clone, Serialize)]
pub struct RevenueStats {
    pub today: f64,
    pub this_month: f64,
}

/// Feedback block
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackStats {
    pub average_rating: Option<f64>,
    pub count: i64,
}

/// Full dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub bookings_today: BookingCounts,
    pub tables_booked_today: i64,
    pub pending_event_requests: i64,
    pub upcoming_events: Vec<Event>,
    pub revenue: RevenueStats,
    pub feedback: FeedbackStats,
}

/// Per-day report point
#[derive(Debug, Clone, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub bookings: i64,
    pub events: i64,
    pub revenue: f64,
}

/// Report series response
#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DailyPoint>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    pub start: String,
    pub end: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/dashboard - 当日运营总览
pub async fn summary(State(state): State<ServerState>) -> AppResult<Json<DashboardResponse>> {
    let today = time::today_in(state.config.timezone);

    let counts = report::booking_status_counts_on(&state.pool, today).await?;
    let tables_booked = booking::distinct_tables_on(&state.pool, today).await?;
    let pending_events = report::pending_event_count(&state.pool).await?;
    let week_ahead = today.checked_add_days(Days::new(7)).unwrap_or(today);
    let upcoming = report::upcoming_events(&state.pool, today, week_ahead).await?;

    let (month_start, month_end) = month_bounds(today);
    let revenue_today = report::revenue_between(&state.pool, today, today).await?;
    let revenue_month = report::revenue_between(&state.pool, month_start, month_end).await?;

    let average_rating = feedback::average_rating(&state.pool).await?;
    let feedback_count = feedback::count(&state.pool).await?;

    Ok(Json(DashboardResponse {
        date: today,
        bookings_today: BookingCounts {
            pending: counts.pending,
            approved: counts.approved,
            rejected: counts.rejected,
            cancelled: counts.cancelled,
            total: counts.total(),
        },
        tables_booked_today: tables_booked,
        pending_event_requests: pending_events,
        upcoming_events: upcoming,
        revenue: RevenueStats {
            today: revenue_today,
            this_month: revenue_month,
        },
        feedback: FeedbackStats {
            average_rating,
            count: feedback_count,
        },
    }))
}

/// GET /api/dashboard/reports?start=&end= - 按天的报表序列（闭区间）
pub async fn reports(
    State(state): State<ServerState>,
    Query(query): Query<ReportsQuery>,
) -> AppResult<Json<ReportsResponse>> {
    let start = time::parse_date(&query.start)?;
    let end = time::parse_date(&query.end)?;
    if start > end {
        return Err(AppError::validation("start must not be after end"));
    }
    if (end - start).num_days() >= MAX_REPORT_SPAN_DAYS {
        return Err(AppError::validation(format!(
            "Report range is limited to {MAX_REPORT_SPAN_DAYS} days"
        )));
    }

    let mut days: BTreeMap<NaiveDate, DailyPoint> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| {
            (
                date,
                DailyPoint {
                    date,
                    bookings: 0,
                    events: 0,
                    revenue: 0.0,
                },
            )
        })
        .collect();

    for (date, n) in report::bookings_per_day(&state.pool, start, end).await? {
        if let Some(point) = days.get_mut(&date) {
            point.bookings = n;
        }
    }
    for (date, n) in report::events_per_day(&state.pool, start, end).await? {
        if let Some(point) = days.get_mut(&date) {
            point.events = n;
        }
    }
    for (date, amount) in report::revenue_per_day(&state.pool, start, end).await? {
        if let Some(point) = days.get_mut(&date) {
            point.revenue += amount;
        }
    }

    Ok(Json(ReportsResponse {
        start,
        end,
        days: days.into_values().collect(),
    }))
}

/// First and last day of the month containing `today`
fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let next_month = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    };
    let end = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(today);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_regular_month() {
        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 8, 31).unwrap());
    }

    #[test]
    fn month_bounds_december_wraps_year() {
        let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2026, 12, 15).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }
}

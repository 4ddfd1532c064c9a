//! Month digest over the normalized store
//!
//! Read-only reporting: for a query month, which plants have an active
//! sowing or harvest window, whether that window is in its last month
//! (expiring), and whether it is a true range (peak) rather than a
//! single-month spike.

use crate::seasonality::{Activity, SeasonWindow};
use crate::{months, Result};
use sqlx::SqlitePool;
use std::fmt::Write as _;

/// One active window for the query month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub plant_id: String,
    pub common_name: String,
    pub activity: Activity,
    pub window: SeasonWindow,
    pub expiring: bool,
    pub peak: bool,
}

/// Collect every (plant, activity) window active in `month`, in plant
/// primary key order.
pub async fn month_report(pool: &SqlitePool, month: u8) -> Result<Vec<ReportEntry>> {
    let rows = sqlx::query_as::<_, (String, String, String, i64, i64)>(
        r#"
        SELECT s.plant_id, p.common_name, s.activity, s.start_month, s.end_month
        FROM plant_seasonality s
        JOIN plants p ON p.plant_id = s.plant_id
        ORDER BY s.plant_id, s.activity, s.rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::new();
    for (plant_id, common_name, activity, start_month, end_month) in rows {
        let Some(activity) = Activity::parse(&activity) else {
            continue;
        };
        let Some(window) = SeasonWindow::new(start_month as u8, end_month as u8) else {
            continue;
        };
        if !window.is_active(month) {
            continue;
        }
        entries.push(ReportEntry {
            plant_id,
            common_name,
            activity,
            expiring: window.is_expiring(month),
            peak: window.is_peak(),
            window,
        });
    }

    Ok(entries)
}

/// Render a digest as human-readable lines.
pub fn render(month: u8, entries: &[ReportEntry]) -> String {
    let mut out = String::new();
    let month_name = months::decode(month as i64).unwrap_or("?");
    let _ = writeln!(out, "Activity for {month_name}:");

    if entries.is_empty() {
        let _ = writeln!(out, "  (nothing active this month)");
        return out;
    }

    for entry in entries {
        let range = format!(
            "{}..{}",
            months::decode_or_empty(entry.window.start_month as i64),
            months::decode_or_empty(entry.window.end_month as i64),
        );
        let mut tags = Vec::new();
        if entry.peak {
            tags.push("peak");
        }
        if entry.expiring {
            tags.push("expiring");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        let _ = writeln!(
            out,
            "  {} - {} ({}){}",
            entry.common_name, entry.activity, range, tags
        );
    }

    out
}

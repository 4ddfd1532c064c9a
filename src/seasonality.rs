//! Seasonality window evaluation
//!
//! A window is a (start_month, end_month) pair in 1..12. Windows may wrap
//! the year boundary (start > end), e.g. November..February covers Nov,
//! Dec, Jan, Feb. Evaluation is pure; it is invoked per (plant, window,
//! query month) by reporting and ingestion validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seasonal activity a window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Sowing,
    Harvest,
}

impl Activity {
    /// Stable string form used as the `activity` column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Sowing => "sowing",
            Activity::Harvest => "harvest",
        }
    }

    /// Parse the stored column value back into an activity.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sowing" => Some(Activity::Sowing),
            "harvest" => Some(Activity::Harvest),
            _ => None,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved seasonality window, months validated into 1..12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub start_month: u8,
    pub end_month: u8,
}

impl SeasonWindow {
    /// Build a window, rejecting out-of-range months.
    pub fn new(start_month: u8, end_month: u8) -> Option<Self> {
        if (1..=12).contains(&start_month) && (1..=12).contains(&end_month) {
            Some(Self {
                start_month,
                end_month,
            })
        } else {
            None
        }
    }

    /// True when the window spans the December/January boundary.
    pub fn wraps(&self) -> bool {
        self.start_month > self.end_month
    }

    /// Containment test for a query month.
    ///
    /// Non-wrapping: `start <= month <= end`.
    /// Wrapping: `month >= start || month <= end`.
    pub fn is_active(&self, month: u8) -> bool {
        if self.wraps() {
            month >= self.start_month || month <= self.end_month
        } else {
            (self.start_month..=self.end_month).contains(&month)
        }
    }

    /// The window closes this month (its last active month).
    pub fn is_expiring(&self, month: u8) -> bool {
        self.end_month == month
    }

    /// A true range rather than a single-month spike. Reporting
    /// classification only, not a structural invariant.
    pub fn is_peak(&self) -> bool {
        self.start_month != self.end_month
    }
}

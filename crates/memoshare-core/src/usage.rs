//! Daily memo activity for the usage heatmap.
//!
//! The matrix always covers whole weeks starting on a Sunday and ends today,
//! so the last column is partial. Every day in the window has exactly one
//! entry.

use chrono::{Datelike, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::client::{MemosConnector, MemosService};
use crate::credentials::{resolve_credentials, CredentialSource};
use crate::error::ErrorKind;
use crate::models::{ListMemosFilter, MemoRecord};
use crate::Result;

pub const DEFAULT_WEEKS: u32 = 12;
/// Ten years of columns.
pub const MAX_WEEKS: u32 = 520;

/// Number of memos created on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyUsageStat {
    pub date: NaiveDate,
    pub count: u32,
}

/// Trailing window of whole weeks ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageWindow {
    weeks: u32,
}

impl Default for UsageWindow {
    fn default() -> Self {
        Self {
            weeks: DEFAULT_WEEKS,
        }
    }
}

impl UsageWindow {
    /// A window of `weeks` columns, clamped to `1..=MAX_WEEKS`.
    #[must_use]
    pub fn weeks(weeks: u32) -> Self {
        Self {
            weeks: weeks.clamp(1, MAX_WEEKS),
        }
    }

    #[must_use]
    pub const fn week_count(self) -> u32 {
        self.weeks
    }

    /// First day of the window: the Sunday `weeks - 1` weeks before this
    /// week's Sunday.
    #[must_use]
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        let back = u64::from(today.weekday().num_days_from_sunday())
            + u64::from(self.weeks - 1) * 7;
        today
            .checked_sub_days(Days::new(back))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Every day in the window, oldest first.
    pub fn days(self, today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
        self.start(today)
            .iter_days()
            .take_while(move |date| *date <= today)
    }
}

/// Zero-filled matrix for the default window ending today.
#[must_use]
pub fn initial_matrix() -> Vec<DailyUsageStat> {
    initial_matrix_at(Local::now().date_naive(), UsageWindow::default())
}

#[must_use]
pub fn initial_matrix_at(today: NaiveDate, window: UsageWindow) -> Vec<DailyUsageStat> {
    window
        .days(today)
        .map(|date| DailyUsageStat { date, count: 0 })
        .collect()
}

/// Bucket memos by local creation day over the default window.
#[must_use]
pub fn calculate_matrix(memos: &[MemoRecord]) -> Vec<DailyUsageStat> {
    calculate_matrix_at(
        memos,
        Local::now().date_naive(),
        &Local,
        UsageWindow::default(),
    )
}

/// Bucket memos by their creation day in `tz`.
///
/// Memos created outside the window are ignored.
#[must_use]
pub fn calculate_matrix_at<Tz: TimeZone>(
    memos: &[MemoRecord],
    today: NaiveDate,
    tz: &Tz,
    window: UsageWindow,
) -> Vec<DailyUsageStat> {
    let mut matrix = initial_matrix_at(today, window);
    let Some(start) = matrix.first().map(|stat| stat.date) else {
        return matrix;
    };

    for memo in memos {
        let Some(created) = tz.timestamp_opt(memo.created_ts, 0).single() else {
            tracing::debug!(
                "Ignoring memo {} with invalid timestamp {}",
                memo.id,
                memo.created_ts
            );
            continue;
        };
        let day = created.date_naive();
        if day < start || day > today {
            continue;
        }
        let Ok(offset) = usize::try_from((day - start).num_days()) else {
            continue;
        };
        if let Some(stat) = matrix.get_mut(offset) {
            stat.count = stat.count.saturating_add(1);
        }
    }
    matrix
}

/// Fetch non-archived memos and aggregate them.
///
/// Returns `Ok(None)` when no server is configured so the caller keeps
/// showing [`initial_matrix`].
pub async fn refresh_usage_matrix<C, K>(
    source: &C,
    connector: &K,
    window: UsageWindow,
) -> Result<Option<Vec<DailyUsageStat>>>
where
    C: CredentialSource + ?Sized,
    K: MemosConnector,
{
    let credentials = match resolve_credentials(source) {
        Ok(credentials) => credentials,
        Err(error) if error.kind() == ErrorKind::NotAuthenticated => {
            tracing::debug!("Skipping usage refresh: {}", error);
            return Ok(None);
        }
        Err(error) => return Err(error),
    };

    let service = connector.connect(&credentials)?;
    let memos = service.list_memos(&ListMemosFilter::normal()).await?;
    tracing::info!("Aggregating usage for {} memo(s)", memos.len());
    Ok(Some(calculate_matrix_at(
        &memos,
        Local::now().date_naive(),
        &Local,
        window,
    )))
}

//! # Cashbox Commands
//!
//! Closing the register ("cerrar caja") and the views around it.
//!
//! ## Close Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  close_day(date)                                                        │
//! │     │                                                                   │
//! │     ├── already closed? ──────────────────────► ALREADY_CLOSED          │
//! │     ├── later day closed? ────────────────────► BUSINESS_RULE           │
//! │     ├── services(date), expenses(date), latest close before date       │
//! │     ├── compute_close ──► CashboxDay                                   │
//! │     ├── cashbox.save (transactional; UNIQUE(date) backstop)            │
//! │     │                                                                   │
//! │     └── backup_on_close?                                               │
//! │            ├── VACUUM INTO <backup_dir>/barberia-<ts>.db  ──► Written   │
//! │            └── error ──► logged, reported as Failed; close stays       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};
use barberia_core::cashbox::{compute_close, summarize_week, CashboxClose, CashboxWeek};
use barberia_core::{CashboxDay, CoreError};
use barberia_db::BackupInfo;

// =============================================================================
// Responses
// =============================================================================

/// The live numbers for a day, and its close if there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub close: CashboxClose,
    pub saved: Option<CashboxDay>,
}

/// What happened to the backup that follows a close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BackupOutcome {
    Written { path: PathBuf, size_bytes: u64 },
    Failed { message: String },
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseDayResponse {
    pub day: CashboxDay,
    pub backup: BackupOutcome,
}

// =============================================================================
// Commands
// =============================================================================

/// Computes the close for `date` without saving it.
pub async fn day_summary(
    db: &DbState,
    session: &SessionState,
    date: NaiveDate,
) -> Result<DaySummary, ApiError> {
    session.require()?;
    let close = compute_for(db, date).await?;
    let saved = db.inner().cashbox().find_by_date(date).await?;
    Ok(DaySummary { close, saved })
}

/// Closes the register for `date` and backs the database up.
///
/// Days close in order: a later close already carried the balances past
/// `date`, so `date` can no longer be slotted in before it.
///
/// ## Errors
/// - `ALREADY_CLOSED` when `date` has a close; the stored row is untouched
/// - `BUSINESS_RULE` when a later date is already closed
pub async fn close_day(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    date: NaiveDate,
) -> Result<CloseDayResponse, ApiError> {
    let by = session.require()?;

    if db.inner().cashbox().find_by_date(date).await?.is_some() {
        return Err(CoreError::AlreadyClosed { date }.into());
    }

    let day = compute_for(db, date)
        .await?
        .into_day(Uuid::new_v4().to_string(), Utc::now());

    db.inner().cashbox().save(&day).await.map_err(|e| -> ApiError {
        if e.is_unique_on("cashbox_days") {
            CoreError::AlreadyClosed { date }.into()
        } else {
            e.into()
        }
    })?;

    info!(
        by = %by.user_id,
        date = %day.date,
        income = day.income_total_gs,
        expenses = day.expense_total_gs,
        balance = day.balance_gs,
        cash = day.cash_gs,
        transfer = day.transfer_gs,
        pos = day.pos_gs,
        "Cashbox closed"
    );

    let backup = if config.backup_on_close {
        match write_backup(db, config).await {
            Ok(info) => BackupOutcome::Written {
                path: info.path,
                size_bytes: info.size_bytes,
            },
            Err(e) => {
                error!(date = %day.date, error = %e, "Backup after close failed");
                BackupOutcome::Failed { message: e.message }
            }
        }
    } else {
        BackupOutcome::Disabled
    };

    Ok(CloseDayResponse { day, backup })
}

/// Closes inside the cashbox week containing `date`, with totals.
pub async fn cashbox_week(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
    date: NaiveDate,
) -> Result<CashboxWeek, ApiError> {
    session.require()?;
    let range = config.cashbox_week.range_containing(date);
    let days = db.inner().cashbox().list_in_range(range.start, range.end).await?;
    Ok(summarize_week(range, &days))
}

/// Reopens the latest closed day. Admin only.
pub async fn delete_close(
    db: &DbState,
    session: &SessionState,
    date: NaiveDate,
) -> Result<CashboxDay, ApiError> {
    let admin = session.require_admin("delete cashbox close")?;
    let day = db.inner().cashbox().delete(date).await?;
    info!(by = %admin.user_id, date = %date, balance = day.balance_gs, "Cashbox close deleted");
    Ok(day)
}

/// Writes a backup now, whatever `backup_on_close` says.
pub async fn backup_now(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<BackupInfo, ApiError> {
    let by = session.require()?;
    let info = write_backup(db, config).await?;
    info!(by = %by.user_id, path = %info.path.display(), "Manual backup");
    Ok(info)
}

async fn compute_for(db: &DbState, date: NaiveDate) -> Result<CashboxClose, ApiError> {
    let services = db.inner().services().list_by_date(date).await?;
    let expenses = db.inner().expenses().list_by_date(date).await?;
    let prior = db.inner().cashbox().find_latest_before(date).await?;
    Ok(compute_close(date, &services, &expenses, prior.as_ref()))
}

async fn write_backup(db: &DbState, config: &ConfigState) -> Result<BackupInfo, ApiError> {
    let dir = config.backup_dir()?;
    Ok(db.inner().backup_to(&dir).await?)
}

//! # Database Backup
//!
//! Point-in-time copies of the live database via `VACUUM INTO`.
//!
//! ```text
//!  close_day ──► commit ──► backup_to(dir)
//!                              │
//!                              ▼
//!              dir/barberia-20240608-201533-117.db
//! ```
//!
//! `VACUUM INTO` writes a compacted, self-contained file (no -wal/-shm
//! companions) from a read transaction, so the app keeps running while it
//! copies. Rotation and restore are left to the operator.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Prefix of every backup file name.
pub const BACKUP_PREFIX: &str = "barberia-";

/// What was written.
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Copies the database into a new timestamped file under `dir`.
///
/// The directory is created when missing. An existing file is never
/// overwritten; SQLite refuses and the error is returned.
pub async fn backup_to(pool: &SqlitePool, dir: &Path) -> DbResult<BackupInfo> {
    std::fs::create_dir_all(dir)
        .map_err(|e| DbError::BackupFailed(format!("{}: {e}", dir.display())))?;

    let created_at = Utc::now();
    let path = dir.join(backup_file_name(created_at));
    let target = path
        .to_str()
        .ok_or_else(|| DbError::BackupFailed(format!("non UTF-8 path {}", path.display())))?
        .to_string();

    debug!(path = %target, "Writing backup");

    sqlx::query("VACUUM INTO ?1")
        .bind(&target)
        .execute(pool)
        .await
        .map_err(|e| DbError::BackupFailed(e.to_string()))?;

    let size_bytes = std::fs::metadata(&path)
        .map(|m| m.len())
        .map_err(|e| DbError::BackupFailed(e.to_string()))?;

    info!(path = %path.display(), size_bytes, "Backup written");

    Ok(BackupInfo {
        path,
        size_bytes,
        created_at,
    })
}

/// `barberia-YYYYMMDD-HHMMSS-mmm.db`
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("{BACKUP_PREFIX}{}.db", at.format("%Y%m%d-%H%M%S-%3f"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;

    #[test]
    fn test_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 6, 8, 20, 15, 33).unwrap();
        assert_eq!(backup_file_name(at), "barberia-20240608-201533-000.db");
    }

    #[tokio::test]
    async fn test_backup_writes_sqlite_file() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("backups");

        let info = db.backup_to(&dir).await.unwrap();

        assert!(info.path.starts_with(&dir));
        assert!(info.size_bytes > 0);
        let header = std::fs::read(&info.path).unwrap();
        assert_eq!(&header[..16], b"SQLite format 3\0");
    }

    #[tokio::test]
    async fn test_backup_into_unwritable_location_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        // a regular file cannot be used as a directory
        let file = tempfile::NamedTempFile::new().unwrap();

        let err = db.backup_to(file.path()).await.unwrap_err();
        assert!(matches!(err, DbError::BackupFailed(_)));
    }
}

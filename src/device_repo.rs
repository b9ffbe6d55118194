// SQLite storage: device holds current state (one row per ip, enforced by
// a unique index), device_log is the append-only history. Heartbeats are
// stored as "YYYY-MM-DD HH:MM:SS" text; lexicographic order matches
// chronological order for that format, so range scans bind text bounds.

use crate::models::{DeviceLogRow, DeviceRow, DeviceSnapshot};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct DeviceRepo {
    pool: SqlitePool,
}

impl DeviceRepo {
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS device (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                ip             TEXT NOT NULL,
                mac            TEXT NOT NULL,
                name           TEXT NOT NULL,
                heartbeat_time TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // One current-state row per ip; lets the upsert below be atomic.
        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_device_ip ON device(ip)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS device_log (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                ip             TEXT NOT NULL,
                mac            TEXT NOT NULL,
                name           TEXT NOT NULL,
                heartbeat_time TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_device_log_heartbeat_time ON device_log(heartbeat_time)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Records one report batch: every snapshot is appended to device_log
    /// and upserted into device. The whole batch is one transaction, so a
    /// failure leaves storage untouched.
    #[instrument(skip(self, batch), fields(repo = "device", operation = "record_batch", batch_size = batch.len()))]
    pub async fn record_batch(&self, batch: &[DeviceSnapshot]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        for device in batch {
            sqlx::query("INSERT INTO device_log (ip, mac, name, heartbeat_time) VALUES ($1, $2, $3, $4)")
                .bind(&device.ip)
                .bind(&device.mac)
                .bind(&device.name)
                .bind(&device.heartbeat_time)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO device (ip, mac, name, heartbeat_time) VALUES ($1, $2, $3, $4)
                ON CONFLICT(ip) DO UPDATE SET
                    mac = excluded.mac,
                    name = excluded.name,
                    heartbeat_time = excluded.heartbeat_time
                "#,
            )
            .bind(&device.ip)
            .bind(&device.mac)
            .bind(&device.name)
            .bind(&device.heartbeat_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// All current-state rows, unordered (the index view sorts by ip).
    pub async fn list_devices(&self) -> anyhow::Result<Vec<DeviceRow>> {
        let rows = sqlx::query("SELECT id, ip, mac, name, heartbeat_time FROM device")
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(DeviceRow {
                id: row.try_get("id")?,
                ip: row.try_get("ip")?,
                mac: row.try_get("mac")?,
                name: row.try_get("name")?,
                heartbeat_time: row.try_get("heartbeat_time")?,
            });
        }
        Ok(out)
    }

    /// History rows in [begin, end], newest first, optionally for one ip.
    #[instrument(skip(self), fields(repo = "device", operation = "get_logs"))]
    pub async fn get_logs(
        &self,
        begin: &str,
        end: &str,
        ip: Option<&str>,
    ) -> anyhow::Result<Vec<DeviceLogRow>> {
        let rows = match ip {
            Some(ip) => {
                sqlx::query(
                    "SELECT id, ip, mac, name, heartbeat_time FROM device_log
                     WHERE ip = $1 AND heartbeat_time >= $2 AND heartbeat_time <= $3
                     ORDER BY heartbeat_time DESC",
                )
                .bind(ip)
                .bind(begin)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, ip, mac, name, heartbeat_time FROM device_log
                     WHERE heartbeat_time >= $1 AND heartbeat_time <= $2
                     ORDER BY heartbeat_time DESC",
                )
                .bind(begin)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(DeviceLogRow {
                id: row.try_get("id")?,
                ip: row.try_get("ip")?,
                mac: row.try_get("mac")?,
                name: row.try_get("name")?,
                heartbeat_time: row.try_get("heartbeat_time")?,
            });
        }
        Ok(out)
    }

    /// Heartbeat timestamps only, for the distribution aggregation.
    #[instrument(skip(self), fields(repo = "device", operation = "get_log_times"))]
    pub async fn get_log_times(
        &self,
        begin: &str,
        end: &str,
        ip: Option<&str>,
    ) -> anyhow::Result<Vec<String>> {
        let times = match ip {
            Some(ip) => {
                sqlx::query_scalar::<_, String>(
                    "SELECT heartbeat_time FROM device_log
                     WHERE ip = $1 AND heartbeat_time >= $2 AND heartbeat_time <= $3",
                )
                .bind(ip)
                .bind(begin)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, String>(
                    "SELECT heartbeat_time FROM device_log
                     WHERE heartbeat_time >= $1 AND heartbeat_time <= $2",
                )
                .bind(begin)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(times)
    }

    /// Total history rows (monotonically non-decreasing).
    pub async fn count_logs(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM device_log")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Current-state row count (one per ip ever seen).
    pub async fn count_devices(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM device")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

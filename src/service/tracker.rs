use crate::db::{Device, DevicesStorage};
use crate::error::TrackerError;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Owns the device storage and the once-per-process schema initialization.
///
/// Cloning shares the same readiness state, so every handler awaits a single
/// in-flight initialization. A failed attempt leaves the cell empty and the
/// next caller starts over.
#[derive(Clone)]
pub struct DeviceTracker {
    storage: DevicesStorage,
    ready: Arc<OnceCell<()>>,
}

impl DeviceTracker {
    pub fn new(storage: DevicesStorage) -> Self {
        Self {
            storage,
            ready: Arc::new(OnceCell::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &DevicesStorage {
        &self.storage
    }

    #[cfg(test)]
    pub(crate) fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Create the table and seed it if empty, once. Later calls return immediately.
    pub async fn ensure_ready(&self) -> Result<(), TrackerError> {
        self.ready
            .get_or_try_init(|| async {
                self.storage.init_schema().await?;
                let seeded = self.storage.seed_if_empty().await?;
                if seeded > 0 {
                    info!(count = seeded, "seeded device table");
                } else {
                    debug!("device table already populated");
                }
                Ok::<(), TrackerError>(())
            })
            .await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Device>, TrackerError> {
        self.ensure_ready().await?;
        self.storage.list_all().await
    }

    /// Last writer wins: the current status is not checked.
    pub async fn checkout(&self, name: &str, borrower: &str) -> Result<(), TrackerError> {
        self.ensure_ready().await?;
        let affected = self.storage.checkout(name, borrower, Utc::now()).await?;
        if affected == 0 {
            return Err(TrackerError::DeviceNotFound(name.to_string()));
        }
        info!(device = %name, borrower = %borrower, "device checked out");
        Ok(())
    }

    pub async fn checkin(&self, name: &str) -> Result<(), TrackerError> {
        self.ensure_ready().await?;
        let affected = self.storage.checkin(name).await?;
        if affected == 0 {
            return Err(TrackerError::DeviceNotFound(name.to_string()));
        }
        info!(device = %name, "device checked in");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DeviceStatus;
    use crate::db::sqlite::tests::{file_storage, memory_storage};
    use futures::future::join_all;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_ensure_ready_seeds_once() {
        let db = file_storage(8).await;
        let tracker = DeviceTracker::new(db.storage.clone());
        assert!(!tracker.is_ready());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                tokio::spawn(async move { tracker.ensure_ready().await })
            })
            .collect();
        let results = join_all(handles).await;
        assert!(results.into_iter().all(|r| matches!(r, Ok(Ok(())))));
        assert!(tracker.is_ready());
        assert_eq!(tracker.storage().count().await.unwrap(), 7);

        tracker.ensure_ready().await.unwrap();
        assert_eq!(tracker.storage().count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn closed_pool_leaves_tracker_uninitialized() {
        let tracker = DeviceTracker::new(memory_storage().await);
        tracker.storage().pool().close().await;

        assert!(matches!(
            tracker.ensure_ready().await,
            Err(TrackerError::Database(_))
        ));
        assert!(!tracker.is_ready());
        assert!(tracker.list_all().await.is_err());
    }

    #[tokio::test]
    async fn failed_initialization_is_retried_from_scratch() {
        let tracker = DeviceTracker::new(memory_storage().await);
        let pool = tracker.storage().pool().clone();
        sqlx::query("CREATE TABLE devices (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            tracker.ensure_ready().await,
            Err(TrackerError::Database(_))
        ));
        assert!(!tracker.is_ready());

        sqlx::query("DROP TABLE devices").execute(&pool).await.unwrap();

        tracker.ensure_ready().await.unwrap();
        assert!(tracker.is_ready());
        assert_eq!(tracker.storage().count().await.unwrap(), 7);
        assert_eq!(tracker.list_all().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn operations_initialize_lazily() {
        let tracker = DeviceTracker::new(memory_storage().await);
        let devices = tracker.list_all().await.unwrap();
        assert_eq!(devices.len(), 7);
        assert!(tracker.is_ready());
    }

    #[tokio::test]
    async fn checkout_unknown_device_is_not_found() {
        let tracker = DeviceTracker::new(memory_storage().await);
        let err = tracker.checkout("Nonexistent Phone", "Bob").await.unwrap_err();
        assert!(matches!(err, TrackerError::DeviceNotFound(ref name) if name == "Nonexistent Phone"));
        assert!(
            tracker
                .list_all()
                .await
                .unwrap()
                .iter()
                .all(|d| d.status == DeviceStatus::Available)
        );
    }

    #[tokio::test]
    async fn checkout_and_checkin_round_trip() {
        let tracker = DeviceTracker::new(memory_storage().await);
        tracker.checkout("iPhone 15", "Alice").await.unwrap();
        let device = tracker.storage().get_by_name("iPhone 15").await.unwrap().unwrap();
        assert_eq!(device.status, DeviceStatus::CheckedOut);
        assert_eq!(device.borrower.as_deref(), Some("Alice"));

        tracker.checkin("iPhone 15").await.unwrap();
        tracker.checkin("iPhone 15").await.unwrap();
        let device = tracker.storage().get_by_name("iPhone 15").await.unwrap().unwrap();
        assert_eq!(device.status, DeviceStatus::Available);
        assert!(device.borrower.is_none());
    }
}

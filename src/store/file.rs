//! File-backed record store.
//!
//! Each cluster lives in `<data_dir>/<id>.json`. Updates go through a temp file and a
//! rename so a crash never leaves a half-written record behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::{Address, ClusterRecord, ClusterStatus, DomainError};
use crate::store::{RecordStore, StoreError, StoreResult};

const EXTENSION: &str = "json";

/// On-disk form of a cluster record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCluster {
    id: String,
    name: String,
    hosts: Vec<String>,
    key: String,
    status: ClusterStatus,
    last_bad_time: DateTime<Utc>,
    #[serde(default)]
    detail: Value,
}

impl From<&ClusterRecord> for StoredCluster {
    fn from(record: &ClusterRecord) -> Self {
        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            hosts: record.addresses().iter().map(ToString::to_string).collect(),
            key: record.key().to_string(),
            status: record.status(),
            last_bad_time: record.last_bad_time(),
            detail: record.detail().clone(),
        }
    }
}

impl TryFrom<StoredCluster> for ClusterRecord {
    type Error = DomainError;

    fn try_from(stored: StoredCluster) -> Result<Self, Self::Error> {
        let addresses = Address::parse_all(&stored.hosts)?;
        ClusterRecord::new(
            stored.id,
            stored.name,
            addresses,
            stored.key,
            stored.status,
            stored.last_bad_time,
            stored.detail,
        )
    }
}

/// Stores cluster records as JSON documents in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory.
    pub async fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        tracing::info!(path = %dir.display(), "File record store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        // Ids become file names; refuse anything that could escape the directory.
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.{EXTENSION}")))
    }

    async fn read_record(path: &Path) -> StoreResult<ClusterRecord> {
        let data = fs::read(path).await?;
        let stored: StoredCluster = serde_json::from_slice(&data)?;
        let id = stored.id.clone();
        ClusterRecord::try_from(stored).map_err(|source| StoreError::Corrupt { id, source })
    }

    fn encode(record: &ClusterRecord) -> StoreResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&StoredCluster::from(record))?)
    }
}

async fn write_file(path: &Path, data: &[u8], create_new: bool) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true);
    if create_new {
        options.create_new(true);
    } else {
        options.create(true).truncate(true);
    }
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

#[async_trait]
impl RecordStore for FileStore {
    async fn create(&self, record: &ClusterRecord) -> StoreResult<()> {
        let path = self.path_for(record.id())?;
        let data = Self::encode(record)?;

        match write_file(&path, &data, true).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists(record.id().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: &str) -> StoreResult<ClusterRecord> {
        let path = self.path_for(id)?;
        match Self::read_record(&path).await {
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    async fn list(&self) -> StoreResult<Vec<ClusterRecord>> {
        let mut records = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            records.push(Self::read_record(&path).await?);
        }

        records.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(records)
    }

    async fn update(&self, record: &ClusterRecord) -> StoreResult<()> {
        let path = self.path_for(record.id())?;
        if !fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(record.id().to_string()));
        }

        let data = Self::encode(record)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        write_file(&tmp, &data, false).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> ClusterRecord {
        ClusterRecord::new(
            id,
            "prod-ceph",
            Address::parse_all(&["10.0.0.1:6789", "[fd00::2]:6789"]).unwrap(),
            "AQBsecretkey==",
            ClusterStatus::Warning,
            Utc::now(),
            json!({"MON_DOWN": {"severity": "HEALTH_WARN"}}),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn persisted_record_reloads_identically() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let original = record("0190a1b2-0000-7000-8000-000000000001");

        store.create(&original).await.unwrap();

        let reopened = FileStore::open(dir.path()).await.unwrap();
        let loaded = reopened.get(original.id()).await.unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn create_refuses_existing_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.create(&record("a")).await.unwrap();
        assert!(matches!(
            store.create(&record("a")).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn update_requires_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        assert!(matches!(
            store.update(&record("ghost")).await,
            Err(StoreError::NotFound(_))
        ));

        let rec = record("a");
        store.create(&rec).await.unwrap();
        let healed = rec
            .set_status(ClusterStatus::Ok, Value::Null, Utc::now())
            .unwrap()
            .into_owned();
        store.update(&healed).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), healed);
        assert!(!dir.path().join("a.json.tmp").exists());
    }

    #[tokio::test]
    async fn list_is_sorted_and_skips_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        store.create(&record("b")).await.unwrap();
        store.create(&record("a")).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn rejects_path_like_ids_and_corrupt_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        assert!(matches!(store.get("../etc/passwd").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.get("missing").await, Err(StoreError::NotFound(_))));

        let bad = json!({
            "id": "bad",
            "name": "c",
            "hosts": ["not-an-ip:1"],
            "key": "k",
            "status": "ok",
            "lastBadTime": "2025-01-01T00:00:00Z"
        });
        std::fs::write(dir.path().join("bad.json"), bad.to_string()).unwrap();
        assert!(matches!(store.get("bad").await, Err(StoreError::Corrupt { .. })));
    }
}

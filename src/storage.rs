use crate::errors::AppError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{collections::BTreeMap, env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub const KPI_ORDER_KEY: &str = "kpiOrder";
pub const FILTER_SETS_KEY: &str = "dashboardFilterSets";
pub const AUDIT_TRAIL_KEY: &str = "auditTrail";
pub const REPORT_FOLDERS_KEY: &str = "reportFolders";
pub const CREATED_USERS_KEY: &str = "createdUserList";
pub const FORM_DATA_PREFIX: &str = "formdata-";

/// Minimal string-keyed JSON store, the shape browser local storage has.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&Value>;
    fn set(&mut self, key: &str, value: Value);
    fn remove(&mut self, key: &str) -> Option<Value>;
    fn keys(&self) -> Vec<String>;
}

/// In-memory store; serialized as a single JSON object when flushed to disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct StoreData {
    entries: BTreeMap<String, Value>,
}

impl KeyValueStore for StoreData {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Decodes a JSON array under `key` one element at a time. Elements that do
/// not decode are skipped, so the rest survive the next read-modify-write.
pub fn read_json_list<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(value) = store.get(key) else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        warn!("ignoring non-list value under '{key}'");
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!("skipping corrupt entry {index} under '{key}': {err}");
                None
            }
        })
        .collect()
}

pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), AppError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_value(value)?;
    store.set(key, encoded);
    Ok(())
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/dashboard.json"))
}

pub async fn load_data(path: &Path) -> StoreData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                StoreData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            StoreData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &StoreData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

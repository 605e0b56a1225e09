use crate::errors::AppError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    fs,
    sync::{Mutex, watch},
};
use tracing::{debug, error, warn};

pub async fn load_state<T>(path: &Path) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => merge_over_defaults(value),
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            T::default()
        }
    }
}

/// Overlays a persisted object onto the defaults key by key. Keys that do not
/// deserialize keep their default value.
pub fn merge_over_defaults<T>(persisted: Value) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    let defaults = T::default();
    let Value::Object(persisted) = persisted else {
        error!("persisted state is not an object, using defaults");
        return defaults;
    };
    let mut merged = match serde_json::to_value(&defaults) {
        Ok(Value::Object(map)) => map,
        _ => return defaults,
    };

    for (key, value) in persisted {
        let previous = merged.insert(key.clone(), value);
        if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
            warn!(key = %key, "ignoring persisted field with an unexpected shape");
            match previous {
                Some(previous) => {
                    merged.insert(key, previous);
                }
                None => {
                    merged.remove(&key);
                }
            }
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
}

pub async fn persist_data<T: Serialize>(path: &Path, data: &T) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// One persisted state file with a background writer.
///
/// `save` hands the serialized state to the writer and returns immediately.
/// Pending saves coalesce so only the newest blob is written, and write
/// failures are logged and dropped.
#[derive(Clone)]
pub struct Slot {
    path: PathBuf,
    latest: Arc<watch::Sender<Option<Vec<u8>>>>,
    io: Arc<Mutex<()>>,
}

impl Slot {
    pub fn spawn(path: PathBuf) -> Self {
        let (latest, mut pending) = watch::channel(None::<Vec<u8>>);
        let io = Arc::new(Mutex::new(()));

        let writer_path = path.clone();
        let writer_io = Arc::clone(&io);
        tokio::spawn(async move {
            while pending.changed().await.is_ok() {
                let Some(payload) = pending.borrow_and_update().clone() else {
                    continue;
                };
                let _guard = writer_io.lock().await;
                match fs::write(&writer_path, payload).await {
                    Ok(()) => debug!("saved {}", writer_path.display()),
                    Err(err) => warn!("failed to save {}: {err}", writer_path.display()),
                }
            }
        });

        Self {
            path,
            latest: Arc::new(latest),
            io,
        }
    }

    pub fn save<T: Serialize>(&self, data: &T) {
        match serde_json::to_vec_pretty(data) {
            Ok(payload) => {
                self.latest.send_replace(Some(payload));
            }
            Err(err) => warn!("failed to serialize {}: {err}", self.path.display()),
        }
    }

    /// Writes `data` now and waits for it, after any write already in flight.
    pub async fn flush<T: Serialize>(&self, data: &T) -> Result<(), AppError> {
        let _guard = self.io.lock().await;
        persist_data(&self.path, data).await
    }
}

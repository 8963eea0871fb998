use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::common::AppResult;

pub mod auth;
pub mod cart;

pub use auth::AuthStore;
pub use cart::CartStore;

pub const AUTH_KEY: &str = "auth-storage";
pub const CART_KEY: &str = "cart-storage";

const STATE_VERSION: u32 = 0;

/// 客户端本地持久化的键值存储
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// 每个键对应目录下的一个 `<key>.json` 文件
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        // 先写临时文件再改名，避免中途失败留下半截内容
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// 内存存储，用于测试和临时会话
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct Persisted<T> {
    state: T,
    version: u32,
}

/// 读取 `{state, version}` 记录；键不存在时返回 None
pub fn load_state<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> AppResult<Option<T>> {
    match storage.get(key)? {
        Some(raw) => {
            let persisted: Persisted<T> = serde_json::from_str(&raw)?;
            if persisted.version != STATE_VERSION {
                tracing::warn!(key, version = persisted.version, "unexpected persisted state version");
            }
            Ok(Some(persisted.state))
        }
        None => Ok(None),
    }
}

pub fn save_state<T: Serialize>(storage: &dyn Storage, key: &str, state: &T) -> AppResult<()> {
    let raw = serde_json::to_string(&Persisted {
        state,
        version: STATE_VERSION,
    })?;
    storage.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested")).unwrap();

        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v1").unwrap();
        storage.set("k", "v2").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));
        assert!(storage.dir().join("k.json").exists());

        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn state_is_wrapped_with_version() {
        let storage = MemoryStorage::new();
        save_state(&storage, "numbers", &vec![1, 2, 3]).unwrap();

        let raw = storage.get("numbers").unwrap().unwrap();
        assert_eq!(raw, r#"{"state":[1,2,3],"version":0}"#);

        let loaded: Option<Vec<i32>> = load_state(&storage, "numbers").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
        assert_eq!(load_state::<Vec<i32>>(&storage, "missing").unwrap(), None);
    }

    #[test]
    fn corrupt_state_is_an_error() {
        let storage = MemoryStorage::new();
        storage.set("bad", "{not json").unwrap();
        assert!(load_state::<Vec<i32>>(&storage, "bad").is_err());
    }
}

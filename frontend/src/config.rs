//! 运行时配置
//!
//! API 根地址的读取顺序：
//! 1. LocalStorage 中的 `prolearn_api_root`（便于指向其他环境）
//! 2. 编译期环境变量 `PROLEARN_API_ROOT`
//! 3. 默认值 `http://127.0.0.1:8000`

use crate::web::KeyValueStore;
use prolearn_shared::{DEFAULT_API_ROOT, STORAGE_API_ROOT_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    api_root: String,
}

impl AppConfig {
    pub fn new(api_root: impl Into<String>) -> Self {
        let api_root = api_root.into().trim().trim_end_matches('/').to_string();
        Self { api_root }
    }

    pub fn resolve<S: KeyValueStore>(store: &S) -> Self {
        let api_root = store
            .get(STORAGE_API_ROOT_KEY)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| option_env!("PROLEARN_API_ROOT").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_ROOT.to_string());
        Self::new(api_root)
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_root, path)
        } else {
            format!("{}/{}", self.api_root, path)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;

    #[test]
    fn storage_override_wins_and_slash_is_trimmed() {
        let store = MemoryStorage::new();
        store.set(STORAGE_API_ROOT_KEY, "https://api.prolearn.test/");
        let config = AppConfig::resolve(&store);
        assert_eq!(config.api_root(), "https://api.prolearn.test");
        assert_eq!(config.url("/courses/"), "https://api.prolearn.test/courses/");
        assert_eq!(config.url("users/login/"), "https://api.prolearn.test/users/login/");
    }

    #[test]
    fn blank_override_is_ignored() {
        let store = MemoryStorage::new();
        store.set(STORAGE_API_ROOT_KEY, "   ");
        let config = AppConfig::resolve(&store);
        assert!(!config.api_root().is_empty());
        assert!(!config.api_root().ends_with('/'));
    }
}

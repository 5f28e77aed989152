//! 会话 token 存储
//!
//! token 是不透明字符串，不做校验、过期或刷新；直到远端拒绝为止都视为有效。

use crate::web::KeyValueStore;
use prolearn_shared::STORAGE_TOKEN_KEY;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 持久化 token，返回是否写入成功
    pub fn save_token(&self, token: &str) -> bool {
        self.store.set(STORAGE_TOKEN_KEY, token)
    }

    /// 读取 token；空字符串视为不存在
    pub fn token(&self) -> Option<String> {
        self.store
            .get(STORAGE_TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn clear_token(&self) {
        self.store.delete(STORAGE_TOKEN_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;

    #[test]
    fn save_get_clear() {
        let store = MemoryStorage::new();
        let session = SessionStore::new(store.clone());
        assert_eq!(session.token(), None);

        assert!(session.save_token("abc"));
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(store.get(STORAGE_TOKEN_KEY).as_deref(), Some("abc"));

        session.clear_token();
        assert!(session.token().is_none());
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let store = MemoryStorage::new();
        store.set(STORAGE_TOKEN_KEY, "");
        assert_eq!(SessionStore::new(store).token(), None);
    }
}

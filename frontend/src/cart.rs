//! 购物车模块
//!
//! 每个用户一份课程 ID 列表，以 JSON 数组形式存放在 `cart_<username>` 键下。
//! 列表视为幂等集合：add 为并集，remove 为按位置删除。
//! 多个标签页并发写同一个键时后写者胜出，不做冲突合并。

use crate::error::{AppError, AppResult};
use crate::web::{KeyValueStore, LocalStorage};
use leptos::prelude::*;
use prolearn_shared::PREFIX_CART;

#[cfg(test)]
mod tests;

/// 加入购物车的结果；重复加入只是界面提示，不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyInCart,
}

impl AddOutcome {
    pub fn notice(&self) -> &'static str {
        match self {
            AddOutcome::Added => "Course added to cart!",
            AddOutcome::AlreadyInCart => "This course is already in your cart.",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CartStore<S> {
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn key(username: &str) -> String {
        format!("{}{}", PREFIX_CART, username)
    }

    /// 当前列表；不存在或内容损坏时返回空列表
    pub fn list(&self, username: &str) -> Vec<String> {
        let key = Self::key(username);
        let Some(raw) = self.store.get(&key) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                log_warn!("[Cart] Ignoring malformed cart under {}: {}", key, e);
                Vec::new()
            }
        }
    }

    pub fn contains(&self, username: &str, course_id: &str) -> bool {
        self.list(username).iter().any(|id| id == course_id)
    }

    pub fn len(&self, username: &str) -> usize {
        self.list(username).len()
    }

    /// 不存在时追加到末尾
    pub fn add(&self, username: &str, course_id: &str) -> AppResult<AddOutcome> {
        let mut items = self.list(username);
        if items.iter().any(|id| id == course_id) {
            return Ok(AddOutcome::AlreadyInCart);
        }
        items.push(course_id.to_string());
        self.write(username, &items)
            .map_err(|e| e.in_op_with("cart.add", course_id))?;
        log_info!("[Cart] {} added {}", username, course_id);
        Ok(AddOutcome::Added)
    }

    /// 删除指定位置的元素并返回它；越界时不写入，返回 `None`
    pub fn remove(&self, username: &str, index: usize) -> AppResult<Option<String>> {
        let mut items = self.list(username);
        if index >= items.len() {
            return Ok(None);
        }
        let removed = items.remove(index);
        self.write(username, &items)
            .map_err(|e| e.in_op_with("cart.remove", index.to_string()))?;
        Ok(Some(removed))
    }

    /// 仅当该位置仍是 `course_id` 时才删除；列表已被其他页面改动时返回 `None`
    pub fn remove_expected(
        &self,
        username: &str,
        index: usize,
        course_id: &str,
    ) -> AppResult<Option<String>> {
        if self.list(username).get(index).map(String::as_str) != Some(course_id) {
            log_warn!("[Cart] {} no longer holds {} at {}", username, course_id, index);
            return Ok(None);
        }
        self.remove(username, index)
    }

    pub fn clear(&self, username: &str) -> AppResult<()> {
        if self.store.delete(&Self::key(username)) {
            Ok(())
        } else {
            Err(AppError::storage("failed to delete cart").in_op_with("cart.clear", username))
        }
    }

    fn write(&self, username: &str, items: &[String]) -> AppResult<()> {
        let encoded = serde_json::to_string(items)?;
        if self.store.set(&Self::key(username), &encoded) {
            Ok(())
        } else {
            Err(AppError::storage("browser storage rejected the write"))
        }
    }
}

/// 把请求时的 ID 列表与服务端明细按位置配对
///
/// 明细不带课程 ID；服务端丢弃了某个 ID（例如课程已下架）时两边长度不同，
/// 无法确认对应关系，返回 `None`。
pub fn pair_with_ids<T>(ids: &[String], details: Vec<T>) -> Option<Vec<(String, T)>> {
    (ids.len() == details.len()).then(|| ids.iter().cloned().zip(details).collect())
}

/// 明细请求代次，只采用最近一次请求的结果
///
/// 请求可能在页面销毁后才返回；此时所有检查都失败，结果被丢弃，
/// 不会访问已释放的响应式值。
#[derive(Clone, Copy)]
pub struct RequestGeneration(StoredValue<u64>);

impl RequestGeneration {
    pub fn new() -> Self {
        Self(StoredValue::new(0))
    }

    /// 开始一次新请求并返回它的票号；页面已销毁时返回 `None`
    pub fn next(&self) -> Option<u64> {
        self.0.try_update_value(|g| {
            *g += 1;
            *g
        })
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.try_get_value() == Some(ticket)
    }
}

impl Default for RequestGeneration {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================
// 界面层句柄
// =========================================================

/// 购物车句柄
///
/// 由 App 创建并作为属性显式传给各页面。写操作会递增 `revision`，
/// 读取购物车的视图因此自动刷新（例如导航栏的数量徽标）。
#[derive(Clone, Copy)]
pub struct CartContext<S = LocalStorage> {
    store: CartStore<S>,
    revision: RwSignal<u64>,
}

impl CartContext {
    pub fn new() -> Self {
        Self::with_store(LocalStorage)
    }
}

impl<S: KeyValueStore> CartContext<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store: CartStore::new(store),
            revision: RwSignal::new(0),
        }
    }

    fn bump(&self) {
        self.revision.update(|r| *r += 1);
    }

    /// 响应式读取
    pub fn items(&self, username: &str) -> Vec<String> {
        self.revision.track();
        self.store.list(username)
    }

    pub fn count(&self, username: &str) -> usize {
        self.revision.track();
        self.store.len(username)
    }

    pub fn add(&self, username: &str, course_id: &str) -> AppResult<AddOutcome> {
        let outcome = self.store.add(username, course_id)?;
        if outcome == AddOutcome::Added {
            self.bump();
        }
        Ok(outcome)
    }

    pub fn remove(&self, username: &str, index: usize) -> AppResult<Option<String>> {
        let removed = self.store.remove(username, index)?;
        if removed.is_some() {
            self.bump();
        }
        Ok(removed)
    }

    pub fn remove_expected(
        &self,
        username: &str,
        index: usize,
        course_id: &str,
    ) -> AppResult<Option<String>> {
        let removed = self.store.remove_expected(username, index, course_id)?;
        if removed.is_some() {
            self.bump();
        }
        Ok(removed)
    }

    pub fn clear(&self, username: &str) -> AppResult<()> {
        self.store.clear(username)?;
        self.bump();
        Ok(())
    }
}

impl Default for CartContext {
    fn default() -> Self {
        Self::new()
    }
}

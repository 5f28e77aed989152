//! 本地资料缓存
//!
//! 头像、展示名、头衔与简介只保存在浏览器中，按用户分区，从不同步到远端资料。

use crate::error::{AppError, AppResult};
use crate::web::KeyValueStore;
use prolearn_shared::{
    PREFIX_PROFILE_BIO, PREFIX_PROFILE_HEADLINE, PREFIX_PROFILE_IMAGE, PREFIX_PROFILE_NAME,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalProfile {
    pub name: String,
    pub headline: String,
    pub bio: String,
    /// data URL
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileCache<S> {
    store: S,
}

impl<S: KeyValueStore> ProfileCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(prefix: &str, username: &str) -> String {
        format!("{}{}", prefix, username)
    }

    /// 空分区键会让所有无名账户共享同一组键，一律拒绝写入
    fn require_partition(username: &str, operation: &str) -> AppResult<()> {
        if username.trim().is_empty() {
            return Err(AppError::validation("no account key for the local profile").in_op(operation));
        }
        Ok(())
    }

    /// 无分区键时返回空资料
    pub fn load(&self, username: &str) -> LocalProfile {
        if username.trim().is_empty() {
            return LocalProfile::default();
        }
        let text = |prefix: &str| {
            self.store
                .get(&Self::key(prefix, username))
                .unwrap_or_default()
        };
        LocalProfile {
            name: text(PREFIX_PROFILE_NAME),
            headline: text(PREFIX_PROFILE_HEADLINE),
            bio: text(PREFIX_PROFILE_BIO),
            image: self
                .store
                .get(&Self::key(PREFIX_PROFILE_IMAGE, username))
                .filter(|v| !v.is_empty()),
        }
    }

    /// 保存文本字段；头像单独通过 [`Self::set_image`] 管理
    pub fn save(&self, username: &str, profile: &LocalProfile) -> AppResult<()> {
        Self::require_partition(username, "profile.save")?;
        let fields = [
            (PREFIX_PROFILE_NAME, profile.name.as_str()),
            (PREFIX_PROFILE_HEADLINE, profile.headline.as_str()),
            (PREFIX_PROFILE_BIO, profile.bio.as_str()),
        ];
        for (prefix, value) in fields {
            let key = Self::key(prefix, username);
            if !self.store.set(&key, value) {
                return Err(AppError::storage("failed to save profile field")
                    .in_op_with("profile.save", key));
            }
        }
        Ok(())
    }

    pub fn set_image(&self, username: &str, data_url: &str) -> AppResult<()> {
        Self::require_partition(username, "profile.set_image")?;
        let key = Self::key(PREFIX_PROFILE_IMAGE, username);
        if self.store.set(&key, data_url) {
            Ok(())
        } else {
            // 图片 data URL 较大，最常见的失败原因是配额不足
            Err(AppError::storage("image too large for browser storage")
                .in_op_with("profile.set_image", key))
        }
    }

    pub fn remove_image(&self, username: &str) {
        if username.trim().is_empty() {
            return;
        }
        self.store.delete(&Self::key(PREFIX_PROFILE_IMAGE, username));
    }
}

/// 头像占位字母：展示名首字母 > 用户名首字母 > `?`
pub fn avatar_letter(display_name: &str, username: &str) -> String {
    display_name
        .trim()
        .chars()
        .next()
        .or_else(|| username.trim().chars().next())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string())
}

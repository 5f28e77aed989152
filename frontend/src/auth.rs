//! 认证模块
//!
//! - `SessionService`: 与界面无关的会话逻辑（登录、注册、注销、启动恢复）
//! - `AuthContext`: 包装为 Leptos 信号，由 App 创建并显式传给各页面
//!
//! 认证成功后总是重新拉取一次用户资料，不信任登录响应中附带的 user 对象。

use crate::api::StorefrontApi;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::session::SessionStore;
use crate::web::{FetchClient, HttpClient, KeyValueStore, LocalStorage};
use leptos::prelude::*;
use leptos::task::spawn_local;
use prolearn_shared::{AuthResponse, Profile};

#[cfg(test)]
mod tests;

/// 会话状态
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Profile),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            SessionState::Authenticated(profile) => Some(profile),
            SessionState::Anonymous => None,
        }
    }

    /// 本地存储分区键
    pub fn username(&self) -> Option<String> {
        self.profile()
            .and_then(Profile::partition_key)
            .map(str::to_string)
    }
}

/// 登录表单校验
pub fn validate_login(email: &str, password: &str) -> AppResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::validation("Please fill in all fields"));
    }
    Ok(())
}

/// 注册表单校验：必填项与两次密码一致
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> AppResult<()> {
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(AppError::validation("Please fill in all fields"));
    }
    if password != confirm_password {
        return Err(AppError::validation("Passwords do not match"));
    }
    Ok(())
}

// =========================================================
// 会话服务
// =========================================================

#[derive(Debug, Clone)]
pub struct SessionService<H, S> {
    api: StorefrontApi<H>,
    tokens: SessionStore<S>,
}

impl<H: HttpClient, S: KeyValueStore> SessionService<H, S> {
    pub fn new(api: StorefrontApi<H>, tokens: SessionStore<S>) -> Self {
        Self { api, tokens }
    }

    pub fn api(&self) -> &StorefrontApi<H> {
        &self.api
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.token()
    }

    /// 启动时恢复会话
    ///
    /// 只有远端明确拒绝 (401/403) 时才清除 token；网络失败保留 token 供下次启动再试。
    pub async fn restore(&self) -> SessionState {
        let Some(token) = self.tokens.token() else {
            return SessionState::Anonymous;
        };

        match self.api.profile(&token).await {
            Ok(profile) => {
                log_info!("[Auth] Session restored for {}", profile.display_name());
                SessionState::Authenticated(profile)
            }
            Err(e) if e.is_unauthorized() => {
                log_warn!("[Auth] Stored token rejected, clearing it: {}", e);
                self.tokens.clear_token();
                SessionState::Anonymous
            }
            Err(e) => {
                log_warn!("[Auth] Could not verify stored session: {}", e);
                SessionState::Anonymous
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> SessionState {
        if let Err(e) = validate_login(email, password) {
            log_warn!("[Auth] Login blocked: {}", e);
            return SessionState::Anonymous;
        }
        let result = self.api.login(email, password).await;
        self.adopt(result, "login").await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> SessionState {
        if let Err(e) = validate_registration(name, email, password, password) {
            log_warn!("[Auth] Registration blocked: {}", e);
            return SessionState::Anonymous;
        }
        let result = self.api.signup(name, email, password).await;
        self.adopt(result, "register").await
    }

    /// 处理登录 / 注册响应：持久化 token，再拉取资料确认其有效
    async fn adopt(&self, result: AppResult<AuthResponse>, op: &str) -> SessionState {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log_warn!("[Auth] {} failed: {}", op, e);
                return SessionState::Anonymous;
            }
        };

        let Some(token) = response.usable_token() else {
            log_warn!("[Auth] {} response carried no token", op);
            return SessionState::Anonymous;
        };

        if !self.tokens.save_token(token) {
            log_error!("[Auth] Could not persist session token after {}", op);
            return SessionState::Anonymous;
        }

        match self.api.profile(token).await {
            Ok(profile) => {
                log_info!("[Auth] {} succeeded for {}", op, profile.display_name());
                SessionState::Authenticated(profile)
            }
            Err(e) => {
                log_warn!("[Auth] Profile fetch after {} failed: {}", op, e);
                self.tokens.clear_token();
                SessionState::Anonymous
            }
        }
    }

    /// 注销：远端调用尽力而为，失败忽略；本地 token 总是被清除
    pub async fn logout(&self) -> SessionState {
        if let Some(token) = self.tokens.token() {
            if let Err(e) = self.api.logout(&token).await {
                log_warn!("[Auth] Remote logout failed (ignored): {}", e);
            }
        }
        self.tokens.clear_token();
        SessionState::Anonymous
    }

    /// 询问远端当前 token 是否仍被接受
    pub async fn check_status(&self) -> bool {
        let Some(token) = self.tokens.token() else {
            return false;
        };
        match self.api.auth_status(&token).await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                log_warn!("[Auth] Status check failed: {}", e);
                false
            }
        }
    }
}

// =========================================================
// 界面层上下文
// =========================================================

pub type BrowserSession = SessionService<FetchClient, LocalStorage>;

/// 认证状态
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub session: SessionState,
    /// 启动时的会话恢复是否仍在进行
    pub is_loading: bool,
}

/// 认证上下文
///
/// 包含读写信号与会话服务，由 App 创建后作为属性传给路由出口和各页面。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    set_state: WriteSignal<AuthState>,
    service: StoredValue<BrowserSession>,
}

impl AuthContext {
    /// 创建新的认证上下文；初始为加载中，等待 [`init_auth`] 完成恢复
    pub fn new(config: AppConfig) -> Self {
        let (state, set_state) = signal(AuthState {
            session: SessionState::Anonymous,
            is_loading: true,
        });
        let service = SessionService::new(
            StorefrontApi::new(FetchClient, config),
            SessionStore::new(LocalStorage),
        );
        Self {
            state,
            set_state,
            service: StoredValue::new(service),
        }
    }

    pub fn service(&self) -> BrowserSession {
        self.service.get_value()
    }

    pub fn api(&self) -> StorefrontApi<FetchClient> {
        self.service.with_value(|s| s.api().clone())
    }

    /// 当前持久化的 token（直接读存储）
    pub fn token(&self) -> Option<String> {
        self.service.with_value(|s| s.token())
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().session.is_authenticated())
    }

    pub fn is_loading_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_loading)
    }

    pub fn username(&self) -> Option<String> {
        self.state.with(|s| s.session.username())
    }

    /// 事件处理器中使用，不建立响应式依赖
    pub fn username_untracked(&self) -> Option<String> {
        self.state.with_untracked(|s| s.session.username())
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.with(|s| s.session.profile().cloned())
    }

    fn apply(&self, session: SessionState) {
        self.set_state.update(|state| {
            state.session = session;
            state.is_loading = false;
        });
    }
}

/// 初始化认证状态：存在 token 时异步拉取资料确认
pub fn init_auth(ctx: AuthContext) {
    spawn_local(async move {
        let session = ctx.service().restore().await;
        ctx.apply(session);
    });
}

/// 登录并更新状态
///
/// # Returns
/// 登录是否成功
pub async fn login(ctx: AuthContext, email: String, password: String) -> bool {
    let session = ctx.service().login(&email, &password).await;
    let ok = session.is_authenticated();
    ctx.apply(session);
    ok
}

pub async fn register(ctx: AuthContext, name: String, email: String, password: String) -> bool {
    let session = ctx.service().register(&name, &email, &password).await;
    let ok = session.is_authenticated();
    ctx.apply(session);
    ok
}

/// 注销并清除状态
///
/// 导航由路由服务的认证状态监听自动处理。
pub async fn logout(ctx: AuthContext) {
    let session = ctx.service().logout().await;
    ctx.apply(session);
}

//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。
//!
//! 路由服务由 App 创建后作为属性传给出口和页面，不放入全局 Context。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态；`push` 为 false 时替换当前条目（用于重定向）
fn write_history(path: &str, push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if result.is_err() {
        log_warn!("[Router] History update rejected for {}", path);
    }
}

/// 守卫：返回需要重定向到的路由；会话恢复期间不做判断
fn guard(target: &AppRoute, is_auth: bool, is_loading: bool) -> Option<AppRoute> {
    if is_loading {
        return None;
    }
    if target.requires_auth() && !is_auth {
        return Some(AppRoute::auth_failure_redirect());
    }
    if target.should_redirect_when_authenticated() && is_auth {
        return Some(AppRoute::auth_success_redirect());
    }
    None
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；认证信号由外部注入，与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号）
    is_authenticated: Signal<bool>,
    /// 启动时的会话恢复是否仍在进行
    is_loading: Signal<bool>,
}

impl RouterService {
    /// 创建路由服务并启动监听
    ///
    /// # Arguments
    /// * `is_authenticated` - 认证状态信号
    /// * `is_loading` - 会话恢复进行中；为 true 时暂缓守卫，避免刷新受保护页面时被误踢回登录页
    pub fn start(is_authenticated: Signal<bool>, is_loading: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        let router = Self {
            current_route,
            set_route,
            is_authenticated,
            is_loading,
        };
        router.init_popstate_listener();
        router.setup_auth_redirect();
        router
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn is_loading(&self) -> Signal<bool> {
        self.is_loading
    }

    /// 按 URL path 导航；未知路径保留原地址，渲染 NotFound
    pub fn navigate(&self, path: &str) {
        let target = AppRoute::from_path(path);
        let shown = if target == AppRoute::NotFound {
            path.to_string()
        } else {
            target.to_path()
        };
        self.apply(target, &shown, true);
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate_to(&self, target: AppRoute) {
        let path = target.to_path();
        self.apply(target, &path, true);
    }

    fn apply(&self, target: AppRoute, path: &str, push: bool) {
        let is_auth = self.is_authenticated.get_untracked();
        let is_loading = self.is_loading.get_untracked();

        // --- Step 1: 验证目标路由 ---
        if let Some(redirect) = guard(&target, is_auth, is_loading) {
            log_info!("[Router] {} not allowed here, redirecting to {}", target, redirect);
            write_history(&redirect.to_path(), push);
            self.set_route.set(redirect);
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        write_history(path, push);
        self.set_route.set(target);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let is_loading = self.is_loading;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let is_auth = is_authenticated.get_untracked();

            // popstate 时也执行守卫逻辑
            match guard(&target, is_auth, is_loading.get_untracked()) {
                Some(redirect) => {
                    write_history(&redirect.to_path(), false);
                    set_route.set(redirect);
                }
                None => set_route.set(target),
            }
        });

        if let Some(window) = web_sys::window() {
            if window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
                .is_err()
            {
                log_error!("[Router] Could not register popstate listener");
            }
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化（包括会话恢复完成）时的自动重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let is_loading = self.is_loading;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let loading = is_loading.get();
            let route = current_route.get_untracked();

            if let Some(redirect) = guard(&route, is_auth, loading) {
                log_info!(
                    "[Router] Auth state changed (authenticated: {}), redirecting to {}",
                    is_auth,
                    redirect
                );
                write_history(&redirect.to_path(), false);
                set_route.set(redirect);
            }
        });
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件；会话恢复期间受保护页面显示加载状态。
#[component]
pub fn RouterOutlet<F>(
    router: RouterService,
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: F,
) -> impl IntoView
where
    F: Fn(AppRoute) -> AnyView + Send + Sync + Clone + 'static,
{
    move || {
        let current = router.current_route().get();
        if current.requires_auth() && router.is_loading().get() {
            return view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg"></span>
                </div>
            }
            .into_any();
        }
        matcher(current)
    }
}

/// 站内链接：拦截点击，改由路由服务导航
#[component]
pub fn Link(
    router: RouterService,
    to: AppRoute,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let href = to.to_path();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}

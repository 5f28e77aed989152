//! ProLearn 课程商城前端
//!
//! 句柄显式注入的架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `cart` / `profile`: 按用户分区的本地存储
//! - `components`: UI 组件层
//!
//! App 创建认证、购物车与路由句柄，经由路由出口作为属性传给每个页面。

// =========================================================
// 条件编译日志宏
// =========================================================
#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

mod api;
mod auth;
mod cart;
mod config;
mod error;
mod profile;
mod session;
mod components {
    pub mod cart;
    pub mod course_card;
    pub mod course_detail;
    pub mod dashboard;
    pub mod landing;
    pub mod login;
    pub mod nav_bar;
    pub mod not_found;
    pub mod notification;
    pub mod register;
    pub mod sector;
    pub mod user_dashboard;
}

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::{FetchClient, HttpClient, HttpError, HttpRequest};
    #[cfg(test)]
    pub use http::MockHttpClient;
    #[cfg(test)]
    pub use storage::MemoryStorage;
    pub use storage::{KeyValueStore, LocalStorage};
}

use crate::auth::{AuthContext, init_auth};
use crate::cart::CartContext;
use crate::components::cart::CartPage;
use crate::components::course_detail::CourseDetailPage;
use crate::components::dashboard::DashboardPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::not_found::NotFoundPage;
use crate::components::register::RegisterPage;
use crate::components::sector::SectorPage;
use crate::components::user_dashboard::UserDashboardPage;
use crate::config::AppConfig;

use leptos::prelude::*;

use web::LocalStorage;
use web::route::AppRoute;
use web::router::{RouterOutlet, RouterService};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，并把句柄逐一传入。
fn route_matcher(
    route: AppRoute,
    auth: AuthContext,
    cart: CartContext,
    router: RouterService,
) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage router=router /> }.into_any(),
        AppRoute::Login => view! { <LoginPage auth=auth router=router /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage auth=auth router=router /> }.into_any(),
        AppRoute::Dashboard => {
            view! { <DashboardPage auth=auth cart=cart router=router /> }.into_any()
        }
        AppRoute::Course(course_uuid) => view! {
            <CourseDetailPage course_uuid=course_uuid auth=auth cart=cart router=router />
        }
        .into_any(),
        AppRoute::Sector(sector_uuid) => view! {
            <SectorPage sector_uuid=sector_uuid auth=auth cart=cart router=router />
        }
        .into_any(),
        AppRoute::Cart => view! { <CartPage auth=auth cart=cart router=router /> }.into_any(),
        AppRoute::Profile => {
            view! { <UserDashboardPage auth=auth cart=cart router=router /> }.into_any()
        }
        AppRoute::NotFound => view! { <NotFoundPage router=router /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 解析配置并创建会话句柄
    let config = AppConfig::resolve(&LocalStorage);
    log_info!("[App] Using API root {}", config.api_root());
    let auth = AuthContext::new(config);

    // 2. 初始化认证状态（存在 token 时拉取资料确认）
    init_auth(auth);

    let cart = CartContext::new();

    // 3. 路由服务：注入认证信号实现守卫
    let router = RouterService::start(auth.is_authenticated_signal(), auth.is_loading_signal());

    view! {
        <RouterOutlet
            router=router
            matcher=move |route: AppRoute| route_matcher(route, auth, cart, router)
        />
    }
}

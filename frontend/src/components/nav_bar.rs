use crate::auth::{AuthContext, logout};
use crate::cart::CartContext;
use crate::web::route::AppRoute;
use crate::web::router::{Link, RouterService};
use crate::profile::avatar_letter;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 已登录页面共用的顶部导航栏
///
/// 购物车徽标随 [`CartContext`] 的写操作自动刷新。
#[component]
pub fn NavBar(
    auth: AuthContext,
    cart: CartContext,
    router: RouterService,
    /// 右侧额外内容（例如搜索框）
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    let (logging_out, set_logging_out) = signal(false);

    let cart_count = move || auth.username().map(|u| cart.count(&u)).unwrap_or(0);
    let display_name = move || auth.profile().map(|p| p.display_name()).unwrap_or_default();
    let letter = move || avatar_letter(&display_name(), &auth.username().unwrap_or_default());

    let on_logout = move |_| {
        set_logging_out.set(true);
        spawn_local(async move {
            // 导航由路由服务的认证状态监听处理
            logout(auth).await;
            set_logging_out.set(false);
        });
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl gap-2">
            <div class="flex-1">
                <Link router=router to=AppRoute::Dashboard class="btn btn-ghost text-xl text-primary">
                    "ProLearn"
                </Link>
            </div>
            <div class="flex-none flex items-center gap-2">
                {children.map(|c| c())}
                <Link router=router to=AppRoute::Cart class="btn btn-ghost gap-2">
                    "Cart"
                    <span class="badge badge-primary">{cart_count}</span>
                </Link>
                <Link router=router to=AppRoute::Profile class="btn btn-ghost gap-2">
                    <div class="avatar placeholder">
                        <div class="bg-neutral text-neutral-content rounded-full w-8">
                            <span>{letter}</span>
                        </div>
                    </div>
                    <span class="hidden md:inline">{display_name}</span>
                </Link>
                <button
                    on:click=on_logout
                    disabled=move || logging_out.get()
                    class="btn btn-outline btn-error btn-sm"
                >
                    "Logout"
                </button>
            </div>
        </div>
    }
}

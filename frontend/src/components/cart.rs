use crate::auth::AuthContext;
use crate::cart::{CartContext, RequestGeneration, pair_with_ids};
use crate::components::nav_bar::NavBar;
use crate::components::notification::{Notice, Toast, notice_signal};
use crate::web::route::AppRoute;
use crate::web::router::RouterService;
use leptos::prelude::*;
use leptos::task::spawn_local;
use prolearn_shared::{CartItem, CartResponse};

#[component]
pub fn CartPage(auth: AuthContext, cart: CartContext, router: RouterService) -> impl IntoView {
    // 请求时的 ID 列表与服务端明细一起保存，删除时据此核对位置
    let (details, set_details) = signal(Option::<(Vec<String>, CartResponse)>::None);
    let (load_failed, set_load_failed) = signal(false);
    let (notice, set_notice) = notice_signal();
    let generation = RequestGeneration::new();

    // 购物车内容变化时重新向服务端解析价格
    Effect::new(move |_| {
        let Some(username) = auth.username() else {
            return;
        };
        let ids = cart.items(&username);
        let Some(ticket) = generation.next() else {
            return;
        };

        spawn_local(async move {
            let result = auth.api().cart_details(&ids).await;
            if !generation.is_current(ticket) {
                return;
            }
            match result {
                Ok(resp) => {
                    set_load_failed.set(false);
                    set_details.set(Some((ids, resp)));
                }
                Err(e) => {
                    log_error!("[Cart] Failed to load cart: {}", e);
                    set_load_failed.set(true);
                }
            }
        });
    });

    // 按位置删除，并核对该位置仍是这一行对应的课程
    let on_remove = move |index: usize, course_id: &str| {
        let Some(username) = auth.username_untracked() else {
            return;
        };
        match cart.remove_expected(&username, index, course_id) {
            Ok(Some(_)) => set_notice.set(Some(Notice::info("Removed from cart."))),
            Ok(None) => set_notice.set(Some(Notice::error(
                "Your cart changed. Please review it and try again.",
            ))),
            Err(e) => {
                log_error!("[Cart] {}", e);
                set_notice.set(Some(Notice::error(e.user_message())));
            }
        }
    };

    let on_clear = move |_| {
        let Some(username) = auth.username_untracked() else {
            return;
        };
        if let Err(e) = cart.clear(&username) {
            log_error!("[Cart] {}", e);
            set_notice.set(Some(Notice::error(e.user_message())));
        }
    };

    // `course_id` 为 None 时不提供单行删除
    let line_item = move |index: usize, course_id: Option<String>, item: CartItem| {
        let remove_button = course_id.map(|id| {
            view! {
                <button
                    class="btn btn-sm btn-outline btn-error"
                    on:click=move |_| on_remove(index, &id)
                >
                    "Remove"
                </button>
            }
        });
        view! {
            <div class="flex gap-4 border-b border-base-200 pb-6">
                <img src=item.image_url alt=item.title.clone() class="w-48 h-32 object-cover rounded-lg" />
                <div class="flex-1">
                    <h3 class="font-semibold text-lg mb-1">{item.title}</h3>
                    <p class="text-base-content/70 mb-2">"by " {item.author.full_name()}</p>
                    <div class="flex justify-between items-center">
                        <span class="text-primary font-medium">"$" {item.price}</span>
                        {remove_button}
                    </div>
                </div>
            </div>
        }
    };

    let total = move || {
        details.with(|d| {
            d.as_ref()
                .map(|(_, d)| d.cart_total.clone())
                .unwrap_or_else(|| CartResponse::empty().cart_total)
        })
    };
    let is_empty = move || details.with(|d| d.as_ref().is_none_or(|(_, d)| d.is_empty()));

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Toast notice=notice />
                <NavBar auth=auth cart=cart router=router />

                <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
                    <div class="lg:col-span-2 card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="flex justify-between items-center mb-4">
                                <h2 class="card-title text-2xl">"Shopping Cart"</h2>
                                <Show when=move || !is_empty()>
                                    <button class="btn btn-ghost btn-sm" on:click=on_clear>
                                        "Clear cart"
                                    </button>
                                </Show>
                            </div>
                            {move || {
                                if load_failed.get() {
                                    return view! {
                                        <div role="alert" class="alert alert-error">
                                            <span>"Could not load your cart. Please try again."</span>
                                        </div>
                                    }
                                    .into_any();
                                }
                                match details.get() {
                                    None => view! {
                                        <div class="flex justify-center py-8">
                                            <span class="loading loading-spinner loading-lg text-primary"></span>
                                        </div>
                                    }
                                    .into_any(),
                                    Some((_, resp)) if resp.is_empty() => view! {
                                        <div class="text-center py-8 space-y-4">
                                            <p class="text-base-content/60">"Your cart is empty"</p>
                                            <button
                                                class="btn btn-primary"
                                                on:click=move |_| router.navigate_to(AppRoute::Dashboard)
                                            >
                                                "Browse Courses"
                                            </button>
                                        </div>
                                    }
                                    .into_any(),
                                    Some((ids, resp)) => match pair_with_ids(&ids, resp.cart_detail.clone()) {
                                        Some(lines) => view! {
                                            <div class="space-y-6">
                                                {lines
                                                    .into_iter()
                                                    .enumerate()
                                                    .map(|(index, (id, item))| line_item(index, Some(id), item))
                                                    .collect_view()}
                                            </div>
                                        }
                                        .into_any(),
                                        None => view! {
                                            <div class="space-y-6">
                                                <div role="alert" class="alert alert-warning">
                                                    <span>
                                                        "Some courses in your cart are no longer available. Clear the cart to continue."
                                                    </span>
                                                </div>
                                                {resp
                                                    .cart_detail
                                                    .into_iter()
                                                    .enumerate()
                                                    .map(|(index, item)| line_item(index, None, item))
                                                    .collect_view()}
                                            </div>
                                        }
                                        .into_any(),
                                    },
                                }
                            }}
                        </div>
                    </div>

                    <div class="lg:col-span-1">
                        <div class="card bg-base-100 shadow-xl sticky top-8">
                            <div class="card-body space-y-4">
                                <h2 class="card-title">"Order Summary"</h2>
                                <div class="flex justify-between">
                                    <span class="text-base-content/70">"Subtotal"</span>
                                    <span class="font-medium">"$" {total}</span>
                                </div>
                                <div class="divider my-0"></div>
                                <div class="flex justify-between">
                                    <span class="font-bold">"Total"</span>
                                    <span class="font-bold text-primary">"$" {total}</span>
                                </div>
                                <button
                                    class="btn btn-primary w-full"
                                    disabled=is_empty
                                    on:click=move |_| router.navigate("/checkout")
                                >
                                    "Proceed to Checkout"
                                </button>
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

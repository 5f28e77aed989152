use crate::auth::AuthContext;
use crate::cart::CartContext;
use crate::components::course_card::{CourseCard, add_to_cart};
use crate::components::nav_bar::NavBar;
use crate::components::notification::{Notice, Toast, notice_signal};
use crate::web::route::AppRoute;
use crate::web::router::RouterService;
use leptos::prelude::*;
use leptos::task::spawn_local;
use prolearn_shared::{Course, Sector};

#[component]
pub fn DashboardPage(auth: AuthContext, cart: CartContext, router: RouterService) -> impl IntoView {
    let (sectors, set_sectors) = signal(Vec::<Sector>::new());
    let (loading, set_loading) = signal(true);
    let (search_term, set_search_term) = signal(String::new());
    // None 表示未在搜索，显示精选板块
    let (search_results, set_search_results) = signal(Option::<Vec<Course>>::None);
    let (searching, set_searching) = signal(false);
    let (notice, set_notice) = notice_signal();

    // 初始加载
    spawn_local(async move {
        match auth.api().homepage().await {
            Ok(data) => set_sectors.set(data),
            Err(e) => {
                log_error!("[Dashboard] Failed to load featured courses: {}", e);
                set_notice.set(Some(Notice::error(e.user_message())));
            }
        }
        set_loading.set(false);
    });

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let term = search_term.get_untracked();
        set_searching.set(true);
        spawn_local(async move {
            match auth.api().search_courses(&term).await {
                Ok(courses) => set_search_results.set(Some(courses)),
                Err(e) => {
                    log_warn!("[Dashboard] Search failed: {}", e);
                    set_notice.set(Some(Notice::error(e.user_message())));
                }
            }
            set_searching.set(false);
        });
    };

    let clear_search = move |_| {
        set_search_term.set(String::new());
        set_search_results.set(None);
    };

    let on_add = Callback::new(move |course_uuid: String| {
        add_to_cart(auth, cart, set_notice, &course_uuid)
    });

    let course_grid = move |courses: Vec<Course>| {
        courses
            .into_iter()
            .map(|course| view! { <CourseCard course=course router=router on_add=on_add /> })
            .collect_view()
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Toast notice=notice />

                <NavBar auth=auth cart=cart router=router>
                    <form class="join hidden md:flex" on:submit=on_search>
                        <input
                            type="search"
                            placeholder="Search courses..."
                            class="input input-bordered input-sm join-item w-64"
                            on:input=move |ev| set_search_term.set(event_target_value(&ev))
                            prop:value=search_term
                        />
                        <button class="btn btn-sm join-item" disabled=move || searching.get()>
                            "Search"
                        </button>
                    </form>
                </NavBar>

                {move || {
                    if loading.get() {
                        return view! {
                            <div class="flex justify-center py-12">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                        .into_any();
                    }

                    if let Some(results) = search_results.get() {
                        let empty = results.is_empty();
                        return view! {
                            <div class="space-y-6">
                                <div class="flex items-center justify-between">
                                    <h2 class="text-2xl font-bold">"Search Results"</h2>
                                    <button class="btn btn-ghost btn-sm" on:click=clear_search>
                                        "Clear search"
                                    </button>
                                </div>
                                <Show when=move || empty>
                                    <p class="text-base-content/60">"No courses match your search."</p>
                                </Show>
                                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                                    {course_grid(results)}
                                </div>
                            </div>
                        }
                        .into_any();
                    }

                    view! {
                        <div class="space-y-12">
                            <For
                                each=move || sectors.get()
                                key=|sector| sector.sector_uuid.clone()
                                children=move |sector: Sector| {
                                    let sector_uuid = sector.sector_uuid.clone();
                                    view! {
                                        <section>
                                            <div class="flex items-center justify-between mb-6">
                                                <h2 class="text-2xl font-bold">{sector.sector_title}</h2>
                                                <button
                                                    class="btn btn-outline btn-sm"
                                                    on:click=move |_| router.navigate_to(AppRoute::Sector(sector_uuid.clone()))
                                                >
                                                    "View All"
                                                </button>
                                            </div>
                                            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">
                                                {course_grid(sector.featured_course)}
                                            </div>
                                        </section>
                                    }
                                }
                            />
                        </div>
                    }
                    .into_any()
                }}
            </div>
        </div>
    }
}

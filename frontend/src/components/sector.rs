use crate::auth::AuthContext;
use crate::cart::CartContext;
use crate::components::course_card::{CourseCard, add_to_cart};
use crate::components::nav_bar::NavBar;
use crate::components::notification::{Notice, Toast, notice_signal};
use crate::web::router::RouterService;
use leptos::prelude::*;
use leptos::task::spawn_local;
use prolearn_shared::SectorListing;

/// 分类课程列表
#[component]
pub fn SectorPage(
    sector_uuid: String,
    auth: AuthContext,
    cart: CartContext,
    router: RouterService,
) -> impl IntoView {
    let (listing, set_listing) = signal(Option::<SectorListing>::None);
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = notice_signal();

    spawn_local(async move {
        match auth.api().sector_courses(&sector_uuid).await {
            Ok(data) => set_listing.set(Some(data)),
            Err(e) => {
                log_error!("[Sector] Failed to load sector {}: {}", sector_uuid, e);
                set_notice.set(Some(Notice::error(e.user_message())));
            }
        }
        set_loading.set(false);
    });

    let on_add = Callback::new(move |course_uuid: String| {
        add_to_cart(auth, cart, set_notice, &course_uuid)
    });

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Toast notice=notice />
                <NavBar auth=auth cart=cart router=router />

                {move || match (loading.get(), listing.get()) {
                    (true, _) => view! {
                        <div class="flex justify-center py-12">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                    .into_any(),
                    (false, None) => view! {
                        <div class="text-center py-12 text-base-content/60">"Sector not found"</div>
                    }
                    .into_any(),
                    (false, Some(listing)) => {
                        let title = listing
                            .sector_name
                            .clone()
                            .unwrap_or_else(|| "Courses".to_string());
                        let students = listing.total_students;
                        let empty = listing.courses.is_empty();
                        view! {
                            <div class="space-y-6">
                                <div>
                                    <h2 class="text-3xl font-bold">{title}</h2>
                                    {students.map(|n| view! {
                                        <p class="text-base-content/60">{n} " students learning in this sector"</p>
                                    })}
                                </div>
                                <Show when=move || empty>
                                    <p class="text-base-content/60">"No courses in this sector yet."</p>
                                </Show>
                                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">
                                    {listing
                                        .courses
                                        .into_iter()
                                        .map(|course| view! { <CourseCard course=course router=router on_add=on_add /> })
                                        .collect_view()}
                                </div>
                            </div>
                        }
                        .into_any()
                    }
                }}
            </div>
        </div>
    }
}

use crate::auth::AuthContext;
use crate::cart::CartContext;
use crate::components::notification::Notice;
use crate::web::route::AppRoute;
use crate::web::router::RouterService;
use leptos::prelude::*;
use prolearn_shared::Course;

/// 把课程加入当前用户的购物车，并以通知反馈结果
pub fn add_to_cart(
    auth: AuthContext,
    cart: CartContext,
    set_notice: WriteSignal<Option<Notice>>,
    course_uuid: &str,
) {
    let Some(username) = auth.username_untracked() else {
        set_notice.set(Some(Notice::error("Please log in to add courses to your cart.")));
        return;
    };
    match cart.add(&username, course_uuid) {
        Ok(outcome) => set_notice.set(Some(Notice::info(outcome.notice()))),
        Err(e) => {
            log_error!("[Cart] {}", e);
            set_notice.set(Some(Notice::error(e.user_message())));
        }
    }
}

/// 课程卡片
#[component]
pub fn CourseCard(
    course: Course,
    router: RouterService,
    /// 点击 "Add to Cart" 时以课程 ID 回调
    on_add: Callback<String>,
) -> impl IntoView {
    let Course {
        course_uuid,
        title,
        student_no,
        author,
        price,
        image_url,
        ..
    } = course;
    let detail_uuid = course_uuid.clone();

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow">
            <figure>
                <img src=image_url alt=title.clone() class="w-full h-48 object-cover" />
            </figure>
            <div class="card-body p-4">
                <h3 class="card-title text-lg">{title}</h3>
                <p class="text-base-content/70 text-sm">"by " {author.full_name()}</p>
                <div class="flex justify-between items-center mt-2">
                    <span class="text-primary font-semibold">"$" {price}</span>
                    <div class="card-actions">
                        <button
                            class="btn btn-sm btn-ghost"
                            on:click=move |_| router.navigate_to(AppRoute::Course(detail_uuid.clone()))
                        >
                            "Details"
                        </button>
                        <button
                            class="btn btn-sm btn-primary"
                            on:click=move |_| on_add.run(course_uuid.clone())
                        >
                            "Add to Cart"
                        </button>
                    </div>
                </div>
                <div class="text-xs text-base-content/50">{student_no} " students enrolled"</div>
            </div>
        </div>
    }
}

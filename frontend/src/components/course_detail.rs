use crate::auth::AuthContext;
use crate::cart::CartContext;
use crate::components::course_card::add_to_cart;
use crate::components::nav_bar::NavBar;
use crate::components::notification::{Notice, Toast, notice_signal};
use crate::error::ErrorKind;
use crate::web::router::RouterService;
use leptos::prelude::*;
use leptos::task::spawn_local;
use prolearn_shared::date::format_date;
use prolearn_shared::{Author, Comment, CourseDetail, CourseSection};

/// 尚未由服务端确认的评论显示此时间
const PENDING_COMMENT_TIME: &str = "just now";

fn comment_time(created: &str) -> String {
    if created.is_empty() {
        PENDING_COMMENT_TIME.to_string()
    } else {
        format_date(created)
    }
}

#[component]
fn SectionList(sections: Vec<CourseSection>) -> impl IntoView {
    if sections.is_empty() {
        return view! { <p class="text-base-content/60">"Curriculum coming soon."</p> }.into_any();
    }
    sections
        .into_iter()
        .map(|section| {
            view! {
                <div class="collapse collapse-arrow bg-base-200">
                    <input type="checkbox" />
                    <div class="collapse-title font-medium flex justify-between">
                        <span>{section.section_title}</span>
                        <span class="text-sm text-base-content/60">{section.total_duration}</span>
                    </div>
                    <div class="collapse-content">
                        <ul class="space-y-2">
                            {section
                                .episode
                                .into_iter()
                                .map(|episode| view! {
                                    <li class="flex justify-between text-sm">
                                        <span>{episode.title}</span>
                                        <span class="flex gap-3 items-center">
                                            {episode.file.map(|href| view! {
                                                <a class="link link-primary" href=href target="_blank">"Watch"</a>
                                            })}
                                            <span class="text-base-content/60">{episode.length}</span>
                                        </span>
                                    </li>
                                })
                                .collect_view()}
                        </ul>
                    </div>
                </div>
            }
        })
        .collect_view()
        .into_any()
}

#[component]
pub fn CourseDetailPage(
    course_uuid: String,
    auth: AuthContext,
    cart: CartContext,
    router: RouterService,
) -> impl IntoView {
    let course_uuid = StoredValue::new(course_uuid);
    let (detail, set_detail) = signal(Option::<CourseDetail>::None);
    let (loading, set_loading) = signal(true);
    let (comment, set_comment) = signal(String::new());
    let (posting, set_posting) = signal(false);
    let (studying, set_studying) = signal(false);
    let (notice, set_notice) = notice_signal();

    // 任务只持有自己的数据；页面销毁后写入信号是空操作，结果被丢弃
    let load = move |uuid: String| {
        spawn_local(async move {
            match auth.api().course_detail(&uuid).await {
                Ok(data) => set_detail.set(Some(data)),
                Err(e) => log_error!("[Course] Failed to load course details: {}", e),
            }
            set_loading.set(false);
        });
    };
    load(course_uuid.get_value());

    // 先在本地追加评论，再拉取完整详情与服务端对齐；失败时重新拉取即可撤销
    let on_comment = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let message = comment.get_untracked().trim().to_string();
        if message.is_empty() {
            set_notice.set(Some(Notice::error("Comment cannot be empty")));
            return;
        }

        let author = Author {
            first_name: auth
                .profile()
                .map(|p| p.display_name())
                .unwrap_or_else(|| "You".to_string()),
            ..Default::default()
        };
        set_detail.update(|d| {
            if let Some(d) = d {
                d.comments.push(Comment {
                    user: author,
                    message: message.clone(),
                    created: String::new(),
                });
            }
        });
        set_comment.set(String::new());
        set_posting.set(true);

        let uuid = course_uuid.get_value();
        spawn_local(async move {
            let token = auth.token();
            let result = auth
                .api()
                .add_comment(&uuid, &message, token.as_deref())
                .await;
            if let Err(e) = result {
                log_error!("[Course] Failed to add comment: {}", e);
                set_notice.set(Some(Notice::error(e.user_message())));
            }
            set_posting.set(false);
            load(uuid);
        });
    };

    let on_add = move |_| add_to_cart(auth, cart, set_notice, &course_uuid.get_value());

    // 已购课程返回带视频地址的章节
    let on_study = move |_| {
        let Some(token) = auth.token() else {
            return;
        };
        set_studying.set(true);
        let uuid = course_uuid.get_value();
        spawn_local(async move {
            match auth.api().study_course(&uuid, &token).await {
                Ok(data) => set_detail.set(Some(data)),
                Err(e) if e.kind() == ErrorKind::Unauthorized => {
                    set_notice.set(Some(Notice::error("Purchase this course to start learning.")))
                }
                Err(e) => {
                    log_error!("[Course] Failed to open course: {}", e);
                    set_notice.set(Some(Notice::error(e.user_message())));
                }
            }
            set_studying.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Toast notice=notice />
                <NavBar auth=auth cart=cart router=router />

                {move || {
                    if loading.get() {
                        return view! {
                            <div class="flex justify-center py-12">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                        .into_any();
                    }
                    let Some(detail) = detail.get() else {
                        return view! {
                            <div class="text-center py-12 text-base-content/60">"Course not found"</div>
                        }
                        .into_any();
                    };

                    let CourseDetail { course, created, updated, language, course_section, comments } = detail;
                    let no_comments = comments.is_empty();
                    view! {
                        <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
                            <div class="lg:col-span-2 space-y-6">
                                <div class="card bg-base-100 shadow-xl">
                                    <figure>
                                        <img src=course.image_url alt=course.title.clone() class="w-full h-72 object-cover" />
                                    </figure>
                                    <div class="card-body">
                                        <h1 class="card-title text-3xl">{course.title}</h1>
                                        <p class="text-base-content/70">"by " {course.author.full_name()}</p>
                                        {course.description.map(|d| view! { <p class="mt-2">{d}</p> })}
                                        <p class="text-xs text-base-content/50">
                                            "Created " {format_date(&created)} " · Updated " {format_date(&updated)}
                                        </p>
                                    </div>
                                </div>

                                <div class="card bg-base-100 shadow-xl">
                                    <div class="card-body space-y-2">
                                        <h2 class="card-title">"Course content"</h2>
                                        <SectionList sections=course_section />
                                    </div>
                                </div>

                                <div class="card bg-base-100 shadow-xl">
                                    <div class="card-body space-y-4">
                                        <h2 class="card-title">"Comments"</h2>
                                        <Show when=move || no_comments>
                                            <p class="text-base-content/60">"No comments yet. Be the first!"</p>
                                        </Show>
                                        {comments
                                            .into_iter()
                                            .map(|c| view! {
                                                <div class="border-b border-base-200 pb-3">
                                                    <div class="flex justify-between text-sm">
                                                        <span class="font-semibold">{c.user.full_name()}</span>
                                                        <span class="text-base-content/50">{comment_time(&c.created)}</span>
                                                    </div>
                                                    <p>{c.message}</p>
                                                </div>
                                            })
                                            .collect_view()}
                                        <form class="flex flex-col gap-2" on:submit=on_comment>
                                            <textarea
                                                class="textarea textarea-bordered"
                                                placeholder="Share your thoughts..."
                                                on:input=move |ev| set_comment.set(event_target_value(&ev))
                                                prop:value=comment
                                            ></textarea>
                                            <button class="btn btn-primary self-end" disabled=move || posting.get()>
                                                "Post Comment"
                                            </button>
                                        </form>
                                    </div>
                                </div>
                            </div>

                            <div class="lg:col-span-1">
                                <div class="card bg-base-100 shadow-xl sticky top-8">
                                    <div class="card-body space-y-3">
                                        <div class="text-3xl font-bold">"$" {course.price}</div>
                                        <ul class="text-base-content/70 space-y-1">
                                            <li>{course.student_no} " students"</li>
                                            {course.total_duration.map(|d| view! { <li>{d} " total length"</li> })}
                                            {course.total_lectures.map(|n| view! { <li>{n} " lectures"</li> })}
                                            {(!language.is_empty()).then(|| view! { <li>{language}</li> })}
                                        </ul>
                                        <button class="btn btn-primary w-full" on:click=on_add>
                                            "Add to Cart"
                                        </button>
                                        <button
                                            class="btn btn-outline w-full"
                                            on:click=move |_| router.navigate("/checkout")
                                        >
                                            "Buy Now"
                                        </button>
                                        <button
                                            class="btn btn-ghost w-full"
                                            disabled=move || studying.get()
                                            on:click=on_study
                                        >
                                            "Start Learning"
                                        </button>
                                    </div>
                                </div>
                            </div>
                        </div>
                    }
                    .into_any()
                }}
            </div>
        </div>
    }
}

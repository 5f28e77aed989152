//! 个人中心
//!
//! 资料与头像只写入本地存储，不同步到远端用户资料。

use crate::auth::AuthContext;
use crate::cart::CartContext;
use crate::components::nav_bar::NavBar;
use crate::components::notification::{Notice, Toast, notice_signal};
use crate::profile::{LocalProfile, ProfileCache, avatar_letter};
use crate::web::LocalStorage;
use crate::web::route::AppRoute;
use crate::web::router::RouterService;
use leptos::prelude::*;
use leptos::task::spawn_local;
use prolearn_shared::Course;
use wasm_bindgen::prelude::*;

/// 头像文件上限；data URL 还会再膨胀约三分之一
const MAX_IMAGE_BYTES: f64 = 1_500_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Profile,
    Photos,
    Learning,
    Privacy,
    Subscription,
    DeleteAccount,
}

impl Tab {
    const ALL: [Tab; 6] = [
        Tab::Profile,
        Tab::Photos,
        Tab::Learning,
        Tab::Privacy,
        Tab::Subscription,
        Tab::DeleteAccount,
    ];

    fn label(&self) -> &'static str {
        match self {
            Tab::Profile => "Profile",
            Tab::Photos => "Photos",
            Tab::Learning => "My Courses",
            Tab::Privacy => "Account Privacy",
            Tab::Subscription => "Subscription",
            Tab::DeleteAccount => "Delete Account",
        }
    }
}

/// 以 data URL 读取文件；读取未能开始时立即以 `None` 回调
fn read_as_data_url(
    file: web_sys::File,
    on_done: impl FnOnce(Option<String>) + Clone + 'static,
) {
    let reader = match web_sys::FileReader::new() {
        Ok(reader) => reader,
        Err(_) => {
            on_done(None);
            return;
        }
    };

    let on_failure = on_done.clone();
    let result_reader = reader.clone();
    let onload = Closure::<dyn FnMut()>::once(move || {
        on_done(result_reader.result().ok().and_then(|v| v.as_string()));
    });
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));

    if reader.read_as_data_url(&file).is_err() {
        log_error!("[Profile] FileReader refused the selected file");
        // 回调不会触发，解除绑定后随 onload 一起释放
        reader.set_onload(None);
        on_failure(None);
        return;
    }
    // 读取已开始：泄漏闭包以保持回调存活
    onload.forget();
}

#[component]
fn Avatar(
    image: ReadSignal<Option<String>>,
    letter: Signal<String>,
    #[prop(default = "w-28")] size: &'static str,
) -> impl IntoView {
    view! {
        <div class="avatar placeholder">
            <div class=format!("bg-base-300 text-primary rounded-full {}", size)>
                {move || match image.get() {
                    Some(src) => view! { <img src=src alt="Profile" /> }.into_any(),
                    None => view! { <span class="text-4xl font-bold">{letter}</span> }.into_any(),
                }}
            </div>
        </div>
    }
}

#[component]
pub fn UserDashboardPage(
    auth: AuthContext,
    cart: CartContext,
    router: RouterService,
) -> impl IntoView {
    let cache = ProfileCache::new(LocalStorage);
    // 分区键；没有时不读写本地资料
    let username = auth.username_untracked();
    let account = StoredValue::new(username.clone());
    let profile = auth.profile();
    let remote_name = profile.as_ref().map(|p| p.display_name()).unwrap_or_default();
    let email = profile.and_then(|p| p.email).unwrap_or_default();

    let stored = username
        .as_deref()
        .map(|u| cache.load(u))
        .unwrap_or_default();
    let (name, set_name) = signal(if stored.name.is_empty() {
        remote_name
    } else {
        stored.name
    });
    let (headline, set_headline) = signal(stored.headline);
    let (bio, set_bio) = signal(stored.bio);
    let (image, set_image) = signal(stored.image);

    let (tab, set_tab) = signal(Tab::Profile);
    let (enrolled, set_enrolled) = signal(Option::<Vec<Course>>::None);
    let (session_ok, set_session_ok) = signal(Option::<bool>::None);
    let (notice, set_notice) = notice_signal();

    let fallback_name = username.unwrap_or_default();
    let letter = {
        let fallback_name = fallback_name.clone();
        Signal::derive(move || avatar_letter(&name.get(), &fallback_name))
    };

    // 已购课程与会话状态
    spawn_local(async move {
        set_session_ok.set(Some(auth.service().check_status().await));

        let Some(token) = auth.token() else {
            set_enrolled.set(Some(Vec::new()));
            return;
        };
        match auth.api().enrolled_courses(&token).await {
            Ok(courses) => set_enrolled.set(Some(courses)),
            Err(e) => {
                log_warn!("[Profile] Failed to load enrolled courses: {}", e);
                set_enrolled.set(Some(Vec::new()));
            }
        }
    });

    let on_save = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(username) = account.get_value() else {
            set_notice.set(Some(Notice::error("Profile cannot be saved for this account.")));
            return;
        };
        let profile = LocalProfile {
            name: name.get_untracked(),
            headline: headline.get_untracked(),
            bio: bio.get_untracked(),
            image: None,
        };
        match cache.save(&username, &profile) {
            Ok(()) => set_notice.set(Some(Notice::info("Profile updated!"))),
            Err(e) => {
                log_error!("[Profile] {}", e);
                set_notice.set(Some(Notice::error(e.user_message())));
            }
        }
    };

    let on_image_selected = move |ev: leptos::ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        if file.size() > MAX_IMAGE_BYTES {
            set_notice.set(Some(Notice::error("Image is too large. Please choose a smaller photo.")));
            return;
        }
        let Some(username) = account.get_value() else {
            set_notice.set(Some(Notice::error("Photo cannot be saved for this account.")));
            return;
        };
        // 回调可能在页面销毁后才触发，只使用自己持有的数据
        read_as_data_url(file, move |data_url| {
            let Some(data_url) = data_url else {
                set_notice.set(Some(Notice::error("Could not read the selected image.")));
                return;
            };
            match cache.set_image(&username, &data_url) {
                Ok(()) => {
                    set_image.set(Some(data_url));
                    set_notice.set(Some(Notice::info("Photo updated!")));
                }
                Err(e) => {
                    log_error!("[Profile] {}", e);
                    set_notice.set(Some(Notice::error(e.user_message())));
                }
            }
        });
    };

    let on_remove_image = move |_| {
        if let Some(username) = account.get_value() {
            cache.remove_image(&username);
        }
        set_image.set(None);
    };

    let email_view = email.clone();
    let tab_content = move || match tab.get() {
        Tab::Profile => view! {
            <form class="space-y-4" on:submit=on_save>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Full Name"</span></label>
                    <input
                        class="input input-bordered"
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                        prop:value=name
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Email"</span></label>
                    <input class="input input-bordered" type="email" prop:value=email_view.clone() disabled />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Headline"</span></label>
                    <input
                        class="input input-bordered"
                        placeholder="e.g. Instructor, Developer..."
                        on:input=move |ev| set_headline.set(event_target_value(&ev))
                        prop:value=headline
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Biography"</span></label>
                    <textarea
                        class="textarea textarea-bordered min-h-32"
                        rows="5"
                        on:input=move |ev| set_bio.set(event_target_value(&ev))
                        prop:value=bio
                    ></textarea>
                </div>
                <button type="submit" class="btn btn-primary w-full">"Save"</button>
            </form>
        }
        .into_any(),
        Tab::Photos => view! {
            <div class="space-y-6 flex flex-col items-center">
                <Avatar image=image letter=letter size="w-32" />
                <input
                    type="file"
                    accept="image/*"
                    class="file-input file-input-bordered w-full"
                    on:change=on_image_selected
                />
                <button class="btn btn-outline w-full" on:click=on_remove_image>
                    "Remove Photo"
                </button>
            </div>
        }
        .into_any(),
        Tab::Learning => view! {
            <div class="space-y-4">
                <h2 class="font-bold text-lg">"My Courses"</h2>
                {move || match enrolled.get() {
                    None => view! { <span class="loading loading-spinner"></span> }.into_any(),
                    Some(courses) if courses.is_empty() => view! {
                        <p class="text-base-content/60">"You have not enrolled in any courses yet."</p>
                    }
                    .into_any(),
                    Some(courses) => courses
                        .into_iter()
                        .map(|course| {
                            let uuid = course.course_uuid.clone();
                            view! {
                                <div class="flex justify-between items-center border-b border-base-200 pb-2">
                                    <div>
                                        <div class="font-semibold">{course.title}</div>
                                        <div class="text-sm text-base-content/60">"by " {course.author.full_name()}</div>
                                    </div>
                                    <button
                                        class="btn btn-sm btn-primary"
                                        on:click=move |_| router.navigate_to(AppRoute::Course(uuid.clone()))
                                    >
                                        "Continue"
                                    </button>
                                </div>
                            }
                        })
                        .collect_view()
                        .into_any(),
                }}
            </div>
        }
        .into_any(),
        Tab::Privacy => view! {
            <div class="space-y-4">
                <h2 class="font-bold text-lg">"Account Privacy"</h2>
                <p class="text-base-content/60">"Password change and privacy settings coming soon."</p>
                <button class="btn" disabled>"Change Password"</button>
            </div>
        }
        .into_any(),
        Tab::Subscription => view! {
            <div class="space-y-4">
                <h2 class="font-bold text-lg">"Subscription"</h2>
                <p class="text-base-content/60">"Subscription management coming soon."</p>
            </div>
        }
        .into_any(),
        Tab::DeleteAccount => view! {
            <div class="space-y-4">
                <h2 class="font-bold text-lg text-error">"Delete Account"</h2>
                <p class="text-base-content/60">"This action is irreversible. All your data will be lost."</p>
                <button class="btn btn-error" disabled>"Delete My Account"</button>
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Toast notice=notice />
                <NavBar auth=auth cart=cart router=router />

                <div class="flex flex-col md:flex-row gap-8">
                    <aside class="w-full md:w-72 flex-shrink-0">
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body items-center text-center">
                                <Avatar image=image letter=letter />
                                <div class="font-bold text-xl truncate w-full">
                                    {move || {
                                        let n = name.get();
                                        if n.is_empty() { fallback_name.clone() } else { n }
                                    }}
                                </div>
                                <div class="text-base-content/60 truncate w-full">{email}</div>
                                {move || session_ok.get().map(|ok| if ok {
                                    view! { <span class="badge badge-success">"Session active"</span> }.into_any()
                                } else {
                                    view! { <span class="badge badge-warning">"Session not verified"</span> }.into_any()
                                })}
                                <ul class="menu w-full mt-4">
                                    {Tab::ALL
                                        .into_iter()
                                        .map(|t| view! {
                                            <li>
                                                <a
                                                    class=move || if tab.get() == t { "active" } else { "" }
                                                    on:click=move |_| set_tab.set(t)
                                                >
                                                    {t.label()}
                                                </a>
                                            </li>
                                        })
                                        .collect_view()}
                                </ul>
                            </div>
                        </div>
                    </aside>

                    <section class="flex-1 min-w-0">
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">{tab_content}</div>
                        </div>
                    </section>
                </div>
            </div>
        </div>
    }
}

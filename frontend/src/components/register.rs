use crate::auth::{AuthContext, register, validate_registration};
use crate::web::route::AppRoute;
use crate::web::router::{Link, RouterService};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 表单输入框
#[component]
fn Field(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=input_type
                on:input=move |ev| set_value.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered"
                required
            />
        </div>
    }
}

#[component]
pub fn RegisterPage(auth: AuthContext, router: RouterService) -> impl IntoView {
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (name, email, password) = (name.get(), email.get(), password.get());

        // 两次密码在本地比对，不一致时不发请求
        if let Err(e) = validate_registration(&name, &email, &password, &confirm.get()) {
            set_error_msg.set(Some(e.user_message()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            if !register(auth, name, email, password).await {
                set_error_msg.set(Some("Registration failed. Please try again.".to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold text-primary">"Create your account"</h1>
                    <p class="text-base-content/70">"Join ProLearn and start learning"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.with(Option::is_some)>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <Field id="name" label="Full Name" value=name set_value=set_name />
                        <Field id="email" label="Email" input_type="email" value=email set_value=set_email />
                        <Field id="password" label="Password" input_type="password" value=password set_value=set_password />
                        <Field id="confirm" label="Confirm Password" input_type="password" value=confirm set_value=set_confirm />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Sign Up".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already have an account? "
                            <Link router=router to=AppRoute::Login class="link link-primary">
                                "Log in"
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

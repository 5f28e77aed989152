use crate::web::route::AppRoute;
use crate::web::router::{Link, RouterService};
use leptos::prelude::*;

#[component]
pub fn LandingPage(router: RouterService) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-gradient-to-br from-orange-100 to-blue-100">
            <div class="navbar px-4">
                <div class="flex-1">
                    <span class="text-2xl font-bold text-primary">"ProLearn"</span>
                </div>
                <div class="flex-none gap-2">
                    <Link router=router to=AppRoute::Login class="btn btn-ghost btn-sm">
                        "Login"
                    </Link>
                    <Link router=router to=AppRoute::Register class="btn btn-primary btn-sm">
                        "Sign Up"
                    </Link>
                </div>
            </div>

            <div class="hero min-h-[70vh]">
                <div class="hero-content text-center lg:text-left">
                    <div class="max-w-xl">
                        <h1 class="text-4xl lg:text-5xl font-bold">
                            "Start Your Learning Journey Today"
                        </h1>
                        <p class="py-6 text-lg text-base-content/70">
                            "Join our platform to access premium courses, expert instructors, "
                            "and a supportive learning community."
                        </p>
                        <Link router=router to=AppRoute::Register class="btn btn-primary btn-lg">
                            "Get Started"
                        </Link>
                    </div>
                </div>
            </div>
        </div>
    }
}

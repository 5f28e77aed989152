use crate::web::route::AppRoute;
use crate::web::router::{Link, RouterService};
use leptos::prelude::*;

#[component]
pub fn NotFoundPage(router: RouterService) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl">"Page not found"</p>
                <Link router=router to=AppRoute::Landing class="btn btn-primary">
                    "Go Home"
                </Link>
            </div>
        </div>
    }
}

use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_sign_out;
use crate::{Route, State};

const NAV: &[(Route, &str)] = &[
    (Route::Dashboard, "Dashboard"),
    (Route::Categories, "Categories"),
    (Route::Awards, "Awards"),
    (Route::MediaChannels, "Media channels"),
    (Route::Users, "Users"),
];

#[function_component]
pub fn Header() -> Html {
    let (state, _) = use_store::<State>();
    let current = use_route::<Route>();
    let on_sign_out = use_sign_out();

    let link_class = |route: &Route| {
        if current.as_ref() == Some(route) {
            "text-sm font-medium text-neutral-900 dark:text-white"
        } else {
            "text-sm text-neutral-600 dark:text-neutral-400 \
             hover:text-neutral-900 dark:hover:text-white"
        }
    };

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex items-center gap-8">
                        <Link<Route> to={Route::Dashboard} classes="text-xl font-semibold text-neutral-900 dark:text-white">
                            {"EJAT Admin"}
                        </Link<Route>>
                        if state.is_authenticated() {
                            <nav class="flex items-center gap-6">
                                {for NAV.iter().map(|(route, label)| html! {
                                    <Link<Route> to={route.clone()} classes={link_class(route)}>
                                        {*label}
                                    </Link<Route>>
                                })}
                            </nav>
                        }
                    </div>
                    if let Some(session) = &state.session {
                        <div class="flex items-center gap-4">
                            <span class="text-sm text-neutral-600 dark:text-neutral-400">
                                {&session.user.name}
                            </span>
                            <button
                                onclick={on_sign_out}
                                class="text-sm text-neutral-700 dark:text-neutral-300 hover:underline"
                            >
                                {"Sign out"}
                            </button>
                        </div>
                    }
                </div>
            </div>
        </header>
    }
}

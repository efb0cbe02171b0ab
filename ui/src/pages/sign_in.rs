use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::components::SignInForm;
use crate::hooks::{use_push_route, use_title};
use crate::{Route, State};

#[function_component]
pub fn SignInPage() -> Html {
    use_title("Sign in");
    let (state, _) = use_store::<State>();
    let push_route = use_push_route();

    let body = match &state.session {
        Some(session) => html! {
            <div class="p-6 rounded-lg border border-neutral-200 dark:border-neutral-700
                        bg-white dark:bg-neutral-800 text-center space-y-3">
                <p class="text-neutral-700 dark:text-neutral-300">
                    {format!("Signed in as {}", session.user.email)}
                </p>
                <Link<Route>
                    to={Route::Dashboard}
                    classes="text-sm font-medium text-neutral-900 dark:text-white underline"
                >
                    {"Go to the dashboard"}
                </Link<Route>>
            </div>
        },
        None => {
            let on_success =
                Callback::from(move |_| push_route.emit(Route::Dashboard));
            html! {
                <SignInForm
                    title="EJAT Admin"
                    description="Sign in with your administrator account"
                    {on_success}
                />
            }
        }
    };

    html! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <div class="max-w-md w-full">{body}</div>
        </div>
    }
}

use payloads::requests;
use yew::prelude::*;
use yewdux::prelude::*;

use super::TextField;
use crate::State;

#[derive(Properties, PartialEq)]
pub struct SignInFormProps {
    #[prop_or_else(|| AttrValue::from("Sign in"))]
    pub title: AttrValue,
    #[prop_or_default]
    pub description: Option<AttrValue>,
    /// Called after the session is stored
    #[prop_or_default]
    pub on_success: Callback<()>,
}

#[function_component]
pub fn SignInForm(props: &SignInFormProps) -> Html {
    let dispatch = use_dispatch::<State>();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error_message = use_state(|| None::<String>);
    let is_loading = use_state(|| false);

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let error_message = error_message.clone();
        let is_loading = is_loading.clone();
        let on_success = props.on_success.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            if email.trim().is_empty() || password.is_empty() {
                error_message.set(Some(
                    "Please enter both email and password".to_string(),
                ));
                return;
            }

            let credentials = requests::LoginCredentials {
                email: email.trim().to_string(),
                password: (*password).clone(),
            };
            let error_message = error_message.clone();
            let is_loading = is_loading.clone();
            let dispatch = dispatch.clone();
            let on_success = on_success.clone();

            yew::platform::spawn_local(async move {
                is_loading.set(true);
                error_message.set(None);

                match crate::get_api_client().login(&credentials).await {
                    Ok(session) => {
                        tracing::info!(user = %session.user.email, "signed in");
                        dispatch.reduce_mut(|state| state.sign_in(session));
                        on_success.emit(());
                    }
                    Err(e) => error_message.set(Some(e.to_string())),
                }

                is_loading.set(false);
            });
        })
    };

    let on_email = {
        let email = email.clone();
        Callback::from(move |value| email.set(value))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |value| password.set(value))
    };

    html! {
        <form
            onsubmit={on_submit}
            class="space-y-4 p-6 rounded-lg border border-neutral-200 dark:border-neutral-700
                   bg-white dark:bg-neutral-800"
        >
            <div>
                <h2 class="text-xl font-semibold text-neutral-900 dark:text-white">
                    {&props.title}
                </h2>
                if let Some(description) = &props.description {
                    <p class="mt-1 text-sm text-neutral-600 dark:text-neutral-400">
                        {description}
                    </p>
                }
            </div>

            <TextField
                label="Email"
                input_type="email"
                value={(*email).clone()}
                on_change={on_email}
                required=true
            />
            <TextField
                label="Password"
                input_type="password"
                value={(*password).clone()}
                on_change={on_password}
                required=true
            />

            if let Some(error) = &*error_message {
                <div class="text-sm text-red-600 dark:text-red-400">{error}</div>
            }

            <button
                type="submit"
                disabled={*is_loading}
                class="w-full px-4 py-2 text-sm font-medium text-white bg-neutral-900
                       dark:bg-neutral-100 dark:text-neutral-900 rounded-md
                       hover:bg-neutral-700 disabled:opacity-50"
            >
                {if *is_loading { "Signing in..." } else { "Sign in" }}
            </button>
        </form>
    }
}

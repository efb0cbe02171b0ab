use payloads::api_client::DEFAULT_TIMEOUT;
use payloads::{APIClient, ClientConfig, Resource};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use std::time::Duration;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

mod components;
mod contexts;
mod hooks;
mod logs;
mod pages;
mod state;

pub use state::State;

use components::layout::MainLayout;
use components::{RequireAuth, ToastContainer};
use contexts::toast::ToastProvider;

/// Backend address and timeout are fixed at build time through
/// `BACKEND_URL` and `REQUEST_TIMEOUT_SECS`. Without `BACKEND_URL` the app
/// talks to its own origin.
pub fn client_config() -> ClientConfig {
    let address = option_env!("BACKEND_URL")
        .map(str::to_string)
        .or_else(|| web_sys::window()?.location().origin().ok())
        .unwrap_or_default();
    let timeout = option_env!("REQUEST_TIMEOUT_SECS")
        .and_then(|secs| secs.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    ClientConfig::new(address).with_timeout(Some(timeout))
}

/// API client that reads the bearer token from the global session on every
/// request.
pub fn get_api_client() -> APIClient {
    APIClient::new(&client_config()).with_token_provider(|| {
        Dispatch::<State>::global()
            .get()
            .session
            .as_ref()
            .map(|session| SecretString::from(session.token.clone()))
    })
}

pub fn resource<T: DeserializeOwned + 'static>(path: &str) -> Resource<T> {
    Resource::new(get_api_client(), path)
}

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <BrowserRouter>
            <ToastProvider>
                <MainLayout>
                    <Switch<Route> render={switch} />
                </MainLayout>
                <ToastContainer />
            </ToastProvider>
        </BrowserRouter>
    }
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/categories")]
    Categories,
    #[at("/awards")]
    Awards,
    #[at("/media-channels")]
    MediaChannels,
    #[at("/users")]
    Users,
    #[at("/sign-in")]
    SignIn,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    let protected = |page: Html| html! { <RequireAuth>{page}</RequireAuth> };

    match routes {
        Route::Dashboard => protected(html! { <pages::DashboardPage /> }),
        Route::Categories => protected(html! { <pages::CategoriesPage /> }),
        Route::Awards => protected(html! { <pages::AwardsPage /> }),
        Route::MediaChannels => {
            protected(html! { <pages::MediaChannelsPage /> })
        }
        Route::Users => protected(html! { <pages::UsersPage /> }),
        Route::SignIn => html! { <pages::SignInPage /> },
        Route::NotFound => html! { <pages::NotFoundPage /> },
    }
}

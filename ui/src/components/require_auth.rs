use yew::prelude::*;
use yewdux::prelude::*;

use super::SignInForm;
use crate::State;

#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    #[prop_or_default]
    pub children: Children,
}

/// Renders its children only while a session exists, otherwise the
/// sign-in form.
///
/// Queries below drop the session when the server answers 401, which
/// brings the form back without a page change.
#[function_component]
pub fn RequireAuth(props: &RequireAuthProps) -> Html {
    let (state, _) = use_store::<State>();

    if !state.is_authenticated() {
        return html! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="max-w-md w-full">
                    <SignInForm description="Please sign in to continue" />
                </div>
            </div>
        };
    }

    html! {
        <>
            {for props.children.iter()}
        </>
    }
}

use yew::prelude::*;

use super::Modal;

#[derive(Properties, PartialEq)]
pub struct ConfirmationModalProps {
    /// e.g. "Delete category"
    pub title: AttrValue,
    /// Consequences of confirming
    pub message: AttrValue,
    pub confirm_text: AttrValue,
    /// Name of the record, which the user must type to confirm
    pub confirmation_value: AttrValue,
    pub on_confirm: Callback<()>,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub is_loading: bool,
    #[prop_or_default]
    pub error_message: Option<AttrValue>,
}

#[function_component]
pub fn ConfirmationModal(props: &ConfirmationModalProps) -> Html {
    let confirmation_input = use_state(String::new);
    let can_confirm =
        confirmation_input.trim() == props.confirmation_value.trim();

    let on_input = {
        let confirmation_input = confirmation_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            confirmation_input.set(input.value());
        })
    };

    let on_confirm_click = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| on_confirm.emit(()))
    };
    let on_cancel_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <Modal
            on_close={props.on_close.clone()}
            close_on_backdrop={!props.is_loading}
        >
            <h3 class="text-lg font-semibold text-neutral-900 dark:text-neutral-100 mb-4">
                {&props.title}
            </h3>

            <div class="space-y-4">
                <p class="text-sm text-neutral-600 dark:text-neutral-400">
                    {"This action "}
                    <span class="font-semibold text-red-600 dark:text-red-400">
                        {"cannot be undone"}
                    </span>
                    {". "}{&props.message}
                </p>

                <p class="text-sm text-neutral-600 dark:text-neutral-400">
                    {"Please type "}
                    <span class="font-mono font-semibold text-neutral-900 dark:text-neutral-100">
                        {&props.confirmation_value}
                    </span>
                    {" to confirm."}
                </p>

                <input
                    type="text"
                    value={(*confirmation_input).clone()}
                    oninput={on_input}
                    disabled={props.is_loading}
                    class="w-full px-3 py-2 text-sm border border-neutral-300 dark:border-neutral-600
                           rounded-md bg-white dark:bg-neutral-700
                           text-neutral-900 dark:text-neutral-100
                           focus:outline-none focus:ring-2 focus:ring-red-500
                           disabled:opacity-50 disabled:cursor-not-allowed"
                />

                if let Some(error) = &props.error_message {
                    <div class="text-sm text-red-600 dark:text-red-400">
                        {error}
                    </div>
                }
            </div>

            <div class="flex justify-end gap-3 mt-6">
                <button
                    onclick={on_cancel_click}
                    disabled={props.is_loading}
                    class="px-4 py-2 text-sm font-medium text-neutral-700 dark:text-neutral-300
                           bg-white dark:bg-neutral-700 border border-neutral-300 dark:border-neutral-600
                           rounded-md hover:bg-neutral-50 dark:hover:bg-neutral-600
                           disabled:opacity-50 disabled:cursor-not-allowed"
                >
                    {"Cancel"}
                </button>
                <button
                    onclick={on_confirm_click}
                    disabled={!can_confirm || props.is_loading}
                    class="px-4 py-2 text-sm font-medium text-white
                           bg-red-600 hover:bg-red-700 dark:bg-red-700 dark:hover:bg-red-600
                           rounded-md disabled:opacity-50 disabled:cursor-not-allowed"
                >
                    {if props.is_loading { "Deleting..." } else { props.confirm_text.as_str() }}
                </button>
            </div>
        </Modal>
    }
}

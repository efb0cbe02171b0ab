use yew::prelude::*;

use super::Modal;

#[derive(Properties, PartialEq)]
pub struct FormModalProps {
    pub title: AttrValue,
    pub children: Html,
    pub on_submit: Callback<()>,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub is_saving: bool,
    #[prop_or_default]
    pub error_message: Option<AttrValue>,
}

/// Create/edit dialog. The fields come in as children.
#[function_component]
pub fn FormModal(props: &FormModalProps) -> Html {
    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };
    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <Modal
            on_close={props.on_close.clone()}
            close_on_backdrop={!props.is_saving}
            max_width="max-w-lg"
        >
            <h3 class="text-lg font-semibold text-neutral-900 dark:text-neutral-100 mb-4">
                {&props.title}
            </h3>
            <form onsubmit={on_submit} class="space-y-4">
                {props.children.clone()}

                if let Some(error) = &props.error_message {
                    <div class="text-sm text-red-600 dark:text-red-400">
                        {error}
                    </div>
                }

                <div class="flex justify-end gap-3 pt-2">
                    <button
                        type="button"
                        onclick={on_cancel}
                        disabled={props.is_saving}
                        class="px-4 py-2 text-sm font-medium text-neutral-700 dark:text-neutral-300
                               bg-white dark:bg-neutral-700 border border-neutral-300 dark:border-neutral-600
                               rounded-md hover:bg-neutral-50 dark:hover:bg-neutral-600
                               disabled:opacity-50"
                    >
                        {"Cancel"}
                    </button>
                    <button
                        type="submit"
                        disabled={props.is_saving}
                        class="px-4 py-2 text-sm font-medium text-white bg-neutral-900
                               dark:bg-neutral-100 dark:text-neutral-900 rounded-md
                               hover:bg-neutral-700 disabled:opacity-50"
                    >
                        {if props.is_saving { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    pub label: AttrValue,
    pub value: AttrValue,
    pub on_change: Callback<String>,
    #[prop_or_else(|| AttrValue::from("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub required: bool,
}

#[function_component]
pub fn TextField(props: &TextFieldProps) -> Html {
    let oninput = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            on_change.emit(input.value());
        })
    };

    html! {
        <label class="block">
            <span class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-1">
                {&props.label}
            </span>
            <input
                type={props.input_type.clone()}
                value={props.value.clone()}
                required={props.required}
                {oninput}
                class="w-full px-3 py-2 text-sm border border-neutral-300 dark:border-neutral-600
                       rounded-md bg-white dark:bg-neutral-700
                       text-neutral-900 dark:text-neutral-100
                       focus:outline-none focus:ring-2 focus:ring-neutral-500"
            />
        </label>
    }
}

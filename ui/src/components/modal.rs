use wasm_bindgen::JsCast;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub children: Html,
    /// Called when user clicks the backdrop
    pub on_close: Callback<()>,
    #[prop_or_else(|| AttrValue::from("max-w-md"))]
    pub max_width: AttrValue,
    /// Ignore backdrop clicks, e.g. while a save is in flight
    #[prop_or(true)]
    pub close_on_backdrop: bool,
}

/// Dialog on a dimmed backdrop.
#[function_component]
pub fn Modal(props: &ModalProps) -> Html {
    let backdrop_ref = use_node_ref();
    let on_backdrop_click = backdrop_click(
        backdrop_ref.clone(),
        props.on_close.clone(),
        props.close_on_backdrop,
    );

    html! {
        <div
            ref={backdrop_ref}
            onclick={on_backdrop_click}
            class="fixed inset-0 bg-black bg-opacity-50 z-50 flex
                   items-center justify-center p-4"
        >
            <div
                role="dialog"
                class={format!(
                    "bg-white dark:bg-neutral-800 rounded-lg shadow-xl \
                     w-full p-6 {}",
                    props.max_width
                )}
            >
                {props.children.clone()}
            </div>
        </div>
    }
}

/// Click handler that closes only when the backdrop itself was clicked,
/// not the dialog inside it.
pub fn backdrop_click(
    backdrop_ref: NodeRef,
    on_close: Callback<()>,
    enabled: bool,
) -> Callback<MouseEvent> {
    Callback::from(move |e: MouseEvent| {
        if !enabled {
            return;
        }
        if let Some(backdrop) = backdrop_ref.cast::<web_sys::Element>()
            && let Some(target) = e.target()
            && target.dyn_ref::<web_sys::Element>() == Some(&backdrop)
        {
            on_close.emit(());
        }
    })
}

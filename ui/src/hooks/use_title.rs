use yew::prelude::*;

/// Sets the document title to "`page` · EJAT Admin".
#[hook]
pub fn use_title(page: &str) {
    let title = format!("{page} · EJAT Admin");
    use_effect_with(title, |title| {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            doc.set_title(title);
        }
    });
}

use payloads::{Category, ListParams, requests};
use yew::prelude::*;

use super::{CELL, Dialog, MUTED_CELL, format_date, non_empty};
use crate::components::{
    ConfirmationModal, FormModal, ResourceTable, RowActions, TextField,
};
use crate::hooks::{use_mutation, use_paginated_query, use_title};

const PATH: &str = "/categories";

#[derive(Clone, Default, PartialEq)]
struct CategoryForm {
    name: String,
    description: String,
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
        }
    }
}

#[function_component]
pub fn CategoriesPage() -> Html {
    use_title("Categories");
    let categories = use_paginated_query(
        crate::resource::<Category>(PATH),
        ListParams::default(),
    );
    let dialog = use_state(|| Dialog::<Category>::Closed);
    let form = use_state(CategoryForm::default);
    let mutation = use_mutation();

    let close = {
        let dialog = dialog.clone();
        let mutation = mutation.clone();
        Callback::from(move |_| {
            mutation.reset();
            dialog.set(Dialog::Closed);
        })
    };
    let after_save = {
        let close = close.clone();
        let refetch = categories.refetch.clone();
        Callback::from(move |_| {
            close.emit(());
            refetch.emit(());
        })
    };

    let open_create = {
        let dialog = dialog.clone();
        let form = form.clone();
        Callback::from(move |_| {
            form.set(CategoryForm::default());
            dialog.set(Dialog::Create);
        })
    };

    let on_submit = {
        let dialog = dialog.clone();
        let form = form.clone();
        let mutation = mutation.clone();
        let after_save = after_save.clone();
        Callback::from(move |_| {
            let resource = crate::resource::<Category>(PATH);
            let name = form.name.trim().to_string();
            let description = non_empty(&form.description);
            match &*dialog {
                Dialog::Create => {
                    let details = requests::CreateCategory {
                        name: name.clone(),
                        description,
                    };
                    mutation.run(
                        async move { resource.create(&details, "").await },
                        format!("Created {name}"),
                        after_save.clone(),
                    );
                }
                Dialog::Edit(category) => {
                    let details = requests::UpdateCategory {
                        id: category.id,
                        name: name.clone(),
                        description,
                    };
                    mutation.run(
                        async move { resource.update(&details, "").await },
                        format!("Saved {name}"),
                        after_save.clone(),
                    );
                }
                Dialog::Closed | Dialog::Delete(_) => {}
            }
        })
    };

    let on_delete = {
        let dialog = dialog.clone();
        let mutation = mutation.clone();
        let after_save = after_save.clone();
        Callback::from(move |_| {
            if let Dialog::Delete(category) = &*dialog {
                let resource = crate::resource::<Category>(PATH);
                let id = category.id;
                mutation.run(
                    async move { resource.delete(id, "").await },
                    format!("Deleted {}", category.name),
                    after_save.clone(),
                );
            }
        })
    };

    let rows = categories
        .data
        .iter()
        .map(|category| {
            let on_edit = {
                let dialog = dialog.clone();
                let form = form.clone();
                let category = category.clone();
                Callback::from(move |_| {
                    form.set(CategoryForm::from(&category));
                    dialog.set(Dialog::Edit(category.clone()));
                })
            };
            let on_delete = {
                let dialog = dialog.clone();
                let category = category.clone();
                Callback::from(move |_| dialog.set(Dialog::Delete(category.clone())))
            };
            html! {
                <tr key={category.id.to_string()}>
                    <td class={CELL}>{&category.name}</td>
                    <td class={MUTED_CELL}>
                        {category.description.clone().unwrap_or_default()}
                    </td>
                    <td class={MUTED_CELL}>{format_date(&category.created_at)}</td>
                    <RowActions {on_edit} {on_delete} />
                </tr>
            }
        })
        .collect::<Html>();

    let dialog_view = match &*dialog {
        Dialog::Closed => html! {},
        Dialog::Create | Dialog::Edit(_) => {
            let on_name = {
                let form = form.clone();
                Callback::from(move |name| {
                    form.set(CategoryForm { name, ..(*form).clone() })
                })
            };
            let on_description = {
                let form = form.clone();
                Callback::from(move |description| {
                    form.set(CategoryForm { description, ..(*form).clone() })
                })
            };
            let title = if matches!(*dialog, Dialog::Create) {
                "New category"
            } else {
                "Edit category"
            };
            html! {
                <FormModal
                    {title}
                    {on_submit}
                    on_close={close.clone()}
                    is_saving={mutation.is_saving()}
                    error_message={mutation.error()}
                >
                    <TextField
                        label="Name"
                        value={form.name.clone()}
                        on_change={on_name}
                        required=true
                    />
                    <TextField
                        label="Description"
                        value={form.description.clone()}
                        on_change={on_description}
                    />
                </FormModal>
            }
        }
        Dialog::Delete(category) => html! {
            <ConfirmationModal
                title="Delete category"
                message="Its criteria will no longer be used for judging."
                confirm_text="Delete category"
                confirmation_value={category.name.clone()}
                on_confirm={on_delete}
                on_close={close.clone()}
                is_loading={mutation.is_saving()}
                error_message={mutation.error()}
            />
        },
    };

    html! {
        <>
            <ResourceTable
                title="Categories"
                columns={vec![
                    AttrValue::from("Name"),
                    AttrValue::from("Description"),
                    AttrValue::from("Created"),
                ]}
                row_count={categories.data.len()}
                total={categories.total}
                pagination={categories.pagination.clone()}
                set_pagination={categories.set_pagination.clone()}
                is_loading={categories.is_loading}
                error={categories.error.clone()}
                on_create={open_create}
            >
                {rows}
            </ResourceTable>
            {dialog_view}
        </>
    }
}

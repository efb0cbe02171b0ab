use payloads::{Award, ListParams, requests};
use yew::prelude::*;

use super::{CELL, Dialog, MUTED_CELL, format_date};
use crate::components::{
    ConfirmationModal, FormModal, ResourceTable, RowActions, TextField,
};
use crate::hooks::{use_mutation, use_paginated_query, use_title};

const PATH: &str = "/awards";

#[derive(Clone, PartialEq)]
struct AwardForm {
    name: String,
    year: String,
    is_open: bool,
}

impl Default for AwardForm {
    fn default() -> Self {
        let year = jiff::Timestamp::now()
            .to_zoned(jiff::tz::TimeZone::UTC)
            .year();
        Self {
            name: format!("EJAT {year}"),
            year: year.to_string(),
            is_open: true,
        }
    }
}

impl From<&Award> for AwardForm {
    fn from(award: &Award) -> Self {
        Self {
            name: award.name.clone(),
            year: award.year.to_string(),
            is_open: award.is_open,
        }
    }
}

#[function_component]
pub fn AwardsPage() -> Html {
    use_title("Awards");
    let awards =
        use_paginated_query(crate::resource::<Award>(PATH), ListParams::default());
    let dialog = use_state(|| Dialog::<Award>::Closed);
    let form = use_state(AwardForm::default);
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
        let refetch = awards.refetch.clone();
        Callback::from(move |_| {
            close.emit(());
            refetch.emit(());
        })
    };

    let open_create = {
        let dialog = dialog.clone();
        let form = form.clone();
        Callback::from(move |_| {
            form.set(AwardForm::default());
            dialog.set(Dialog::Create);
        })
    };

    let on_submit = {
        let dialog = dialog.clone();
        let form = form.clone();
        let mutation = mutation.clone();
        let after_save = after_save.clone();
        Callback::from(move |_| {
            let Ok(year) = form.year.trim().parse::<i32>() else {
                mutation.reject("Year must be a number");
                return;
            };
            let resource = crate::resource::<Award>(PATH);
            let name = form.name.trim().to_string();
            let is_open = form.is_open;
            match &*dialog {
                Dialog::Create => {
                    let details = requests::CreateAward {
                        name: name.clone(),
                        year,
                        is_open,
                    };
                    mutation.run(
                        async move { resource.create(&details, "").await },
                        format!("Created {name}"),
                        after_save.clone(),
                    );
                }
                Dialog::Edit(award) => {
                    let details = requests::UpdateAward {
                        id: award.id,
                        name: name.clone(),
                        year,
                        is_open,
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
        Callback::from(move |_| {
            if let Dialog::Delete(award) = &*dialog {
                let resource = crate::resource::<Award>(PATH);
                let id = award.id;
                mutation.run(
                    async move { resource.delete(id, "").await },
                    format!("Deleted {}", award.name),
                    after_save.clone(),
                );
            }
        })
    };

    let rows = awards
        .data
        .iter()
        .map(|award| {
            let on_edit = {
                let dialog = dialog.clone();
                let form = form.clone();
                let award = award.clone();
                Callback::from(move |_| {
                    form.set(AwardForm::from(&award));
                    dialog.set(Dialog::Edit(award.clone()));
                })
            };
            let on_delete = {
                let dialog = dialog.clone();
                let award = award.clone();
                Callback::from(move |_| dialog.set(Dialog::Delete(award.clone())))
            };
            let status = if award.is_open { "Open" } else { "Closed" };
            html! {
                <tr key={award.id.to_string()}>
                    <td class={CELL}>{&award.name}</td>
                    <td class={CELL}>{award.year}</td>
                    <td class={MUTED_CELL}>{status}</td>
                    <td class={MUTED_CELL}>{format_date(&award.created_at)}</td>
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
                Callback::from(move |name| form.set(AwardForm { name, ..(*form).clone() }))
            };
            let on_year = {
                let form = form.clone();
                Callback::from(move |year| form.set(AwardForm { year, ..(*form).clone() }))
            };
            let on_open = {
                let form = form.clone();
                Callback::from(move |e: Event| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    form.set(AwardForm {
                        is_open: input.checked(),
                        ..(*form).clone()
                    });
                })
            };
            let title = if matches!(*dialog, Dialog::Create) {
                "New award"
            } else {
                "Edit award"
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
                        label="Year"
                        input_type="number"
                        value={form.year.clone()}
                        on_change={on_year}
                        required=true
                    />
                    <label class="flex items-center gap-2 text-sm text-neutral-700 dark:text-neutral-300">
                        <input type="checkbox" checked={form.is_open} onchange={on_open} />
                        {"Accepting applications"}
                    </label>
                </FormModal>
            }
        }
        Dialog::Delete(award) => html! {
            <ConfirmationModal
                title="Delete award"
                message="Applications to this award will be orphaned."
                confirm_text="Delete award"
                confirmation_value={award.name.clone()}
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
                title="Awards"
                columns={vec![
                    AttrValue::from("Name"),
                    AttrValue::from("Year"),
                    AttrValue::from("Status"),
                    AttrValue::from("Created"),
                ]}
                row_count={awards.data.len()}
                total={awards.total}
                pagination={awards.pagination.clone()}
                set_pagination={awards.set_pagination.clone()}
                is_loading={awards.is_loading}
                error={awards.error.clone()}
                on_create={open_create}
            >
                {rows}
            </ResourceTable>
            {dialog_view}
        </>
    }
}

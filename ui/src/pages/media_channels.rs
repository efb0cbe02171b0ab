use payloads::{ListParams, MediaChannel, requests};
use yew::prelude::*;

use super::{CELL, Dialog, MUTED_CELL, format_date, non_empty};
use crate::components::{
    ConfirmationModal, FormModal, ResourceTable, RowActions, TextField,
};
use crate::hooks::{use_mutation, use_paginated_query, use_title};

const PATH: &str = "/media-channels";

#[derive(Clone, Default, PartialEq)]
struct ChannelForm {
    name: String,
    website: String,
}

impl From<&MediaChannel> for ChannelForm {
    fn from(channel: &MediaChannel) -> Self {
        Self {
            name: channel.name.clone(),
            website: channel.website.clone().unwrap_or_default(),
        }
    }
}

#[function_component]
pub fn MediaChannelsPage() -> Html {
    use_title("Media channels");
    let channels = use_paginated_query(
        crate::resource::<MediaChannel>(PATH),
        ListParams::default(),
    );
    let dialog = use_state(|| Dialog::<MediaChannel>::Closed);
    let form = use_state(ChannelForm::default);
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
        let refetch = channels.refetch.clone();
        Callback::from(move |_| {
            close.emit(());
            refetch.emit(());
        })
    };

    let open_create = {
        let dialog = dialog.clone();
        let form = form.clone();
        Callback::from(move |_| {
            form.set(ChannelForm::default());
            dialog.set(Dialog::Create);
        })
    };

    let on_submit = {
        let dialog = dialog.clone();
        let form = form.clone();
        let mutation = mutation.clone();
        let after_save = after_save.clone();
        Callback::from(move |_| {
            let resource = crate::resource::<MediaChannel>(PATH);
            let name = form.name.trim().to_string();
            let website = non_empty(&form.website);
            if website
                .as_deref()
                .is_some_and(|url| !url.starts_with("http://") && !url.starts_with("https://"))
            {
                mutation.reject("Website must start with http:// or https://");
                return;
            }
            match &*dialog {
                Dialog::Create => {
                    let details = requests::CreateMediaChannel {
                        name: name.clone(),
                        website,
                    };
                    mutation.run(
                        async move { resource.create(&details, "").await },
                        format!("Created {name}"),
                        after_save.clone(),
                    );
                }
                Dialog::Edit(channel) => {
                    let details = requests::UpdateMediaChannel {
                        id: channel.id,
                        name: name.clone(),
                        website,
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
            if let Dialog::Delete(channel) = &*dialog {
                let resource = crate::resource::<MediaChannel>(PATH);
                let id = channel.id;
                mutation.run(
                    async move { resource.delete(id, "").await },
                    format!("Deleted {}", channel.name),
                    after_save.clone(),
                );
            }
        })
    };

    let rows = channels
        .data
        .iter()
        .map(|channel| {
            let on_edit = {
                let dialog = dialog.clone();
                let form = form.clone();
                let channel = channel.clone();
                Callback::from(move |_| {
                    form.set(ChannelForm::from(&channel));
                    dialog.set(Dialog::Edit(channel.clone()));
                })
            };
            let on_delete = {
                let dialog = dialog.clone();
                let channel = channel.clone();
                Callback::from(move |_| dialog.set(Dialog::Delete(channel.clone())))
            };
            html! {
                <tr key={channel.id.to_string()}>
                    <td class={CELL}>{&channel.name}</td>
                    <td class={MUTED_CELL}>
                        if let Some(website) = &channel.website {
                            <a href={website.clone()} target="_blank" rel="noopener" class="hover:underline">
                                {website}
                            </a>
                        }
                    </td>
                    <td class={MUTED_CELL}>{format_date(&channel.created_at)}</td>
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
                Callback::from(move |name| form.set(ChannelForm { name, ..(*form).clone() }))
            };
            let on_website = {
                let form = form.clone();
                Callback::from(move |website| {
                    form.set(ChannelForm { website, ..(*form).clone() })
                })
            };
            let title = if matches!(*dialog, Dialog::Create) {
                "New media channel"
            } else {
                "Edit media channel"
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
                        label="Website"
                        input_type="url"
                        value={form.website.clone()}
                        on_change={on_website}
                    />
                </FormModal>
            }
        }
        Dialog::Delete(channel) => html! {
            <ConfirmationModal
                title="Delete media channel"
                message="Journalists will no longer be able to select it."
                confirm_text="Delete channel"
                confirmation_value={channel.name.clone()}
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
                title="Media channels"
                columns={vec![
                    AttrValue::from("Name"),
                    AttrValue::from("Website"),
                    AttrValue::from("Created"),
                ]}
                row_count={channels.data.len()}
                total={channels.total}
                pagination={channels.pagination.clone()}
                set_pagination={channels.set_pagination.clone()}
                is_loading={channels.is_loading}
                error={channels.error.clone()}
                on_create={open_create}
            >
                {rows}
            </ResourceTable>
            {dialog_view}
        </>
    }
}

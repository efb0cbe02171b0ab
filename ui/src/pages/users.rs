use payloads::{ListParams, PaginationUpdate, Role, User, requests};
use std::collections::BTreeMap;
use yew::prelude::*;

use super::{CELL, Dialog, MUTED_CELL, format_date};
use crate::components::{
    ConfirmationModal, FormModal, ResourceTable, RowActions, TextField,
};
use crate::hooks::{use_mutation, use_paginated_query, use_title};

const PATH: &str = "/users";

#[derive(Clone, PartialEq)]
struct UserForm {
    name: String,
    email: String,
    role: Role,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: Role::Judge,
        }
    }
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

fn parse_role(value: &str) -> Option<Role> {
    Role::ALL.into_iter().find(|role| role.to_string() == value)
}

#[derive(Properties, PartialEq)]
struct RoleSelectProps {
    value: Option<Role>,
    on_change: Callback<Option<Role>>,
    /// Label of the empty option; without it a role must be chosen
    #[prop_or_default]
    any_label: Option<AttrValue>,
}

#[function_component]
fn RoleSelect(props: &RoleSelectProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            on_change.emit(parse_role(&select.value()));
        })
    };

    html! {
        <select
            {onchange}
            class="px-3 py-2 text-sm border border-neutral-300 dark:border-neutral-600
                   rounded-md bg-white dark:bg-neutral-700 text-neutral-900 dark:text-neutral-100"
        >
            if let Some(any_label) = &props.any_label {
                <option value="" selected={props.value.is_none()}>{any_label}</option>
            }
            {for Role::ALL.iter().map(|role| html! {
                <option value={role.to_string()} selected={props.value == Some(*role)}>
                    {role.to_string()}
                </option>
            })}
        </select>
    }
}

#[function_component]
pub fn UsersPage() -> Html {
    use_title("Users");
    let users =
        use_paginated_query(crate::resource::<User>(PATH), ListParams::default());
    let dialog = use_state(|| Dialog::<User>::Closed);
    let form = use_state(UserForm::default);
    let mutation = use_mutation();

    let role_filter = users
        .pagination
        .filters
        .get("role")
        .and_then(|role| parse_role(role));
    let on_role_filter = {
        let set_pagination = users.set_pagination.clone();
        Callback::from(move |role: Option<Role>| {
            let filters: BTreeMap<String, String> = role
                .map(|role| ("role".to_string(), role.to_string()))
                .into_iter()
                .collect();
            set_pagination.emit(PaginationUpdate {
                filters: Some(filters),
                page: Some(1),
                ..Default::default()
            });
        })
    };

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
        let refetch = users.refetch.clone();
        Callback::from(move |_| {
            close.emit(());
            refetch.emit(());
        })
    };

    let open_create = {
        let dialog = dialog.clone();
        let form = form.clone();
        Callback::from(move |_| {
            form.set(UserForm::default());
            dialog.set(Dialog::Create);
        })
    };

    let on_submit = {
        let dialog = dialog.clone();
        let form = form.clone();
        let mutation = mutation.clone();
        let after_save = after_save.clone();
        Callback::from(move |_| {
            let email = form.email.trim().to_string();
            if !email.contains('@') {
                mutation.reject("Please enter a valid email address");
                return;
            }
            let resource = crate::resource::<User>(PATH);
            let name = form.name.trim().to_string();
            let role = form.role;
            match &*dialog {
                Dialog::Create => {
                    let details = requests::CreateUser {
                        name: name.clone(),
                        email,
                        role,
                    };
                    mutation.run(
                        async move { resource.create(&details, "").await },
                        format!("Created {name}"),
                        after_save.clone(),
                    );
                }
                Dialog::Edit(user) => {
                    let details = requests::UpdateUser {
                        id: user.id,
                        name: name.clone(),
                        email,
                        role,
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
            if let Dialog::Delete(user) = &*dialog {
                let resource = crate::resource::<User>(PATH);
                let id = user.id;
                mutation.run(
                    async move { resource.delete(id, "").await },
                    format!("Deleted {}", user.name),
                    after_save.clone(),
                );
            }
        })
    };

    let rows = users
        .data
        .iter()
        .map(|user| {
            let on_edit = {
                let dialog = dialog.clone();
                let form = form.clone();
                let user = user.clone();
                Callback::from(move |_| {
                    form.set(UserForm::from(&user));
                    dialog.set(Dialog::Edit(user.clone()));
                })
            };
            let on_delete = {
                let dialog = dialog.clone();
                let user = user.clone();
                Callback::from(move |_| dialog.set(Dialog::Delete(user.clone())))
            };
            html! {
                <tr key={user.id.to_string()}>
                    <td class={CELL}>{&user.name}</td>
                    <td class={MUTED_CELL}>{&user.email}</td>
                    <td class={MUTED_CELL}>{user.role.to_string()}</td>
                    <td class={MUTED_CELL}>{format_date(&user.created_at)}</td>
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
                Callback::from(move |name| form.set(UserForm { name, ..(*form).clone() }))
            };
            let on_email = {
                let form = form.clone();
                Callback::from(move |email| form.set(UserForm { email, ..(*form).clone() }))
            };
            let on_role = {
                let form = form.clone();
                Callback::from(move |role: Option<Role>| {
                    if let Some(role) = role {
                        form.set(UserForm { role, ..(*form).clone() });
                    }
                })
            };
            let title = if matches!(*dialog, Dialog::Create) {
                "New user"
            } else {
                "Edit user"
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
                        label="Email"
                        input_type="email"
                        value={form.email.clone()}
                        on_change={on_email}
                        required=true
                    />
                    <label class="block">
                        <span class="block text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-1">
                            {"Role"}
                        </span>
                        <RoleSelect value={Some(form.role)} on_change={on_role} />
                    </label>
                </FormModal>
            }
        }
        Dialog::Delete(user) => html! {
            <ConfirmationModal
                title="Delete user"
                message="Their applications and scores stay on record."
                confirm_text="Delete user"
                confirmation_value={user.email.clone()}
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
                title="Users"
                columns={vec![
                    AttrValue::from("Name"),
                    AttrValue::from("Email"),
                    AttrValue::from("Role"),
                    AttrValue::from("Created"),
                ]}
                row_count={users.data.len()}
                total={users.total}
                pagination={users.pagination.clone()}
                set_pagination={users.set_pagination.clone()}
                is_loading={users.is_loading}
                error={users.error.clone()}
                on_create={open_create}
                toolbar={html! {
                    <RoleSelect
                        value={role_filter}
                        on_change={on_role_filter}
                        any_label="All roles"
                    />
                }}
            >
                {rows}
            </ResourceTable>
            {dialog_view}
        </>
    }
}

use payloads::{ListParams, PaginationUpdate};
use yew::prelude::*;

use super::PaginationControls;
use crate::contexts::toast::use_toast;

#[derive(Properties, PartialEq)]
pub struct ResourceTableProps {
    pub title: AttrValue,
    pub columns: Vec<AttrValue>,
    /// Table rows, one `<tr>` per record
    pub children: Html,
    pub row_count: usize,
    pub total: u64,
    pub pagination: ListParams,
    pub set_pagination: Callback<PaginationUpdate>,
    pub is_loading: bool,
    #[prop_or_default]
    pub error: Option<String>,
    /// Shows a "New" button when set
    #[prop_or_default]
    pub on_create: Option<Callback<()>>,
    /// Extra controls next to the search box, e.g. filters
    #[prop_or_default]
    pub toolbar: Html,
}

/// Page body shared by the list pages: search box, table and pagination.
///
/// Errors show inline above the table and as a toast. The rows from the
/// last successful load stay visible while a new page loads or fails.
#[function_component]
pub fn ResourceTable(props: &ResourceTableProps) -> Html {
    let toasts = use_toast();
    use_effect_with(props.error.clone(), move |error| {
        if let Some(error) = error {
            toasts.error(error.clone());
        }
    });

    let on_search = {
        let set_pagination = props.set_pagination.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            set_pagination.emit(PaginationUpdate::search(input.value()));
        })
    };
    let on_page_change = {
        let set_pagination = props.set_pagination.clone();
        Callback::from(move |page| {
            set_pagination.emit(PaginationUpdate::page(page))
        })
    };
    let on_create = props.on_create.clone().map(|on_create| {
        Callback::from(move |_: MouseEvent| on_create.emit(()))
    });

    let empty = props.row_count == 0 && !props.is_loading;

    html! {
        <section class="space-y-4">
            <div class="flex items-center justify-between gap-4">
                <h1 class="text-2xl font-semibold text-neutral-900 dark:text-white">
                    {&props.title}
                </h1>
                if let Some(on_create) = on_create {
                    <button
                        onclick={on_create}
                        class="px-4 py-2 text-sm font-medium text-white bg-neutral-900
                               dark:bg-neutral-100 dark:text-neutral-900 rounded-md
                               hover:bg-neutral-700"
                    >
                        {"New"}
                    </button>
                }
            </div>

            <div class="flex items-center gap-3">
                <input
                    type="search"
                    placeholder="Search..."
                    value={props.pagination.search.clone()}
                    oninput={on_search}
                    class="w-full max-w-sm px-3 py-2 text-sm border border-neutral-300
                           dark:border-neutral-600 rounded-md bg-white dark:bg-neutral-700
                           text-neutral-900 dark:text-neutral-100"
                />
                {props.toolbar.clone()}
                if props.is_loading {
                    <div class="inline-block animate-spin rounded-full h-5 w-5 border-2
                                border-neutral-900 dark:border-neutral-100 border-t-transparent"></div>
                }
            </div>

            if let Some(error) = &props.error {
                <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border
                            border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                </div>
            }

            <div class="overflow-x-auto rounded-lg border border-neutral-200 dark:border-neutral-700">
                <table class="min-w-full divide-y divide-neutral-200 dark:divide-neutral-700">
                    <thead class="bg-neutral-50 dark:bg-neutral-800">
                        <tr>
                            {for props.columns.iter().map(|column| html! {
                                <th class="px-4 py-3 text-left text-xs font-medium uppercase
                                           tracking-wider text-neutral-500 dark:text-neutral-400">
                                    {column}
                                </th>
                            })}
                            <th class="px-4 py-3"></th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-neutral-200 dark:divide-neutral-700">
                        {props.children.clone()}
                    </tbody>
                </table>
                if empty {
                    <p class="py-8 text-center text-sm text-neutral-500 dark:text-neutral-400">
                        {"Nothing found"}
                    </p>
                }
            </div>

            <PaginationControls
                pagination={props.pagination.clone()}
                total={props.total}
                on_page_change={on_page_change}
                is_loading={props.is_loading}
            />
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct RowActionsProps {
    pub on_edit: Callback<()>,
    pub on_delete: Callback<()>,
}

/// Edit and delete buttons for the last cell of a row.
#[function_component]
pub fn RowActions(props: &RowActionsProps) -> Html {
    let on_edit = props.on_edit.reform(|_: MouseEvent| ());
    let on_delete = props.on_delete.reform(|_: MouseEvent| ());

    html! {
        <td class="px-4 py-3 text-right text-sm whitespace-nowrap space-x-3">
            <button onclick={on_edit} class="text-neutral-700 dark:text-neutral-300 hover:underline">
                {"Edit"}
            </button>
            <button onclick={on_delete} class="text-red-600 dark:text-red-400 hover:underline">
                {"Delete"}
            </button>
        </td>
    }
}

use payloads::responses::ReportSummary;
use yew::prelude::*;

use crate::hooks::{use_single_query, use_title};

#[derive(Properties, PartialEq)]
struct StatCardProps {
    label: AttrValue,
    value: u64,
}

#[function_component]
fn StatCard(props: &StatCardProps) -> Html {
    html! {
        <div class="p-5 rounded-lg border border-neutral-200 dark:border-neutral-700
                    bg-white dark:bg-neutral-800">
            <p class="text-sm text-neutral-600 dark:text-neutral-400">{&props.label}</p>
            <p class="mt-1 text-3xl font-semibold text-neutral-900 dark:text-white">
                {props.value}
            </p>
        </div>
    }
}

#[function_component]
pub fn DashboardPage() -> Html {
    use_title("Dashboard");
    let summary = use_single_query(|| {
        crate::resource::<ReportSummary>("/reports").fetch("/summary")
    });

    let body = summary.render("report summary", |summary, is_loading, error| {
        html! {
            <>
                if let Some(error) = error {
                    <p class="mb-4 text-sm text-red-600 dark:text-red-400">{error}</p>
                }
                <div class={classes!(
                    "grid", "gap-4", "sm:grid-cols-2", "lg:grid-cols-5",
                    is_loading.then_some("opacity-60"),
                )}>
                    <StatCard label="Award programs" value={summary.awards} />
                    <StatCard label="Categories" value={summary.categories} />
                    <StatCard label="Applications" value={summary.applications} />
                    <StatCard label="Judges" value={summary.judges} />
                    <StatCard label="Scores" value={summary.scores} />
                </div>
            </>
        }
    });

    let on_refresh = {
        let refetch = summary.refetch.clone();
        Callback::from(move |_: MouseEvent| refetch.emit(()))
    };

    html! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-neutral-900 dark:text-white">
                    {"Dashboard"}
                </h1>
                <button
                    onclick={on_refresh}
                    disabled={summary.is_loading}
                    class="px-3 py-2 text-sm border border-neutral-300 dark:border-neutral-600
                           rounded-md text-neutral-700 dark:text-neutral-300
                           hover:bg-neutral-100 dark:hover:bg-neutral-700 disabled:opacity-50"
                >
                    {"Refresh"}
                </button>
            </div>
            {body}
        </div>
    }
}

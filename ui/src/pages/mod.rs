pub mod awards;
pub mod categories;
pub mod dashboard;
pub mod media_channels;
pub mod not_found;
pub mod sign_in;
pub mod users;

pub use awards::AwardsPage;
pub use categories::CategoriesPage;
pub use dashboard::DashboardPage;
pub use media_channels::MediaChannelsPage;
pub use not_found::NotFoundPage;
pub use sign_in::SignInPage;
pub use users::UsersPage;

use jiff::Timestamp;

/// Which dialog a list page has open.
#[derive(Clone, PartialEq)]
pub enum Dialog<T> {
    Closed,
    Create,
    Edit(T),
    Delete(T),
}

pub fn format_date(timestamp: &Timestamp) -> String {
    timestamp.strftime("%Y-%m-%d").to_string()
}

/// `None` for blank input.
pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

const CELL: &str = "px-4 py-3 text-sm text-neutral-900 dark:text-neutral-100";
const MUTED_CELL: &str = "px-4 py-3 text-sm text-neutral-500 dark:text-neutral-400";

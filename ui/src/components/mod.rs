pub mod confirmation_modal;
pub mod form_modal;
pub mod layout;
pub mod modal;
pub mod pagination_controls;
pub mod require_auth;
pub mod resource_table;
pub mod sign_in_form;
pub mod toast;

pub use confirmation_modal::ConfirmationModal;
pub use form_modal::{FormModal, TextField};
pub use modal::Modal;
pub use pagination_controls::PaginationControls;
pub use require_auth::RequireAuth;
pub use resource_table::{ResourceTable, RowActions};
pub use sign_in_form::SignInForm;
pub use toast::ToastContainer;

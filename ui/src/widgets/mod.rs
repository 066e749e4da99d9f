mod change_password;
mod form_field;
mod login;
mod pagination;
mod password_strength;
mod permission_modal;
mod permission_table;

pub use change_password::change_password_modal;
pub use form_field::{COLOR_ERROR, field_error, form_field};
pub use login::login_widget;
pub use pagination::{PAGE_SIZES, PageEvent, pagination};
pub use password_strength::strength_meter;
pub use permission_modal::{permission_form_modal, sync_confirmation};
pub use permission_table::{RowAction, permission_table};

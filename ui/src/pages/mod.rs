//! Pages module for the application.
//!
//! - `login_page`: login form for unauthenticated users
//! - `permission_page`: the permission list with its modals
//! - `account_page`: account settings, currently the security tab

mod account_page;
mod login_page;
mod permission_page;

pub use account_page::account_page;
pub use login_page::login_page;
pub use permission_page::permission_page;

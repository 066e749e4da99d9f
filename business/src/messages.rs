//! User-facing strings.
//!
//! Validators and commands never hard-code text; they ask a
//! [`MessageProvider`] for a [`MessageKey`] so a locale can be swapped in.

use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;

use truthy_states::{SnapshotClone, State, state_assign_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKey {
    UsernameRequired,
    PasswordRequired,
    OldPasswordRequired,
    ConfirmPasswordRequired,
    ConfirmPasswordMatchError,
    WeakPassword,
    ResourceRequired,
    DescriptionRequired,
    PathRequired,
    MethodRequired,
    InvalidCredentials,
    NoPermissionSelected,
    NotAuthenticated,
    ServerError,
    NetworkError,
    ChangePassword,
    ChangePasswordTitle,
    PermissionTitle,
    SyncButton,
    SyncConfirmation,
    SyncOk,
    Cancel,
    Ok,
    Create,
    Edit,
    Delete,
    SearchPlaceholder,
}

pub trait MessageProvider: Send + Sync {
    fn message(&self, key: MessageKey) -> Cow<'static, str>;
}

/// Built-in English strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishMessages;

impl MessageProvider for EnglishMessages {
    fn message(&self, key: MessageKey) -> Cow<'static, str> {
        Cow::Borrowed(match key {
            MessageKey::UsernameRequired => "Please input your username",
            MessageKey::PasswordRequired => "Please input your password",
            MessageKey::OldPasswordRequired => "Please input your old password",
            MessageKey::ConfirmPasswordRequired => "Please confirm your password",
            MessageKey::ConfirmPasswordMatchError => "passwords do not match",
            MessageKey::WeakPassword => {
                "Password must be at least 6 characters and contain uppercase, lowercase, number and special character"
            }
            MessageKey::ResourceRequired => "Please input the resource",
            MessageKey::DescriptionRequired => "Please input the description",
            MessageKey::PathRequired => "Please input the path",
            MessageKey::MethodRequired => "Please select the method",
            MessageKey::InvalidCredentials => "Invalid username or password",
            MessageKey::NoPermissionSelected => "No permission is selected",
            MessageKey::NotAuthenticated => "You are not signed in",
            MessageKey::ServerError => "Something went wrong on the server",
            MessageKey::NetworkError => "Unable to reach the server",
            MessageKey::ChangePassword => "Change",
            MessageKey::ChangePasswordTitle => "Change Password",
            MessageKey::PermissionTitle => "Permission",
            MessageKey::SyncButton => "Sync",
            MessageKey::SyncConfirmation => {
                "Sync will register every route of the server as a permission. Continue?"
            }
            MessageKey::SyncOk => "Yes, sync",
            MessageKey::Cancel => "Cancel",
            MessageKey::Ok => "OK",
            MessageKey::Create => "Create",
            MessageKey::Edit => "Edit",
            MessageKey::Delete => "Delete",
            MessageKey::SearchPlaceholder => "Search permissions",
        })
    }
}

/// The active provider, shared between widgets and form validators.
#[derive(Clone)]
pub struct Messages {
    provider: Arc<dyn MessageProvider>,
}

impl Messages {
    pub fn new(provider: impl MessageProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn get(&self, key: MessageKey) -> Cow<'static, str> {
        self.provider.message(key)
    }

    pub fn provider(&self) -> Arc<dyn MessageProvider> {
        Arc::clone(&self.provider)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(EnglishMessages)
    }
}

impl std::fmt::Debug for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messages").finish_non_exhaustive()
    }
}

impl SnapshotClone for Messages {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for Messages {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouting;

    impl MessageProvider for Shouting {
        fn message(&self, key: MessageKey) -> Cow<'static, str> {
            Cow::Owned(EnglishMessages.message(key).to_uppercase())
        }
    }

    #[test]
    fn confirm_mismatch_text_is_stable() {
        assert_eq!(
            Messages::default().get(MessageKey::ConfirmPasswordMatchError),
            "passwords do not match"
        );
    }

    #[test]
    fn provider_can_be_replaced() {
        let messages = Messages::new(Shouting);
        assert_eq!(messages.get(MessageKey::SyncButton), "SYNC");
    }
}

//! FILENAME: core/dashboard/src/users.rs
//! Owner filter options.

use serde::{Deserialize, Serialize};

use crate::types::UserRecord;

/// Label of the option that clears the owner filter.
pub const ALL_USERS_LABEL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOption {
    pub label: String,
    /// User id; empty for the "All" option.
    pub value: String,
}

impl UserOption {
    pub fn all() -> Self {
        UserOption {
            label: ALL_USERS_LABEL.to_string(),
            value: String::new(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&UserRecord> for UserOption {
    fn from(user: &UserRecord) -> Self {
        UserOption {
            label: user.name.clone(),
            value: user.id.clone(),
        }
    }
}

/// "All" first, then one option per user in provider order.
pub fn user_options(users: &[UserRecord]) -> Vec<UserOption> {
    std::iter::once(UserOption::all())
        .chain(users.iter().map(UserOption::from))
        .collect()
}

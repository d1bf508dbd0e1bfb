use crate::data_model::role::Role;
use serde::{Deserialize, Serialize};

/// Login form.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct LoginUser {
    pub user_type: Role,
    pub username: String,
    pub password: String,
}

/// Session status as reported by `/is_logged_in`.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct LoggedInUser {
    pub username: String,
    pub id: u64,
    pub role: Option<Role>,
}

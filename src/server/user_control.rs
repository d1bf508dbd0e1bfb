use crate::data_model::mentee::Mentee;
use crate::data_model::mentor::Mentor;
use crate::data_model::role::Role;
use crate::error::AppError;
use crate::state::data::Data;
use crate::state::store::StoreError;
use actix_identity::Identity;
use log::info;

/// Account behind a session.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub role: Role,
    pub id: u64,
    pub name: String,
}

pub fn identity_string(role: Role, id: u64) -> String {
    format!("{}:{}", role, id)
}

pub fn parse_identity(login: &str) -> Option<(Role, u64)> {
    let (role, id) = login.split_once(':')?;
    Some((role.parse().ok()?, id.parse().ok()?))
}

pub async fn get_user(srv: &mut Data, login: &str) -> Result<Option<CurrentUser>, StoreError> {
    let user = match parse_identity(login) {
        Some((Role::Mentor, id)) => srv.get::<Mentor>(id).await?.map(|m| CurrentUser {
            role: Role::Mentor,
            id: m.id,
            name: m.name,
        }),
        Some((Role::Mentee, id)) => srv.get::<Mentee>(id).await?.map(|m| CurrentUser {
            role: Role::Mentee,
            id: m.id,
            name: m.name,
        }),
        None => None,
    };
    Ok(user)
}

/// Resolves the session owner and insists on `role`.
pub async fn check_role(
    srv: &mut Data,
    user: &Option<Identity>,
    role: Role,
) -> Result<CurrentUser, AppError> {
    let login = match user.as_ref().map(|u| u.id()) {
        Some(Ok(login)) => login,
        _ => {
            info!("No user");
            return Err(AppError::Unauthorized);
        }
    };

    let current = get_user(srv, &login).await?.ok_or_else(|| {
        info!("Session {} has no account behind it", login);
        AppError::Unauthorized
    })?;

    if current.role != role {
        info!("User {} is not a {}", login, role);
        return Err(AppError::Forbidden);
    }

    Ok(current)
}

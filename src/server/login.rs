use crate::data_model::login_user::{LoggedInUser, LoginUser};
use crate::data_model::mentee::Mentee;
use crate::data_model::mentor::Mentor;
use crate::data_model::process_result::ProcessResult;
use crate::data_model::role::Role;
use crate::error::AppError;
use crate::server::user_control::*;
use crate::state::data::Data;
use crate::state::state::*;
use crate::state::store::StoreError;
use crate::util::crypto::verify_password;
use actix_identity::Identity;
use actix_web::{web, HttpMessage, HttpRequest};
use log::{error, info};

/// Accounts of `role` named `username`, in id order, with their hashes.
pub async fn login_candidates(
    srv: &mut Data,
    role: Role,
    username: &str,
) -> Result<Vec<(u64, String)>, StoreError> {
    let accounts: Vec<(u64, String, String)> = match role {
        Role::Mentor => srv
            .all::<Mentor>()
            .await?
            .into_iter()
            .map(|m| (m.id, m.name, m.password))
            .collect(),
        Role::Mentee => srv
            .all::<Mentee>()
            .await?
            .into_iter()
            .map(|m| (m.id, m.name, m.password))
            .collect(),
    };

    Ok(accounts
        .into_iter()
        .filter(|(_, name, _)| name == username)
        .map(|(id, _, hash)| (id, hash))
        .collect())
}

/// First candidate whose hash verifies against `password`.
pub fn first_verified(candidates: &[(u64, String)], password: &str) -> Option<u64> {
    candidates
        .iter()
        .find(|(_, hash)| verify_password(password, hash))
        .map(|(id, _)| *id)
}

pub async fn login(
    data: web::Data<State>,
    form: web::Form<LoginUser>,
    req: HttpRequest,
) -> Result<web::Json<ProcessResult>, AppError> {
    let lu = form.into_inner();
    info!("User name: {}", lu.username);

    let candidates = {
        let mut srv = data.server.lock().await;
        login_candidates(&mut srv, lu.user_type, lu.username.trim()).await?
    };

    let id = match first_verified(&candidates, &lu.password) {
        Some(id) => id,
        None => {
            error!("Invalid login/password for {} {}", lu.user_type, lu.username);
            return Err(AppError::InvalidCredentials);
        }
    };

    Identity::login(&req.extensions(), identity_string(lu.user_type, id)).map_err(|e| {
        error!("Failed to attach identity: {}", e);
        AppError::Internal("session unavailable".to_string())
    })?;
    info!("Logged in as {} {} (ID {})", lu.user_type, lu.username, id);

    Ok(web::Json(ProcessResult::ok()))
}

/// Ends the session if there is one; logging out twice is not an error.
pub async fn logout(user: Option<Identity>) -> web::Json<ProcessResult> {
    match user {
        Some(user) => {
            user.logout();
            info!("Logged out");
        }
        None => info!("Logout without a session"),
    }

    web::Json(ProcessResult::ok())
}

pub async fn is_logged_in(
    user: Option<Identity>,
    data: web::Data<State>,
) -> Result<web::Json<LoggedInUser>, AppError> {
    let mut srv = data.server.lock().await;

    let mut res = LoggedInUser {
        username: "".to_string(),
        id: 0,
        role: None,
    };

    let login = match user.as_ref().map(|u| u.id()) {
        Some(Ok(login)) => login,
        _ => {
            info!("No user");
            return Ok(web::Json(res));
        }
    };

    if let Some(current) = get_user(&mut srv, &login).await? {
        res.username = current.name;
        res.id = current.id;
        res.role = Some(current.role);
    }

    Ok(web::Json(res))
}

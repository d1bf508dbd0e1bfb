use crate::data_model::mentee::Mentee;
use crate::data_model::mentor::Mentor;
use crate::data_model::role::Role;
use crate::error::AppError;
use crate::server::assign::{mentor_loads, select_mentor};
use crate::state::data::Data;
use crate::state::state::*;
use crate::util::crypto::{get_new_salt, get_password_hash};
use actix_web::web;
use log::{error, info};
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct RegisterForm {
    pub user_type: Role,
    pub name: String,
    /// Department for mentors, academic details for mentees.
    pub details: String,
    pub contact: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct Registered {
    pub succeeded: bool,
    pub id: u64,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_name: Option<String>,
}

pub fn validate_registration(form: &RegisterForm) -> Result<(), AppError> {
    if form.password != form.confirm_password {
        return Err(AppError::BadRequest("Passwords don't match".to_string()));
    }

    let fields = [&form.name, &form.details, &form.contact, &form.password];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}

fn name_taken(name: &str) -> AppError {
    AppError::Conflict(format!("Name {} is already registered", name))
}

/// Validates the form and hashes its password. Runs before the state lock
/// is taken.
pub fn hash_registration(form: &RegisterForm) -> Result<String, AppError> {
    validate_registration(form)?;

    get_password_hash(&form.password, &get_new_salt()).map_err(|e| {
        error!("Failed to hash password for {}: {}", form.name.trim(), e);
        AppError::Internal("password hashing failed".to_string())
    })
}

/// Stores a new account with an already computed `hash`. Mentees get the
/// least-loaded mentor; the caller must hold the state lock so the load
/// snapshot stays current until the mentee is written.
pub async fn register_user(
    srv: &mut Data,
    form: &RegisterForm,
    hash: &str,
) -> Result<Registered, AppError> {
    let name = form.name.trim();
    let details = form.details.trim();
    let contact = form.contact.trim();

    let mentors = srv.all::<Mentor>().await?;

    match form.user_type {
        Role::Mentor => {
            if mentors.iter().any(|m| m.name == name) {
                return Err(name_taken(name));
            }

            let mut mentor = Mentor::new(name, details, contact, hash);
            let id = srv.insert(&mut mentor).await?;
            info!("Added mentor {} with ID {}", name, id);

            Ok(Registered {
                succeeded: true,
                id,
                role: Role::Mentor,
                mentor_id: None,
                mentor_name: None,
            })
        }
        Role::Mentee => {
            let mentees = srv.all::<Mentee>().await?;
            if mentees.iter().any(|m| m.name == name) {
                return Err(name_taken(name));
            }

            let mentor_id = select_mentor(mentor_loads(&mentors, &mentees)).map_err(|e| {
                error!("Cannot register mentee {}: {}", name, e);
                e
            })?;
            let mentor_name = mentors
                .iter()
                .find(|m| m.id == mentor_id)
                .map(|m| m.name.clone());

            let mut mentee = Mentee::new(name, mentor_id, details, contact, hash);
            let id = srv.insert(&mut mentee).await?;
            info!("Added mentee {} with ID {}, assigned to mentor {}", name, id, mentor_id);

            Ok(Registered {
                succeeded: true,
                id,
                role: Role::Mentee,
                mentor_id: Some(mentor_id),
                mentor_name,
            })
        }
    }
}

pub async fn register(
    data: web::Data<State>,
    form: web::Form<RegisterForm>,
) -> Result<web::Json<Registered>, AppError> {
    let hash = hash_registration(&form)?;
    let mut srv = data.server.lock().await;
    let res = register_user(&mut srv, &form, &hash).await?;
    Ok(web::Json(res))
}

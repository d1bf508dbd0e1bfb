use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::error;

pub fn verify_password(pw: &str, pw_hash: &str) -> bool {
    match PasswordHash::new(pw_hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(pw.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(e) => {
            error!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

pub fn get_new_salt() -> String {
    let salt = SaltString::generate(&mut OsRng);
    salt.to_string()
}

/// PHC string for `pw`, embedding `salt`.
pub fn get_password_hash(pw: &str, salt: &str) -> Result<String, argon2::password_hash::Error> {
    let saltstr = SaltString::from_b64(salt)?;
    let password_hash = Argon2::default().hash_password(pw.as_bytes(), saltstr.as_salt())?;
    Ok(password_hash.serialize().as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_right_password() {
        let hash = get_password_hash("correct horse", &get_new_salt()).unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn same_password_gets_different_hashes() {
        let a = get_password_hash("password1", &get_new_salt()).unwrap();
        let b = get_password_hash("password1", &get_new_salt()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("password1", "not-a-phc-string"));
    }
}

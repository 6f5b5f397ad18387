use anyhow::bail;
use blake2::{Blake2b, Digest};
use log::warn;

use crate::{database::Store, error::HmsError, patient::utils::Authenticate};

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Blake2b::digest(password.as_bytes()))
}

/// Admin passwords are stored as hex Blake2b digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake2Hashed;

impl Authenticate for Blake2Hashed {
    fn verify(&self, stored: &str, supplied: &str) -> bool {
        stored == hash_password(supplied)
    }
}

pub fn verify_admin(store: &Store, username: &str, password: &str) -> anyhow::Result<String> {
    let username = username.trim();
    let admins = store.load_admins()?;
    let found = admins
        .iter()
        .any(|a| a.username == username && Blake2Hashed.verify(&a.password_hash, password));
    if !found {
        warn!("failed admin login for `{}`", username);
        bail!(HmsError::AuthFailed);
    }
    Ok(username.to_string())
}

use rand::{distributions::Alphanumeric, Rng};

const PATIENT_ID_PREFIX: char = 'P';
const PASSWORD_LEN: usize = 8;

/// Checks a supplied secret against what is on file.
pub trait Authenticate {
    fn verify(&self, stored: &str, supplied: &str) -> bool;
}

/// Patient passwords are kept as issued and compared as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl Authenticate for Plaintext {
    fn verify(&self, stored: &str, supplied: &str) -> bool {
        !stored.is_empty() && stored == supplied
    }
}

pub fn generate_patient_id<R: Rng>(rng: &mut R) -> String {
    format!("{}{}", PATIENT_ID_PREFIX, rng.gen_range(10000..=99999))
}

pub fn generate_password<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(PASSWORD_LEN)
        .map(char::from)
        .collect()
}

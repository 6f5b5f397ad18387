use anyhow::{bail, Context};
use log::info;
use std::collections::HashSet;

use super::utils::{generate_password, generate_patient_id, Authenticate, Plaintext};
use crate::{
    database::Store,
    error::HmsError,
    models::patients::{NewPatient, PatientData},
};

/// Five digit ids leave room for 90000 patients.
const MAX_ID_ATTEMPTS: usize = 1000;

/// Issued once at registration and never shown again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub patient_id: String,
    pub password: String,
}

/// Creates a new patient record with a fresh id and password. Every call
/// registers a new patient; the booking flow calls it once per first booking.
pub fn register_if_absent(store: &Store, info: NewPatient) -> anyhow::Result<Credentials> {
    let mut patients = store.load_patients()?;
    let taken: HashSet<&str> = patients.iter().map(|p| p.id.as_str()).collect();

    let mut rng = rand::thread_rng();
    let patient_id = (0..MAX_ID_ATTEMPTS)
        .map(|_| generate_patient_id(&mut rng))
        .find(|id| !taken.contains(id.as_str()))
        .context("no free patient id left")?;
    let password = generate_password(&mut rng);

    patients.push(PatientData {
        id: patient_id.clone(),
        name: info.name.trim().to_string(),
        password: password.clone(),
        phone: info.phone.trim().to_string(),
        email: info.email.trim().to_string(),
    });
    store.save_patients(&patients)?;

    info!("registered patient {}", patient_id);
    Ok(Credentials {
        patient_id,
        password,
    })
}

/// Who an appointment is booked for.
#[derive(Debug, Clone)]
pub enum PatientRef {
    Registered { patient_id: String, password: String },
    New(NewPatient),
}

#[derive(Debug, Clone)]
pub struct EnsuredPatient {
    pub patient_id: String,
    /// Set when the patient was registered by this call.
    pub issued: Option<Credentials>,
}

/// First step of a booking: resolves the id to book under, registering the
/// patient if they have no record yet.
pub fn ensure_patient(store: &Store, patient: PatientRef) -> anyhow::Result<EnsuredPatient> {
    match patient {
        PatientRef::Registered {
            patient_id,
            password,
        } => Ok(EnsuredPatient {
            patient_id: authenticate(store, &patient_id, &password)?.id,
            issued: None,
        }),
        PatientRef::New(info) => {
            let credentials = register_if_absent(store, info)?;
            Ok(EnsuredPatient {
                patient_id: credentials.patient_id.clone(),
                issued: Some(credentials),
            })
        }
    }
}

pub fn authenticate(
    store: &Store,
    patient_id: &str,
    password: &str,
) -> anyhow::Result<PatientData> {
    authenticate_with(&Plaintext, store, patient_id, password)
}

pub fn authenticate_with<A: Authenticate>(
    checker: &A,
    store: &Store,
    patient_id: &str,
    password: &str,
) -> anyhow::Result<PatientData> {
    let patient = store
        .load_patients()?
        .into_iter()
        .find(|p| p.id == patient_id.trim());
    match patient {
        Some(patient) if checker.verify(&patient.password, password) => Ok(patient),
        _ => bail!(HmsError::AuthFailed),
    }
}

pub fn list_patients(store: &Store) -> anyhow::Result<Vec<PatientData>> {
    let mut patients = store.load_patients()?;
    patients.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(patients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind;

    fn new_patient(name: &str) -> NewPatient {
        NewPatient {
            name: name.to_string(),
            phone: " 555-0101 ".to_string(),
            email: "asha@example.com".to_string(),
        }
    }

    #[test]
    fn registration_issues_fresh_working_credentials() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();

        let mut seen = HashSet::new();
        for _ in 0..20 {
            let before: Vec<String> =
                list_patients(&store).unwrap().into_iter().map(|p| p.id).collect();
            let credentials = register_if_absent(&store, new_patient("Asha")).unwrap();
            assert!(!before.contains(&credentials.patient_id));
            assert!(seen.insert(credentials.patient_id.clone()));

            let patient =
                authenticate(&store, &credentials.patient_id, &credentials.password).unwrap();
            assert_eq!(patient.name, "Asha");
            assert_eq!(patient.phone, "555-0101");

            let err = authenticate(&store, &credentials.patient_id, "not-it").unwrap_err();
            assert_eq!(kind(&err), Some(&HmsError::AuthFailed));
        }
        assert_eq!(list_patients(&store).unwrap().len(), 20);
    }

    #[test]
    fn unknown_patient_fails_authentication() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let err = authenticate(&store, "P99999", "whatever").unwrap_err();
        assert_eq!(kind(&err), Some(&HmsError::AuthFailed));
    }

    #[test]
    fn same_name_registers_twice() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let a = ensure_patient(&store, PatientRef::New(new_patient("Asha"))).unwrap();
        let b = ensure_patient(&store, PatientRef::New(new_patient("Asha"))).unwrap();
        assert_ne!(a.patient_id, b.patient_id);
        assert!(a.issued.is_some());
        assert_eq!(store.load_patients().unwrap().len(), 2);
    }

    #[test]
    fn registered_patient_is_not_registered_again() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let credentials = register_if_absent(&store, new_patient("Asha")).unwrap();

        let ensured = ensure_patient(
            &store,
            PatientRef::Registered {
                patient_id: credentials.patient_id.clone(),
                password: credentials.password.clone(),
            },
        )
        .unwrap();
        assert_eq!(ensured.patient_id, credentials.patient_id);
        assert!(ensured.issued.is_none());
        assert_eq!(store.load_patients().unwrap().len(), 1);

        let err = ensure_patient(
            &store,
            PatientRef::Registered {
                patient_id: credentials.patient_id,
                password: "guess".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(kind(&err), Some(&HmsError::AuthFailed));
    }
}

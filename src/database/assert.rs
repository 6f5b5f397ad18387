use anyhow::bail;

use super::Store;
use crate::{
    error::HmsError,
    models::{doctors::DoctorData, patients::PatientData, staff::StaffData},
};

pub fn assert_doctor(store: &Store, id: u64) -> anyhow::Result<DoctorData> {
    match store.load_doctors()?.into_iter().find(|d| d.id == id) {
        Some(doctor) => Ok(doctor),
        None => bail!(HmsError::UnknownDoctor(id)),
    }
}

pub fn assert_patient(store: &Store, id: &str) -> anyhow::Result<PatientData> {
    match store.load_patients()?.into_iter().find(|p| p.id == id) {
        Some(patient) => Ok(patient),
        None => bail!(HmsError::UnknownPatient(id.to_string())),
    }
}

pub fn assert_staff(store: &Store, id: u64) -> anyhow::Result<StaffData> {
    match store.load_staff()?.into_iter().find(|s| s.id == id) {
        Some(staff) => Ok(staff),
        None => bail!(HmsError::NotFound(format!("staff member {}", id))),
    }
}

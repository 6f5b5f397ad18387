use anyhow::bail;
use log::info;

use crate::{
    database::{assert, Sequence, Store},
    error::HmsError,
    models::appointments::{Appointment, NewAppointment, REASON_NOT_GIVEN},
    patient::registry::authenticate,
    schedule,
    utils::{format_date, format_slot},
};

/// Books a slot. The doctor and patient must exist, the time must be one of
/// the doctor's slots and nobody may hold the slot already.
pub fn book(store: &Store, slot_minutes: u32, info: NewAppointment) -> anyhow::Result<Appointment> {
    let doctor = assert::assert_doctor(store, info.doctor_id)?;
    assert::assert_patient(store, &info.patient_id)?;

    if !schedule::is_doctor_slot(&doctor, slot_minutes, info.slot) {
        bail!(HmsError::InvalidSlot {
            doctor_id: doctor.id,
            slot: format_slot(info.slot),
        });
    }

    let mut appointments = store.load_appointments()?;
    if appointments
        .iter()
        .any(|a| a.occupies(info.doctor_id, info.date, info.slot))
    {
        bail!(HmsError::SlotUnavailable {
            doctor_id: info.doctor_id,
            date: format_date(info.date),
            slot: format_slot(info.slot),
        });
    }

    let reason = info
        .reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
        .unwrap_or_else(|| REASON_NOT_GIVEN.to_string());
    let id = store.issue_id(Sequence::Appointments, appointments.iter().map(|a| a.id))?;
    let appointment = Appointment {
        id,
        patient_id: info.patient_id,
        doctor_id: info.doctor_id,
        date: info.date,
        slot: info.slot,
        reason,
    };
    appointments.push(appointment.clone());
    store.save_appointments(&appointments)?;

    info!(
        "appointment {} booked: doctor {} on {} at {}",
        appointment.id,
        appointment.doctor_id,
        format_date(appointment.date),
        format_slot(appointment.slot)
    );
    Ok(appointment)
}

/// Admin cancellation.
pub fn cancel_by_id(store: &Store, appointment_id: u64) -> anyhow::Result<Appointment> {
    let mut appointments = store.load_appointments()?;
    let index = match appointments.iter().position(|a| a.id == appointment_id) {
        Some(index) => index,
        None => bail!(HmsError::NotFound(format!("appointment {}", appointment_id))),
    };
    let removed = appointments.remove(index);
    store.save_appointments(&appointments)?;

    info!("appointment {} cancelled by admin", removed.id);
    Ok(removed)
}

/// Patient cancellation. Appointments of other patients are reported as
/// missing.
pub fn cancel_by_patient(
    store: &Store,
    patient_id: &str,
    password: &str,
    appointment_id: u64,
) -> anyhow::Result<Appointment> {
    let patient = authenticate(store, patient_id, password)?;

    let mut appointments = store.load_appointments()?;
    let index = match appointments
        .iter()
        .position(|a| a.id == appointment_id && a.patient_id == patient.id)
    {
        Some(index) => index,
        None => bail!(HmsError::NotFound(format!(
            "appointment {} for patient {}",
            appointment_id, patient.id
        ))),
    };
    let removed = appointments.remove(index);
    store.save_appointments(&appointments)?;

    info!("appointment {} cancelled by patient {}", removed.id, patient.id);
    Ok(removed)
}

pub fn list_all(store: &Store) -> anyhow::Result<Vec<Appointment>> {
    let mut appointments = store.load_appointments()?;
    sort_chronologically(&mut appointments);
    Ok(appointments)
}

pub fn list_for_patient(store: &Store, patient_id: &str) -> anyhow::Result<Vec<Appointment>> {
    let mut appointments: Vec<Appointment> = store
        .load_appointments()?
        .into_iter()
        .filter(|a| a.patient_id == patient_id)
        .collect();
    sort_chronologically(&mut appointments);
    Ok(appointments)
}

fn sort_chronologically(appointments: &mut [Appointment]) {
    appointments.sort_by(|a, b| (a.date, a.slot, a.id).cmp(&(b.date, b.slot, b.id)));
}

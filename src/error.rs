use thiserror::Error;

/// Rule violations raised by the roster, patient and appointment operations.
///
/// Raised through `anyhow::bail!`, so callers that care about the kind use
/// `err.downcast_ref::<HmsError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HmsError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    DuplicateId(String),

    #[error("slot {slot} on {date} is already booked for doctor {doctor_id}")]
    SlotUnavailable {
        doctor_id: u64,
        date: String,
        slot: String,
    },

    #[error("invalid credentials")]
    AuthFailed,

    #[error("no such doctor: {0}")]
    UnknownDoctor(u64),

    #[error("no such patient: {0}")]
    UnknownPatient(String),

    #[error("{slot} is not a slot in the shift of doctor {doctor_id}")]
    InvalidSlot { doctor_id: u64, slot: String },

    #[error("{0}")]
    InvalidInput(String),
}

/// Returns the domain error kind carried by an `anyhow::Error`, if any.
pub fn kind(err: &anyhow::Error) -> Option<&HmsError> {
    err.downcast_ref::<HmsError>()
}

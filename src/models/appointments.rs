use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub patient_id: String,
    pub doctor_id: u64,
    pub date: NaiveDate,
    /// Start time of the booked slot.
    pub slot: NaiveTime,
    #[serde(default = "default_reason")]
    pub reason: String,
}

impl Appointment {
    pub fn occupies(&self, doctor_id: u64, date: NaiveDate, slot: NaiveTime) -> bool {
        self.doctor_id == doctor_id && self.date == date && self.slot == slot
    }
}

pub struct NewAppointment {
    pub patient_id: String,
    pub doctor_id: u64,
    pub date: NaiveDate,
    pub slot: NaiveTime,
    pub reason: Option<String>,
}

pub const REASON_NOT_GIVEN: &str = "N/A";

fn default_reason() -> String {
    REASON_NOT_GIVEN.to_string()
}

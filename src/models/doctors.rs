use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorData {
    pub id: u64,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub shift_start: Option<NaiveTime>,
    #[serde(default)]
    pub shift_end: Option<NaiveTime>,
}

impl DoctorData {
    /// Both bounds, if the doctor has a usable shift.
    pub fn shift(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.shift_start, self.shift_end) {
            (Some(start), Some(end)) if end > start => Some((start, end)),
            _ => None,
        }
    }
}

/// Fields left `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateDoctor {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub shift_start: Option<NaiveTime>,
    pub shift_end: Option<NaiveTime>,
}

impl UpdateDoctor {
    pub fn apply_to(self, doctor: &mut DoctorData) {
        if let Some(name) = self.name {
            doctor.name = name;
        }
        if let Some(specialization) = self.specialization {
            doctor.specialization = specialization;
        }
        if let Some(start) = self.shift_start {
            doctor.shift_start = Some(start);
        }
        if let Some(end) = self.shift_end {
            doctor.shift_end = Some(end);
        }
    }
}

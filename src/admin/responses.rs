use std::fmt;

use crate::{
    models::{doctors::DoctorData, patients::PatientData, staff::StaffData},
    utils::format_shift,
};

pub struct DoctorItem<'a>(pub &'a DoctorData);

impl fmt::Display for DoctorItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        write!(
            f,
            "ID: {}, Name: Dr. {}, Specialization: {}, Timings: {}",
            d.id,
            d.name,
            d.specialization,
            format_shift(d.shift_start, d.shift_end)
        )
    }
}

pub struct StaffItem<'a>(pub &'a StaffData);

impl fmt::Display for StaffItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        write!(
            f,
            "ID: {}, Name: {}, Role: {}, Shift: {}",
            s.id, s.name, s.role, s.shift_timings
        )
    }
}

/// Never shows the password.
pub struct PatientItem<'a>(pub &'a PatientData);

impl fmt::Display for PatientItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        write!(
            f,
            "ID: {}, Name: {}, Phone: {}, Email: {}",
            p.id, p.name, p.phone, p.email
        )
    }
}

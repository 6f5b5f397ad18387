use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffData {
    pub id: u64,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub shift_timings: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStaff {
    pub name: Option<String>,
    pub role: Option<String>,
    pub shift_timings: Option<String>,
}

impl UpdateStaff {
    pub fn apply_to(self, staff: &mut StaffData) {
        if let Some(name) = self.name {
            staff.name = name;
        }
        if let Some(role) = self.role {
            staff.role = role;
        }
        if let Some(shift_timings) = self.shift_timings {
            staff.shift_timings = shift_timings;
        }
    }
}

pub const STAFF_ROLE_RECEPTIONIST: &str = "Receptionist";
pub const STAFF_ROLE_NURSE: &str = "Nurse";
pub const STAFF_ROLE_MANAGEMENT: &str = "Management Staff";
pub const STAFF_ROLE_OTHER: &str = "Staff";

pub const STAFF_ROLES: [&str; 3] = [
    STAFF_ROLE_RECEPTIONIST,
    STAFF_ROLE_NURSE,
    STAFF_ROLE_MANAGEMENT,
];

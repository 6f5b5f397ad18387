use chrono::NaiveTime;

#[derive(Debug, Clone)]
pub struct AddDoctorRequest {
    /// Only read when roster ids are admin-supplied.
    pub id: Option<u64>,
    pub name: String,
    pub specialization: String,
    pub shift_start: Option<NaiveTime>,
    pub shift_end: Option<NaiveTime>,
}

#[derive(Debug, Clone)]
pub struct AddStaffRequest {
    pub id: Option<u64>,
    pub name: String,
    pub role: String,
    pub shift_timings: String,
}

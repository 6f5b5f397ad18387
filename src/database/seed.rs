use chrono::NaiveTime;
use log::info;

use super::{Sequence, Store};
use crate::{
    admin::utils::hash_password,
    models::{
        administrators::AdminData,
        doctors::DoctorData,
        staff::{StaffData, STAFF_ROLE_MANAGEMENT, STAFF_ROLE_NURSE, STAFF_ROLE_RECEPTIONIST},
    },
};

const DEFAULT_DOCTORS: [(&str, &str); 20] = [
    ("Rajesh Kumar", "Cardiology"),
    ("Priya Sharma", "General Physician"),
    ("Amit Patel", "Orthopedics"),
    ("Sunita Singh", "Pediatrics"),
    ("Vikram Reddy", "Dermatology"),
    ("Neha Gupta", "ENT Specialist"),
    ("Arun Verma", "Neurology"),
    ("Kavita Joshi", "Psychiatry"),
    ("Sanjay Rao", "Ophthalmology"),
    ("Anita Deshpande", "Gynecology"),
    ("Rahul Bhat", "Endocrinology"),
    ("Meera Iyer", "Gastroenterology"),
    ("Karan Malhotra", "Pulmonology"),
    ("Swati Kapoor", "Nephrology"),
    ("Rohit Sinha", "Urology"),
    ("Nisha Menon", "Oncology"),
    ("Vikram Chawla", "Rheumatology"),
    ("Pooja Jain", "Dermatology (Cosmetic)"),
    ("Aditya Nair", "Sports Medicine"),
    ("Deepa Kaur", "Dentistry"),
];

const DEFAULT_STAFF: [(&str, &str, &str); 5] = [
    ("Anjali Mehta", STAFF_ROLE_RECEPTIONIST, "8:00 AM - 4:00 PM"),
    ("Ravi Kumar", STAFF_ROLE_RECEPTIONIST, "4:00 PM - 12:00 AM"),
    ("Meena Sharma", STAFF_ROLE_NURSE, "9:00 AM - 5:00 PM"),
    ("Pooja Desai", STAFF_ROLE_NURSE, "5:00 PM - 1:00 AM"),
    ("Suresh Rao", STAFF_ROLE_MANAGEMENT, "9:00 AM - 6:00 PM"),
];

const DEFAULT_ADMINS: [(&str, &str); 2] = [("admin1", "admin123"), ("admin2", "admin456")];

/// Writes the default roster and admin accounts into collections that have
/// never been written. Existing files, even empty ones, are left alone.
pub fn seed_defaults(store: &Store) -> anyhow::Result<()> {
    if !store.has_doctors() {
        let shift_start = NaiveTime::from_hms_opt(9, 0, 0);
        let shift_end = NaiveTime::from_hms_opt(17, 0, 0);
        let doctors: Vec<DoctorData> = DEFAULT_DOCTORS
            .iter()
            .zip(1..)
            .map(|((name, specialization), id)| DoctorData {
                id,
                name: name.to_string(),
                specialization: specialization.to_string(),
                shift_start,
                shift_end,
            })
            .collect();
        store.save_doctors(&doctors)?;
        store.reserve_id(Sequence::Doctors, doctors.len() as u64)?;
        info!("seeded {} default doctors", doctors.len());
    }

    if !store.has_staff() {
        let staff: Vec<StaffData> = DEFAULT_STAFF
            .iter()
            .zip(1..)
            .map(|((name, role, shift_timings), id)| StaffData {
                id,
                name: name.to_string(),
                role: role.to_string(),
                shift_timings: shift_timings.to_string(),
            })
            .collect();
        store.save_staff(&staff)?;
        store.reserve_id(Sequence::Staff, staff.len() as u64)?;
        info!("seeded {} default staff members", staff.len());
    }

    if !store.has_admins() {
        let admins: Vec<AdminData> = DEFAULT_ADMINS
            .iter()
            .map(|(username, password)| AdminData {
                username: username.to_string(),
                password_hash: hash_password(password),
            })
            .collect();
        store.save_admins(&admins)?;
        info!("seeded {} default admin accounts", admins.len());
    }

    Ok(())
}

use anyhow::bail;
use log::info;

use super::requests::{AddDoctorRequest, AddStaffRequest};
use crate::{
    config::RosterIds,
    database::{Sequence, Store},
    error::HmsError,
    models::{
        doctors::{DoctorData, UpdateDoctor},
        staff::{StaffData, UpdateStaff},
    },
};

const FALLBACK_SPECIALIZATION: &str = "General Physician";

const CONDITION_KEYWORDS: [(&str, &str); 24] = [
    ("heart", "Cardiology"),
    ("cardiac", "Cardiology"),
    ("chest pain", "Cardiology"),
    ("fever", "General Physician"),
    ("cold", "General Physician"),
    ("cough", "General Physician"),
    ("flu", "General Physician"),
    ("bone", "Orthopedics"),
    ("fracture", "Orthopedics"),
    ("joint", "Orthopedics"),
    ("back pain", "Orthopedics"),
    ("child", "Pediatrics"),
    ("baby", "Pediatrics"),
    ("skin", "Dermatology"),
    ("rash", "Dermatology"),
    ("acne", "Dermatology"),
    ("ear", "ENT Specialist"),
    ("nose", "ENT Specialist"),
    ("throat", "ENT Specialist"),
    ("sinus", "ENT Specialist"),
    ("headache", "Neurology"),
    ("migraine", "Neurology"),
    ("brain", "Neurology"),
    ("nerve", "Neurology"),
];

fn resolve_id(
    store: &Store,
    policy: RosterIds,
    sequence: Sequence,
    supplied: Option<u64>,
    existing: Vec<u64>,
    what: &str,
) -> anyhow::Result<u64> {
    match (policy, supplied) {
        (RosterIds::Supplied, Some(id)) => {
            if existing.contains(&id) {
                bail!(HmsError::DuplicateId(format!("{} {}", what, id)));
            }
            store.reserve_id(sequence, id)?;
            Ok(id)
        }
        (RosterIds::Supplied, None) => {
            bail!(HmsError::InvalidInput(format!("{} id is required", what)))
        }
        (RosterIds::Generated, _) => store.issue_id(sequence, existing),
    }
}

fn check_shift(doctor: &DoctorData) -> anyhow::Result<()> {
    if let (Some(start), Some(end)) = (doctor.shift_start, doctor.shift_end) {
        if end <= start {
            bail!(HmsError::InvalidInput(format!(
                "shift end {} must be after shift start {}",
                end.format("%H:%M"),
                start.format("%H:%M")
            )));
        }
    }
    Ok(())
}

pub fn add_doctor(
    store: &Store,
    policy: RosterIds,
    info: AddDoctorRequest,
) -> anyhow::Result<DoctorData> {
    let mut doctors = store.load_doctors()?;
    let existing = doctors.iter().map(|d| d.id).collect();
    // validate before an id is spent on the record
    let mut doctor = DoctorData {
        id: 0,
        name: info.name,
        specialization: info.specialization,
        shift_start: info.shift_start,
        shift_end: info.shift_end,
    };
    check_shift(&doctor)?;
    doctor.id = resolve_id(store, policy, Sequence::Doctors, info.id, existing, "doctor")?;

    doctors.push(doctor.clone());
    store.save_doctors(&doctors)?;

    info!("doctor {} added", doctor.id);
    Ok(doctor)
}

pub fn update_doctor(store: &Store, id: u64, data: UpdateDoctor) -> anyhow::Result<DoctorData> {
    let mut doctors = store.load_doctors()?;
    let doctor = match doctors.iter_mut().find(|d| d.id == id) {
        Some(doctor) => doctor,
        None => bail!(HmsError::NotFound(format!("doctor {}", id))),
    };

    let mut updated = doctor.clone();
    data.apply_to(&mut updated);
    check_shift(&updated)?;
    *doctor = updated.clone();
    store.save_doctors(&doctors)?;

    info!("doctor {} updated", id);
    Ok(updated)
}

/// Appointments of the doctor stay where they are.
pub fn delete_doctor(store: &Store, id: u64) -> anyhow::Result<DoctorData> {
    let mut doctors = store.load_doctors()?;
    let index = match doctors.iter().position(|d| d.id == id) {
        Some(index) => index,
        None => bail!(HmsError::NotFound(format!("doctor {}", id))),
    };
    let removed = doctors.remove(index);
    store.save_doctors(&doctors)?;

    info!("doctor {} deleted", id);
    Ok(removed)
}

pub fn get_doctor(store: &Store, id: u64) -> anyhow::Result<DoctorData> {
    match store.load_doctors()?.into_iter().find(|d| d.id == id) {
        Some(doctor) => Ok(doctor),
        None => bail!(HmsError::NotFound(format!("doctor {}", id))),
    }
}

pub fn list_doctors(store: &Store) -> anyhow::Result<Vec<DoctorData>> {
    let mut doctors = store.load_doctors()?;
    doctors.sort_by_key(|d| d.id);
    Ok(doctors)
}

/// Specialization suggested by the first keyword found in `condition`.
pub fn specialization_for(condition: &str) -> &'static str {
    let condition = condition.to_lowercase();
    CONDITION_KEYWORDS
        .iter()
        .find(|(keyword, _)| condition.contains(keyword))
        .map_or(FALLBACK_SPECIALIZATION, |(_, specialization)| *specialization)
}

pub fn doctors_for_condition(
    store: &Store,
    condition: &str,
) -> anyhow::Result<(&'static str, Vec<DoctorData>)> {
    let specialization = specialization_for(condition);
    let needle = specialization.to_lowercase();
    let doctors = list_doctors(store)?
        .into_iter()
        .filter(|d| d.specialization.to_lowercase().contains(&needle))
        .collect();
    Ok((specialization, doctors))
}

pub fn add_staff(
    store: &Store,
    policy: RosterIds,
    info: AddStaffRequest,
) -> anyhow::Result<StaffData> {
    let mut staff = store.load_staff()?;
    let existing = staff.iter().map(|s| s.id).collect();
    let id = resolve_id(store, policy, Sequence::Staff, info.id, existing, "staff member")?;

    let member = StaffData {
        id,
        name: info.name,
        role: info.role,
        shift_timings: info.shift_timings,
    };
    staff.push(member.clone());
    store.save_staff(&staff)?;

    info!("staff member {} added", member.id);
    Ok(member)
}

pub fn update_staff(store: &Store, id: u64, data: UpdateStaff) -> anyhow::Result<StaffData> {
    let mut staff = store.load_staff()?;
    let member = match staff.iter_mut().find(|s| s.id == id) {
        Some(member) => member,
        None => bail!(HmsError::NotFound(format!("staff member {}", id))),
    };
    data.apply_to(member);
    let updated = member.clone();
    store.save_staff(&staff)?;

    info!("staff member {} updated", id);
    Ok(updated)
}

pub fn delete_staff(store: &Store, id: u64) -> anyhow::Result<StaffData> {
    let mut staff = store.load_staff()?;
    let index = match staff.iter().position(|s| s.id == id) {
        Some(index) => index,
        None => bail!(HmsError::NotFound(format!("staff member {}", id))),
    };
    let removed = staff.remove(index);
    store.save_staff(&staff)?;

    info!("staff member {} deleted", id);
    Ok(removed)
}

pub fn get_staff(store: &Store, id: u64) -> anyhow::Result<StaffData> {
    crate::database::assert::assert_staff(store, id)
}

pub fn list_staff(store: &Store) -> anyhow::Result<Vec<StaffData>> {
    let mut staff = store.load_staff()?;
    staff.sort_by_key(|s| s.id);
    Ok(staff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind;
    use chrono::NaiveTime;

    fn time(h: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, 0, 0)
    }

    fn doctor_request(id: Option<u64>, name: &str, specialization: &str) -> AddDoctorRequest {
        AddDoctorRequest {
            id,
            name: name.to_string(),
            specialization: specialization.to_string(),
            shift_start: time(9),
            shift_end: time(17),
        }
    }

    fn staff_request(id: Option<u64>, name: &str) -> AddStaffRequest {
        AddStaffRequest {
            id,
            name: name.to_string(),
            role: "Nurse".to_string(),
            shift_timings: "9:00 AM - 5:00 PM".to_string(),
        }
    }

    fn add(store: &Store, id: Option<u64>, name: &str, specialization: &str) -> DoctorData {
        add_doctor(
            store,
            RosterIds::Generated,
            doctor_request(id, name, specialization),
        )
        .unwrap()
    }

    fn doctor_ids(store: &Store) -> Vec<u64> {
        list_doctors(store).unwrap().iter().map(|d| d.id).collect()
    }

    #[test]
    fn generated_doctor_ids_follow_the_highest() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();

        let a = add(&store, None, "A", "Cardiology");
        let b = add(&store, Some(1), "B", "Cardiology");
        assert_eq!((a.id, b.id), (1, 2));

        delete_doctor(&store, 1).unwrap();
        let c = add(&store, None, "C", "Urology");
        assert_eq!(c.id, 3);
        assert_eq!(doctor_ids(&store), vec![2, 3]);
    }

    #[test]
    fn deleted_newest_doctor_id_is_not_reissued() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        add(&store, None, "A", "Cardiology");
        let newest = add(&store, None, "B", "Urology");

        delete_doctor(&store, newest.id).unwrap();
        let next = add(&store, None, "C", "Neurology");
        assert_eq!(next.id, newest.id + 1);
        assert_eq!(doctor_ids(&store), vec![1, 3]);

        let member = add_staff(&store, RosterIds::Generated, staff_request(None, "Ravi")).unwrap();
        delete_staff(&store, member.id).unwrap();
        let again = add_staff(&store, RosterIds::Generated, staff_request(None, "Meena")).unwrap();
        assert_ne!(again.id, member.id);
    }

    #[test]
    fn rejected_doctor_does_not_use_up_an_id() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let mut request = doctor_request(None, "A", "Cardiology");
        request.shift_start = time(18);
        assert!(add_doctor(&store, RosterIds::Generated, request).is_err());
        assert_eq!(add(&store, None, "B", "Cardiology").id, 1);
    }

    #[test]
    fn supplied_ids_must_be_unique() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();

        let request = doctor_request(Some(10), "A", "Cardiology");
        add_doctor(&store, RosterIds::Supplied, request).unwrap();
        let request = doctor_request(Some(10), "B", "Urology");
        let err = add_doctor(&store, RosterIds::Supplied, request).unwrap_err();
        assert!(matches!(kind(&err), Some(HmsError::DuplicateId(_))));

        add_staff(&store, RosterIds::Supplied, staff_request(Some(3), "Meena")).unwrap();
        let err =
            add_staff(&store, RosterIds::Supplied, staff_request(Some(3), "Pooja")).unwrap_err();
        assert!(matches!(kind(&err), Some(HmsError::DuplicateId(_))));
        assert_eq!(list_staff(&store).unwrap().len(), 1);

        // generated ids continue above the supplied ones
        assert_eq!(add(&store, None, "C", "Neurology").id, 11);
    }

    #[test]
    fn update_keeps_unset_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let doctor = add(&store, None, "Meera Iyer", "Gastroenterology");

        let updated = update_doctor(
            &store,
            doctor.id,
            UpdateDoctor {
                shift_end: time(13),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Meera Iyer");
        assert_eq!(updated.shift_end, time(13));
        assert_eq!(get_doctor(&store, doctor.id).unwrap(), updated);

        let err = update_doctor(
            &store,
            doctor.id,
            UpdateDoctor {
                shift_start: time(14),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(kind(&err), Some(HmsError::InvalidInput(_))));
        assert_eq!(get_doctor(&store, doctor.id).unwrap(), updated);
    }

    #[test]
    fn missing_records_are_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();

        for err in [
            update_doctor(&store, 5, UpdateDoctor::default()).unwrap_err(),
            delete_doctor(&store, 5).unwrap_err(),
            get_doctor(&store, 5).unwrap_err(),
            update_staff(&store, 5, UpdateStaff::default()).unwrap_err(),
            delete_staff(&store, 5).unwrap_err(),
            get_staff(&store, 5).unwrap_err(),
        ] {
            assert!(matches!(kind(&err), Some(HmsError::NotFound(_))), "{}", err);
        }
    }

    #[test]
    fn staff_crud() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let member = add_staff(&store, RosterIds::Generated, staff_request(None, "Ravi")).unwrap();

        let updated = update_staff(
            &store,
            member.id,
            UpdateStaff {
                role: Some("Receptionist".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.role, "Receptionist");
        assert_eq!(updated.name, "Ravi");

        delete_staff(&store, member.id).unwrap();
        assert!(list_staff(&store).unwrap().is_empty());
    }

    #[test]
    fn conditions_map_to_specializations() {
        assert_eq!(specialization_for("Chest PAIN since morning"), "Cardiology");
        assert_eq!(specialization_for("itchy rash on the arm"), "Dermatology");
        assert_eq!(specialization_for("sore throat"), "ENT Specialist");
        assert_eq!(specialization_for("tired"), "General Physician");

        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        add(&store, None, "A", "Dermatology");
        add(&store, None, "B", "Dermatology (Cosmetic)");
        add(&store, None, "C", "Neurology");

        let (specialization, doctors) = doctors_for_condition(&store, "acne").unwrap();
        assert_eq!(specialization, "Dermatology");
        assert_eq!(doctors.len(), 2);
    }
}

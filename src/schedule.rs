//! Weekly booking grid of a single doctor.
//!
//! The grid is derived on demand from the doctor's shift and the current
//! appointments; nothing about it is stored.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use std::collections::HashSet;

use crate::{
    database::{assert, Store},
    models::{appointments::Appointment, doctors::DoctorData},
};

pub const WEEK_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCell {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub booked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub slots: Vec<SlotCell>,
}

impl DaySchedule {
    pub fn slot(&self, start: NaiveTime) -> Option<&SlotCell> {
        self.slots.iter().find(|cell| cell.start == start)
    }

    pub fn free_slots(&self) -> impl Iterator<Item = &SlotCell> {
        self.slots.iter().filter(|cell| !cell.booked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    pub days: Vec<DaySchedule>,
}

impl WeekGrid {
    /// `None` when the date is outside the week or the time is not a slot.
    #[cfg(test)]
    pub fn is_booked(&self, date: NaiveDate, slot: NaiveTime) -> Option<bool> {
        let day = self.days.iter().find(|day| day.date == date)?;
        day.slot(slot).map(|cell| cell.booked)
    }

    /// Slot start/end pairs shared by every day of the week.
    pub fn slot_times(&self) -> Vec<(NaiveTime, NaiveTime)> {
        self.days.first().map_or_else(Vec::new, |day| {
            day.slots.iter().map(|cell| (cell.start, cell.end)).collect()
        })
    }
}

/// Start/end of every slot in the doctor's shift, in order. Slots that would
/// run past the end of the shift are not offered.
pub fn doctor_slots(doctor: &DoctorData, slot_minutes: u32) -> Vec<(NaiveTime, NaiveTime)> {
    let (start, end) = match doctor.shift() {
        Some(shift) => shift,
        None => return Vec::new(),
    };
    if slot_minutes == 0 {
        return Vec::new();
    }
    let step = Duration::minutes(i64::from(slot_minutes));

    let mut slots = Vec::new();
    let mut slot_start = start;
    // compare in seconds so the last slot may end exactly at the shift end
    while i64::from(slot_start.num_seconds_from_midnight()) + step.num_seconds()
        <= i64::from(end.num_seconds_from_midnight())
    {
        let slot_end = slot_start + step;
        slots.push((slot_start, slot_end));
        slot_start = slot_end;
    }
    slots
}

pub fn is_doctor_slot(doctor: &DoctorData, slot_minutes: u32, slot: NaiveTime) -> bool {
    doctor_slots(doctor, slot_minutes)
        .iter()
        .any(|(start, _)| *start == slot)
}

/// Builds the 7-day grid starting at `reference` (day 0).
pub fn week_grid(
    appointments: &[Appointment],
    doctor: &DoctorData,
    reference: NaiveDate,
    slot_minutes: u32,
) -> WeekGrid {
    let booked: HashSet<(NaiveDate, NaiveTime)> = appointments
        .iter()
        .filter(|appointment| appointment.doctor_id == doctor.id)
        .map(|appointment| (appointment.date, appointment.slot))
        .collect();
    let slots = doctor_slots(doctor, slot_minutes);

    let days = reference
        .iter_days()
        .take(WEEK_DAYS)
        .map(|date| DaySchedule {
            date,
            slots: slots
                .iter()
                .map(|&(start, end)| SlotCell {
                    start,
                    end,
                    booked: booked.contains(&(date, start)),
                })
                .collect(),
        })
        .collect();

    WeekGrid { days }
}

/// Loads the doctor and appointments and builds the grid.
pub fn load_week_grid(
    store: &Store,
    doctor_id: u64,
    reference: NaiveDate,
    slot_minutes: u32,
) -> anyhow::Result<(DoctorData, WeekGrid)> {
    let doctor = assert::assert_doctor(store, doctor_id)?;
    let appointments = store.load_appointments()?;
    let grid = week_grid(&appointments, &doctor, reference, slot_minutes);
    Ok((doctor, grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn doctor(start: Option<NaiveTime>, end: Option<NaiveTime>) -> DoctorData {
        DoctorData {
            id: 4,
            name: "Sunita Singh".to_string(),
            specialization: "Pediatrics".to_string(),
            shift_start: start,
            shift_end: end,
        }
    }

    fn appointment(id: u64, doctor_id: u64, date: NaiveDate, slot: NaiveTime) -> Appointment {
        Appointment {
            id,
            patient_id: "P10000".to_string(),
            doctor_id,
            date,
            slot,
            reason: "N/A".to_string(),
        }
    }

    #[test]
    fn hourly_slots_cover_the_shift() {
        let slots = doctor_slots(&doctor(Some(time(9, 0)), Some(time(17, 0))), 60);
        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0], (time(9, 0), time(10, 0)));
        assert_eq!(slots[7], (time(16, 0), time(17, 0)));
    }

    #[test]
    fn partial_last_slot_is_dropped() {
        let slots = doctor_slots(&doctor(Some(time(9, 0)), Some(time(10, 45))), 30);
        assert_eq!(
            slots,
            vec![
                (time(9, 0), time(9, 30)),
                (time(9, 30), time(10, 0)),
                (time(10, 0), time(10, 30)),
            ]
        );
    }

    #[test]
    fn no_shift_gives_empty_days() {
        for doc in [
            doctor(None, None),
            doctor(Some(time(9, 0)), None),
            doctor(Some(time(17, 0)), Some(time(9, 0))),
        ] {
            let grid = week_grid(&[], &doc, date(16), 60);
            assert_eq!(grid.days.len(), WEEK_DAYS);
            assert!(grid.days.iter().all(|day| day.slots.is_empty()));
        }
    }

    #[test]
    fn seven_consecutive_days_from_reference() {
        let grid = week_grid(&[], &doctor(Some(time(9, 0)), Some(time(12, 0))), date(28), 60);
        let dates: Vec<NaiveDate> = grid.days.iter().map(|day| day.date).collect();
        assert_eq!(dates[0], date(28));
        assert_eq!(dates[3], date(31));
        assert_eq!(dates[6], NaiveDate::from_ymd_opt(2026, 11, 3).unwrap());
    }

    #[test]
    fn booked_exactly_where_appointments_are() {
        let doc = doctor(Some(time(9, 0)), Some(time(17, 0)));
        let appointments = vec![
            appointment(1, 4, date(16), time(10, 0)),
            appointment(2, 4, date(18), time(16, 0)),
            // other doctor, same cell
            appointment(3, 5, date(17), time(9, 0)),
            // outside the window
            appointment(4, 4, date(23), time(9, 0)),
        ];
        let grid = week_grid(&appointments, &doc, date(16), 60);

        for day in &grid.days {
            for cell in &day.slots {
                let expected = appointments
                    .iter()
                    .any(|a| a.occupies(doc.id, day.date, cell.start));
                assert_eq!(cell.booked, expected, "{} {}", day.date, cell.start);
            }
        }
        assert_eq!(grid.is_booked(date(16), time(10, 0)), Some(true));
        assert_eq!(grid.is_booked(date(17), time(9, 0)), Some(false));
        assert_eq!(grid.is_booked(date(23), time(9, 0)), None);
        assert_eq!(grid.days[0].free_slots().count(), 7);
    }

    #[test]
    fn off_grid_appointment_is_not_shown() {
        let doc = doctor(Some(time(9, 0)), Some(time(11, 0)));
        let grid = week_grid(&[appointment(1, 4, date(16), time(9, 30))], &doc, date(16), 60);
        assert!(grid.days.iter().all(|day| day.free_slots().count() == 2));
    }
}

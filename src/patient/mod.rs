pub mod registry;
pub mod utils;

use anyhow::bail;
use std::io::{BufRead, Write};

use crate::{
    admin::{responses::DoctorItem, roster},
    appointment,
    error::HmsError,
    models::{appointments::NewAppointment, patients::NewPatient},
    protocol::{appointment_items, render_week_grid, Session},
    schedule::{self, WEEK_DAYS},
    utils::{format_date, format_slot_range},
};

use self::registry::{authenticate, ensure_patient, Credentials, PatientRef};

const REASON_PROMPT: &str =
    "Optional: Briefly describe reason for visit (or press Enter to skip): ";

impl<R: BufRead, W: Write> Session<'_, R, W> {
    crate::session_actions! {
        book_appointment,
        view_my_appointments,
        cancel_my_appointment,
        find_doctor,
    }

    pub(crate) fn patient_menu(&mut self) -> anyhow::Result<()> {
        loop {
            self.console.menu(
                "PATIENT PORTAL",
                &[
                    "Book New Appointment",
                    "View My Appointments",
                    "Cancel My Appointment",
                    "Find a Doctor by Symptom",
                    "Back to Main Menu",
                ],
            )?;
            match self.console.read_line("Enter your choice: ")?.as_str() {
                "1" => self.book_appointment()?,
                "2" => self.view_my_appointments()?,
                "3" => self.cancel_my_appointment()?,
                "4" => self.find_doctor()?,
                "5" => return Ok(()),
                _ => self
                    .console
                    .line("[ERROR] Invalid choice! Please try again.")?,
            }
        }
    }

    /// Returning patients sign in; everyone else is registered once the slot
    /// has been chosen.
    fn book_appointment_impl(&mut self) -> anyhow::Result<()> {
        self.console.line("\n--- Book New Appointment ---")?;
        let booker = match self
            .console
            .read_optional("Enter your Patient ID (leave blank if this is your first booking): ")?
        {
            Some(patient_id) => {
                let password = self.console.read_line("Enter your Password: ")?;
                // sign-in problems surface before the slot is picked
                authenticate(self.store, &patient_id, &password)?;
                PatientRef::Registered {
                    patient_id,
                    password,
                }
            }
            None => PatientRef::New(NewPatient {
                name: self.console.read_line("Enter your full name: ")?,
                phone: self.console.read_line("Enter your contact number: ")?,
                email: self.console.read_line("Enter your email: ")?,
            }),
        };

        let doctors = roster::list_doctors(self.store)?;
        if doctors.is_empty() {
            bail!(HmsError::NotFound("any doctor".to_string()));
        }
        self.console.line("\nAvailable Doctors:")?;
        for doctor in &doctors {
            self.console.line(DoctorItem(doctor))?;
        }
        let doctor_id: u64 = self
            .console
            .read_parsed("\nEnter Doctor ID to book appointment with: ", "doctor ID")?;
        let (doctor, grid) =
            schedule::load_week_grid(self.store, doctor_id, self.today, self.config.slot_minutes)?;
        let slot_times = grid.slot_times();
        if slot_times.is_empty() {
            bail!(HmsError::InvalidInput(format!(
                "Dr. {} has no shift configured",
                doctor.name
            )));
        }
        self.console.line(render_week_grid(&doctor, &grid))?;

        self.console.line("\nChoose the day and slot to book.")?;
        let first = format_date(grid.days[0].date);
        let last = format_date(grid.days[WEEK_DAYS - 1].date);
        let day_choice = self.console.read_choice(
            &format!("Day (1 for {}, {} for {}): ", first, WEEK_DAYS, last),
            WEEK_DAYS,
        )?;
        let day = &grid.days[day_choice - 1];
        if day.free_slots().next().is_none() {
            bail!(HmsError::InvalidInput(format!(
                "Dr. {} is fully booked on {}",
                doctor.name,
                format_date(day.date)
            )));
        }

        self.console
            .line(format!("\nSlots for {}:", format_date(day.date)))?;
        for (index, cell) in day.slots.iter().enumerate() {
            let status = if cell.booked { "Booked" } else { "Free" };
            self.console.line(format!(
                "{}. {} --> {}",
                index + 1,
                format_slot_range(cell.start, cell.end),
                status
            ))?;
        }
        let slot_choice = self.console.read_choice(
            &format!("Choose slot number (1-{}): ", day.slots.len()),
            day.slots.len(),
        )?;
        let cell = day.slots[slot_choice - 1];
        if cell.booked {
            bail!(HmsError::SlotUnavailable {
                doctor_id: doctor.id,
                date: format_date(day.date),
                slot: format_slot_range(cell.start, cell.end),
            });
        }
        let date = day.date;
        let reason = self.console.read_optional(REASON_PROMPT)?;

        let ensured = ensure_patient(self.store, booker)?;
        if let Some(credentials) = &ensured.issued {
            self.show_credentials(credentials)?;
        }

        let booked = appointment::book(
            self.store,
            self.config.slot_minutes,
            NewAppointment {
                patient_id: ensured.patient_id,
                doctor_id: doctor.id,
                date,
                slot: cell.start,
                reason,
            },
        )?;
        self.console.success(format!(
            "Appointment booked successfully! Appointment ID: {}",
            booked.id
        ))
    }

    fn show_credentials(&mut self, credentials: &Credentials) -> anyhow::Result<()> {
        let rule = "=".repeat(50);
        self.console.line(format!("\n{}", rule))?;
        self.console.success("PATIENT REGISTERED SUCCESSFULLY!")?;
        self.console.line(&rule)?;
        self.console
            .line(format!("Your Patient ID: {}", credentials.patient_id))?;
        self.console
            .line(format!("Your Password: {}", credentials.password))?;
        self.console
            .line("IMPORTANT: Please save these credentials!")?;
        self.console.line(&rule)
    }

    fn view_my_appointments_impl(&mut self) -> anyhow::Result<()> {
        let patient_id = self.console.read_line("Enter your Patient ID: ")?;
        let password = self.console.read_line("Enter your Password: ")?;
        let patient = authenticate(self.store, &patient_id, &password)?;

        let appointments = appointment::list_for_patient(self.store, &patient.id)?;
        if appointments.is_empty() {
            return self.console.warning(format!(
                "No appointments found for Patient ID: {}",
                patient.id
            ));
        }
        let doctors = self.store.load_doctors()?;
        self.console
            .line(format!("\nAppointments for Patient ID: {}", patient.id))?;
        self.console.line("-".repeat(100))?;
        for item in appointment_items(&appointments, &doctors) {
            self.console.line(item)?;
        }
        Ok(())
    }

    fn cancel_my_appointment_impl(&mut self) -> anyhow::Result<()> {
        let patient_id = self.console.read_line("Enter your Patient ID: ")?;
        let password = self.console.read_line("Enter your Password: ")?;
        // fail on bad credentials before asking for the appointment
        authenticate(self.store, &patient_id, &password)?;
        let appointment_id = self
            .console
            .read_parsed("Enter Appointment ID to cancel: ", "appointment ID")?;
        appointment::cancel_by_patient(self.store, &patient_id, &password, appointment_id)?;
        self.console.success("Appointment cancelled successfully!")
    }

    fn find_doctor_impl(&mut self) -> anyhow::Result<()> {
        let condition = self
            .console
            .read_line("Describe your symptom or condition: ")?;
        let (specialization, doctors) = roster::doctors_for_condition(self.store, &condition)?;
        if doctors.is_empty() {
            return self
                .console
                .warning(format!("No {} doctors on the roster.", specialization));
        }
        self.console
            .line(format!("\nSuggested specialization: {}", specialization))?;
        for doctor in &doctors {
            self.console.line(DoctorItem(doctor))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        patient::registry::authenticate,
        protocol::tests::{drive, seeded, today},
    };
    use chrono::NaiveTime;

    fn issued(out: &str, label: &str) -> String {
        out.lines()
            .find_map(|line| line.strip_prefix(label))
            .unwrap()
            .trim()
            .to_string()
    }

    #[test]
    fn first_booking_registers_and_books() {
        let (_tmp, store, config) = seeded();
        // patient menu, book, new patient, doctor 1, day 2, slot 3, no reason, back, exit
        let out = drive(
            &store,
            &config,
            &[
                "2",
                "1",
                "",
                "Asha Rao",
                "555-0101",
                "asha@example.com",
                "1",
                "2",
                "3",
                "",
                "5",
                "3",
            ],
        );
        assert!(out.contains("[SUCCESS] PATIENT REGISTERED SUCCESSFULLY!"));
        assert!(out.contains("[SUCCESS] Appointment booked successfully! Appointment ID: 1"));

        let patient_id = issued(&out, "Your Patient ID: ");
        let password = issued(&out, "Your Password: ");
        assert_eq!(authenticate(&store, &patient_id, &password).unwrap().name, "Asha Rao");

        let appointments = store.load_appointments().unwrap();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].patient_id, patient_id);
        assert_eq!(appointments[0].doctor_id, 1);
        assert_eq!(appointments[0].date, today().succ_opt().unwrap());
        assert_eq!(appointments[0].slot, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
        assert_eq!(appointments[0].reason, "N/A");
    }

    #[test]
    fn returning_patient_books_again_and_taken_slot_is_refused() {
        let (_tmp, store, config) = seeded();
        let out = drive(
            &store,
            &config,
            &["2", "1", "", "Asha", "", "", "1", "1", "1", "checkup", "5", "3"],
        );
        let patient_id = issued(&out, "Your Patient ID: ");
        let password = issued(&out, "Your Password: ");

        let (id, pw) = (patient_id.as_str(), password.as_str());
        let out = drive(
            &store,
            &config,
            &[
                "2", "1", id, pw, "1", "1", "1", // same slot again
                "1", id, pw, "1", "1", "2", "", // next slot
                "2", id, pw, // view
                "5", "3",
            ],
        );
        assert!(out.contains("is already booked"));
        assert!(!out.contains("PATIENT REGISTERED"));
        assert!(out.contains("Appointment ID: 2"));
        assert!(out.contains("Reason: checkup"));
        assert_eq!(store.load_patients().unwrap().len(), 1);
        assert_eq!(store.load_appointments().unwrap().len(), 2);
    }

    #[test]
    fn cancel_checks_credentials_and_ownership() {
        let (_tmp, store, config) = seeded();
        let mut ids = Vec::new();
        for (name, slot) in &[("Asha", "1"), ("Bilal", "2")] {
            let out = drive(
                &store,
                &config,
                &["2", "1", "", *name, "", "", "3", "1", *slot, "", "5", "3"],
            );
            ids.push((issued(&out, "Your Patient ID: "), issued(&out, "Your Password: ")));
        }
        let (asha, asha_pw) = (ids[0].0.as_str(), ids[0].1.as_str());
        let (bilal, bilal_pw) = (ids[1].0.as_str(), ids[1].1.as_str());
        let booked = store.load_appointments().unwrap();
        assert_eq!(booked.len(), 2);
        let asha_appointment = booked
            .iter()
            .find(|a| a.patient_id == asha)
            .unwrap()
            .id
            .to_string();
        let target = asha_appointment.as_str();

        let out = drive(
            &store,
            &config,
            &[
                "2",
                "3", asha, "wrong", // bad password
                "3", bilal, bilal_pw, target, // not Bilal's
                "3", asha, asha_pw, target, // ok
                "5", "3",
            ],
        );
        assert!(out.contains("[ERROR] invalid credentials"));
        assert!(out.contains(&format!(
            "[ERROR] appointment {} for patient {} not found",
            target, bilal
        )));
        assert!(out.contains("[SUCCESS] Appointment cancelled successfully!"));
        let left = store.load_appointments().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].patient_id, bilal);
    }

    #[test]
    fn symptom_search_suggests_doctors() {
        let (_tmp, store, config) = seeded();
        let out = drive(&store, &config, &["2", "4", "Terrible migraine", "5", "3"]);
        assert!(out.contains("Suggested specialization: Neurology"));
        assert!(out.contains("Dr. Arun Verma"));
    }
}

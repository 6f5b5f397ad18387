pub mod requests;
pub mod responses;
pub mod roster;
pub mod utils;

use std::io::{BufRead, Write};

use crate::{
    appointment,
    config::RosterIds,
    models::{
        doctors::UpdateDoctor,
        staff::{UpdateStaff, STAFF_ROLES, STAFF_ROLE_OTHER},
    },
    patient::registry::list_patients,
    protocol::{appointment_items, is_input_closed, render_week_grid, Session},
    schedule,
    utils::{parse_date_str, parse_time_str},
};

use self::{
    requests::{AddDoctorRequest, AddStaffRequest},
    responses::{DoctorItem, PatientItem, StaffItem},
};

const DEFAULT_SHIFT_START: &str = "09:00";
const DEFAULT_SHIFT_END: &str = "17:00";

impl<R: BufRead, W: Write> Session<'_, R, W> {
    crate::session_actions! {
        add_doctor,
        view_doctors,
        update_doctor,
        delete_doctor,
        add_staff,
        view_staff,
        update_staff,
        delete_staff,
        view_patients,
        view_appointments,
        cancel_appointment,
        view_schedule,
    }

    /// `Ok(false)` on wrong credentials; the caller stays in the main menu.
    pub(crate) fn admin_login(&mut self) -> anyhow::Result<bool> {
        self.console.banner("ADMIN LOGIN")?;
        let username = self.console.read_line("Enter admin username: ")?;
        let password = self.console.read_line("Enter admin password: ")?;
        match utils::verify_admin(self.store, &username, &password) {
            Ok(username) => {
                self.console
                    .success(format!("Login Successful! Welcome {}!", username))?;
                Ok(true)
            }
            Err(err) if is_input_closed(&err) => Err(err),
            Err(err) => {
                self.console.error(&err)?;
                Ok(false)
            }
        }
    }

    pub(crate) fn admin_menu(&mut self) -> anyhow::Result<()> {
        loop {
            self.console.menu(
                "ADMIN DASHBOARD",
                &[
                    "Doctor Management",
                    "Hospital Staff Management",
                    "View All Patients",
                    "View All Appointments",
                    "Cancel Appointment",
                    "View Doctor Weekly Schedule",
                    "Logout",
                ],
            )?;
            match self.console.read_line("Enter your choice: ")?.as_str() {
                "1" => self.doctor_menu()?,
                "2" => self.staff_menu()?,
                "3" => self.view_patients()?,
                "4" => self.view_appointments()?,
                "5" => self.cancel_appointment()?,
                "6" => self.view_schedule()?,
                "7" => {
                    self.console.line("Logging out...")?;
                    return Ok(());
                }
                _ => self
                    .console
                    .line("[ERROR] Invalid choice! Please try again.")?,
            }
        }
    }

    fn doctor_menu(&mut self) -> anyhow::Result<()> {
        loop {
            self.console.menu(
                "DOCTOR MANAGEMENT",
                &[
                    "Add Doctor",
                    "View All Doctors",
                    "Update Doctor",
                    "Delete Doctor",
                    "Back to Admin Menu",
                ],
            )?;
            match self.console.read_line("Enter your choice: ")?.as_str() {
                "1" => self.add_doctor()?,
                "2" => self.view_doctors()?,
                "3" => self.update_doctor()?,
                "4" => self.delete_doctor()?,
                "5" => return Ok(()),
                _ => self
                    .console
                    .line("[ERROR] Invalid choice! Please try again.")?,
            }
        }
    }

    fn staff_menu(&mut self) -> anyhow::Result<()> {
        loop {
            self.console.menu(
                "HOSPITAL STAFF MANAGEMENT",
                &[
                    "Add Staff Member",
                    "View All Staff",
                    "Update Staff",
                    "Delete Staff",
                    "Back to Admin Menu",
                ],
            )?;
            match self.console.read_line("Enter your choice: ")?.as_str() {
                "1" => self.add_staff()?,
                "2" => self.view_staff()?,
                "3" => self.update_staff()?,
                "4" => self.delete_staff()?,
                "5" => return Ok(()),
                _ => self
                    .console
                    .line("[ERROR] Invalid choice! Please try again.")?,
            }
        }
    }

    fn read_roster_id(&mut self) -> anyhow::Result<Option<u64>> {
        match self.config.roster_ids {
            RosterIds::Supplied => Ok(Some(self.console.read_parsed("Enter new ID: ", "ID")?)),
            RosterIds::Generated => Ok(None),
        }
    }

    fn add_doctor_impl(&mut self) -> anyhow::Result<()> {
        self.console.line("\n--- Add New Doctor ---")?;
        let id = self.read_roster_id()?;
        let name = self.console.read_line("Enter doctor name: ")?;
        let specialization = self.console.read_line("Enter specialization: ")?;
        let shift_start = self
            .console
            .read_optional(&format!("Enter shift start HH:MM (default {}): ", DEFAULT_SHIFT_START))?
            .unwrap_or_else(|| DEFAULT_SHIFT_START.to_string());
        let shift_end = self
            .console
            .read_optional(&format!("Enter shift end HH:MM (default {}): ", DEFAULT_SHIFT_END))?
            .unwrap_or_else(|| DEFAULT_SHIFT_END.to_string());

        let doctor = roster::add_doctor(
            self.store,
            self.config.roster_ids,
            AddDoctorRequest {
                id,
                name,
                specialization,
                shift_start: Some(parse_time_str(shift_start)?),
                shift_end: Some(parse_time_str(shift_end)?),
            },
        )?;
        self.console.success(format!(
            "Doctor {} added successfully with ID: {}",
            doctor.name, doctor.id
        ))
    }

    fn view_doctors_impl(&mut self) -> anyhow::Result<()> {
        let doctors = roster::list_doctors(self.store)?;
        if doctors.is_empty() {
            return self.console.warning("No doctors found.");
        }
        self.console.banner("DOCTOR LIST")?;
        for doctor in &doctors {
            self.console.line(DoctorItem(doctor))?;
        }
        Ok(())
    }

    fn update_doctor_impl(&mut self) -> anyhow::Result<()> {
        let id = self.console.read_parsed("Enter doctor ID to update: ", "doctor ID")?;
        let current = roster::get_doctor(self.store, id)?;
        self.console
            .line(format!("Current doctor data: {}", DoctorItem(&current)))?;
        self.console
            .line("\nEnter new information: (leave blank to keep current)")?;

        let data = UpdateDoctor {
            name: self.console.read_optional("Enter new name: ")?,
            specialization: self.console.read_optional("Enter new specialization: ")?,
            shift_start: self
                .console
                .read_optional("Enter new shift start HH:MM: ")?
                .map(parse_time_str)
                .transpose()?,
            shift_end: self
                .console
                .read_optional("Enter new shift end HH:MM: ")?
                .map(parse_time_str)
                .transpose()?,
        };
        roster::update_doctor(self.store, id, data)?;
        self.console.success("Doctor updated successfully!")
    }

    fn delete_doctor_impl(&mut self) -> anyhow::Result<()> {
        let id = self.console.read_parsed("Enter doctor ID to delete: ", "doctor ID")?;
        roster::delete_doctor(self.store, id)?;
        self.console.success("Doctor deleted successfully!")
    }

    fn read_staff_role(&mut self) -> anyhow::Result<Option<String>> {
        self.console.line("\nSelect Role:")?;
        for (index, role) in STAFF_ROLES.iter().enumerate() {
            self.console.line(format!("{}. {}", index + 1, role))?;
        }
        let choice = self.console.read_line("Enter role choice: ")?;
        Ok(choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| STAFF_ROLES.get(index))
            .map(|role| role.to_string()))
    }

    fn add_staff_impl(&mut self) -> anyhow::Result<()> {
        self.console.line("\n--- Add New Staff Member ---")?;
        let id = self.read_roster_id()?;
        let name = self.console.read_line("Enter staff name: ")?;
        let role = self
            .read_staff_role()?
            .unwrap_or_else(|| STAFF_ROLE_OTHER.to_string());
        let shift_timings = self.console.read_line("Enter shift timings: ")?;

        let member = roster::add_staff(
            self.store,
            self.config.roster_ids,
            AddStaffRequest {
                id,
                name,
                role,
                shift_timings,
            },
        )?;
        self.console.success(format!(
            "Staff member {} added successfully with ID: {}",
            member.name, member.id
        ))
    }

    fn view_staff_impl(&mut self) -> anyhow::Result<()> {
        let staff = roster::list_staff(self.store)?;
        if staff.is_empty() {
            return self.console.warning("No staff found.");
        }
        self.console.banner("HOSPITAL STAFF LIST")?;
        for member in &staff {
            self.console.line(StaffItem(member))?;
        }
        Ok(())
    }

    fn update_staff_impl(&mut self) -> anyhow::Result<()> {
        let id = self.console.read_parsed("Enter staff ID to update: ", "staff ID")?;
        let current = roster::get_staff(self.store, id)?;
        self.console
            .line(format!("Current staff data: {}", StaffItem(&current)))?;
        self.console
            .line("\nEnter new information: (leave blank to keep current)")?;

        let data = UpdateStaff {
            name: self.console.read_optional("Enter new name: ")?,
            role: self.read_staff_role()?,
            shift_timings: self.console.read_optional("Enter new shift timings: ")?,
        };
        roster::update_staff(self.store, id, data)?;
        self.console.success("Staff updated successfully!")
    }

    fn delete_staff_impl(&mut self) -> anyhow::Result<()> {
        let id = self.console.read_parsed("Enter staff ID to delete: ", "staff ID")?;
        roster::delete_staff(self.store, id)?;
        self.console.success("Staff deleted successfully!")
    }

    fn view_patients_impl(&mut self) -> anyhow::Result<()> {
        let patients = list_patients(self.store)?;
        if patients.is_empty() {
            return self.console.warning("No patients found.");
        }
        self.console.banner("PATIENT LIST")?;
        for patient in &patients {
            self.console.line(PatientItem(patient))?;
        }
        Ok(())
    }

    fn view_appointments_impl(&mut self) -> anyhow::Result<()> {
        let appointments = appointment::list_all(self.store)?;
        if appointments.is_empty() {
            return self.console.warning("No appointments found.");
        }
        let doctors = self.store.load_doctors()?;
        self.console.banner("APPOINTMENTS LIST")?;
        for item in appointment_items(&appointments, &doctors) {
            self.console.line(item)?;
        }
        Ok(())
    }

    fn cancel_appointment_impl(&mut self) -> anyhow::Result<()> {
        let id = self
            .console
            .read_parsed("Enter Appointment ID to cancel: ", "appointment ID")?;
        appointment::cancel_by_id(self.store, id)?;
        self.console.success("Appointment cancelled successfully!")
    }

    fn view_schedule_impl(&mut self) -> anyhow::Result<()> {
        let doctor_id = self.console.read_parsed("Enter doctor ID: ", "doctor ID")?;
        let start = match self
            .console
            .read_optional("Start date DD-MM-YYYY (blank for today): ")?
        {
            Some(date) => parse_date_str(date)?,
            None => self.today,
        };
        let (doctor, grid) =
            schedule::load_week_grid(self.store, doctor_id, start, self.config.slot_minutes)?;
        if grid.slot_times().is_empty() {
            return self
                .console
                .warning(format!("Dr. {} has no shift configured.", doctor.name));
        }
        self.console.line(render_week_grid(&doctor, &grid))
    }
}

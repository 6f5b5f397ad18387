use anyhow::{bail, Context};
use chrono::NaiveDate;
use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};
use thiserror::Error;

use crate::{
    config::Config,
    database::Store,
    error::{kind, HmsError},
    models::{appointments::Appointment, doctors::DoctorData},
    schedule::WeekGrid,
    utils::{format_date, format_slot, format_slot_range},
};

const RULE_WIDTH: usize = 50;
const GRID_COL_WIDTH: usize = 15;

/// The user closed standard input.
#[derive(Error, Debug)]
#[error("input closed")]
pub struct InputClosed;

pub fn is_input_closed(err: &anyhow::Error) -> bool {
    err.downcast_ref::<InputClosed>().is_some()
}

/// Line-oriented prompt/print surface of a session.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn read_line(&mut self, label: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", label).context("write prompt")?;
        self.output.flush().context("write prompt")?;

        let mut line = String::new();
        if self.input.read_line(&mut line).context("read input")? == 0 {
            bail!(InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// `None` for a blank answer.
    pub fn read_optional(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        let line = self.read_line(label)?;
        Ok(if line.is_empty() { None } else { Some(line) })
    }

    pub fn read_parsed<T>(&mut self, label: &str, what: &str) -> anyhow::Result<T>
    where
        T: FromStr,
    {
        let line = self.read_line(label)?;
        match line.parse() {
            Ok(value) => Ok(value),
            Err(_) => bail!(HmsError::InvalidInput(format!(
                "`{}` is not a valid {}",
                line, what
            ))),
        }
    }

    /// Reads a number in `1..=max`.
    pub fn read_choice(&mut self, label: &str, max: usize) -> anyhow::Result<usize> {
        let choice: usize = self.read_parsed(label, "choice")?;
        if choice == 0 || choice > max {
            bail!(HmsError::InvalidInput(format!(
                "choice {} out of range 1-{}",
                choice, max
            )));
        }
        Ok(choice)
    }

    pub fn line<D: Display>(&mut self, text: D) -> anyhow::Result<()> {
        writeln!(self.output, "{}", text).context("write output")
    }

    pub fn banner(&mut self, title: &str) -> anyhow::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        self.line("")?;
        self.line(&rule)?;
        self.line(format!("{:^width$}", title, width = RULE_WIDTH))?;
        self.line(&rule)
    }

    pub fn menu(&mut self, title: &str, items: &[&str]) -> anyhow::Result<()> {
        self.banner(title)?;
        for (index, item) in items.iter().enumerate() {
            self.line(format!("{}. {}", index + 1, item))?;
        }
        Ok(())
    }

    pub fn success<D: Display>(&mut self, message: D) -> anyhow::Result<()> {
        self.line(format!("[SUCCESS] {}", message))
    }

    pub fn warning<D: Display>(&mut self, message: D) -> anyhow::Result<()> {
        self.line(format!("[WARNING] {}", message))
    }

    /// Rule violations print their own message; anything else prints the
    /// whole context chain.
    pub fn error(&mut self, err: &anyhow::Error) -> anyhow::Result<()> {
        match kind(err) {
            Some(reason) => self.line(format!("[ERROR] {}", reason)),
            None => self.line(format!("[ERROR] {:#}", err)),
        }
    }
}

/// One interactive run: the store handle, settings and console shared by
/// the admin and patient flows.
pub struct Session<'a, R, W> {
    pub store: &'a Store,
    pub config: &'a Config,
    pub console: Console<R, W>,
    /// Day 0 of every schedule shown to patients.
    pub today: NaiveDate,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        store: &'a Store,
        config: &'a Config,
        console: Console<R, W>,
        today: NaiveDate,
    ) -> Self {
        Self {
            store,
            config,
            console,
            today,
        }
    }

    /// Main menu loop. Returns when the user exits or input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        match self.main_menu() {
            Err(err) if is_input_closed(&err) => Ok(()),
            other => other,
        }
    }

    fn main_menu(&mut self) -> anyhow::Result<()> {
        loop {
            self.console
                .menu("HOSPITAL MANAGEMENT SYSTEM", &["Admin", "Patient", "Exit"])?;
            match self.console.read_line("Enter your choice: ")?.as_str() {
                "1" => {
                    if self.admin_login()? {
                        self.admin_menu()?;
                    }
                }
                "2" => self.patient_menu()?,
                "3" => {
                    self.console
                        .line("Thank you for using Hospital Management System!")?;
                    return Ok(());
                }
                _ => self
                    .console
                    .line("[ERROR] Invalid choice! Please try again.")?,
            }
        }
    }
}

pub struct AppointmentItem<'a> {
    pub appointment: &'a Appointment,
    pub doctor: Option<&'a DoctorData>,
}

impl Display for AppointmentItem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let a = self.appointment;
        let doctor = match self.doctor {
            Some(doctor) => format!("Dr. {} ({})", doctor.name, doctor.id),
            None => format!("doctor {} (no longer on roster)", a.doctor_id),
        };
        write!(
            f,
            "ID: {}, Patient: {}, Doctor: {}, Date: {}, Time: {}, Reason: {}",
            a.id,
            a.patient_id,
            doctor,
            format_date(a.date),
            format_slot(a.slot),
            a.reason
        )
    }
}

pub fn appointment_items<'a>(
    appointments: &'a [Appointment],
    doctors: &'a [DoctorData],
) -> Vec<AppointmentItem<'a>> {
    appointments
        .iter()
        .map(|appointment| AppointmentItem {
            appointment,
            doctor: doctors.iter().find(|d| d.id == appointment.doctor_id),
        })
        .collect()
}

/// Slots down, days across; `B` booked, `U` free.
pub fn render_week_grid(doctor: &DoctorData, grid: &WeekGrid) -> String {
    let mut header = vec![format!("{:^w$}", "Slot\\Date", w = GRID_COL_WIDTH)];
    header.extend(grid.days.iter().map(|day| {
        let label = day.date.format("%a %d-%b").to_string();
        format!("{:^w$}", label, w = GRID_COL_WIDTH)
    }));
    let header = header.concat();
    let rule = "=".repeat(header.len());

    let mut lines = vec![
        rule.clone(),
        format!(
            "Weekly schedule for Dr. {} (Specialization: {})",
            doctor.name, doctor.specialization
        ),
        rule,
        header.clone(),
        "-".repeat(header.len()),
    ];
    for (start, end) in grid.slot_times() {
        let mut row = format!("{:^w$}", format_slot_range(start, end), w = GRID_COL_WIDTH);
        for day in &grid.days {
            let mark = match day.slot(start) {
                Some(cell) if cell.booked => "B",
                _ => "U",
            };
            row.push_str(&format!("{:^w$}", mark, w = GRID_COL_WIDTH));
        }
        lines.push(row);
    }
    lines.push(String::new());
    lines.push("Legend: B = Booked, U = Unbooked".to_string());
    lines.join("\n")
}

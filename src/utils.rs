/// Wraps `<name>_impl` session methods so that a failed action is reported
/// to the user and the menu keeps running. Only a closed input stream is
/// passed through to the caller.
#[macro_export]
macro_rules! session_actions {
    ( $( $func_name:ident ),+ $(,)? ) => {
        $(
            paste::paste! {
                fn $func_name(&mut self) -> anyhow::Result<()> {
                    match self.[<$func_name _impl>]() {
                        Ok(()) => Ok(()),
                        Err(err) if $crate::protocol::is_input_closed(&err) => Err(err),
                        Err(err) => self.console.error(&err),
                    }
                }
            }
        )+
    };
}

use anyhow::bail;
use chrono::{NaiveDate, NaiveTime};

use crate::error::HmsError;

pub const DATE_FMT: &str = "%d-%m-%Y";
const DATE_FMT_ISO: &str = "%Y-%m-%d";
pub const SLOT_FMT: &str = "%H:%M";

/// Accepts `DD-MM-YYYY` and `YYYY-MM-DD`.
pub fn parse_date_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDate> {
    let s = s.as_ref().trim();
    match NaiveDate::parse_from_str(s, DATE_FMT)
        .or_else(|_| NaiveDate::parse_from_str(s, DATE_FMT_ISO))
    {
        Ok(date) => Ok(date),
        Err(_) => bail!(HmsError::InvalidInput(format!(
            "`{}` is not a date (use DD-MM-YYYY)",
            s
        ))),
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`, 24-hour clock.
pub fn parse_time_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveTime> {
    let s = s.as_ref().trim();
    match NaiveTime::parse_from_str(s, SLOT_FMT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    {
        Ok(time) => Ok(time),
        Err(_) => bail!(HmsError::InvalidInput(format!(
            "`{}` is not a time (use HH:MM)",
            s
        ))),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

pub fn format_slot(slot: NaiveTime) -> String {
    slot.format(SLOT_FMT).to_string()
}

pub fn format_slot_range(start: NaiveTime, end: NaiveTime) -> String {
    format!("{}-{}", format_slot(start), format_slot(end))
}

pub fn format_shift(start: Option<NaiveTime>, end: Option<NaiveTime>) -> String {
    match (start, end) {
        (Some(start), Some(end)) if end > start => format!(
            "{} - {}",
            start.format("%I:%M %p"),
            end.format("%I:%M %p")
        ),
        _ => "no shift".to_string(),
    }
}

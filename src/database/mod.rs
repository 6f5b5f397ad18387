pub mod assert;
pub mod seed;

use anyhow::Context;
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::models::{
    administrators::AdminData, appointments::Appointment, doctors::DoctorData,
    patients::PatientData, staff::StaffData,
};

pub const DOCTORS_FILE: &str = "doctors.json";
pub const STAFF_FILE: &str = "staff.json";
pub const PATIENTS_FILE: &str = "patients.json";
pub const APPOINTMENTS_FILE: &str = "appointments.json";
pub const ADMINS_FILE: &str = "admins.json";
pub const COUNTERS_FILE: &str = "counters.json";

/// Numbered collections whose ids are issued by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sequence {
    Doctors,
    Staff,
    Appointments,
}

/// Last id issued per sequence, kept in `counters.json`.
type Counters = BTreeMap<Sequence, u64>;

/// Handle on the data directory. Every collection lives in its own JSON file
/// and is always read and written as a whole.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

macro_rules! collections {
    ( $( ( $name:ident, $file:expr, $item:ty ) ),+ $(,)? ) => {
        impl Store {
            $(
                paste::paste! {
                    pub fn [<load_ $name>](&self) -> anyhow::Result<Vec<$item>> {
                        self.load($file)
                    }

                    pub fn [<save_ $name>](&self, items: &[$item]) -> anyhow::Result<()> {
                        self.save($file, items)
                    }
                }
            )+
        }
    };
}

/// Collections that get default content on a fresh data directory.
macro_rules! seeded_collections {
    ( $( ( $name:ident, $file:expr ) ),+ $(,)? ) => {
        impl Store {
            $(
                paste::paste! {
                    pub fn [<has_ $name>](&self) -> bool {
                        self.path($file).exists()
                    }
                }
            )+
        }
    };
}

collections! {
    (doctors, DOCTORS_FILE, DoctorData),
    (staff, STAFF_FILE, StaffData),
    (patients, PATIENTS_FILE, PatientData),
    (appointments, APPOINTMENTS_FILE, Appointment),
    (admins, ADMINS_FILE, AdminData),
}

seeded_collections! {
    (doctors, DOCTORS_FILE),
    (staff, STAFF_FILE),
    (admins, ADMINS_FILE),
}

impl Store {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Issues the next id of `sequence`. An id is never issued twice, even
    /// after the record holding it was deleted. `existing` covers data
    /// written before the counter existed.
    pub fn issue_id<I>(&self, sequence: Sequence, existing: I) -> anyhow::Result<u64>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut counters: Counters = self.read(COUNTERS_FILE)?;
        let last = counters.get(&sequence).copied().unwrap_or(0);
        let id = existing.into_iter().fold(last, u64::max) + 1;
        counters.insert(sequence, id);
        self.write(COUNTERS_FILE, &counters)?;
        debug!("issued {:?} id {}", sequence, id);
        Ok(id)
    }

    /// Records an id chosen by the caller so that issued ids stay above it.
    pub fn reserve_id(&self, sequence: Sequence, id: u64) -> anyhow::Result<()> {
        let mut counters: Counters = self.read(COUNTERS_FILE)?;
        let last = counters.entry(sequence).or_insert(0);
        if id > *last {
            *last = id;
            self.write(COUNTERS_FILE, &counters)?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> anyhow::Result<Vec<T>> {
        let items: Vec<T> = self.read(file)?;
        debug!("loaded {} records from {}", items.len(), file);
        Ok(items)
    }

    fn save<T: Serialize>(&self, file: &str, items: &[T]) -> anyhow::Result<()> {
        self.write(file, items)?;
        debug!("saved {} records to {}", items.len(), file);
        Ok(())
    }

    /// A missing or blank file reads as `T::default()`.
    fn read<T: DeserializeOwned + Default>(&self, file: &str) -> anyhow::Result<T> {
        let path = self.path(file);
        if !path.exists() {
            return Ok(T::default());
        }
        let text =
            fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&text)
            .with_context(|| format!("malformed data file {}", path.display()))
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> anyhow::Result<()> {
        let path = self.path(file);
        let text = serde_json::to_string_pretty(value).context("serialize data file")?;
        fs::write(&path, text).with_context(|| format!("cannot write {}", path.display()))
    }
}

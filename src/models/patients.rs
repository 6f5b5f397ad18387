use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientData {
    pub id: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewPatient {
    pub name: String,
    pub phone: String,
    pub email: String,
}

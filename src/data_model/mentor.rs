use crate::data_model::{unset_id, Record};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Mentor {
    #[serde(default = "unset_id")]
    pub id: u64,
    pub name: String,
    pub department: String,
    pub contact_info: String,
    /// argon2 PHC string
    pub password: String,
}

impl Mentor {
    pub fn new(name: &str, department: &str, contact_info: &str, password: &str) -> Self {
        Self {
            id: unset_id(),
            name: name.to_string(),
            department: department.to_string(),
            contact_info: contact_info.to_string(),
            password: password.to_string(),
        }
    }

    pub fn profile(&self) -> MentorProfile {
        MentorProfile {
            id: self.id,
            name: self.name.clone(),
            department: self.department.clone(),
            contact_info: self.contact_info.clone(),
        }
    }
}

impl Record for Mentor {
    const COLLECTION: &'static str = "mentor";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

/// Mentor as shown to their mentees.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct MentorProfile {
    pub id: u64,
    pub name: String,
    pub department: String,
    pub contact_info: String,
}

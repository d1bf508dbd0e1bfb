use crate::data_model::{unset_id, Record};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Mentee {
    #[serde(default = "unset_id")]
    pub id: u64,
    pub name: String,
    pub mentor_id: u64,
    pub academic_details: String,
    pub contact_info: String,
    pub password: String,
}

impl Mentee {
    pub fn new(
        name: &str,
        mentor_id: u64,
        academic_details: &str,
        contact_info: &str,
        password: &str,
    ) -> Self {
        Self {
            id: unset_id(),
            name: name.to_string(),
            mentor_id,
            academic_details: academic_details.to_string(),
            contact_info: contact_info.to_string(),
            password: password.to_string(),
        }
    }

    pub fn entry(&self) -> MenteeEntry {
        MenteeEntry {
            id: self.id,
            name: self.name.clone(),
            academic_details: self.academic_details.clone(),
            contact_info: self.contact_info.clone(),
        }
    }
}

impl Record for Mentee {
    const COLLECTION: &'static str = "mentee";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

/// Row of a mentor's student list.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct MenteeEntry {
    pub id: u64,
    pub name: String,
    pub academic_details: String,
    pub contact_info: String,
}

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct StudentList {
    pub count: u64,
    pub mentees: Vec<MenteeEntry>,
}

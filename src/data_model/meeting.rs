use crate::data_model::{unset_id, Record};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Meeting {
    #[serde(default = "unset_id")]
    pub id: u64,
    pub mentor_id: u64,
    pub mentee_id: u64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub agenda: String,
}

impl Meeting {
    pub fn new(mentor_id: u64, mentee_id: u64, date: NaiveDate, time: NaiveTime, agenda: &str) -> Self {
        Self {
            id: unset_id(),
            mentor_id,
            mentee_id,
            date,
            time,
            agenda: agenda.to_string(),
        }
    }

    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }
}

impl Record for Meeting {
    const COLLECTION: &'static str = "meeting";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

/// Meeting joined with the name of the other party.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct MeetingEntry {
    pub id: u64,
    pub with: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub agenda: String,
}

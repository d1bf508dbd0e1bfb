use crate::data_model::{unset_id, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct MeetingReport {
    #[serde(default = "unset_id")]
    pub id: u64,
    pub meeting_id: u64,
    pub mentor_id: u64,
    pub report_text: String,
    pub report_date: NaiveDate,
}

impl MeetingReport {
    pub fn new(meeting_id: u64, mentor_id: u64, report_text: &str, report_date: NaiveDate) -> Self {
        Self {
            id: unset_id(),
            meeting_id,
            mentor_id,
            report_text: report_text.to_string(),
            report_date,
        }
    }
}

impl Record for MeetingReport {
    const COLLECTION: &'static str = "meeting_report";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct ReportEntry {
    pub report_date: NaiveDate,
    pub meeting_date: NaiveDate,
    pub mentor: String,
    pub report_text: String,
}

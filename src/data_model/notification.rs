use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NOTIF_NEW_MEETING: &str = "New meeting scheduled";
pub const NOTIF_NEW_REPORT: &str = "Meeting report available";

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Notification {
    pub message: String,
    pub date: NaiveDate,
}

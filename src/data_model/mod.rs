pub mod login_user;
pub mod meeting;
pub mod meeting_report;
pub mod mentee;
pub mod mentor;
pub mod notification;
pub mod process_result;
pub mod role;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record kind persisted in its own store collection.
pub trait Record: Serialize + DeserializeOwned + Send {
    const COLLECTION: &'static str;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

/// Collections created by every store on connect.
pub const COLLECTIONS: [&str; 4] = [
    mentor::Mentor::COLLECTION,
    mentee::Mentee::COLLECTION,
    meeting::Meeting::COLLECTION,
    meeting_report::MeetingReport::COLLECTION,
];

pub fn unset_id() -> u64 {
    0
}

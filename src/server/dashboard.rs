use crate::data_model::meeting::{Meeting, MeetingEntry};
use crate::data_model::meeting_report::MeetingReport;
use crate::data_model::mentee::{Mentee, StudentList};
use crate::data_model::mentor::{Mentor, MentorProfile};
use crate::data_model::notification::*;
use crate::data_model::role::Role;
use crate::error::AppError;
use crate::server::schedule::today;
use crate::server::user_control::*;
use crate::state::data::Data;
use crate::state::state::*;
use actix_identity::Identity;
use actix_web::web;
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};

pub async fn student_list(srv: &mut Data, mentor_id: u64) -> Result<StudentList, AppError> {
    let mentees: Vec<_> = srv
        .all::<Mentee>()
        .await?
        .iter()
        .filter(|m| m.mentor_id == mentor_id)
        .map(Mentee::entry)
        .collect();

    Ok(StudentList {
        count: mentees.len() as u64,
        mentees,
    })
}

pub async fn mentor_of(srv: &mut Data, mentee_id: u64) -> Result<MentorProfile, AppError> {
    let mentee = srv
        .get::<Mentee>(mentee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No mentee {}", mentee_id)))?;
    let mentor = srv
        .get::<Mentor>(mentee.mentor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No mentor {}", mentee.mentor_id)))?;
    Ok(mentor.profile())
}

/// Mentee's meetings from `today` on, soonest first, with the mentor's name.
pub async fn upcoming_for_mentee(
    srv: &mut Data,
    mentee_id: u64,
    today: NaiveDate,
) -> Result<Vec<MeetingEntry>, AppError> {
    let names: HashMap<u64, String> = srv
        .all::<Mentor>()
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();
    let mut meetings: Vec<Meeting> = srv
        .all::<Meeting>()
        .await?
        .into_iter()
        .filter(|m| m.mentee_id == mentee_id && m.is_upcoming(today))
        .collect();
    meetings.sort_by_key(|m| (m.date, m.time, m.id));

    Ok(meetings
        .into_iter()
        .map(|m| MeetingEntry {
            id: m.id,
            with: names
                .get(&m.mentor_id)
                .cloned()
                .unwrap_or_else(|| "<unknown>".to_string()),
            date: m.date,
            time: m.time,
            agenda: m.agenda,
        })
        .collect())
}

/// Upcoming meetings and available reports, deduplicated, newest first.
pub async fn notifications(
    srv: &mut Data,
    mentee_id: u64,
    today: NaiveDate,
) -> Result<Vec<Notification>, AppError> {
    let meetings: Vec<Meeting> = srv
        .all::<Meeting>()
        .await?
        .into_iter()
        .filter(|m| m.mentee_id == mentee_id)
        .collect();
    let own: HashSet<u64> = meetings.iter().map(|m| m.id).collect();

    let mut set: BTreeSet<(Reverse<NaiveDate>, String)> = BTreeSet::new();
    for m in meetings.iter().filter(|m| m.is_upcoming(today)) {
        set.insert((Reverse(m.date), NOTIF_NEW_MEETING.to_string()));
    }
    for r in srv.all::<MeetingReport>().await? {
        if own.contains(&r.meeting_id) {
            set.insert((Reverse(r.report_date), NOTIF_NEW_REPORT.to_string()));
        }
    }

    Ok(set
        .into_iter()
        .map(|(Reverse(date), message)| Notification { message, date })
        .collect())
}

pub async fn mentor_mentees(
    user: Option<Identity>,
    data: web::Data<State>,
) -> Result<web::Json<StudentList>, AppError> {
    let mut srv = data.server.lock().await;
    let mentor = check_role(&mut srv, &user, Role::Mentor).await?;
    Ok(web::Json(student_list(&mut srv, mentor.id).await?))
}

pub async fn mentee_mentor(
    user: Option<Identity>,
    data: web::Data<State>,
) -> Result<web::Json<MentorProfile>, AppError> {
    let mut srv = data.server.lock().await;
    let mentee = check_role(&mut srv, &user, Role::Mentee).await?;
    Ok(web::Json(mentor_of(&mut srv, mentee.id).await?))
}

pub async fn mentee_meetings(
    user: Option<Identity>,
    data: web::Data<State>,
) -> Result<web::Json<Vec<MeetingEntry>>, AppError> {
    let mut srv = data.server.lock().await;
    let mentee = check_role(&mut srv, &user, Role::Mentee).await?;
    Ok(web::Json(upcoming_for_mentee(&mut srv, mentee.id, today()).await?))
}

pub async fn mentee_notifications(
    user: Option<Identity>,
    data: web::Data<State>,
) -> Result<web::Json<Vec<Notification>>, AppError> {
    let mut srv = data.server.lock().await;
    let mentee = check_role(&mut srv, &user, Role::Mentee).await?;
    Ok(web::Json(notifications(&mut srv, mentee.id, today()).await?))
}

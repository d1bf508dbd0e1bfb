use crate::data_model::meeting::{Meeting, MeetingEntry};
use crate::data_model::meeting_report::MeetingReport;
use crate::data_model::mentee::Mentee;
use crate::data_model::process_result::ProcessResult;
use crate::data_model::role::Role;
use crate::error::AppError;
use crate::server::user_control::*;
use crate::state::data::Data;
use crate::state::state::*;
use actix_identity::Identity;
use actix_web::{web, HttpRequest};
use chrono::{NaiveDate, NaiveTime};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_qs::Config;
use std::collections::HashMap;

pub const DELETE_DENIED: &str =
    "Unable to delete meeting. Please ensure it exists and you have permission.";

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct MeetingForm {
    pub mentee_id: u64,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub agenda: String,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct IdParam {
    pub id: u64,
}

fn default_limit() -> usize {
    10
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct LimitParam {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_query<'a, T: Deserialize<'a>>(query: &'a str) -> Result<T, AppError> {
    let config = Config::new(10, false);
    config.deserialize_str(query).map_err(|e| {
        error!("Bad query {}: {}", query, e);
        AppError::BadRequest(format!("Invalid query: {}", e))
    })
}

pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date {}", s)))
}

/// Accepts `HH:MM:SS` and `HH:MM`.
pub fn parse_time(s: &str) -> Result<NaiveTime, AppError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| AppError::BadRequest(format!("Invalid time {}", s)))
}

async fn mentee_names(srv: &mut Data) -> Result<HashMap<u64, String>, AppError> {
    Ok(srv
        .all::<Mentee>()
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect())
}

fn entry(meeting: Meeting, names: &HashMap<u64, String>, other: u64) -> MeetingEntry {
    MeetingEntry {
        id: meeting.id,
        with: names.get(&other).cloned().unwrap_or_else(|| "<unknown>".to_string()),
        date: meeting.date,
        time: meeting.time,
        agenda: meeting.agenda,
    }
}

pub async fn add_meeting(
    srv: &mut Data,
    mentor: &CurrentUser,
    form: &MeetingForm,
    today: NaiveDate,
) -> Result<u64, AppError> {
    let date = parse_date(&form.date)?;
    if date < today {
        return Err(AppError::BadRequest(
            "Cannot schedule meetings in the past".to_string(),
        ));
    }
    let time = parse_time(&form.time)?;

    let mentee = srv
        .get::<Mentee>(form.mentee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No mentee {}", form.mentee_id)))?;
    if mentee.mentor_id != mentor.id {
        info!(
            "Mentor {} tried to schedule with mentee {} of mentor {}",
            mentor.id, mentee.id, mentee.mentor_id
        );
        return Err(AppError::Forbidden);
    }

    let mut meeting = Meeting::new(mentor.id, mentee.id, date, time, form.agenda.trim());
    let id = srv.insert(&mut meeting).await?;
    info!("Added meeting {} with mentee {} on {} {}", id, mentee.id, date, time);
    Ok(id)
}

/// Mentor's meetings from `today` on, soonest first.
pub async fn upcoming_for_mentor(
    srv: &mut Data,
    mentor_id: u64,
    today: NaiveDate,
) -> Result<Vec<MeetingEntry>, AppError> {
    let names = mentee_names(srv).await?;
    let mut meetings: Vec<Meeting> = srv
        .all::<Meeting>()
        .await?
        .into_iter()
        .filter(|m| m.mentor_id == mentor_id && m.is_upcoming(today))
        .collect();
    meetings.sort_by_key(|m| (m.date, m.time, m.id));

    Ok(meetings
        .into_iter()
        .map(|m| {
            let other = m.mentee_id;
            entry(m, &names, other)
        })
        .collect())
}

/// Mentor's meetings up to `today`, newest first. Reports are written for
/// these.
pub async fn past_for_mentor(
    srv: &mut Data,
    mentor_id: u64,
    today: NaiveDate,
    limit: usize,
) -> Result<Vec<MeetingEntry>, AppError> {
    let names = mentee_names(srv).await?;
    let mut meetings: Vec<Meeting> = srv
        .all::<Meeting>()
        .await?
        .into_iter()
        .filter(|m| m.mentor_id == mentor_id && m.date <= today)
        .collect();
    meetings.sort_by_key(|m| std::cmp::Reverse((m.date, m.time, m.id)));
    meetings.truncate(limit);

    Ok(meetings
        .into_iter()
        .map(|m| {
            let other = m.mentee_id;
            entry(m, &names, other)
        })
        .collect())
}

pub async fn delete_meeting(srv: &mut Data, mentor_id: u64, id: u64) -> Result<(), AppError> {
    match srv.get::<Meeting>(id).await? {
        Some(m) if m.mentor_id == mentor_id => {}
        _ => {
            error!("Failed to remove meeting {} for mentor {}", id, mentor_id);
            return Err(AppError::NotFound(DELETE_DENIED.to_string()));
        }
    }

    let reports = srv.all::<MeetingReport>().await?;
    if reports.iter().any(|r| r.meeting_id == id) {
        info!("Meeting {} has reports, keeping it", id);
        return Err(AppError::Conflict(
            "Meeting already has reports and cannot be deleted".to_string(),
        ));
    }

    if !srv.remove::<Meeting>(id).await? {
        return Err(AppError::NotFound(DELETE_DENIED.to_string()));
    }
    info!("Removed meeting with ID {}", id);
    Ok(())
}

pub async fn meeting_add(
    user: Option<Identity>,
    data: web::Data<State>,
    form: web::Form<MeetingForm>,
) -> Result<web::Json<ProcessResult>, AppError> {
    let mut srv = data.server.lock().await;
    let mentor = check_role(&mut srv, &user, Role::Mentor).await?;
    let id = add_meeting(&mut srv, &mentor, &form, today()).await?;
    Ok(web::Json(ProcessResult::created(id)))
}

pub async fn meeting_list(
    user: Option<Identity>,
    data: web::Data<State>,
) -> Result<web::Json<Vec<MeetingEntry>>, AppError> {
    let mut srv = data.server.lock().await;
    let mentor = check_role(&mut srv, &user, Role::Mentor).await?;
    let lst = upcoming_for_mentor(&mut srv, mentor.id, today()).await?;
    Ok(web::Json(lst))
}

pub async fn meeting_past(
    user: Option<Identity>,
    data: web::Data<State>,
    req: HttpRequest,
) -> Result<web::Json<Vec<MeetingEntry>>, AppError> {
    let params: LimitParam = parse_query(req.query_string())?;
    let mut srv = data.server.lock().await;
    let mentor = check_role(&mut srv, &user, Role::Mentor).await?;
    let lst = past_for_mentor(&mut srv, mentor.id, today(), params.limit).await?;
    Ok(web::Json(lst))
}

pub async fn meeting_del(
    user: Option<Identity>,
    data: web::Data<State>,
    req: HttpRequest,
) -> Result<web::Json<ProcessResult>, AppError> {
    let params: IdParam = parse_query(req.query_string())?;
    let mut srv = data.server.lock().await;
    let mentor = check_role(&mut srv, &user, Role::Mentor).await?;
    delete_meeting(&mut srv, mentor.id, params.id).await?;
    Ok(web::Json(ProcessResult::ok()))
}

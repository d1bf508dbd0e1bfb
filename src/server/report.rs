use crate::data_model::meeting::Meeting;
use crate::data_model::meeting_report::{MeetingReport, ReportEntry};
use crate::data_model::mentor::Mentor;
use crate::data_model::process_result::ProcessResult;
use crate::data_model::role::Role;
use crate::error::AppError;
use crate::server::schedule::today;
use crate::server::user_control::*;
use crate::state::data::Data;
use crate::state::state::*;
use actix_identity::Identity;
use actix_web::web;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct ReportForm {
    pub meeting_id: u64,
    pub report_text: String,
}

pub async fn add_report(
    srv: &mut Data,
    mentor: &CurrentUser,
    form: &ReportForm,
    today: NaiveDate,
) -> Result<u64, AppError> {
    let text = form.report_text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Report text is required".to_string()));
    }

    let meeting = match srv.get::<Meeting>(form.meeting_id).await? {
        Some(m) if m.mentor_id == mentor.id => m,
        _ => {
            return Err(AppError::NotFound(format!(
                "No meeting {} for this mentor",
                form.meeting_id
            )))
        }
    };
    if meeting.date > today {
        return Err(AppError::BadRequest(
            "Cannot report on a meeting that has not happened yet".to_string(),
        ));
    }

    let mut report = MeetingReport::new(meeting.id, mentor.id, text, today);
    let id = srv.insert(&mut report).await?;
    info!("Added report {} for meeting {}", id, meeting.id);
    Ok(id)
}

/// Reports on the mentee's meetings, newest first.
pub async fn reports_for_mentee(srv: &mut Data, mentee_id: u64) -> Result<Vec<ReportEntry>, AppError> {
    let meetings: HashMap<u64, Meeting> = srv
        .all::<Meeting>()
        .await?
        .into_iter()
        .filter(|m| m.mentee_id == mentee_id)
        .map(|m| (m.id, m))
        .collect();
    let mentor_names: HashMap<u64, String> = srv
        .all::<Mentor>()
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();

    let mut reports: Vec<MeetingReport> = srv
        .all::<MeetingReport>()
        .await?
        .into_iter()
        .filter(|r| meetings.contains_key(&r.meeting_id))
        .collect();
    reports.sort_by_key(|r| std::cmp::Reverse((r.report_date, r.id)));

    Ok(reports
        .into_iter()
        .filter_map(|r| {
            let meeting = meetings.get(&r.meeting_id)?;
            Some(ReportEntry {
                report_date: r.report_date,
                meeting_date: meeting.date,
                mentor: mentor_names
                    .get(&r.mentor_id)
                    .cloned()
                    .unwrap_or_else(|| "<unknown>".to_string()),
                report_text: r.report_text,
            })
        })
        .collect())
}

pub async fn report_add(
    user: Option<Identity>,
    data: web::Data<State>,
    form: web::Form<ReportForm>,
) -> Result<web::Json<ProcessResult>, AppError> {
    let mut srv = data.server.lock().await;
    let mentor = check_role(&mut srv, &user, Role::Mentor).await?;
    let id = add_report(&mut srv, &mentor, &form, today()).await?;
    Ok(web::Json(ProcessResult::created(id)))
}

pub async fn mentee_reports(
    user: Option<Identity>,
    data: web::Data<State>,
) -> Result<web::Json<Vec<ReportEntry>>, AppError> {
    let mut srv = data.server.lock().await;
    let mentee = check_role(&mut srv, &user, Role::Mentee).await?;
    let lst = reports_for_mentee(&mut srv, mentee.id).await?;
    Ok(web::Json(lst))
}

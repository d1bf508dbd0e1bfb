pub mod assign;
pub mod dashboard;
pub mod login;
pub mod register;
pub mod report;
pub mod schedule;
pub mod user_control;

use actix_web::web;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register::register))
        .route("/login", web::post().to(login::login))
        .route("/logout", web::post().to(login::logout))
        .route("/is_logged_in", web::get().to(login::is_logged_in))
        .route("/mentor/mentees", web::get().to(dashboard::mentor_mentees))
        .route("/meeting/add", web::post().to(schedule::meeting_add))
        .route("/meeting/list", web::get().to(schedule::meeting_list))
        .route("/meeting/past", web::get().to(schedule::meeting_past))
        .route("/meeting/del", web::post().to(schedule::meeting_del))
        .route("/report/add", web::post().to(report::report_add))
        .route("/mentee/mentor", web::get().to(dashboard::mentee_mentor))
        .route("/mentee/meetings", web::get().to(dashboard::mentee_meetings))
        .route("/mentee/reports", web::get().to(report::mentee_reports))
        .route("/mentee/notifications", web::get().to(dashboard::mentee_notifications));
}

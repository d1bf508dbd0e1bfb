mod args;
mod data_model;
mod error;
mod server;
mod state;
mod util;

use crate::args::Args;
use crate::state::data::Data;
use crate::state::state::*;
use crate::state::store::{Store, StoreError};
use crate::state::store_local::StoreLocal;
use crate::state::store_mongo::StoreMongo;
use actix_cors::Cors;
use actix_identity::IdentityMiddleware;
use actix_session::config::{BrowserSession, CookieContentSecurity};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::{error, info};
use std::io;

pub const SESSION_COOKIE: &str = "mentorship-cookie";

fn session_middleware(key: Key, domain: &str) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .session_lifecycle(BrowserSession::default())
        .cookie_same_site(SameSite::None)
        .cookie_path("/".into())
        .cookie_name(String::from(SESSION_COOKIE))
        .cookie_domain(Some(domain.to_string()))
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_http_only(true)
        .cookie_secure(true)
        .build()
}

fn load_key(path: &Option<String>) -> io::Result<Key> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            Key::try_from(bytes.as_slice()).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Cookie key {} is unusable: {:?}", path, e),
                )
            })
        }
        None => {
            info!("No cookie key given, sessions end with the process");
            Ok(Key::generate())
        }
    }
}

async fn open_store(args: &Args) -> Result<Box<dyn Store>, StoreError> {
    if args.db_url.is_empty() {
        let mut st = StoreLocal::new();
        st.connect(&args.data_path).await?;
        info!("Using local store at {}", args.data_path);
        Ok(Box::new(st))
    } else {
        let mut st = StoreMongo::new(&args.db_name);
        st.connect(&args.db_url).await?;
        info!("Using database {}", args.db_name);
        Ok(Box::new(st))
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    env_logger::init();

    let store = open_store(&args).await.map_err(|e| {
        error!("Failed to open store: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;
    let key = load_key(&args.cookie_key)?;

    let data = web::Data::new(State::new(Data::new(store)));
    let app_data = data.clone();
    let fqdn = args.pub_fqdn.clone();

    info!("Starting server on {}:{}", args.bind, args.port);
    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .wrap(Cors::permissive())
            .wrap(IdentityMiddleware::default())
            .wrap(session_middleware(key.clone(), &fqdn))
            .configure(server::routes)
    })
    .bind((args.bind.as_str(), args.port))?
    .run()
    .await?;

    data.server.lock().await.rw.disconnect().await;
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::login_user::LoggedInUser;
    use crate::data_model::meeting::MeetingEntry;
    use crate::data_model::meeting_report::ReportEntry;
    use crate::data_model::mentee::Mentee;
    use crate::data_model::mentor::Mentor;
    use crate::data_model::mentee::StudentList;
    use crate::data_model::mentor::MentorProfile;
    use crate::data_model::notification::{Notification, NOTIF_NEW_MEETING};
    use crate::data_model::process_result::ProcessResult;
    use crate::data_model::role::Role;
    use crate::server::register::tests::form;
    use crate::server::assign::mentor_loads;
    use crate::server::register::Registered;
    use crate::server::report::ReportForm;
    use crate::server::schedule::{today, MeetingForm};
    use crate::state::testing::temp_data;
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use futures_util::future::join_all;
    use serde::Serialize;

    macro_rules! test_app {
        ($data:expr) => {
            test::init_service(
                App::new()
                    .app_data($data.clone())
                    .wrap(IdentityMiddleware::default())
                    .wrap(session_middleware(Key::generate(), "localhost"))
                    .configure(server::routes),
            )
            .await
        };
    }

    #[derive(Serialize)]
    struct LoginForm<'a> {
        user_type: Role,
        username: &'a str,
        password: &'a str,
    }

    fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
        resp.response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.into_owned())
            .expect("login sets the session cookie")
    }

    async fn state() -> (web::Data<State>, crate::state::testing::TempDir) {
        let (srv, dir) = temp_data().await;
        (web::Data::new(State::new(srv)), dir)
    }

    #[actix_web::test]
    async fn mentor_and_mentee_flow() {
        let (data, _dir) = state().await;
        let app = test_app!(data);

        let req = test::TestRequest::post()
            .uri("/register")
            .set_form(form(Role::Mentee, "Alan"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ProcessResult = test::read_body_json(resp).await;
        assert!(!body.succeeded);
        assert!(body.error.starts_with("No mentors available"));

        for name in ["Ada", "Grace"] {
            let req = test::TestRequest::post()
                .uri("/register")
                .set_form(form(Role::Mentor, name))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::post()
            .uri("/register")
            .set_form(form(Role::Mentee, "Alan"))
            .to_request();
        let reg: Registered = test::call_and_read_body_json(&app, req).await;
        assert_eq!(reg.mentor_id, Some(1));
        assert_eq!(reg.mentor_name.as_deref(), Some("Ada"));

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form(LoginForm {
                user_type: Role::Mentor,
                username: "Ada",
                password: "password123",
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let mentor_cookie = session_cookie(&resp);

        let req = test::TestRequest::get()
            .uri("/is_logged_in")
            .cookie(mentor_cookie.clone())
            .to_request();
        let who: LoggedInUser = test::call_and_read_body_json(&app, req).await;
        assert_eq!(who.username, "Ada");
        assert_eq!(who.role, Some(Role::Mentor));

        let req = test::TestRequest::get()
            .uri("/mentor/mentees")
            .cookie(mentor_cookie.clone())
            .to_request();
        let students: StudentList = test::call_and_read_body_json(&app, req).await;
        assert_eq!(students.count, 1);
        assert_eq!(students.mentees[0].name, "Alan");

        let date = (today() + chrono::Duration::days(7)).format("%Y-%m-%d").to_string();
        let req = test::TestRequest::post()
            .uri("/meeting/add")
            .cookie(mentor_cookie.clone())
            .set_form(MeetingForm {
                mentee_id: reg.id,
                date,
                time: "10:30".to_string(),
                agenda: "Thesis outline".to_string(),
            })
            .to_request();
        let created: ProcessResult = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.id, Some(1));

        let req = test::TestRequest::get()
            .uri("/meeting/list")
            .cookie(mentor_cookie.clone())
            .to_request();
        let meetings: Vec<MeetingEntry> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].with, "Alan");

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form(LoginForm {
                user_type: Role::Mentee,
                username: "Alan",
                password: "password123",
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        let mentee_cookie = session_cookie(&resp);

        let req = test::TestRequest::get()
            .uri("/mentee/mentor")
            .cookie(mentee_cookie.clone())
            .to_request();
        let mentor: MentorProfile = test::call_and_read_body_json(&app, req).await;
        assert_eq!(mentor.name, "Ada");

        let req = test::TestRequest::get()
            .uri("/mentee/notifications")
            .cookie(mentee_cookie.clone())
            .to_request();
        let notifs: Vec<Notification> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(notifs.len(), 1);
        assert_eq!(notifs[0].message, NOTIF_NEW_MEETING);

        let req = test::TestRequest::get()
            .uri("/meeting/list")
            .cookie(mentee_cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/meeting/del?id=1")
            .cookie(mentor_cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // a meeting held today can be reported on
        let req = test::TestRequest::post()
            .uri("/meeting/add")
            .cookie(mentor_cookie.clone())
            .set_form(MeetingForm {
                mentee_id: reg.id,
                date: today().format("%Y-%m-%d").to_string(),
                time: "00:00".to_string(),
                agenda: "Progress review".to_string(),
            })
            .to_request();
        let created: ProcessResult = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.id, Some(2));

        let req = test::TestRequest::get()
            .uri("/meeting/past?limit=1")
            .cookie(mentor_cookie.clone())
            .to_request();
        let past: Vec<MeetingEntry> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].id, 2);
        assert_eq!(past[0].with, "Alan");

        let req = test::TestRequest::post()
            .uri("/report/add")
            .cookie(mentee_cookie.clone())
            .set_form(ReportForm {
                meeting_id: 2,
                report_text: "Outline approved".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/report/add")
            .cookie(mentor_cookie.clone())
            .set_form(ReportForm {
                meeting_id: 2,
                report_text: "Outline approved".to_string(),
            })
            .to_request();
        let created: ProcessResult = test::call_and_read_body_json(&app, req).await;
        assert!(created.succeeded);
        assert_eq!(created.id, Some(1));

        let req = test::TestRequest::get()
            .uri("/mentee/meetings")
            .cookie(mentee_cookie.clone())
            .to_request();
        let upcoming: Vec<MeetingEntry> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].with, "Ada");

        let req = test::TestRequest::get()
            .uri("/mentee/reports")
            .cookie(mentee_cookie)
            .to_request();
        let reports: Vec<ReportEntry> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].mentor, "Ada");
        assert_eq!(reports[0].report_text, "Outline approved");
        assert_eq!(reports[0].meeting_date, today());

        let req = test::TestRequest::get()
            .uri("/mentee/reports")
            .cookie(mentor_cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/logout")
            .cookie(mentor_cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cleared = session_cookie(&resp);
        assert_eq!(cleared.value(), "");

        let req = test::TestRequest::get()
            .uri("/is_logged_in")
            .cookie(cleared)
            .to_request();
        let who: LoggedInUser = test::call_and_read_body_json(&app, req).await;
        assert_eq!(who.role, None);
        assert_eq!(who.username, "");
    }

    #[actix_web::test]
    async fn concurrent_registrations_spread_evenly() {
        let (data, _dir) = state().await;
        let app = test_app!(data);

        for name in ["Ada", "Grace", "Edsger"] {
            let req = test::TestRequest::post()
                .uri("/register")
                .set_form(form(Role::Mentor, name))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let names = ["m1", "m2", "m3", "m4", "m5", "m6"];
        let calls = names.iter().map(|name| {
            let req = test::TestRequest::post()
                .uri("/register")
                .set_form(form(Role::Mentee, name))
                .to_request();
            test::call_service(&app, req)
        });
        for resp in join_all(calls).await {
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let mut srv = data.server.lock().await;
        let mentors = srv.all::<Mentor>().await.unwrap();
        let mentees = srv.all::<Mentee>().await.unwrap();
        assert_eq!(mentees.len(), names.len());

        let loads = mentor_loads(&mentors, &mentees);
        assert_eq!(loads, vec![(1, 2), (2, 2), (3, 2)]);
        let max = loads.iter().map(|(_, c)| *c).max().unwrap();
        let min = loads.iter().map(|(_, c)| *c).min().unwrap();
        assert!(max - min <= 1);
    }

    #[actix_web::test]
    async fn rejects_anonymous_and_bad_logins() {
        let (data, _dir) = state().await;
        let app = test_app!(data);

        let req = test::TestRequest::post()
            .uri("/register")
            .set_form(form(Role::Mentor, "Ada"))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form(LoginForm {
                user_type: Role::Mentor,
                username: "Ada",
                password: "password124",
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // right password, wrong role
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form(LoginForm {
                user_type: Role::Mentee,
                username: "Ada",
                password: "password123",
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/meeting/list").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post().uri("/logout").to_request();
        let res: ProcessResult = test::call_and_read_body_json(&app, req).await;
        assert!(res.succeeded);

        let req = test::TestRequest::get().uri("/is_logged_in").to_request();
        let who: LoggedInUser = test::call_and_read_body_json(&app, req).await;
        assert_eq!(who.username, "");
        assert_eq!(who.role, None);
    }
}

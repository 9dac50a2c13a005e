// Drives the whole menu tree with scripted input against an in-memory API.

use quizdrive_cli::api::{ApiRequest, ApiResponse, Method, Transport};
use quizdrive_cli::error::{ApiError, InputError};
use quizdrive_cli::menu::Prompt;
use quizdrive_cli::ui::main_menu;
use serde_json::json;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

struct Script(VecDeque<String>);

impl Script {
    fn new(lines: &[&str]) -> Self {
        Script(lines.iter().map(|s| s.to_string()).collect())
    }
}

impl Prompt for Script {
    fn line(&mut self, _label: &str) -> io::Result<String> {
        self.0
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

#[derive(Default)]
struct Backend {
    replies: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
    sent: RefCell<Vec<ApiRequest>>,
}

impl Backend {
    fn with(replies: Vec<ApiResponse>) -> Self {
        Self::with_outcomes(replies.into_iter().map(Ok).collect())
    }

    fn with_outcomes(outcomes: Vec<Result<ApiResponse, ApiError>>) -> Self {
        Backend {
            replies: RefCell::new(outcomes.into()),
            sent: RefCell::default(),
        }
    }

    fn calls(&self) -> Vec<(Method, String, Option<String>)> {
        self.sent
            .borrow()
            .iter()
            .map(|r| (r.method, r.path.clone(), r.token.clone()))
            .collect()
    }
}

impl Transport for Backend {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.sent.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::from_text(500, "unexpected call")))
    }
}

fn refused() -> Result<ApiResponse, ApiError> {
    Err(ApiError::Transport {
        url: "http://localhost:8080/api".to_string(),
        reason: "connection refused".to_string(),
    })
}

fn login_ok(token: &str) -> ApiResponse {
    ApiResponse::from_json(200, json!({"token": token, "user": {"id": 1}, "role": "STUDENT"}))
}

#[test]
fn student_lists_participations_then_exits() {
    let backend = Backend::with(vec![login_ok("stu"), ApiResponse::from_json(200, json!([]))]);
    // Student, credentials, participations, logout, exit.
    let mut script = Script::new(&["2", "alice", "pw", "1", "6", "5"]);

    main_menu(&backend, &mut script).unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            (Method::Post, "/auth/login".to_string(), None),
            (Method::Get, "/quiz/my-participations".to_string(), Some("stu".to_string())),
        ]
    );
}

#[test]
fn rejected_login_returns_to_root_menu() {
    let backend = Backend::with(vec![ApiResponse::from_json(
        400,
        json!({"error": "Invalid username or password"}),
    )]);
    // Professor with bad credentials, then straight to exit: no role menu.
    let mut script = Script::new(&["1", "mallory", "nope", "5"]);

    main_menu(&backend, &mut script).unwrap();

    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn invalid_menu_input_is_retried() {
    let backend = Backend::default();
    let mut script = Script::new(&["abc", "0", "42", "5"]);
    main_menu(&backend, &mut script).unwrap();
    assert!(backend.calls().is_empty());
}

#[test]
fn non_numeric_duration_aborts_the_session() {
    let backend = Backend::with(vec![login_ok("prof")]);
    let mut script = Script::new(&["1", "prof", "pw", "1", "T", "D", "soon"]);

    let err = main_menu(&backend, &mut script).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::NotAnInteger { field: "Duration", .. })
    ));
    // Only the login went out.
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn professor_actions_carry_the_session_token() {
    let backend = Backend::with(vec![
        login_ok("prof"),
        ApiResponse::from_json(200, json!({"id": 3, "code": "AB12"})),
        ApiResponse::from_json(200, json!({"id": 11})),
        ApiResponse::from_text(200, ""),
    ]);
    let mut script = Script::new(&[
        "1", "prof", "pw", // login
        "1", "T", "D", "15", // add quiz
        "4", "7", "Paris", "y", // add response
        "6", "3", // delete quiz
        "10", // logout
        "5", // exit
    ]);

    main_menu(&backend, &mut script).unwrap();

    let sent = backend.sent.borrow();
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[1].body, Some(json!({"title": "T", "description": "D", "duration": 15})));
    assert_eq!(sent[2].path, "/quiz/questions/7/responses");
    assert_eq!(sent[2].body, Some(json!({"response_text": "Paris", "isCorrect": true})));
    assert_eq!(sent[3].method, Method::Delete);
    assert_eq!(sent[3].path, "/quiz/3");
    assert!(sent[1..].iter().all(|r| r.token.as_deref() == Some("prof")));
}

#[test]
fn student_submits_answers() {
    let backend = Backend::with(vec![
        login_ok("stu"),
        ApiResponse::from_json(200, json!({"score": 50.0})),
    ]);
    let mut script = Script::new(&["2", "alice", "pw", "3", "8", "1, 2,3", "6", "5"]);

    main_menu(&backend, &mut script).unwrap();

    let sent = backend.sent.borrow();
    assert_eq!(sent[1].path, "/quiz/8/submit");
    assert_eq!(
        sent[1].body,
        Some(json!({"selectedResponseIds": [1, 2, 3], "guestId": null}))
    );
}

#[test]
fn test_suite_runs_without_login_prompt() {
    let backend = Backend::with(vec![
        ApiResponse::from_json(200, json!({"message": "ok"})),
        ApiResponse::from_json(400, json!({"error": "Invalid username or password"})),
    ]);
    let mut script = Script::new(&["3", "5"]);

    main_menu(&backend, &mut script).unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1, "/auth/register/professor");
    assert_eq!(calls[1].1, "/auth/login");
}

#[test]
fn connection_failure_in_an_action_keeps_the_menu_running() {
    let backend = Backend::with_outcomes(vec![
        Ok(login_ok("stu")),
        refused(),
        Ok(ApiResponse::from_json(200, json!([]))),
    ]);
    // Participations twice (first attempt cannot connect), logout, exit.
    let mut script = Script::new(&["2", "alice", "pw", "1", "1", "6", "5"]);

    main_menu(&backend, &mut script).unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].1, "/quiz/my-participations");
    assert_eq!(calls[2].2.as_deref(), Some("stu"));
}

#[test]
fn connection_failure_during_login_returns_to_root_menu() {
    let backend = Backend::with_outcomes(vec![refused(), Ok(login_ok("stu"))]);
    // Failed login opens no menu; the retry succeeds, then logout and exit.
    let mut script = Script::new(&["2", "alice", "pw", "2", "alice", "pw", "6", "5"]);

    main_menu(&backend, &mut script).unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(_, path, _)| path == "/auth/login"));
}

#[test]
fn register_account_sends_fields_in_prompt_order() {
    let backend = Backend::with(vec![ApiResponse::from_json(
        200,
        json!({"message": "Student registered successfully", "userId": 9}),
    )]);
    // Register Account, Student, username, email, password, first, last, exit.
    let mut script = Script::new(&[
        "4", "2", "carol", "carol@example.com", "pw123", "Carol", "Jones", "5",
    ]);

    main_menu(&backend, &mut script).unwrap();

    let sent = backend.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].path, "/auth/register/student");
    assert_eq!(sent[0].token, None);
    assert_eq!(
        sent[0].body,
        Some(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "pw123",
            "firstName": "Carol",
            "lastName": "Jones"
        }))
    );
}

#[test]
fn profile_is_fetched_with_the_session_token() {
    let backend = Backend::with(vec![
        login_ok("prof"),
        ApiResponse::from_json(200, json!({"username": "prof"})),
    ]);
    // Professor login, My Profile, logout, exit.
    let mut script = Script::new(&["1", "prof", "pw", "9", "10", "5"]);

    main_menu(&backend, &mut script).unwrap();

    assert_eq!(
        backend.calls()[1],
        (Method::Get, "/auth/me".to_string(), Some("prof".to_string()))
    );
}

#[test]
fn original_choice_numbers_are_kept() {
    let backend = Backend::with(vec![
        login_ok("stu"),
        ApiResponse::from_json(200, json!({"score": 100})),
    ]);
    // "Answer Quiz" stays third in the student menu; "Exit" is fifth at root.
    let mut script = Script::new(&["2", "alice", "pw", "3", "1", "5", "6", "5"]);

    main_menu(&backend, &mut script).unwrap();

    assert_eq!(backend.calls()[1].1, "/quiz/1/submit");
}

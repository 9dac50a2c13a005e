// Professor actions: quiz CRUD plus questions and responses. Each function
// is one request; prompting and printing live in `ui`.

use crate::api::{ApiRequest, Reply, Transport};
use crate::error::{ApiError, InputError};
use crate::menu::parse_int;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Body of quiz create and quiz update.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QuizPayload {
    pub title: String,
    pub description: String,
    pub duration: i64,
}

impl QuizPayload {
    /// Build from typed text, coercing the duration to minutes.
    pub fn from_input(title: &str, description: &str, duration: &str) -> Result<Self, InputError> {
        Ok(QuizPayload {
            title: title.to_string(),
            description: description.to_string(),
            duration: parse_int("Duration", duration)?,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub question_text: String,
}

/// How the answer text key is spelled when adding a response. The
/// interactive menu and the smoke sequence each send their own form to the
/// same endpoint, and both are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseCasing {
    /// `response_text`
    Snake,
    /// `responseText`
    Camel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePayload {
    pub text: String,
    pub is_correct: bool,
}

impl ResponsePayload {
    /// JSON body for the chosen key spelling. `isCorrect` is camelCase in
    /// both forms.
    pub fn to_body(&self, casing: ResponseCasing) -> Value {
        match casing {
            ResponseCasing::Snake => json!({
                "response_text": self.text,
                "isCorrect": self.is_correct,
            }),
            ResponseCasing::Camel => json!({
                "responseText": self.text,
                "isCorrect": self.is_correct,
            }),
        }
    }
}

/// One row of `/quiz/my-quizzes`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct QuizSummary {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub code: Option<String>,
}

pub fn quiz_path(quiz_id: i64) -> String {
    format!("/quiz/{}", quiz_id)
}

fn payload_reply(transport: &dyn Transport, request: ApiRequest) -> Result<Reply<Value>, ApiError> {
    transport.send(&request)?.into_reply(|resp| Ok(resp.payload()))
}

pub fn create_quiz(
    transport: &dyn Transport,
    session: &Session,
    quiz: &QuizPayload,
) -> Result<Reply<Value>, ApiError> {
    let request = ApiRequest::post("/quiz/create")
        .json(quiz)?
        .bearer(&session.token);
    payload_reply(transport, request)
}

pub fn list_quizzes(
    transport: &dyn Transport,
    session: &Session,
) -> Result<Reply<Vec<QuizSummary>>, ApiError> {
    let request = ApiRequest::get("/quiz/my-quizzes").bearer(&session.token);
    transport.send(&request)?.into_reply(|resp| resp.decode())
}

pub fn add_question(
    transport: &dyn Transport,
    session: &Session,
    quiz_id: i64,
    question: &QuestionPayload,
) -> Result<Reply<Value>, ApiError> {
    let request = ApiRequest::post(format!("/quiz/{}/questions", quiz_id))
        .json(question)?
        .bearer(&session.token);
    payload_reply(transport, request)
}

pub fn add_response(
    transport: &dyn Transport,
    session: &Session,
    question_id: i64,
    response: &ResponsePayload,
    casing: ResponseCasing,
) -> Result<Reply<Value>, ApiError> {
    let request = ApiRequest::post(format!("/quiz/questions/{}/responses", question_id))
        .json(&response.to_body(casing))?
        .bearer(&session.token);
    payload_reply(transport, request)
}

pub fn edit_quiz(
    transport: &dyn Transport,
    session: &Session,
    quiz_id: i64,
    quiz: &QuizPayload,
) -> Result<Reply<Value>, ApiError> {
    let request = ApiRequest::put(quiz_path(quiz_id))
        .json(quiz)?
        .bearer(&session.token);
    payload_reply(transport, request)
}

pub fn delete_quiz(
    transport: &dyn Transport,
    session: &Session,
    quiz_id: i64,
) -> Result<Reply<()>, ApiError> {
    let request = ApiRequest::delete(quiz_path(quiz_id)).bearer(&session.token);
    transport.send(&request)?.into_reply(|_| Ok(()))
}

/// Raw body text of `GET /quiz/{id}`.
pub fn quiz_details(
    transport: &dyn Transport,
    session: &Session,
    quiz_id: i64,
) -> Result<Reply<String>, ApiError> {
    let request = ApiRequest::get(quiz_path(quiz_id)).bearer(&session.token);
    transport.send(&request)?.into_reply(|resp| Ok(resp.text.clone()))
}

/// Everyone who took the quiz, as reported by the server.
pub fn quiz_participations(
    transport: &dyn Transport,
    session: &Session,
    quiz_id: i64,
) -> Result<Reply<Value>, ApiError> {
    let request =
        ApiRequest::get(format!("{}/participations", quiz_path(quiz_id))).bearer(&session.token);
    payload_reply(transport, request)
}

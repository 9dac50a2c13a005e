// Student actions: participations, joining by code and submitting answers.

use crate::api::{ApiRequest, Reply, Transport};
use crate::error::{ApiError, InputError};
use crate::menu::parse_int;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_PARTICIPATIONS: &str = "You haven't participated in any quizzes yet.";

/// Quiz summary nested inside a participation.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct QuizRef {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub code: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Participation {
    pub id: Option<i64>,
    /// Percentage; the server sends a decimal.
    pub score: Option<Value>,
    #[serde(alias = "createdAt")]
    pub created_at: Option<String>,
    pub quiz: Option<QuizRef>,
}

impl Participation {
    /// Multi-line description used by the participations listing.
    pub fn describe(&self) -> String {
        let quiz = self.quiz.clone().unwrap_or_default();
        format!(
            "Quiz: {}\n  ID: {}\n  Score: {}%\n  Taken on: {}",
            quiz.title.as_deref().unwrap_or("N/A"),
            quiz.id.map_or_else(|| "N/A".to_string(), |id| id.to_string()),
            self.score.as_ref().map_or_else(|| "N/A".to_string(), display_value),
            self.created_at.as_deref().unwrap_or("N/A"),
        )
    }
}

/// What the participations screen shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticipationView {
    Empty,
    Entries(Vec<String>),
}

pub fn participation_view(participations: &[Participation]) -> ParticipationView {
    if participations.is_empty() {
        ParticipationView::Empty
    } else {
        ParticipationView::Entries(participations.iter().map(Participation::describe).collect())
    }
}

/// Result of joining a quiz by code.
#[derive(Debug, Clone, PartialEq)]
pub enum Joined {
    /// The participation carried its quiz.
    Quiz { title: Option<String>, id: Option<i64> },
    /// Anything else, shown as-is.
    Raw(Value),
}

impl Joined {
    fn from_payload(payload: Value) -> Self {
        let quiz = payload
            .get("quiz")
            .and_then(Value::as_object)
            .filter(|q| !q.is_empty());
        match quiz {
            Some(q) => Joined::Quiz {
                title: q.get("title").and_then(Value::as_str).map(str::to_string),
                id: q.get("id").and_then(Value::as_i64),
            },
            None => Joined::Raw(payload),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub selected_response_ids: Vec<i64>,
    /// Only guests send one; an authenticated student always sends null.
    pub guest_id: Option<i64>,
}

/// Split `"1, 2,3"` into response ids. Any token that is not an integer,
/// including an empty one, fails the whole list.
pub fn parse_response_ids(raw: &str) -> Result<Vec<i64>, InputError> {
    raw.split(',')
        .map(|token| parse_int("Response IDs", token))
        .collect()
}

/// Render a JSON scalar without quotes around strings.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

pub fn my_participations(
    transport: &dyn Transport,
    session: &Session,
) -> Result<Reply<Vec<Participation>>, ApiError> {
    let request = ApiRequest::get("/quiz/my-participations").bearer(&session.token);
    transport.send(&request)?.into_reply(|resp| resp.decode())
}

pub fn join_quiz(
    transport: &dyn Transport,
    session: &Session,
    code: &str,
) -> Result<Reply<Joined>, ApiError> {
    let request = ApiRequest::post(format!("/quiz/join/{}", code)).bearer(&session.token);
    transport
        .send(&request)?
        .into_reply(|resp| Ok(Joined::from_payload(resp.payload())))
}

/// Look a quiz up by its public code without joining it.
pub fn preview_quiz(
    transport: &dyn Transport,
    session: &Session,
    code: &str,
) -> Result<Reply<Value>, ApiError> {
    let request = ApiRequest::get(format!("/quiz/join/{}", code)).bearer(&session.token);
    transport.send(&request)?.into_reply(|resp| Ok(resp.payload()))
}

/// Submit answers; the reply carries the score if the server sent one.
pub fn submit_answers(
    transport: &dyn Transport,
    session: &Session,
    quiz_id: i64,
    response_ids: Vec<i64>,
) -> Result<Reply<Option<Value>>, ApiError> {
    let submission = SubmissionPayload {
        selected_response_ids: response_ids,
        guest_id: None,
    };
    let request = ApiRequest::post(format!("/quiz/{}/submit", quiz_id))
        .json(&submission)?
        .bearer(&session.token);
    transport
        .send(&request)?
        .into_reply(|resp| Ok(resp.json.as_ref().and_then(|j| j.get("score")).cloned()))
}

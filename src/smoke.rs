// Professor smoke test.
//
// Ten fixed calls covering a quiz's whole lifecycle, from registering a
// professor to fetching the quiz after it was deleted. Each step's raw
// response is reported as soon as it arrives. Nothing is asserted: the
// operator reads the output. Only a failed login stops the run, since every
// later step needs the token.

use crate::api::{ApiRequest, ApiResponse, Transport};
use crate::error::ApiError;
use crate::professor::{QuestionPayload, QuizPayload, ResponseCasing, ResponsePayload};
use crate::session::{Account, Credentials};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmokeStep {
    Register,
    Login,
    CreateQuiz,
    ListQuizzes,
    UpdateQuiz,
    AddQuestion,
    AddResponse,
    QuizParticipations,
    DeleteQuiz,
    FetchDeleted,
}

impl SmokeStep {
    pub const ALL: [SmokeStep; 10] = [
        SmokeStep::Register,
        SmokeStep::Login,
        SmokeStep::CreateQuiz,
        SmokeStep::ListQuizzes,
        SmokeStep::UpdateQuiz,
        SmokeStep::AddQuestion,
        SmokeStep::AddResponse,
        SmokeStep::QuizParticipations,
        SmokeStep::DeleteQuiz,
        SmokeStep::FetchDeleted,
    ];

    /// Printed before the request goes out.
    pub fn announcement(self) -> &'static str {
        match self {
            SmokeStep::Register => "Registering Professor...",
            SmokeStep::Login => "Logging in as Professor...",
            SmokeStep::CreateQuiz => "Creating Quiz...",
            SmokeStep::ListQuizzes => "Listing My Quizzes...",
            SmokeStep::UpdateQuiz => "Updating Quiz...",
            SmokeStep::AddQuestion => "Adding Question...",
            SmokeStep::AddResponse => "Adding Response to Question...",
            SmokeStep::QuizParticipations => "Viewing Quiz Participations...",
            SmokeStep::DeleteQuiz => "Deleting Quiz...",
            SmokeStep::FetchDeleted => "Getting Quiz Details...",
        }
    }

    /// Prefix for the printed response.
    pub fn label(self) -> &'static str {
        match self {
            SmokeStep::Register => "Register Response",
            SmokeStep::Login => "Login Token",
            SmokeStep::CreateQuiz => "Create Quiz Response",
            SmokeStep::ListQuizzes => "My Quizzes",
            SmokeStep::UpdateQuiz => "Update Quiz Response",
            SmokeStep::AddQuestion => "Add Question Response",
            SmokeStep::AddResponse => "Add Response Response",
            SmokeStep::QuizParticipations => "Quiz Participations",
            SmokeStep::DeleteQuiz => "Delete Quiz Response",
            SmokeStep::FetchDeleted => "Quiz Details",
        }
    }
}

/// Fixtures the run sends.
pub struct Fixtures {
    pub account: Account,
    pub quiz: QuizPayload,
    pub update: QuizPayload,
    pub question: QuestionPayload,
    pub response: ResponsePayload,
}

impl Default for Fixtures {
    fn default() -> Self {
        Fixtures {
            account: Account {
                username: "prof_test".into(),
                email: "prof_test@test.com".into(),
                password: "testpass123".into(),
                first_name: "Test".into(),
                last_name: "Prof".into(),
            },
            quiz: QuizPayload {
                title: "API Test Quiz".into(),
                description: "Quiz for API testing".into(),
                duration: 15,
            },
            update: QuizPayload {
                title: "API Test Quiz Updated".into(),
                description: "Updated quiz description".into(),
                duration: 20,
            },
            question: QuestionPayload {
                question_text: "What is 2+2?".into(),
            },
            response: ResponsePayload {
                text: "4".into(),
                is_correct: true,
            },
        }
    }
}

/// Progress notifications emitted while the run is going.
#[derive(Debug)]
pub enum SmokeEvent<'a> {
    Started(SmokeStep),
    Finished(&'a StepRecord),
    /// Login did not produce a token; nothing else will run.
    Halted(&'a StepRecord),
}

#[derive(Debug)]
pub struct StepRecord {
    pub step: SmokeStep,
    pub outcome: Result<ApiResponse, ApiError>,
}

impl StepRecord {
    /// Text to print: the body for a response, the error otherwise.
    pub fn display_text(&self) -> String {
        match &self.outcome {
            Ok(resp) => resp.text.clone(),
            Err(e) => e.to_string(),
        }
    }

    /// Token from a successful login response.
    pub fn token(&self) -> Option<String> {
        match &self.outcome {
            Ok(resp) if resp.is_success() => resp
                .json
                .as_ref()
                .and_then(|json| json.get("token"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
    }

    /// Line printed once the step finished. The login step shows just the
    /// token, every other step its raw body.
    pub fn summary(&self) -> String {
        let text = match self.step {
            SmokeStep::Login => self.token().unwrap_or_else(|| self.display_text()),
            _ => self.display_text(),
        };
        format!("{}: {}", self.step.label(), text)
    }
}

#[derive(Debug)]
pub struct SmokeRun {
    pub records: Vec<StepRecord>,
    pub halted: bool,
}

/// Path segment for an id taken from a response. Missing ids become
/// `null` and the server answers with its own error.
fn id_segment(outcome: &Result<ApiResponse, ApiError>) -> String {
    outcome
        .as_ref()
        .ok()
        .and_then(|resp| resp.json.as_ref())
        .and_then(|json| json.get("id"))
        .map_or_else(|| "null".to_string(), |id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

struct Runner<'a> {
    transport: &'a dyn Transport,
    observer: &'a mut dyn FnMut(SmokeEvent<'_>),
    records: Vec<StepRecord>,
}

impl Runner<'_> {
    fn step(
        &mut self,
        step: SmokeStep,
        request: Result<ApiRequest, ApiError>,
    ) -> &StepRecord {
        (self.observer)(SmokeEvent::Started(step));
        let outcome = request.and_then(|req| self.transport.send(&req));
        if let Err(e) = &outcome {
            warn!(?step, error = %e, "smoke step failed to complete");
        }
        self.records.push(StepRecord { step, outcome });
        let record = &self.records[self.records.len() - 1];
        if step != SmokeStep::Login {
            (self.observer)(SmokeEvent::Finished(record));
        }
        record
    }
}

/// Run the full sequence with the default fixtures.
pub fn run(transport: &dyn Transport, observer: &mut dyn FnMut(SmokeEvent<'_>)) -> SmokeRun {
    run_with(transport, &Fixtures::default(), observer)
}

pub fn run_with(
    transport: &dyn Transport,
    fixtures: &Fixtures,
    observer: &mut dyn FnMut(SmokeEvent<'_>),
) -> SmokeRun {
    info!("starting professor smoke sequence");
    let mut runner = Runner {
        transport,
        observer,
        records: Vec::with_capacity(SmokeStep::ALL.len()),
    };

    runner.step(
        SmokeStep::Register,
        ApiRequest::post("/auth/register/professor").json(&fixtures.account),
    );

    let credentials = Credentials {
        username: fixtures.account.username.clone(),
        password: fixtures.account.password.clone(),
    };
    let login = runner.step(
        SmokeStep::Login,
        ApiRequest::post("/auth/login").json(&credentials),
    );
    let token = match login.token() {
        Some(token) => {
            let record = &runner.records[runner.records.len() - 1];
            (runner.observer)(SmokeEvent::Finished(record));
            token
        }
        None => {
            warn!("smoke sequence halted at login");
            let record = &runner.records[runner.records.len() - 1];
            (runner.observer)(SmokeEvent::Halted(record));
            return SmokeRun {
                records: runner.records,
                halted: true,
            };
        }
    };

    let created = runner.step(
        SmokeStep::CreateQuiz,
        ApiRequest::post("/quiz/create")
            .json(&fixtures.quiz)
            .map(|r| r.bearer(&token)),
    );
    let quiz_id = id_segment(&created.outcome);

    runner.step(
        SmokeStep::ListQuizzes,
        Ok(ApiRequest::get("/quiz/my-quizzes").bearer(&token)),
    );
    runner.step(
        SmokeStep::UpdateQuiz,
        ApiRequest::put(format!("/quiz/{}", quiz_id))
            .json(&fixtures.update)
            .map(|r| r.bearer(&token)),
    );
    let question = runner.step(
        SmokeStep::AddQuestion,
        ApiRequest::post(format!("/quiz/{}/questions", quiz_id))
            .json(&fixtures.question)
            .map(|r| r.bearer(&token)),
    );
    let question_id = id_segment(&question.outcome);

    runner.step(
        SmokeStep::AddResponse,
        ApiRequest::post(format!("/quiz/questions/{}/responses", question_id))
            .json(&fixtures.response.to_body(ResponseCasing::Camel))
            .map(|r| r.bearer(&token)),
    );
    runner.step(
        SmokeStep::QuizParticipations,
        Ok(ApiRequest::get(format!("/quiz/{}/participations", quiz_id)).bearer(&token)),
    );
    runner.step(
        SmokeStep::DeleteQuiz,
        Ok(ApiRequest::delete(format!("/quiz/{}", quiz_id)).bearer(&token)),
    );
    runner.step(
        SmokeStep::FetchDeleted,
        Ok(ApiRequest::get(format!("/quiz/{}", quiz_id)).bearer(&token)),
    );

    info!(steps = runner.records.len(), "smoke sequence finished");
    SmokeRun {
        records: runner.records,
        halted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::api::Method;
    use serde_json::json;

    fn happy_transport() -> FakeTransport {
        FakeTransport::new()
            .reply(ApiResponse::from_json(
                200,
                json!({"message": "Professor registered successfully"}),
            ))
            .reply(ApiResponse::from_json(200, json!({"token": "tok", "role": "PROFESSOR_FREE"})))
            .reply(ApiResponse::from_json(200, json!({"id": 42, "code": "QZ42"})))
            .reply(ApiResponse::from_json(200, json!([{"id": 42}])))
            .reply(ApiResponse::from_json(200, json!({"id": 42})))
            .reply(ApiResponse::from_json(200, json!({"id": 7})))
            .reply(ApiResponse::from_json(200, json!({"id": 70})))
            .reply(ApiResponse::from_json(200, json!([])))
            .reply(ApiResponse::from_text(200, ""))
            .reply(ApiResponse::from_json(400, json!({"error": "Quiz not found"})))
    }

    #[test]
    fn runs_all_ten_steps_in_order() {
        let fake = happy_transport();
        let mut finished = Vec::new();
        let result = run(&fake, &mut |event| {
            if let SmokeEvent::Finished(record) = event {
                finished.push(record.step);
            }
        });

        assert!(!result.halted);
        assert_eq!(finished, SmokeStep::ALL.to_vec());
        let steps: Vec<_> = result.records.iter().map(|r| r.step).collect();
        assert_eq!(steps, SmokeStep::ALL.to_vec());

        let sent = fake.requests();
        let paths: Vec<_> = sent.iter().map(|r| (r.method, r.path.as_str())).collect();
        assert_eq!(
            paths,
            vec![
                (Method::Post, "/auth/register/professor"),
                (Method::Post, "/auth/login"),
                (Method::Post, "/quiz/create"),
                (Method::Get, "/quiz/my-quizzes"),
                (Method::Put, "/quiz/42"),
                (Method::Post, "/quiz/42/questions"),
                (Method::Post, "/quiz/questions/7/responses"),
                (Method::Get, "/quiz/42/participations"),
                (Method::Delete, "/quiz/42"),
                (Method::Get, "/quiz/42"),
            ]
        );
        assert!(sent[..2].iter().all(|r| r.token.is_none()));
        assert_eq!(result.records[1].summary(), "Login Token: tok");
        assert!(result.records[2].summary().starts_with("Create Quiz Response: {"));
        assert!(sent[2..].iter().all(|r| r.token.as_deref() == Some("tok")));
    }

    #[test]
    fn scripted_response_uses_camel_case() {
        let fake = happy_transport();
        run(&fake, &mut |_| {});
        assert_eq!(
            fake.requests()[6].body,
            Some(json!({"responseText": "4", "isCorrect": true}))
        );
        assert_eq!(
            fake.requests()[0].body,
            Some(json!({
                "username": "prof_test",
                "email": "prof_test@test.com",
                "password": "testpass123",
                "firstName": "Test",
                "lastName": "Prof"
            }))
        );
    }

    #[test]
    fn failed_login_halts_after_two_steps() {
        let fake = FakeTransport::new()
            .reply(ApiResponse::from_json(400, json!({"error": "Username already exists"})))
            .reply(ApiResponse::from_json(400, json!({"error": "Invalid username or password"})));
        let mut halted_on = None;
        let result = run(&fake, &mut |event| {
            if let SmokeEvent::Halted(record) = event {
                halted_on = Some((record.step, record.display_text()));
            }
        });

        assert!(result.halted);
        assert_eq!(result.records.len(), 2);
        assert_eq!(fake.requests().len(), 2);
        let (step, text) = halted_on.unwrap();
        assert_eq!(step, SmokeStep::Login);
        assert!(text.contains("Invalid username or password"));
    }

    #[test]
    fn later_failures_do_not_stop_the_run() {
        let fake = FakeTransport::new()
            .reply(ApiResponse::from_json(200, json!({})))
            .reply(ApiResponse::from_json(200, json!({"token": "tok"})))
            .reply(ApiResponse::from_json(403, json!({"error": "Forbidden"})))
            .fail("connection reset");
        let result = run(&fake, &mut |_| {});

        assert!(!result.halted);
        assert_eq!(result.records.len(), 10);
        // No quiz id came back, so later paths carry a placeholder.
        assert_eq!(fake.requests()[4].path, "/quiz/null");
        assert!(result.records[3].outcome.is_err());
        assert!(result.records[3].display_text().contains("connection reset"));
    }

    #[test]
    fn unreachable_server_halts_at_login() {
        let fake = FakeTransport::new().fail("refused").fail("refused");
        let result = run(&fake, &mut |_| {});
        assert!(result.halted);
        assert_eq!(result.records.len(), 2);
    }
}

// UI layer: the root menu, the two role menus and the smoke test runner.
// Handlers collect fields through a `Prompt`, call one action and print its
// reply. Failures reported by the server or the network are printed and the
// menu continues; a field that cannot be parsed aborts with an error.

use crate::api::{ApiRequest, ApiResponse, Reply, Transport};
use crate::error::ApiError;
use crate::menu::{choose, parse_int, Prompt};
use crate::professor::{self, QuestionPayload, QuizPayload, ResponseCasing, ResponsePayload};
use crate::render;
use crate::session::{self, Account, Credentials, LoginOutcome, Role, Session};
use crate::smoke::{self, SmokeEvent};
use crate::student::{self, Joined, ParticipationView, NO_PARTICIPATIONS};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Wraps a transport and shows a spinner while each request is in flight.
pub struct Spinning<T> {
    inner: T,
}

impl<T: Transport> Spinning<T> {
    pub fn new(inner: T) -> Self {
        Spinning { inner }
    }
}

impl<T: Transport> Transport for Spinning<T> {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("{} {}", request.method.as_str(), request.path));
        spinner.enable_steady_tick(Duration::from_millis(80));
        let result = self.inner.send(request);
        spinner.finish_and_clear();
        result
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RootItem {
    Professor,
    Student,
    TestSuite,
    Register,
    Exit,
}

impl RootItem {
    const ALL: [RootItem; 5] = [
        RootItem::Professor,
        RootItem::Student,
        RootItem::TestSuite,
        RootItem::Register,
        RootItem::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            RootItem::Professor => "Professor",
            RootItem::Student => "Student",
            RootItem::Register => "Register Account",
            RootItem::TestSuite => "Professor Test Suite",
            RootItem::Exit => "Exit",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProfessorItem {
    AddQuiz,
    ListQuizzes,
    AddQuestion,
    AddResponse,
    EditQuiz,
    DeleteQuiz,
    QuizDetails,
    QuizParticipations,
    Profile,
    Logout,
}

impl ProfessorItem {
    const ALL: [ProfessorItem; 10] = [
        ProfessorItem::AddQuiz,
        ProfessorItem::ListQuizzes,
        ProfessorItem::AddQuestion,
        ProfessorItem::AddResponse,
        ProfessorItem::EditQuiz,
        ProfessorItem::DeleteQuiz,
        ProfessorItem::QuizDetails,
        ProfessorItem::QuizParticipations,
        ProfessorItem::Profile,
        ProfessorItem::Logout,
    ];

    fn label(self) -> &'static str {
        match self {
            ProfessorItem::AddQuiz => "Add Quiz",
            ProfessorItem::ListQuizzes => "List My Quizzes",
            ProfessorItem::AddQuestion => "Add Question to Quiz",
            ProfessorItem::AddResponse => "Add Response to Question",
            ProfessorItem::EditQuiz => "Edit Quiz",
            ProfessorItem::DeleteQuiz => "Delete Quiz",
            ProfessorItem::QuizDetails => "Get Quiz Details",
            ProfessorItem::QuizParticipations => "View Quiz Participations",
            ProfessorItem::Profile => "My Profile",
            ProfessorItem::Logout => "Logout",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StudentItem {
    Participations,
    Join,
    Answer,
    Preview,
    Profile,
    Logout,
}

impl StudentItem {
    const ALL: [StudentItem; 6] = [
        StudentItem::Participations,
        StudentItem::Join,
        StudentItem::Answer,
        StudentItem::Preview,
        StudentItem::Profile,
        StudentItem::Logout,
    ];

    fn label(self) -> &'static str {
        match self {
            StudentItem::Participations => "My Quiz Participations",
            StudentItem::Join => "Participate in Quiz by Code",
            StudentItem::Preview => "Preview Quiz by Code",
            StudentItem::Answer => "Answer Quiz",
            StudentItem::Profile => "My Profile",
            StudentItem::Logout => "Logout",
        }
    }
}

/// Show a menu built from `items` and return the picked item.
fn pick<T: Copy>(
    prompt: &mut dyn Prompt,
    title: &str,
    items: &[T],
    label: fn(T) -> &'static str,
) -> std::io::Result<T> {
    let labels: Vec<&str> = items.iter().map(|item| label(*item)).collect();
    let n = choose(prompt, title, &labels)?;
    Ok(items[n - 1])
}

/// Print an action's outcome: `on_success` for a 2xx reply, the server's
/// text or the transport error otherwise.
fn report<T>(result: Result<Reply<T>, ApiError>, failure: &str, on_success: impl FnOnce(T)) {
    match result {
        Ok(Reply::Success(value)) => on_success(value),
        Ok(Reply::Failure(resp)) => render::error(&format!("{}: {}", failure, resp.text)),
        Err(e) => render::error(&format!("{}: {}", failure, e)),
    }
}

/// Root menu. Runs until the operator picks "Exit".
pub fn main_menu(transport: &dyn Transport, prompt: &mut dyn Prompt) -> Result<()> {
    render::banner("\n=== Quiz Platform Interactive Test ===\n");
    loop {
        match pick(prompt, "Select role:", &RootItem::ALL, RootItem::label)? {
            RootItem::Professor => {
                if let Some(session) = handle_login(transport, prompt, Role::Professor)? {
                    professor_menu(transport, prompt, &session)?;
                }
            }
            RootItem::Student => {
                if let Some(session) = handle_login(transport, prompt, Role::Student)? {
                    student_menu(transport, prompt, &session)?;
                }
            }
            RootItem::Register => handle_register(transport, prompt)?,
            RootItem::TestSuite => handle_test_suite(transport),
            RootItem::Exit => {
                render::info("Exiting...");
                return Ok(());
            }
        }
    }
}

/// Collect credentials and log in. `None` means no menu should open.
fn handle_login(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    role: Role,
) -> Result<Option<Session>> {
    render::info(&format!("--- {} Login ---", role));
    let username = prompt.line("Username")?;
    let password = prompt.secret("Password")?;
    let credentials = Credentials { username, password };

    match session::login(transport, role, &credentials) {
        Ok(LoginOutcome::Authenticated(session)) => {
            render::success(&format!("Login successful! Token: {}", session.token));
            Ok(Some(session))
        }
        Ok(LoginOutcome::Denied { text, .. }) => {
            render::error(&format!("Login failed: {}", text));
            Ok(None)
        }
        Err(e) => {
            render::error(&format!("Login failed: {}", e));
            Ok(None)
        }
    }
}

fn handle_register(transport: &dyn Transport, prompt: &mut dyn Prompt) -> Result<()> {
    let role = pick(
        prompt,
        "Register as:",
        &[Role::Professor, Role::Student],
        |role| match role {
            Role::Professor => "Professor",
            Role::Student => "Student",
        },
    )?;
    render::info(&format!("--- Register {} ---", role));
    let account = Account {
        username: prompt.line("Username")?,
        email: prompt.line("Email")?,
        password: prompt.secret("Password")?,
        first_name: prompt.line("First Name")?,
        last_name: prompt.line("Last Name")?,
    };
    report(
        session::register(transport, role, &account),
        "Registration failed",
        |body| render::success(&format!("Registered: {}", body)),
    );
    Ok(())
}

fn handle_profile(transport: &dyn Transport, session: &Session) {
    render::info("--- My Profile ---");
    report(
        session::current_user(transport, session),
        "Failed to load profile",
        |user| render::success(&format!("{}", user)),
    );
}

fn handle_test_suite(transport: &dyn Transport) {
    render::info("--- Professor Test Suite ---");
    smoke::run(transport, &mut |event| match event {
        SmokeEvent::Started(step) => render::info(step.announcement()),
        SmokeEvent::Finished(record) => {
            let line = record.summary();
            match &record.outcome {
                Ok(resp) if resp.is_success() => render::success(&line),
                _ => render::error(&line),
            }
        }
        SmokeEvent::Halted(record) => {
            render::error(&format!("Login failed: {}", record.display_text()))
        }
    });
}

fn professor_menu(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    loop {
        match pick(prompt, "Professor Actions:", &ProfessorItem::ALL, ProfessorItem::label)? {
            ProfessorItem::AddQuiz => add_quiz(transport, prompt, session)?,
            ProfessorItem::ListQuizzes => list_quizzes(transport, session),
            ProfessorItem::AddQuestion => add_question(transport, prompt, session)?,
            ProfessorItem::AddResponse => add_response(transport, prompt, session)?,
            ProfessorItem::EditQuiz => edit_quiz(transport, prompt, session)?,
            ProfessorItem::DeleteQuiz => delete_quiz(transport, prompt, session)?,
            ProfessorItem::QuizDetails => quiz_details(transport, prompt, session)?,
            ProfessorItem::QuizParticipations => {
                quiz_participations(transport, prompt, session)?
            }
            ProfessorItem::Profile => handle_profile(transport, session),
            ProfessorItem::Logout => {
                render::info("Logging out...");
                return Ok(());
            }
        }
    }
}

fn add_quiz(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Add Quiz ---");
    let title = prompt.line("Quiz Title")?;
    let description = prompt.line("Description")?;
    let duration = prompt.line("Duration (minutes)")?;
    let quiz = QuizPayload::from_input(&title, &description, &duration)?;
    report(
        professor::create_quiz(transport, session, &quiz),
        "Failed to create quiz",
        |body| render::success(&format!("Quiz created: {}", body)),
    );
    Ok(())
}

fn list_quizzes(transport: &dyn Transport, session: &Session) {
    render::info("--- List Quizzes ---");
    report(
        professor::list_quizzes(transport, session),
        "Failed to list quizzes",
        |quizzes| {
            for q in quizzes {
                render::success(&format!(
                    "ID: {}, Title: {}, Code: {}",
                    q.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    q.title.as_deref().unwrap_or("-"),
                    q.code.as_deref().unwrap_or("-"),
                ));
            }
        },
    );
}

fn add_question(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Add Question ---");
    let quiz_id = parse_int("Quiz ID", &prompt.line("Quiz ID")?)?;
    let question = QuestionPayload {
        question_text: prompt.line("Question Text")?,
    };
    report(
        professor::add_question(transport, session, quiz_id, &question),
        "Failed to add question",
        |body| render::success(&format!("Question added: {}", body)),
    );
    Ok(())
}

fn add_response(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Add Response ---");
    let question_id = parse_int("Question ID", &prompt.line("Question ID")?)?;
    let text = prompt.line("Response Text")?;
    let is_correct = prompt.line("Is Correct? (y/n)")?.trim().eq_ignore_ascii_case("y");
    let response = ResponsePayload { text, is_correct };
    report(
        professor::add_response(transport, session, question_id, &response, ResponseCasing::Snake),
        "Failed to add response",
        |body| render::success(&format!("Response added: {}", body)),
    );
    Ok(())
}

fn edit_quiz(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Edit Quiz ---");
    let quiz_id = parse_int("Quiz ID", &prompt.line("Quiz ID")?)?;
    let title = prompt.line("New Title")?;
    let description = prompt.line("New Description")?;
    let duration = prompt.line("New Duration (minutes)")?;
    let quiz = QuizPayload::from_input(&title, &description, &duration)?;
    report(
        professor::edit_quiz(transport, session, quiz_id, &quiz),
        "Failed to update quiz",
        |body| render::success(&format!("Quiz updated: {}", body)),
    );
    Ok(())
}

fn delete_quiz(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Delete Quiz ---");
    let quiz_id = parse_int("Quiz ID", &prompt.line("Quiz ID")?)?;
    report(
        professor::delete_quiz(transport, session, quiz_id),
        "Failed to delete quiz",
        |()| render::success("Quiz deleted successfully."),
    );
    Ok(())
}

fn quiz_details(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Get Quiz Details ---");
    let quiz_id = parse_int("Quiz ID", &prompt.line("Enter Quiz ID")?)?;
    report(
        professor::quiz_details(transport, session, quiz_id),
        "Failed to get quiz details",
        |text| render::success(&format!("Quiz Details: {}", text)),
    );
    Ok(())
}

fn quiz_participations(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Quiz Participations ---");
    let quiz_id = parse_int("Quiz ID", &prompt.line("Quiz ID")?)?;
    report(
        professor::quiz_participations(transport, session, quiz_id),
        "Failed to list quiz participations",
        |body| render::success(&format!("Quiz Participations: {}", body)),
    );
    Ok(())
}

fn student_menu(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    loop {
        match pick(prompt, "Student Actions:", &StudentItem::ALL, StudentItem::label)? {
            StudentItem::Participations => list_participations(transport, session),
            StudentItem::Join => join_quiz(transport, prompt, session)?,
            StudentItem::Preview => preview_quiz(transport, prompt, session)?,
            StudentItem::Answer => answer_quiz(transport, prompt, session)?,
            StudentItem::Profile => handle_profile(transport, session),
            StudentItem::Logout => {
                render::info("Logging out...");
                return Ok(());
            }
        }
    }
}

fn list_participations(transport: &dyn Transport, session: &Session) {
    render::info("--- My Quiz Participations ---");
    report(
        student::my_participations(transport, session),
        "Failed to list participations",
        |participations| match student::participation_view(&participations) {
            ParticipationView::Empty => render::info(NO_PARTICIPATIONS),
            ParticipationView::Entries(lines) => {
                for line in lines {
                    render::success(&line);
                }
            }
        },
    );
}

fn join_quiz(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Participate in Quiz ---");
    let code = prompt.line("Quiz Code")?;
    report(
        student::join_quiz(transport, session, code.trim()),
        "Failed to participate",
        |joined| {
            match joined {
                Joined::Quiz { title, id } => render::success(&format!(
                    "Participation created for quiz: Title: {}, ID: {}",
                    title.as_deref().unwrap_or("-"),
                    id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                )),
                Joined::Raw(body) => render::success(&format!("Participation created: {}", body)),
            }
            render::info("You can now submit answers using the quiz ID.");
        },
    );
    Ok(())
}

fn preview_quiz(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Preview Quiz ---");
    let code = prompt.line("Quiz Code")?;
    report(
        student::preview_quiz(transport, session, code.trim()),
        "Failed to find quiz",
        |quiz| render::success(&format!("Quiz: {}", quiz)),
    );
    Ok(())
}

fn answer_quiz(
    transport: &dyn Transport,
    prompt: &mut dyn Prompt,
    session: &Session,
) -> Result<()> {
    render::info("--- Answer Quiz ---");
    let quiz_id = parse_int("Quiz ID", &prompt.line("Quiz ID")?)?;
    render::info("Enter response IDs (comma-separated) for your answers:");
    let response_ids = student::parse_response_ids(&prompt.line("Response IDs")?)?;
    report(
        student::submit_answers(transport, session, quiz_id, response_ids),
        "Failed to submit quiz",
        |score| {
            let score = score.as_ref().map_or_else(|| "N/A".to_string(), student::display_value);
            render::success(&format!("Quiz submitted successfully! Score: {}", score));
        },
    );
    Ok(())
}

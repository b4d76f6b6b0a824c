use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cortex_core::models::artifact::ArtifactType;
use cortex_core::models::chat::{ChatRole, STATUS_FIXING, STATUS_WORKING, TurnRole};
use cortex_core::models::runtime_error::RuntimeError;
use cortex_preview::{PreviewAssets, PreviewMessage, PreviewRenderer, PreviewState};
use cortex_relay::chat::BoxFuture;
use cortex_relay::{Completion, PromptRequest, RelayError};
use cortex_session::{PreviewSession, SessionError};
use uuid::Uuid;

/// Answers from a script and records every request it sees.
#[derive(Default)]
struct Scripted {
    answers: Mutex<VecDeque<Result<String, RelayError>>>,
    seen: Mutex<Vec<PromptRequest>>,
}

impl Scripted {
    fn new(answers: Vec<Result<String, RelayError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            seen: Mutex::default(),
        }
    }

    fn seen(&self) -> Vec<PromptRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Completion for Scripted {
    fn complete<'a>(
        &'a self,
        request: &'a PromptRequest,
    ) -> BoxFuture<'a, Result<String, RelayError>> {
        self.seen.lock().unwrap().push(request.clone());
        let answer = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RelayError::EmptyResponse));
        Box::pin(async move { answer })
    }
}

const WIDGET: &str = r#"```json
{"type":"react","code":"function Widget() { return <h1>Hi</h1>; }","title":"Widget","description":"Says hi"}
```"#;

fn session() -> PreviewSession {
    let renderer = Arc::new(PreviewRenderer::new(PreviewAssets::default()).unwrap());
    PreviewSession::new(Uuid::new_v4(), renderer)
}

#[tokio::test]
async fn successful_turn_updates_transcript_history_and_preview() {
    let backend = Scripted::new(vec![Ok(WIDGET.to_string())]);
    let mut session = session();

    let artifact = session.submit(&backend, "make a widget", None).await.unwrap();
    assert_eq!(artifact.kind, ArtifactType::React);
    assert_eq!(artifact.title, "Widget");

    let roles: Vec<ChatRole> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
    assert_eq!(session.messages()[1].content, "Created: Widget\nSays hi");

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, TurnRole::User);
    assert_eq!(history[0].content, "make a widget");
    assert_eq!(history[1].content, "Generated react code: Widget");

    assert_eq!(session.preview_state(), PreviewState::Rendered);
    assert!(session.document().unwrap().html.contains("function Widget()"));
    assert!(!session.is_generating());
}

#[tokio::test]
async fn history_sent_excludes_current_turn() {
    let backend = Scripted::new(vec![Ok("<h1>one</h1>".into()), Ok("<h1>two</h1>".into())]);
    let mut session = session();

    session.submit(&backend, "first", Some("data:image/png;base64,AAAA".into())).await.unwrap();
    session.submit(&backend, "second", None).await.unwrap();

    let seen = backend.seen();
    assert!(seen[0].history.is_empty());
    assert_eq!(seen[0].image.as_deref(), Some("data:image/png;base64,AAAA"));
    assert_eq!(seen[1].history.len(), 2);
    assert_eq!(seen[1].history[0].image.as_deref(), Some("data:image/png;base64,AAAA"));
    assert_eq!(seen[1].history[1].content, "Generated html code: Generated Content");
    assert_eq!(session.history().len(), 4);
}

#[tokio::test]
async fn failed_turn_leaves_no_trace_in_history() {
    let backend = Scripted::new(vec![Ok("<p>first</p>".into()), Err(RelayError::RateLimited)]);
    let mut session = session();
    session.submit(&backend, "first", None).await.unwrap();

    let err = session.submit(&backend, "second", None).await.unwrap_err();
    assert!(matches!(err, SessionError::Relay(RelayError::RateLimited)));

    assert!(session.messages().iter().all(|m| !m.is_status()));
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.preview_state(), PreviewState::Rendered);
    assert_eq!(session.artifact().unwrap().code, "<p>first</p>");
    assert!(!session.is_generating());
}

#[tokio::test]
async fn failed_first_turn_returns_to_idle() {
    let backend = Scripted::new(vec![Err(RelayError::Status {
        status: 500,
        body: "oops".into(),
    })]);
    let mut session = session();
    assert!(session.submit(&backend, "x", None).await.is_err());
    assert_eq!(session.preview_state(), PreviewState::Idle);
    assert!(session.artifact().is_none());
}

#[test]
fn blank_prompt_without_image_is_rejected() {
    let mut session = session();
    assert!(matches!(session.begin_turn("   ", None), Err(SessionError::EmptyPrompt)));
    assert!(session.messages().is_empty());

    let pending = session.begin_turn("", Some("data:image/png;base64,AAAA".into()));
    assert!(pending.is_ok());
}

#[test]
fn busy_guard_rejects_overlapping_turns() {
    let mut session = session();
    let pending = session.begin_turn("first", None).unwrap();
    assert!(session.is_generating());
    assert_eq!(session.preview_state(), PreviewState::Loading);
    assert_eq!(session.messages().last().unwrap().content, STATUS_WORKING);

    assert!(matches!(session.begin_turn("second", None), Err(SessionError::Busy)));

    session.complete_turn(pending, Ok("<p>done</p>".into())).unwrap();
    assert!(!session.is_generating());
    assert!(session.begin_turn("third", None).is_ok());
}

#[tokio::test]
async fn runtime_error_reaches_session_and_fix_resubmits_it() {
    let backend = Scripted::new(vec![Ok(WIDGET.to_string()), Ok("<h1>fixed</h1>".into())]);
    let mut session = session();
    session.submit(&backend, "widget", None).await.unwrap();

    assert!(matches!(
        session.fix_errors(&backend).await,
        Err(SessionError::NoErrors)
    ));

    session
        .error_sender()
        .post(PreviewMessage::console_error("Uncaught Error: boom at about:srcdoc:12"));
    assert!(session.errors().is_empty());
    let errors = session.drain_errors().to_vec();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("boom"));

    let fixed = session.fix_errors(&backend).await.unwrap();
    assert_eq!(fixed.code, "<h1>fixed</h1>");
    assert_eq!(
        backend.seen()[1].prompt,
        "Fix these errors in the code:\nUncaught Error: boom at about:srcdoc:12"
    );
    assert!(session.drain_errors().is_empty());
    assert!(session.messages().iter().all(|m| m.content != STATUS_FIXING));
}

#[test]
fn fix_pushes_fixing_status_before_the_turn() {
    let mut session = session();
    session.report_error(RuntimeError::new("boom"));
    let _pending = session.begin_fix().unwrap();

    let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![STATUS_FIXING, "Fix these errors in the code:\nboom", STATUS_WORKING]
    );
}

#[tokio::test]
async fn refresh_clears_errors() {
    let backend = Scripted::new(vec![Ok(WIDGET.to_string())]);
    let mut session = session();
    session.submit(&backend, "widget", None).await.unwrap();
    session.report_error(RuntimeError::new("boom"));

    session.refresh().unwrap();
    assert!(session.errors().is_empty());
    assert_eq!(session.preview_state(), PreviewState::Rendered);
}

#[tokio::test]
async fn snapshot_restores_equivalent_session() {
    let backend = Scripted::new(vec![Ok(WIDGET.to_string())]);
    let mut session = session();
    session.submit(&backend, "widget", None).await.unwrap();
    session.report_error(RuntimeError::new("boom"));

    let record = session.snapshot();
    assert_eq!(record.id, session.id());
    assert_eq!(record.errors.len(), 1);

    let renderer = Arc::new(PreviewRenderer::new(PreviewAssets::default()).unwrap());
    let restored = PreviewSession::restore(record, renderer).unwrap();
    assert_eq!(restored.id(), session.id());
    assert_eq!(restored.messages(), session.messages());
    assert_eq!(restored.history(), session.history());
    assert_eq!(restored.document(), session.document());
    assert_eq!(restored.errors().len(), 1);
    assert!(!restored.is_generating());
}

#[test]
fn restore_drops_stale_status_rows() {
    let mut session = session();
    let _pending = session.begin_turn("interrupted", None).unwrap();
    let record = session.snapshot();

    let renderer = Arc::new(PreviewRenderer::new(PreviewAssets::default()).unwrap());
    let restored = PreviewSession::restore(record, renderer).unwrap();
    assert_eq!(restored.messages().len(), 1);
    assert!(!restored.is_generating());
}

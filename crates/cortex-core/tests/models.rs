use cortex_core::keys;
use cortex_core::models::artifact::{Artifact, ArtifactType};
use cortex_core::models::chat::{ChatMessage, ChatRole, ConversationTurn};
use uuid::Uuid;

#[test]
fn artifact_serializes_kind_as_type() {
    let artifact = Artifact {
        kind: ArtifactType::React,
        code: "function App() { return null; }".to_string(),
        title: "App".to_string(),
        description: "An app".to_string(),
    };

    let value = serde_json::to_value(&artifact).unwrap();
    assert_eq!(value["type"], "react");
    assert!(value.get("kind").is_none());
}

#[test]
fn fallback_uses_generic_title_and_description() {
    let artifact = Artifact::fallback("<h1>Hello</h1>");
    assert_eq!(artifact.kind, ArtifactType::Html);
    assert_eq!(artifact.code, "<h1>Hello</h1>");
    assert_eq!(artifact.title, "Generated Content");
    assert_eq!(artifact.description, "Generated based on your request");
}

#[test]
fn summary_and_history_note() {
    let artifact = Artifact {
        kind: ArtifactType::Html,
        code: String::new(),
        title: "Todo App".to_string(),
        description: "A simple todo list".to_string(),
    };
    assert_eq!(artifact.summary(), "Created: Todo App\nA simple todo list");
    assert_eq!(artifact.history_note(), "Generated html code: Todo App");
}

#[test]
fn artifact_type_parses_case_insensitively() {
    assert_eq!("React".parse::<ArtifactType>().unwrap(), ArtifactType::React);
    assert_eq!(" html ".parse::<ArtifactType>().unwrap(), ArtifactType::Html);
    assert!("vue".parse::<ArtifactType>().is_err());
}

#[test]
fn status_messages_are_flagged() {
    assert!(ChatMessage::status("Working On Task").is_status());
    assert!(!ChatMessage::user("hi", None).is_status());
    assert_eq!(ChatMessage::assistant("done").role, ChatRole::Assistant);
}

#[test]
fn turn_omits_missing_image() {
    let turn = ConversationTurn::assistant("Generated html code: T");
    let json = serde_json::to_string(&turn).unwrap();
    assert_eq!(json, r#"{"role":"assistant","content":"Generated html code: T"}"#);
}

#[test]
fn session_key_round_trips() {
    let id = Uuid::new_v4();
    let key = keys::session(id);
    assert!(key.starts_with(keys::SESSIONS_PREFIX));
    assert_eq!(keys::session_id(&key), Some(id));
    assert_eq!(keys::session_id("sessions/not-a-uuid.json"), None);
}

use cortex_core::models::chat::ConversationTurn;
use cortex_relay::chat::WireMessage;
use cortex_relay::prompt::{SYSTEM_PROMPT, build_messages};
use cortex_relay::{Backend, PromptRequest};
use serde_json::json;

fn request() -> PromptRequest {
    PromptRequest {
        prompt: "make it blue".to_string(),
        history: vec![
            ConversationTurn::user("a todo app", Some("data:image/png;base64,AAAA".to_string())),
            ConversationTurn::assistant("Generated react code: Todo App"),
        ],
        image: Some("data:image/png;base64,BBBB".to_string()),
    }
}

#[test]
fn system_prompt_forbids_modules_and_demands_json() {
    assert!(SYSTEM_PROMPT.contains("DO NOT use \"import\" statements"));
    assert!(SYSTEM_PROMPT.contains("DO NOT use \"export default\""));
    assert!(SYSTEM_PROMPT.contains("Return ONLY a JSON object"));
    assert!(SYSTEM_PROMPT.contains(r#""type": "html" | "react""#));
}

#[test]
fn order_is_system_history_user() {
    let messages = build_messages(Backend::Ollama, &request());
    let roles: Vec<&str> = messages.iter().map(WireMessage::role).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
}

#[test]
fn text_backends_use_content_and_drop_images() {
    let messages = build_messages(Backend::Local, &request());
    let value = serde_json::to_value(&messages).unwrap();
    assert_eq!(value[1], json!({"role": "user", "content": "a todo app"}));
    assert_eq!(value[3], json!({"role": "user", "content": "make it blue"}));
}

#[test]
fn gateway_uses_parts_and_carries_images() {
    let messages = build_messages(Backend::Gateway, &request());
    let value = serde_json::to_value(&messages).unwrap();

    assert_eq!(value[0]["parts"][0]["type"], "text");
    assert_eq!(value[0]["parts"][0]["text"], SYSTEM_PROMPT);
    assert_eq!(
        value[1]["parts"][1],
        json!({"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}})
    );
    assert_eq!(value[2]["parts"].as_array().unwrap().len(), 1);
    assert_eq!(
        value[3],
        json!({
            "role": "user",
            "parts": [
                {"type": "text", "text": "make it blue"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,BBBB"}}
            ]
        })
    );
}

//! System instruction and message assembly.

use tracing::debug;

use cortex_core::models::chat::ConversationTurn;

use crate::chat::{ContentPart, ImageUrl, PromptRequest, WireMessage};
use crate::client::Backend;

pub const SYSTEM_PROMPT: &str = r#"You are Cortex, an expert code generation AI. Generate complete, working, production-ready code based on user requests.

CRITICAL RULES:
1. Generate ONLY executable code - HTML, CSS, JavaScript, or React components
2. For simple UIs: Generate a complete HTML file with inline CSS and JavaScript
3. For complex apps: Generate a React component WITHOUT any import/export statements
4. Always include ALL code - no placeholders, no "// rest of code here" comments
5. Code must be immediately executable in a browser iframe without modification
6. Include responsive design and modern styling
7. Use Tailwind CSS classes when possible for styling
8. Make it beautiful and functional

CRITICAL - NO MODULE SYNTAX:
- DO NOT use "export default" or "export" statements
- DO NOT use "import" statements (React is already available globally)
- For React: Just define the function component, it will be auto-detected
- The code runs directly in a browser, not in a module system

OUTPUT FORMAT:
Return ONLY a JSON object with this structure:
{
  "type": "html" | "react",
  "code": "complete executable code here",
  "title": "brief title of what was created",
  "description": "one sentence description"
}

Example for HTML:
{
  "type": "html",
  "code": "<!DOCTYPE html>\n<html>\n<head>...</head>\n<body>...</body>\n</html>",
  "title": "Todo App",
  "description": "A simple todo list application"
}

Example for React (NO exports!):
{
  "type": "react",
  "code": "function TodoApp() {\n  const [todos, setTodos] = React.useState([]);\n  // complete component code\n  return (<div>...</div>);\n}",
  "title": "Todo App",
  "description": "A feature-rich todo application"
}"#;

/// Build the full message list for one call: system instruction, replayed
/// history, then the new user turn.
///
/// Images are only carried by backends whose dialect supports them; other
/// backends receive the text alone.
pub fn build_messages(backend: Backend, request: &PromptRequest) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(message(backend, "system", SYSTEM_PROMPT, None));

    for turn in &request.history {
        messages.push(turn_message(backend, turn));
    }

    messages.push(message(
        backend,
        "user",
        &request.prompt,
        request.image.as_deref(),
    ));

    if !backend.supports_images() {
        let dropped = request.image.iter().count()
            + request.history.iter().filter(|t| t.image.is_some()).count();
        if dropped > 0 {
            debug!(backend = %backend, dropped, "backend is text-only, images not sent");
        }
    }

    messages
}

fn turn_message(backend: Backend, turn: &ConversationTurn) -> WireMessage {
    message(backend, turn.role.as_str(), &turn.content, turn.image.as_deref())
}

fn message(backend: Backend, role: &str, text: &str, image: Option<&str>) -> WireMessage {
    if !backend.supports_images() {
        return WireMessage::Text {
            role: role.to_string(),
            content: text.to_string(),
        };
    }

    let mut parts = vec![ContentPart::Text {
        text: text.to_string(),
    }];
    if let Some(url) = image {
        parts.push(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.to_string(),
            },
        });
    }
    WireMessage::Parts {
        role: role.to_string(),
        parts,
    }
}

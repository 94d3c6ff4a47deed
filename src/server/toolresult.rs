use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> ContentBlock {
        ContentBlock {
            kind: "text",
            text: text.into()
        }
    }
}

/// Payload of a `tools/call` response. Failures are ordinary results with
/// `success == false`, never transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub success: bool,
    pub is_error: bool,
    pub content: Vec<ContentBlock>
}

impl ToolResult {
    pub fn ok(content: Vec<ContentBlock>) -> ToolResult {
        ToolResult {
            success: true,
            is_error: false,
            content
        }
    }

    pub fn failure(message: impl Into<String>) -> ToolResult {
        ToolResult {
            success: false,
            is_error: true,
            content: vec![ContentBlock::text(message)]
        }
    }

    /// Text of the first content block.
    pub fn text(&self) -> &str {
        self.content.first().map(|block| block.text.as_str()).unwrap_or_default()
    }
}

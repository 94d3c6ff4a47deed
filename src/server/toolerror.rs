use crate::time::calendarerror::CalendarError;

/// Everything that turns a tool call into a failure payload.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool: [{tool}] {detail}")]
    InvalidArguments {
        tool: String,
        detail: String
    },

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("Holiday data refresh failed, previous data kept")]
    RefreshFailed,

    #[error("cannot encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToolError {
    pub fn invalid_arguments(tool: &str, detail: impl ToString) -> ToolError {
        ToolError::InvalidArguments {
            tool: tool.to_owned(),
            detail: detail.to_string()
        }
    }
}

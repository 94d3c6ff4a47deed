use serde::Serialize;
use serde_json::{
    json,
    Map,
    Value
};

use crate::time::dateformat::{
    CURRENT_TIME_FORMATS,
    DEFAULT_DATE_FORMAT,
    DEFAULT_DATE_TIME_FORMAT,
    WORKDAY_FORMATS
};

/// One entry of the `tools/list` catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value
}

pub const TOOL_NAMES: [&str; 17] = [
    "current_time",
    "relative_time",
    "days_in_month",
    "get_timestamp",
    "convert_time",
    "get_week_year",
    "get_week_dates",
    "get_iso_weeks_in_month",
    "get_workdays",
    "get_workdays_by_month",
    "get_workdays_by_quarter",
    "get_workdays_by_year",
    "get_workdays_by_range",
    "get_workday_stats",
    "is_workday",
    "add_workdays",
    "refresh_holidays",
];

pub fn is_known_tool(name: &str) -> bool {
    TOOL_NAMES.contains(&name)
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn year_property() -> Value {
    json!({"type": "integer", "description": "The year. e.g. 2025"})
}

fn week_property() -> Value {
    json!({"type": "integer", "description": "The ISO week number (1-53). e.g. 12", "minimum": 1, "maximum": 53})
}

fn month_property() -> Value {
    json!({"type": "integer", "description": "The month (1-12). e.g. 3 for March", "minimum": 1, "maximum": 12})
}

/// Properties understood by every workday tool, merged into `extra`.
fn workday_properties(extra: Value) -> Value {
    let mut properties = match extra {
        Value::Object(map) => map,
        _ => Map::new()
    };
    let shared = json!({
        "format": {
            "type": "string",
            "description": "The date format for output. Default: YYYY-MM-DD",
            "enum": WORKDAY_FORMATS,
            "default": DEFAULT_DATE_FORMAT
        },
        "region": {
            "type": "string",
            "description": "'china' applies the Chinese statutory holiday calendar, 'standard' or empty uses Monday to Friday",
            "enum": ["china", "standard", ""],
            "default": ""
        },
        "useHolidays": {
            "type": "boolean",
            "description": "Whether to apply holiday data for the region. Default: true",
            "default": true
        },
        "customWorkdays": {
            "type": "array",
            "items": {"type": "string"},
            "description": "Dates (YYYY-MM-DD) that are always workdays"
        },
        "customHolidays": {
            "type": "array",
            "items": {"type": "string"},
            "description": "Dates (YYYY-MM-DD) that are never workdays"
        },
        "refreshHolidays": {
            "type": "boolean",
            "description": "Download fresh holiday data before answering. Default: false",
            "default": false
        }
    });
    if let Value::Object(shared) = shared {
        properties.extend(shared);
    }
    Value::Object(properties)
}

/// The full tool catalogue, in a stable order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "current_time",
            description: "Get the current date and time.",
            input_schema: object_schema(json!({
                "format": {
                    "type": "string",
                    "description": "The format of the time",
                    "enum": CURRENT_TIME_FORMATS,
                    "default": DEFAULT_DATE_TIME_FORMAT
                },
                "timezone": {
                    "type": "string",
                    "description": "The timezone of the time, IANA timezone name, e.g. Asia/Shanghai"
                }
            }), &["format"])
        },
        ToolDefinition {
            name: "relative_time",
            description: "Get the relative time from now.",
            input_schema: object_schema(json!({
                "time": {
                    "type": "string",
                    "description": "The time to get the relative time from now. Format: YYYY-MM-DD HH:mm:ss"
                }
            }), &["time"])
        },
        ToolDefinition {
            name: "days_in_month",
            description: "Get the number of days in a month. If no date is provided, get the number of days in the current month.",
            input_schema: object_schema(json!({
                "date": {"type": "string", "description": "The date to get the days in month. Format: YYYY-MM-DD"}
            }), &[])
        },
        ToolDefinition {
            name: "get_timestamp",
            description: "Get the timestamp for the time.",
            input_schema: object_schema(json!({
                "time": {"type": "string", "description": "The time to get the timestamp. Format: YYYY-MM-DD HH:mm:ss.SSS"}
            }), &[])
        },
        ToolDefinition {
            name: "convert_time",
            description: "Convert time between timezones.",
            input_schema: object_schema(json!({
                "sourceTimezone": {"type": "string", "description": "The source timezone. IANA timezone name, e.g. Asia/Shanghai"},
                "targetTimezone": {"type": "string", "description": "The target timezone. IANA timezone name, e.g. Europe/London"},
                "time": {"type": "string", "description": "Date and time in 24-hour format. e.g. 2025-03-23 12:30:00"}
            }), &["sourceTimezone", "targetTimezone", "time"])
        },
        ToolDefinition {
            name: "get_week_year",
            description: "Get the week and isoWeek of the year.",
            input_schema: object_schema(json!({
                "date": {"type": "string", "description": "The date to get the week and isoWeek of the year. e.g. 2025-03-23"}
            }), &[])
        },
        ToolDefinition {
            name: "get_week_dates",
            description: "Get the date range for a given ISO week number and year.",
            input_schema: object_schema(json!({
                "year": year_property(),
                "week": week_property()
            }), &["year", "week"])
        },
        ToolDefinition {
            name: "get_iso_weeks_in_month",
            description: "Get the ISO week numbers contained in a specific month.",
            input_schema: object_schema(json!({
                "year": year_property(),
                "month": month_property()
            }), &["year", "month"])
        },
        ToolDefinition {
            name: "get_workdays",
            description: "Get the workdays of a given ISO week and year.",
            input_schema: object_schema(workday_properties(json!({
                "year": year_property(),
                "week": week_property()
            })), &["year", "week"])
        },
        ToolDefinition {
            name: "get_workdays_by_month",
            description: "Get the workdays of a given month.",
            input_schema: object_schema(workday_properties(json!({
                "year": year_property(),
                "month": month_property()
            })), &["year", "month"])
        },
        ToolDefinition {
            name: "get_workdays_by_quarter",
            description: "Get the workdays of a given quarter.",
            input_schema: object_schema(workday_properties(json!({
                "year": year_property(),
                "quarter": {"type": "integer", "description": "The quarter (1-4)", "minimum": 1, "maximum": 4}
            })), &["year", "quarter"])
        },
        ToolDefinition {
            name: "get_workdays_by_year",
            description: "Get the workdays of a given year.",
            input_schema: object_schema(workday_properties(json!({
                "year": year_property()
            })), &["year"])
        },
        ToolDefinition {
            name: "get_workdays_by_range",
            description: "Get the workdays between two dates, both inclusive.",
            input_schema: object_schema(workday_properties(json!({
                "startDate": {"type": "string", "description": "First day of the range. Format: YYYY-MM-DD"},
                "endDate": {"type": "string", "description": "Last day of the range. Format: YYYY-MM-DD"}
            })), &["startDate", "endDate"])
        },
        ToolDefinition {
            name: "get_workday_stats",
            description: "Count workdays, weekends, holidays and in-lieu days between two dates, both inclusive.",
            input_schema: object_schema(workday_properties(json!({
                "startDate": {"type": "string", "description": "First day of the range. Format: YYYY-MM-DD"},
                "endDate": {"type": "string", "description": "Last day of the range. Format: YYYY-MM-DD"}
            })), &["startDate", "endDate"])
        },
        ToolDefinition {
            name: "is_workday",
            description: "Check whether a date is a workday. If no date is provided, check today.",
            input_schema: object_schema(workday_properties(json!({
                "date": {"type": "string", "description": "The date to check. Format: YYYY-MM-DD"}
            })), &[])
        },
        ToolDefinition {
            name: "add_workdays",
            description: "Move a number of workdays forward (or backward when negative) from a date. If no date is provided, start from today.",
            input_schema: object_schema(workday_properties(json!({
                "date": {"type": "string", "description": "The starting date. Format: YYYY-MM-DD"},
                "days": {"type": "integer", "description": "Number of workdays to move; negative moves backward"}
            })), &["days"])
        },
        ToolDefinition {
            name: "refresh_holidays",
            description: "Download the latest holiday data and replace the local cache.",
            input_schema: object_schema(json!({}), &[])
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_matches_names() {
        let names: Vec<_> = tool_definitions().iter().map(|tool| tool.name).collect();
        assert_eq!(names, TOOL_NAMES);
    }

    #[test]
    fn workday_tools_share_options() {
        let definitions = tool_definitions();
        let by_month = definitions
            .iter()
            .find(|tool| tool.name == "get_workdays_by_month")
            .unwrap();
        let properties = &by_month.input_schema["properties"];
        assert_eq!(properties["format"]["enum"].as_array().unwrap().len(), WORKDAY_FORMATS.len());
        assert_eq!(properties["useHolidays"]["default"], true);
        assert_eq!(properties["month"]["maximum"], 12);
        assert_eq!(by_month.input_schema["required"], json!(["year", "month"]));
    }

    #[test]
    fn serializes_input_schema_key() {
        let json = serde_json::to_value(&tool_definitions()[0]).unwrap();
        assert_eq!(json["inputSchema"]["required"], json!(["format"]));
    }
}

use std::collections::BTreeMap;
use std::env;
use std::sync::Arc;

use serde_json::{
    json,
    Value
};
use tokio::io::{
    AsyncReadExt,
    BufReader
};

use timeworkday::server::dispatcher::Dispatcher;
use timeworkday::server::rpcmessage::{
    INVALID_PARAMS,
    INVALID_REQUEST,
    METHOD_NOT_FOUND,
    PARSE_ERROR
};
use timeworkday::server::transport::Server;
use timeworkday::time::calendar::holidaydata::HolidayData;
use timeworkday::time::calendar::holidayregistry::HolidayRegistry;

fn labour_day_2025() -> HolidayData {
    let entry = "Labour Day,劳动节,2".to_owned();
    HolidayData {
        holidays: BTreeMap::from([
            ("2025-05-01".to_owned(), entry.clone()),
            ("2025-05-02".to_owned(), entry.clone()),
            ("2025-05-03".to_owned(), entry.clone()),
            ("2025-05-04".to_owned(), entry.clone()),
            ("2025-05-05".to_owned(), entry.clone()),
        ]),
        workdays: BTreeMap::from([("2025-04-27".to_owned(), entry.clone())]),
        in_lieu_days: BTreeMap::from([("2025-05-05".to_owned(), entry)])
    }
}

// Offline registry: the cache path never exists and there is no fetcher,
// so `initialize` keeps whatever was loaded here.
fn dispatcher(test_name: &str) -> Arc<Dispatcher> {
    let cache = env::temp_dir()
        .join(format!("timeworkday_{}_{}", test_name, std::process::id()))
        .join("missing.json");
    let registry = Arc::new(HolidayRegistry::new(cache, None, false));
    registry.load_data(&labour_day_2025());
    Arc::new(Dispatcher::new(registry, Some("Asia/Shanghai".to_owned())))
}

fn server(test_name: &str) -> Server {
    Server::new(dispatcher(test_name))
}

// ── dispatcher ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn week_dates_and_month_weeks() {
    let dispatcher = dispatcher("weeks");
    let result = dispatcher.call("get_week_dates", Some(json!({"year": 2025, "week": 12}))).await;
    assert!(result.success);
    assert_eq!(result.text(), "ISO week 12 of 2025 runs from 2025-03-17 to 2025-03-23.");

    let result = dispatcher.call("get_week_year", Some(json!({"date": "2025-03-23"}))).await;
    assert_eq!(result.text(), "The week of the year is 13, and the isoWeek of the year is 12.");

    let result = dispatcher.call("days_in_month", Some(json!({"date": "2024-02-10"}))).await;
    assert_eq!(result.text(), "The number of days in month is 29.");

    let result = dispatcher.call("get_week_dates", Some(json!({"year": 2025, "week": 54}))).await;
    assert!(!result.success && result.is_error);
}

#[tokio::test]
async fn time_tools() {
    let dispatcher = dispatcher("time");
    let result = dispatcher.call("get_timestamp", Some(json!({"time": "2025-03-23 12:30:00"}))).await;
    assert_eq!(result.text(), "The timestamp of 2025-03-23 12:30:00 is 1742733000000 ms.");

    let result = dispatcher
        .call(
            "convert_time",
            Some(json!({"sourceTimezone": "UTC", "targetTimezone": "Asia/Shanghai", "time": "2025-03-23 12:30:00"}))
        )
        .await;
    assert_eq!(
        result.text(),
        "Current time in UTC is 2025-03-23 12:30:00, and the time in Asia/Shanghai is 2025-03-23 20:30:00. The time difference is 8 hours."
    );

    let result = dispatcher.call("current_time", Some(json!({"timezone": "Mars/Base"}))).await;
    assert!(!result.success);
    assert!(result.text().contains("Mars/Base"));
}

#[tokio::test]
async fn regional_workdays_by_month() {
    let dispatcher = dispatcher("month");
    let result = dispatcher
        .call("get_workdays_by_month", Some(json!({"year": 2025, "month": 5, "region": "china"})))
        .await;
    assert!(result.success);
    assert_eq!(result.content.len(), 2);
    assert!(result.text().starts_with("Workdays for 2025-05 (china calendar, 19 days):"));
    assert!(!result.text().contains("2025-05-05"));

    let days: Vec<Value> = serde_json::from_str(&result.content[1].text).unwrap();
    assert_eq!(days.len(), 19);
    assert_eq!(days[0]["date"], "2025-05-06");
    assert_eq!(days[0]["dayName"], "Tuesday");
    assert_eq!(days[0]["isWorkday"], true);
}

#[tokio::test]
async fn is_workday_reports_makeup_day() {
    let dispatcher = dispatcher("makeup");
    let result = dispatcher
        .call("is_workday", Some(json!({"date": "2025-04-27", "region": "china"})))
        .await;
    assert!(result.success);
    assert!(result.text().starts_with("2025-04-27 (Sunday) is a workday"));

    let record: Value = serde_json::from_str(&result.content[1].text).unwrap();
    assert_eq!(record["isWeekend"], true);
    assert_eq!(record["workdayInfo"]["chineseName"], "劳动节");

    let result = dispatcher
        .call("is_workday", Some(json!({"date": "2025-04-27", "region": "china", "customHolidays": ["2025-04-27"]})))
        .await;
    assert!(result.text().starts_with("2025-04-27 (Sunday) is not a workday"));
}

#[tokio::test]
async fn stats_and_workday_arithmetic() {
    let dispatcher = dispatcher("stats");
    let result = dispatcher
        .call(
            "get_workday_stats",
            Some(json!({"startDate": "2025-04-28", "endDate": "2025-05-09", "region": "china"}))
        )
        .await;
    assert!(result.success);
    let stats: Value = serde_json::from_str(&result.content[1].text).unwrap();
    assert_eq!(stats["totalDays"], 12);
    assert_eq!(stats["workdays"], 7);
    assert_eq!(stats["holidays"], 5);
    assert_eq!(stats["inLieuDays"], 1);
    assert_eq!(stats["region"], "china");

    let result = dispatcher
        .call("add_workdays", Some(json!({"date": "2025-04-30", "days": 1, "region": "china"})))
        .await;
    assert_eq!(result.text(), "1 workdays from 2025-04-30 is 2025-05-06 (Tuesday).");
}

#[tokio::test]
async fn inverted_range_and_bad_region_fail() {
    let dispatcher = dispatcher("invalid");
    let result = dispatcher
        .call("get_workdays_by_range", Some(json!({"startDate": "2025-03-31", "endDate": "2025-03-01"})))
        .await;
    assert!(!result.success);

    let result = dispatcher
        .call("get_workdays_by_year", Some(json!({"year": 2025, "region": "atlantis"})))
        .await;
    assert!(!result.success);
    assert!(result.text().contains("atlantis"));
}

#[tokio::test]
async fn unknown_tool_and_bad_arguments() {
    let dispatcher = dispatcher("errors");
    let result = dispatcher.call("launch_rocket", None).await;
    assert!(!result.success && result.is_error);
    assert_eq!(result.text(), "Unknown tool: launch_rocket");

    let result = dispatcher.call("get_workdays", Some(json!({"year": 2025}))).await;
    assert!(!result.success);
    assert!(result.text().starts_with("Invalid arguments for tool: [get_workdays]"));
}

#[tokio::test]
async fn offline_refresh_is_a_failure_payload() {
    let dispatcher = dispatcher("refresh");
    let result = dispatcher.call("refresh_holidays", None).await;
    assert!(!result.success);
    assert_eq!(dispatcher.registry().len(), 7);
}

// ── transport ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_and_list_tools() {
    let server = server("list");
    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#)
        .await
        .unwrap();
    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2025-03-26");
    assert_eq!(result["serverInfo"]["name"], "time-mcp");

    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
        .await
        .unwrap();
    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 17);
    assert!(tools.iter().all(|tool| tool["inputSchema"]["type"] == "object"));
}

#[tokio::test]
async fn protocol_errors() {
    let server = server("protocol");

    let response = server.handle_line("{oops").await.unwrap();
    assert_eq!(response.id, Value::Null);
    assert_eq!(response.error.unwrap().code, PARSE_ERROR);

    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#)
        .await
        .unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, METHOD_NOT_FOUND);
    assert_eq!(error.message, "Method not found: resources/list");

    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"arguments":{}}}"#)
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);

    assert!(server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await
        .is_none());
    assert!(server.handle_line("   ").await.is_none());
}

#[tokio::test]
async fn batches_and_scalars_are_invalid_requests() {
    let server = server("non_object");
    for line in [r#"[{"jsonrpc":"2.0","id":1,"method":"ping"}]"#, "[]", "42", r#""ping""#] {
        let response = server.handle_line(line).await.unwrap();
        assert_eq!(response.id, Value::Null);
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }
}

#[tokio::test]
async fn custom_dates_must_be_exact() {
    let dispatcher = dispatcher("custom_dates");
    let result = dispatcher
        .call("is_workday", Some(json!({"date": "2025-05-06", "region": "china", "customHolidays": ["2025-05-06 junk"]})))
        .await;
    assert!(!result.success);
    assert!(result.text().contains("2025-05-06 junk"));

    // the queried date itself may still carry a time part
    let result = dispatcher
        .call("is_workday", Some(json!({"date": "2025-05-06 09:00:00", "region": "china"})))
        .await;
    assert!(result.success);
}

#[tokio::test]
async fn tool_failures_are_results_not_errors() {
    let server = server("failure");
    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"launch_rocket"}}"#)
        .await
        .unwrap();
    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["success"], false);
    assert_eq!(result["isError"], true);
    assert_eq!(result["content"][0]["type"], "text");
}

#[tokio::test]
async fn serve_answers_every_request_line() {
    let server = Arc::new(server("serve"));
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#, "\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_week_dates","arguments":{"year":2025,"week":12}}}"#, "\n",
    );
    let (writer, mut output) = tokio::io::duplex(64 * 1024);

    server
        .serve(BufReader::new(input.as_bytes()), writer)
        .await
        .unwrap();

    let mut written = String::new();
    output.read_to_string(&mut written).await.unwrap();
    let mut responses: Vec<Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    responses.sort_by_key(|response| response["id"].as_i64());

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"], json!({}));
    assert_eq!(
        responses[1]["result"]["content"][0]["text"],
        "ISO week 12 of 2025 runs from 2025-03-17 to 2025-03-23."
    );
}

//! Protocol integration tests for browser-bridge-mcp.
//!
//! Drives `ProtocolHandler` and the stdio loop against an in-memory driver.

mod common;

use serde_json::{json, Value};
use tokio::io::BufReader;

use browser_bridge_mcp::transport::StdioTransport;

use common::*;

// ─────────────────────── helpers ───────────────────────

/// Feed `input` through a full serve loop and return everything written.
async fn serve_output(input: &str) -> (String, StubDriver) {
    let (handler, driver) = stub_handler();
    let transport = StdioTransport::new(handler);
    let mut output: Vec<u8> = Vec::new();

    transport
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    (String::from_utf8(output).unwrap(), driver)
}

/// Feed `input` through a full serve loop and return the reply lines.
async fn serve(input: &str) -> (Vec<Value>, StubDriver) {
    let (output, driver) = serve_output(input).await;
    let lines = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (lines, driver)
}

// ═══════════════════════════════════════════════════════
// DISPATCH
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_initialize_reports_capabilities() {
    let (handler, _) = stub_handler();

    let resp = send(
        &handler,
        &mcp_request(json!(1), "initialize", json!({ "protocolVersion": "2024-11-05" })),
    )
    .await;

    assert_eq!(resp["jsonrpc"], "2.0");
    assert_eq!(resp["id"], 1);
    assert_eq!(resp["result"]["capabilities"]["tools"]["listChanged"], false);
    assert_eq!(resp["result"]["capabilities"]["resources"], json!({}));
    assert_eq!(resp["result"]["capabilities"]["logging"], json!({}));
    assert!(resp.get("error").is_none());
}

#[tokio::test]
async fn test_wire_bytes_follow_declaration_order() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"navigate_to","arguments":{"url":"https://example.com"}}}"#,
        "\n",
    );

    let (output, _) = serve_output(input).await;

    assert_eq!(
        output,
        concat!(
            r#"{"jsonrpc":"2.0","result":{"capabilities":{"tools":{"listChanged":false},"resources":{},"logging":{}}},"id":1}"#,
            "\n",
            r#"{"jsonrpc":"2.0","result":{"success":true,"result":"https://example.com"},"id":2}"#,
            "\n",
        )
    );
}

#[tokio::test]
async fn test_tools_list_is_fixed_and_stable() {
    let (handler, _) = stub_handler();
    let line = mcp_request(json!(2), "tools/list", json!({}));

    let first = send_raw(&handler, &line).await;
    let second = send_raw(&handler, &line).await;
    assert_eq!(first, second, "tools/list must be byte-identical across calls");
    assert!(first.contains(
        r#"{"name":"navigate_to","description":"Navigate to a URL in the persistent browser","inputSchema":{"type":"object","properties":{"url":"#
    ));

    let resp: Value = serde_json::from_str(&first).unwrap();
    let names: Vec<&str> = resp["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        [
            "navigate_to",
            "extract_content",
            "set_credentials",
            "wait_for_login",
            "fill_form",
            "get_page_status"
        ]
    );

    for tool in resp["result"]["tools"].as_array().unwrap() {
        assert!(tool["description"].is_string());
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_parse_error_exact_reply() {
    let (handler, _) = stub_handler();

    let raw = send_raw(&handler, "{not json").await;
    assert_eq!(
        raw,
        r#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error"},"id":null}"#
    );
}

#[tokio::test]
async fn test_unknown_method() {
    let (handler, _) = stub_handler();

    let resp = send(&handler, &mcp_request(json!(3), "foo", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);
    assert!(resp["error"]["message"].as_str().unwrap().contains("foo"));
    assert_eq!(resp["id"], 3);
    assert!(resp.get("result").is_none());
}

#[tokio::test]
async fn test_unknown_tool_is_internal_error() {
    let (handler, _) = stub_handler();

    let resp = send(&handler, &tool_call(4, "bogus", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32603);
    let message = resp["error"]["message"].as_str().unwrap();
    assert!(message.contains("bogus"), "{message}");
    assert!(message.starts_with("Internal error: "), "{message}");
    assert_eq!(resp["id"], 4);
}

#[tokio::test]
async fn test_id_round_trip() {
    let (handler, _) = stub_handler();

    for id in [json!("req-abc"), json!(17), json!(0), json!(-5), json!(2.5), json!(null)] {
        let resp = send(&handler, &mcp_request(id.clone(), "tools/list", json!({}))).await;
        assert_eq!(resp["id"], id);
    }

    let resp = send(&handler, r#"{"jsonrpc":"2.0","method":"tools/list"}"#).await;
    assert!(resp.get("id").is_some(), "absent id must be echoed as null");
    assert!(resp["id"].is_null());

    let resp = send(&handler, r#"{"jsonrpc":"2.0","method":"nope"}"#).await;
    assert!(resp["id"].is_null());
    assert_eq!(resp["error"]["code"], -32601);
}

#[tokio::test]
async fn test_reply_member_order() {
    let (handler, _) = stub_handler();

    let raw = send_raw(&handler, &mcp_request(json!(8), "shutdown", json!({}))).await;
    assert_eq!(raw, r#"{"jsonrpc":"2.0","result":{"status":"shutdown"},"id":8}"#);
}

// ═══════════════════════════════════════════════════════
// TOOLS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_navigate_to_returns_final_url() {
    let (handler, driver) = stub_handler();

    let resp = send(
        &handler,
        &tool_call(5, "navigate_to", json!({ "url": "https://example.com", "wait_for": null })),
    )
    .await;

    assert_eq!(resp["result"], json!({ "success": true, "result": "https://example.com" }));
    assert_eq!(driver.page().visits, ["https://example.com"]);
}

#[tokio::test]
async fn test_navigate_to_waits_for_selector() {
    let (handler, driver) = stub_handler();
    driver
        .page()
        .elements
        .insert("#main".to_string(), "<p>ready</p>".to_string());

    let resp = send(
        &handler,
        &tool_call(6, "navigate_to", json!({ "url": "https://example.com/app", "wait_for": "#main" })),
    )
    .await;

    assert_eq!(resp["result"]["result"], "https://example.com/app");
}

#[tokio::test]
async fn test_navigate_to_requires_url() {
    let (handler, _) = stub_handler();

    let resp = send(&handler, &tool_call(7, "navigate_to", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32603);
    assert!(resp["error"]["message"].as_str().unwrap().contains("url"));
}

#[tokio::test]
async fn test_extract_content_with_metadata() {
    let (handler, _) = stub_handler();
    send(&handler, &tool_call(1, "navigate_to", json!({ "url": "https://example.com" }))).await;

    let resp = send(&handler, &tool_call(2, "extract_content", json!({}))).await;
    assert_eq!(resp["result"]["success"], true);

    let text = resp["result"]["result"].as_str().unwrap();
    assert!(
        text.starts_with("# Example Domain\n\n**URL:** https://example.com\n\n---\n\n"),
        "{text}"
    );
    assert!(text.contains("For use in examples."));
}

#[tokio::test]
async fn test_extract_content_missing_selector_is_success() {
    let (handler, _) = stub_handler();

    let resp = send(
        &handler,
        &tool_call(3, "extract_content", json!({ "selector": "#nope", "include_metadata": false })),
    )
    .await;

    assert_eq!(
        resp["result"],
        json!({ "success": true, "result": "Error: Selector '#nope' not found on page" })
    );
}

#[tokio::test]
async fn test_extract_content_selector_without_metadata() {
    let (handler, driver) = stub_handler();
    driver
        .page()
        .elements
        .insert("article".to_string(), "<h2>Title</h2><ul><li>one</li></ul>".to_string());

    let resp = send(
        &handler,
        &tool_call(4, "extract_content", json!({ "selector": "article", "include_metadata": false })),
    )
    .await;

    let text = resp["result"]["result"].as_str().unwrap();
    assert!(text.starts_with("## Title"), "{text}");
    assert!(
        text.lines().any(|l| l.starts_with('-') && l.ends_with("one")),
        "{text}"
    );
    assert!(!text.contains("**URL:**"));
}

#[tokio::test]
async fn test_set_credentials() {
    let (handler, _) = stub_handler();

    let resp = send(
        &handler,
        &tool_call(5, "set_credentials", json!({ "username": "testuser", "password": "testpass" })),
    )
    .await;
    assert_eq!(resp["result"], json!({ "success": true, "result": "Credentials stored" }));

    let session = handler.session().lock().await;
    let creds = session.client().credentials().unwrap();
    assert_eq!(creds.username, "testuser");
    assert!(!format!("{creds:?}").contains("testpass"));
}

#[tokio::test]
async fn test_fill_form_and_submit() {
    let (handler, driver) = stub_handler();
    {
        let mut page = driver.page();
        for sel in ["#user", "#pass", "button[type=submit]"] {
            page.elements.insert(sel.to_string(), String::new());
        }
    }

    let resp = send(
        &handler,
        &tool_call(
            6,
            "fill_form",
            json!({
                "fields": { "#user": "alice", "#pass": "s3cret" },
                "submit_button": "button[type=submit]"
            }),
        ),
    )
    .await;

    assert_eq!(resp["result"], json!({ "success": true, "result": "Form submitted" }));
    let page = driver.page();
    assert_eq!(
        page.filled,
        [
            ("#user".to_string(), "alice".to_string()),
            ("#pass".to_string(), "s3cret".to_string())
        ]
    );
    assert_eq!(page.clicked, ["button[type=submit]"]);
}

#[tokio::test(start_paused = true)]
async fn test_fill_form_missing_field_fails() {
    let (handler, _) = stub_handler();

    let resp = send(
        &handler,
        &tool_call(7, "fill_form", json!({ "fields": { "#ghost": "x" } })),
    )
    .await;

    assert_eq!(resp["error"]["code"], -32603);
    let message = resp["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Internal error: Timed out"), "{message}");
    assert!(message.contains("#ghost"));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_login_timeout() {
    let (handler, _) = stub_handler();

    let resp = send(
        &handler,
        &tool_call(
            8,
            "wait_for_login",
            json!({ "timeout_seconds": 2, "success_indicator": "#dashboard" }),
        ),
    )
    .await;

    assert_eq!(resp["result"], json!({ "success": false, "result": "Timeout" }));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_login_url_indicator() {
    let (handler, driver) = stub_handler();
    driver.page().url = "https://example.com/home?session=1".to_string();

    let resp = send(
        &handler,
        &tool_call(
            9,
            "wait_for_login",
            json!({ "timeout_seconds": 5, "success_indicator": "https://example.com/home" }),
        ),
    )
    .await;

    assert_eq!(resp["result"], json!({ "success": true, "result": "Login detected" }));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_login_without_indicator_waits_full_timeout() {
    let (handler, _) = stub_handler();
    let started = tokio::time::Instant::now();

    let resp = send(&handler, &tool_call(10, "wait_for_login", json!({ "timeout_seconds": 3 }))).await;

    assert_eq!(resp["result"]["success"], true);
    assert!(started.elapsed() >= std::time::Duration::from_secs(3));
}

#[tokio::test]
async fn test_get_page_status_idempotent() {
    let (handler, _) = stub_handler();
    send(&handler, &tool_call(1, "navigate_to", json!({ "url": "https://example.com" }))).await;

    let first = send(&handler, &tool_call(2, "get_page_status", json!({}))).await;
    let second = send(&handler, &tool_call(2, "get_page_status", json!({}))).await;

    assert_eq!(first, second);
    assert_eq!(
        first["result"]["result"],
        json!({
            "status": "connected",
            "url": "https://example.com",
            "title": "Example Domain",
            "error": null
        })
    );
}

#[tokio::test]
async fn test_get_page_status_reports_driver_failure() {
    let (handler, driver) = stub_handler();
    driver.page().broken = Some("target closed".to_string());

    let resp = send(&handler, &tool_call(3, "get_page_status", json!(null))).await;
    assert_eq!(resp["result"]["success"], true);
    assert_eq!(resp["result"]["result"]["status"], "error");
    assert!(resp["result"]["result"]["error"]
        .as_str()
        .unwrap()
        .contains("target closed"));
}

#[tokio::test]
async fn test_get_page_status_after_shutdown() {
    let (handler, _) = stub_handler();
    send(&handler, &mcp_request(json!(1), "shutdown", json!({}))).await;

    let resp = send(&handler, &tool_call(2, "get_page_status", json!({}))).await;
    assert_eq!(resp["result"]["result"]["status"], "not_started");
    assert_eq!(resp["result"]["result"]["error"], "Browser not started");
}

// ═══════════════════════════════════════════════════════
// SERVE LOOP
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_end_to_end_session() {
    let input = [
        mcp_request(json!(1), "initialize", json!({})),
        tool_call(2, "navigate_to", json!({ "url": "https://example.com" })),
        mcp_request(json!(3), "shutdown", json!({})),
    ]
    .join("\n");

    let (replies, driver) = serve(&input).await;

    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["id"], 1);
    assert!(replies[0]["result"]["capabilities"].is_object());
    assert_eq!(replies[1]["result"]["result"], "https://example.com");
    assert_eq!(replies[2]["result"], json!({ "status": "shutdown" }));
    assert_eq!(driver.page().closes, 1);
}

#[tokio::test]
async fn test_shutdown_stops_processing() {
    let input = format!(
        "{}\n{}\n{}\n",
        mcp_request(json!(1), "shutdown", json!({})),
        tool_call(2, "navigate_to", json!({ "url": "https://example.com" })),
        mcp_request(json!(3), "tools/list", json!({})),
    );

    let (replies, driver) = serve(&input).await;

    assert_eq!(replies.len(), 1, "nothing after shutdown is answered");
    assert_eq!(replies[0]["id"], 1);
    let page = driver.page();
    assert!(page.visits.is_empty());
    assert_eq!(page.closes, 1, "teardown runs exactly once");
}

#[tokio::test]
async fn test_eof_tears_down_once() {
    let input = format!("{}\n", mcp_request(json!(1), "tools/list", json!({})));

    let (replies, driver) = serve(&input).await;

    assert_eq!(replies.len(), 1);
    assert_eq!(driver.page().closes, 1);
}

#[tokio::test]
async fn test_parse_error_then_continues() {
    let input = format!(
        "{{not json\n{}\n",
        mcp_request(json!(2), "tools/list", json!({}))
    );

    let (replies, _) = serve(&input).await;

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert!(replies[0]["id"].is_null());
    assert_eq!(replies[1]["id"], 2);
    assert!(replies[1]["result"]["tools"].is_array());
}

#[tokio::test]
async fn test_blank_line_gets_parse_error_reply() {
    let input = format!(
        "\n{}\n   \n",
        mcp_request(json!(1), "tools/list", json!({}))
    );

    let (replies, _) = serve(&input).await;
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert_eq!(replies[0]["error"]["message"], "Parse error");
    assert!(replies[0]["id"].is_null());
    assert_eq!(replies[1]["id"], 1);
    assert!(replies[1]["result"]["tools"].is_array());
    assert_eq!(replies[2]["error"]["code"], -32700);
}

#[tokio::test]
async fn test_empty_input_still_tears_down() {
    let (replies, driver) = serve("").await;
    assert!(replies.is_empty());
    assert_eq!(driver.page().closes, 1);
}

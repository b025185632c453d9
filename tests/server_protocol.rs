use std::io::Cursor;

use serde_json::{json, Value as JsonValue};

use csv_cleaner::server::{Server, PROTOCOL_VERSION, SERVER_NAME};

fn exchange(requests: &[JsonValue]) -> Vec<JsonValue> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = Vec::new();
    Server::default()
        .serve(Cursor::new(input), &mut output)
        .unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn initialize_list_and_call() {
    let responses = exchange(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": PROTOCOL_VERSION}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
            "name": "remove_null_rows",
            "arguments": {"csv_path": "a,b\n1,\n2,3\n,4"}
        }}),
    ]);

    // The notification is not answered.
    assert_eq!(responses.len(), 3);

    let init = &responses[0];
    assert_eq!(init["id"], json!(1));
    assert_eq!(init["result"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(init["result"]["serverInfo"]["name"], json!(SERVER_NAME));
    assert!(init["result"]["capabilities"]["tools"].is_object());

    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "inspect_csv",
            "remove_null_rows",
            "fill_missing_values",
            "remove_duplicates",
            "standardize_columns",
            "filter_rows"
        ]
    );
    assert!(responses[1]["result"]["tools"][0]["inputSchema"]["properties"]["csv_path"].is_object());

    let call = &responses[2]["result"];
    assert_eq!(call["isError"], json!(false));
    assert_eq!(call["content"][0]["type"], json!("text"));
    assert!(call["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Removed 2 rows. Remaining: 1 rows"));
}

#[test]
fn operation_errors_are_successful_results() {
    let responses = exchange(&[json!({"jsonrpc": "2.0", "id": "x", "method": "tools/call", "params": {
        "name": "filter_rows",
        "arguments": {"csv_path": "a,b\n1,2\n", "column": "c", "operator": "equals", "value": "1"}
    }})]);

    let result = &responses[0]["result"];
    assert_eq!(responses[0]["id"], json!("x"));
    assert_eq!(result["isError"], json!(false));
    assert!(result["content"][0]["text"].as_str().unwrap().starts_with("Error: Column 'c'"));
}

#[test]
fn unknown_tool_sets_is_error() {
    let responses = exchange(&[json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {
        "name": "greet", "arguments": {}
    }})]);
    assert_eq!(responses[0]["result"]["isError"], json!(true));
    assert_eq!(responses[0]["result"]["content"][0]["text"], json!("Unknown tool: greet"));
}

#[test]
fn ping_unknown_method_and_garbage() {
    let mut output = Vec::new();
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":6,"method":"prompts/get"}"#,
        "\n",
        "\n",
        "this is not json\n",
        r#"[{"jsonrpc":"2.0","id":7,"method":"ping"}]"#,
        "\n"
    );
    Server::default().serve(Cursor::new(input), &mut output).unwrap();
    let responses: Vec<JsonValue> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["result"], json!({}));
    assert_eq!(responses[1]["error"]["code"], json!(-32601));
    assert_eq!(responses[2]["id"], JsonValue::Null);
    assert_eq!(responses[2]["error"]["code"], json!(-32700));
    // Batch requests are answered with a single invalid-request error.
    assert_eq!(responses[3]["id"], JsonValue::Null);
    assert_eq!(responses[3]["error"]["code"], json!(-32600));
}

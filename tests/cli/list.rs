use std::fs;

use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_list_all() -> Result<()> {
    let test = CliTest::with_orders()?;

    assert_cmd_snapshot!(test.orders_command("list"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    All (3)  Used (2)  Unused (1)

    used    GET /orders/{orderId}  (1 occurrence)
        --> web/src/api.ts:2:41
    used    POST /orders  (1 occurrence)
        --> web/src/api.ts:1:47
    unused  GET /health

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_list_status_filter_keeps_full_counts() -> Result<()> {
    let test = CliTest::with_orders()?;

    assert_cmd_snapshot!(
        test.orders_command("list").args(["--status", "unused"]),
        @r"
        success: true
        exit_code: 0
        ----- stdout -----
        All (3)  Used (2)  Unused (1)

        unused  GET /health

        ----- stderr -----
        "
    );

    Ok(())
}

#[test]
fn test_list_search_ignores_case() -> Result<()> {
    let test = CliTest::with_orders()?;

    assert_cmd_snapshot!(
        test.orders_command("list").args(["--search", "ORDERS/"]),
        @r"
        success: true
        exit_code: 0
        ----- stdout -----
        All (3)  Used (2)  Unused (1)

        used  GET /orders/{orderId}  (1 occurrence)
            --> web/src/api.ts:2:41

        ----- stderr -----
        "
    );

    assert_cmd_snapshot!(
        test.orders_command("list").args(["--search", "nothing"]),
        @r"
        success: true
        exit_code: 0
        ----- stdout -----
        All (3)  Used (2)  Unused (1)

        No endpoints match the current filter.

        ----- stderr -----
        "
    );

    Ok(())
}

#[test]
fn test_list_json() -> Result<()> {
    let test = CliTest::with_orders()?;

    let output = test
        .orders_command("list")
        .args(["--format", "json"])
        .output()?;
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["specPath"], "openapi.yaml");
    assert_eq!(report["projects"], serde_json::json!(["web"]));
    assert_eq!(report["filesScanned"], 1);

    let endpoints = report["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 3);
    assert_eq!(endpoints[0]["declaration"]["template"], "/orders/{orderId}");
    assert_eq!(endpoints[0]["declaration"]["method"], "GET");
    assert_eq!(endpoints[0]["status"], "used");
    assert_eq!(endpoints[0]["occurrenceCount"], 1);
    assert_eq!(endpoints[0]["locations"][0]["filePath"], "src/api.ts");
    assert_eq!(endpoints[0]["locations"][0]["line"], 2);
    assert_eq!(endpoints[2]["status"], "unused");
    assert_eq!(endpoints[2]["occurrenceCount"], 0);

    let unmatched = report["unmatched"].as_array().unwrap();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0]["text"], "/invoices");

    Ok(())
}

#[test]
fn test_list_shows_unparseable() -> Result<()> {
    let test = CliTest::with_file("endpoints.txt", "/a/{id\n/b\n")?;
    test.write_file("web/app.js", "fetch('/b');\n")?;

    assert_cmd_snapshot!(
        test.command().args([
            "list",
            "--spec",
            "endpoints.txt",
            "--project",
            "web",
            "--status",
            "unparseable",
        ]),
        @r#"
        success: true
        exit_code: 0
        ----- stdout -----
        All (2)  Used (1)  Unused (0)  Unparseable (1)

        unparseable  /a/{id
            = note: unclosed '{' in segment "{id"

        ----- stderr -----
        "#
    );

    Ok(())
}

#[test]
fn test_list_warns_about_unreadable_files() -> Result<()> {
    let test = CliTest::with_orders()?;
    fs::write(test.root().join("web/src/binary.ts"), [0xff, 0xfe, 0x00, 0x41])?;

    // Partial results, but listing never fails
    assert_cmd_snapshot!(
        test.orders_command("list").args(["--status", "unused"]),
        @r"
        success: true
        exit_code: 0
        ----- stdout -----
        All (3)  Used (2)  Unused (1)

        unused  GET /health

        ----- stderr -----
        warning: 1 file(s) could not be read (use -v for details)
        "
    );

    Ok(())
}

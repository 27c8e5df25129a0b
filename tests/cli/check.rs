use std::fs;

use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, ORDERS_SPEC};

#[test]
fn test_unused_endpoint_is_a_warning() -> Result<()> {
    let test = CliTest::with_orders()?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    warning: "GET /health"  unused-endpoint
      --> openapi.yaml:7:1
      = note: no references found in any scanned project


    ✘ 1 problems (0 errors, 1 warning)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_all_endpoints_used() -> Result<()> {
    let test = CliTest::with_orders()?;
    test.write_file("web/src/health.ts", "export const ping = () => fetch('/health');\n")?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 3 endpoints in 2 files - no issues found

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_unmatched_rule() -> Result<()> {
    let test = CliTest::with_orders()?;

    // Only the requested rule runs
    assert_cmd_snapshot!(test.check_command().arg("unmatched"), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    warning: "/invoices"  unmatched-path
      --> web/src/api.ts:3:41
      |
    3 | export const listInvoices = () => fetch('/invoices');
      |                                         ^
      = note: called with GET


    ✘ 1 problems (0 errors, 1 warning)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_method_mismatch_leaves_endpoint_unused() -> Result<()> {
    let test = CliTest::with_orders()?;
    test.write_file(
        "web/src/api.ts",
        "api.get('/orders');\napi.get(`/orders/${id}`);\nfetch('/health');\n",
    )?;

    assert_cmd_snapshot!(test.check_command().args(["unused", "unmatched"]), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    warning: "POST /orders"  unused-endpoint
      --> openapi.yaml:5:1
      = note: no references found in any scanned project

    warning: "/orders"  unmatched-path
      --> web/src/api.ts:1:9
      |
    1 | api.get('/orders');
      |         ^
      = note: called with GET


    ✘ 2 problems (0 errors, 2 warnings)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_malformed_template_fails() -> Result<()> {
    let test = CliTest::with_file("endpoints.txt", "GET /users/{id\nGET /users\n")?;
    test.write_file("web/app.js", "fetch('/users');\n")?;

    assert_cmd_snapshot!(
        test.command()
            .args(["check", "--spec", "endpoints.txt", "--project", "web"]),
        @r#"
        success: false
        exit_code: 1
        ----- stdout -----
        error: "GET /users/{id"  malformed-template
          --> endpoints.txt:1:1
          = note: unclosed '{' in segment "{id"
          = hint: parameters are whole segments written as {name} or :name


        ✘ 1 problems (1 error, 0 warnings)

        ----- stderr -----
        "#
    );

    Ok(())
}

#[test]
fn test_duplicate_endpoint() -> Result<()> {
    let test = CliTest::with_file("endpoints.txt", "/users/{id}\n/users/:userId/\n")?;
    test.write_file("web/app.js", "fetch('/users/1');\n")?;

    assert_cmd_snapshot!(
        test.command()
            .args(["check", "--spec", "endpoints.txt", "--project", "web"]),
        @r#"
        success: true
        exit_code: 0
        ----- stdout -----
        warning: "/users/:userId/"  duplicate-endpoint
          --> endpoints.txt:2:1
          = note: same endpoint as /users/{id} (line 1)


        ✘ 1 problems (0 errors, 1 warning)

        ----- stderr -----
        "#
    );

    Ok(())
}

#[test]
fn test_multiple_projects() -> Result<()> {
    let test = CliTest::with_file("openapi.yaml", ORDERS_SPEC)?;
    test.write_file("web/src/orders.ts", "api.post('/orders', body);\n")?;
    test.write_file(
        "mobile/lib/api.dart",
        "final r = await dio.get('/orders/$id');\nfinal h = await http.get(Uri.parse('$base/health'));\n",
    )?;

    assert_cmd_snapshot!(
        test.command().args([
            "check",
            "--spec",
            "openapi.yaml",
            "--project",
            "web",
            "--project",
            "mobile",
        ]),
        @r#"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Checked 3 endpoints in 2 files - no issues found

        ----- stderr -----
        "#
    );

    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let test = CliTest::with_orders()?;
    test.write_file(
        ".apiusagerc.json",
        r#"{
          "spec": "openapi.yaml",
          "projects": ["web"],
          "ignores": ["**/generated/**"]
        }"#,
    )?;
    test.write_file("web/generated/client.ts", "fetch('/health');\n")?;

    assert_cmd_snapshot!(test.command().arg("check"), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    warning: "GET /health"  unused-endpoint
      --> ./openapi.yaml:7:1
      = note: no references found in any scanned project


    ✘ 1 problems (0 errors, 1 warning)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_strip_prefix_and_case_insensitive() -> Result<()> {
    let test = CliTest::with_orders()?;
    test.write_file("web/src/health.ts", "fetch('/API/v1/Health');\n")?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    warning: "GET /health"  unused-endpoint
      --> openapi.yaml:7:1
      = note: no references found in any scanned project


    ✘ 1 problems (0 errors, 1 warning)

    ----- stderr -----
    "#);

    assert_cmd_snapshot!(
        test.check_command()
            .args(["--strip-prefix", "/api/v1", "--case-insensitive"]),
        @r#"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Checked 3 endpoints in 2 files - no issues found

        ----- stderr -----
        "#
    );

    Ok(())
}

#[test]
fn test_missing_spec_is_a_config_error() -> Result<()> {
    let test = CliTest::with_file("web/app.js", "fetch('/a');\n")?;

    assert_cmd_snapshot!(test.command().args(["check", "--project", "web"]), @r#"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: No endpoint spec configured. Pass --spec or set "spec" in .apiusagerc.json
    "#);

    Ok(())
}

#[test]
fn test_unreadable_spec_is_a_config_error() -> Result<()> {
    let test = CliTest::with_file("web/app.js", "fetch('/a');\n")?;

    assert_cmd_snapshot!(
        test.command()
            .args(["check", "--spec", "missing.json", "--project", "web"]),
        @r#"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        Error: failed to read missing.json: No such file or directory (os error 2)
        "#
    );

    Ok(())
}

#[test]
fn test_unreadable_file_is_reported_and_scan_continues() -> Result<()> {
    let test = CliTest::with_orders()?;
    fs::write(test.root().join("web/src/binary.ts"), [0xff, 0xfe, 0x00, 0x41])?;

    // Readable files were still scanned: both order endpoints are used
    assert_cmd_snapshot!(test.check_command().arg("unused"), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: "GET /health"  unused-endpoint
      --> openapi.yaml:7:1
      = note: no references found in any scanned project

    error: "stream did not contain valid UTF-8"  read-error
      --> web/src/binary.ts


    ✘ 2 problems (1 error, 1 warning)

    ----- stderr -----
    warning: 1 file(s) could not be read (use -v for details)
    "#);

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    A fast CLI tool for finding which declared API endpoints are used by client codebases

    Usage: apiusage [COMMAND]

    Commands:
      check   Check endpoint usage (unused endpoints, unmatched paths, malformed templates, duplicates)
      list    List declared endpoints with their usage counts and locations
      export  Export endpoint usage as CSV
      init    Initialize a new .apiusagerc.json configuration file
      help    Print this message or the help of the given subcommand(s)

    Options:
      -h, --help     Print help
      -V, --version  Print version

    ----- stderr -----
    "#);

    Ok(())
}

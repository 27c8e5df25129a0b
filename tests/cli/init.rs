use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, ORDERS_CLIENT, ORDERS_SPEC};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    // 1. Parse as JSON
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    // 2. Verify expected fields exist
    for field in ["spec", "projects", "extensions", "ignores", "caseSensitive"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["caseSensitive"], true);
    assert_eq!(parsed["decodePercent"], false);

    // 3. Verify formatting (2-space indentation)
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .apiusagerc.json

    ----- stderr -----
    ");

    // Verify file exists
    assert!(test.root().join(".apiusagerc.json").exists());

    // Verify content is valid and has expected structure
    let content = test.read_file(".apiusagerc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".apiusagerc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: .apiusagerc.json already exists
    ");
    assert_eq!(test.read_file(".apiusagerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    // Initialize config
    test.command().arg("init").output()?;

    // Spec and sources where the default config expects them
    test.write_file("openapi.yaml", ORDERS_SPEC)?;
    test.write_file("src/api.ts", ORDERS_CLIENT)?;

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

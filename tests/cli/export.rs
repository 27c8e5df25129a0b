use std::fs;

use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

const ORDERS_CSV: &str = "method,path,used,occurrenceCount,project,file,line
GET,/orders/{orderId},used,1,web,src/api.ts,2
POST,/orders,used,1,web,src/api.ts,1
GET,/health,unused,0,,,
";

#[test]
fn test_export_default_path() -> Result<()> {
    let test = CliTest::with_orders()?;

    assert_cmd_snapshot!(test.orders_command("export"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Exported 3 row(s) for 3 endpoint(s) to endpoint_usage.csv

    ----- stderr -----
    ");
    assert_eq!(test.read_file("endpoint_usage.csv")?, ORDERS_CSV);

    Ok(())
}

#[test]
fn test_export_to_stdout() -> Result<()> {
    let test = CliTest::with_orders()?;

    assert_cmd_snapshot!(
        test.orders_command("export").args(["--output", "-"]),
        @r"
        success: true
        exit_code: 0
        ----- stdout -----
        method,path,used,occurrenceCount,project,file,line
        GET,/orders/{orderId},used,1,web,src/api.ts,2
        POST,/orders,used,1,web,src/api.ts,1
        GET,/health,unused,0,,,

        ----- stderr -----
        "
    );

    Ok(())
}

#[test]
fn test_export_one_row_per_location() -> Result<()> {
    let test = CliTest::with_orders()?;
    test.write_file("web/src/more.ts", "api.get(`/orders/${a}`);\napi.get('/orders/7?full=1');\n")?;

    assert_cmd_snapshot!(
        test.orders_command("export").args(["-o", "usage.csv"]),
        @r"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Exported 5 row(s) for 3 endpoint(s) to usage.csv

        ----- stderr -----
        "
    );

    let csv = test.read_file("usage.csv")?;
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(
        rows[1..4],
        [
            "GET,/orders/{orderId},used,3,web,src/api.ts,2",
            "GET,/orders/{orderId},used,3,web,src/more.ts,1",
            "GET,/orders/{orderId},used,3,web,src/more.ts,2",
        ]
    );

    Ok(())
}

#[test]
fn test_export_warns_about_unreadable_files() -> Result<()> {
    let test = CliTest::with_orders()?;
    fs::write(test.root().join("web/src/binary.ts"), [0xff, 0xfe, 0x00, 0x41])?;

    assert_cmd_snapshot!(
        test.orders_command("export").args(["--output", "-"]),
        @r"
        success: true
        exit_code: 0
        ----- stdout -----
        method,path,used,occurrenceCount,project,file,line
        GET,/orders/{orderId},used,1,web,src/api.ts,2
        POST,/orders,used,1,web,src/api.ts,1
        GET,/health,unused,0,,,

        ----- stderr -----
        warning: 1 file(s) could not be read (use -v for details)
        "
    );

    Ok(())
}

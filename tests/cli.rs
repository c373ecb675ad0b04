use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn streetvend(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("streetvend").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("STREETVEND_DATA_DIR")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

#[test]
fn test_stock_sell_and_sales_report() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path().join("vendor_data");

    streetvend(&data)
        .args(["stock", "samosa", "50", "2.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inventory updated for samosa"));

    streetvend(&data)
        .args(["sell", "samosa", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sale recorded: 5 samosa for $12.50"));

    let ledger = fs::read_to_string(data.join("sales.csv")).unwrap();
    let mut lines = ledger.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp,item_name,quantity,total_price")
    );
    assert!(lines.next().unwrap().ends_with(",samosa,5,12.50"));

    streetvend(&data)
        .arg("sales")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Revenue: $12.50"))
        .stdout(predicate::str::contains("Best Seller: samosa (5 units)"));

    streetvend(&data)
        .arg("inventory")
        .assert()
        .success()
        .stdout(predicate::str::contains("45 units at $2.50 each"));
}

#[test]
fn test_log_sale_rejects_wrong_total() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path();

    streetvend(data)
        .args(["stock", "chai", "10", "1.00"])
        .assert()
        .success();

    streetvend(data)
        .args(["log-sale", "chai", "2", "5.00"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "));

    assert!(!data.join("sales.csv").exists());

    streetvend(data)
        .args(["log-sale", "chai", "2", "2.01"])
        .assert()
        .success();
}

#[test]
fn test_sell_unknown_item_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    streetvend(temp_dir.path())
        .args(["sell", "kulfi", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("kulfi"));
}

#[test]
fn test_feedback_and_search() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path();

    streetvend(data)
        .args(["feedback", "John Doe", "4", "Great", "food"])
        .assert()
        .success();
    streetvend(data)
        .args(["feedback", "Ana", "2", "Too salty"])
        .assert()
        .success();

    streetvend(data)
        .args(["search", "GREAT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 feedback entries containing 'GREAT'"))
        .stdout(predicate::str::contains("Customer: John Doe"))
        .stdout(predicate::str::contains("Comments: Great food"))
        .stdout(predicate::str::contains("Ana").not());

    streetvend(data)
        .args(["feedback", "Ana", "6"])
        .assert()
        .failure();
}

#[test]
fn test_daily_report_for_date() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path();
    fs::write(data.join("inventory.txt"), "samosa,45,2.50\n").unwrap();
    fs::write(
        data.join("sales.csv"),
        "timestamp,item_name,quantity,total_price\n\
         2024-03-01 12:00:00,samosa,5,12.50\n\
         2024-03-02 12:00:00,samosa,1,2.50\n",
    )
    .unwrap();

    streetvend(data)
        .args(["report", "--date", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily report generated"));

    let report = fs::read_to_string(data.join("daily_report.txt")).unwrap();
    assert!(report.contains("2024-03-01"));
    assert!(report.contains("$12.50"));
    assert!(!report.contains("2024-03-02 12:00:00"));

    streetvend(data)
        .args(["report", "--date", "2024-3-1"])
        .assert()
        .failure();
}

#[test]
fn test_backup_copies_data_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path();
    fs::write(data.join("inventory.txt"), "chai,10,1.00\n").unwrap();
    fs::write(data.join("feedback.txt"), "").unwrap();
    fs::write(data.join("sales.csv"), "timestamp,item_name,quantity,total_price\n").unwrap();
    fs::write(data.join("notes.md"), "not backed up").unwrap();

    streetvend(data)
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 files backed up to"));

    let copies = fs::read_dir(data.join("backups")).unwrap().count();
    assert_eq!(copies, 3);
}

#[test]
fn test_config_set_changes_file_names() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path();

    streetvend(data).arg("init").assert().success();
    streetvend(data)
        .args(["config", "inventory-file", "stock.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inventory-file set to stock.txt"));

    streetvend(data)
        .args(["stock", "chai", "10", "1.00"])
        .assert()
        .success();
    assert!(data.join("stock.txt").exists());
    assert!(!data.join("inventory.txt").exists());

    streetvend(data)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("sales-file = sales.csv"));
}

#[test]
fn test_menu_runs_until_exit() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path();

    streetvend(data)
        .write_stdin("2\nsamosa\n50\n2.50\n1\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. View Inventory"))
        .stdout(predicate::str::contains("50 units at $2.50 each"))
        .stdout(predicate::str::contains("Thank you for using"));
}

#[test]
fn test_menu_reports_errors_and_continues() {
    let temp_dir = tempfile::tempdir().unwrap();

    streetvend(temp_dir.path())
        .arg("menu")
        .write_stdin("3\nkulfi\n1\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: "))
        .stdout(predicate::str::contains("Invalid choice"));
}

#[test]
fn test_config_rejects_unknown_keys_and_data_dir_as_backup_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path();

    streetvend(data)
        .args(["config", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key 'colour'"));

    streetvend(data)
        .args(["config", "backup-dir", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid name for backup-dir"));

    assert!(!data.join("config.json").exists());
}

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GUARANTEE_TEXT: &str = "BANK GUARANTEE BG No.0012BG2024/567
Issuance Date: 15/01/2024
To, Oil India Limited, Duliajan, Assam
In consideration of Oil India Limited having agreed to exempt M/s. Grant Infra Projects Pvt Ltd, \
having its registered office at Grant House, 2nd Floor, Uppal Hyderabad 500013 India. \
(hereinafter called the Applicant) we, State Bank of India do hereby undertake to pay an amount \
not exceeding Rs.10,00,000.00 (Rupees Ten Lakh only). This guarantee shall remain valid till \
31/03/2025 and claims may be lodged within 30 days thereafter i.e. 30/04/2025.
This guarantee is made by State Bank of India, Mumbai Main Branch.";

/// A `bgx` command whose config directory is an empty temp dir.
fn bgx(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bgx").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"));
    cmd
}

#[test]
fn parse_text_file_prints_json_fields() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("bg.txt");
    std::fs::write(&input, GUARANTEE_TEXT).unwrap();

    bgx(&home)
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"file\": \"bg.txt\""))
        .stdout(predicate::str::contains("\"Beneficiary Name\": \"Oil India Limited\""))
        .stdout(predicate::str::contains("0012BG2024/567"))
        .stdout(predicate::str::contains("2025-03-31"));
}

#[test]
fn parse_reads_stdin_as_text() {
    let home = TempDir::new().unwrap();

    bgx(&home)
        .args(["parse", "-", "--format", "text"])
        .write_stdin(GUARANTEE_TEXT)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== stdin ==="))
        .stdout(predicate::str::contains("Issuing Bank Name: State Bank of India"));
}

#[test]
fn parse_empty_text_fails() {
    let home = TempDir::new().unwrap();

    bgx(&home)
        .args(["parse", "-"])
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no text extracted"));
}

#[test]
fn country_from_city() {
    let home = TempDir::new().unwrap();

    bgx(&home)
        .args(["country", "Bhandup W , Mumbai 400078"])
        .assert()
        .success()
        .stdout(predicate::str::contains("India"));
}

#[test]
fn country_not_found() {
    let home = TempDir::new().unwrap();

    bgx(&home)
        .args(["country", "Somewhere 12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Country not found"));
}

#[test]
fn config_init_then_get() {
    let home = TempDir::new().unwrap();

    bgx(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bgx"))
        .stdout(predicate::str::contains("not created"));

    bgx(&home).args(["config", "init"]).assert().success();

    bgx(&home)
        .args(["config", "set", "extraction.use_ocr", "false"])
        .assert()
        .success();

    bgx(&home)
        .args(["config", "get", "extraction.use_ocr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));

    bgx(&home)
        .args(["config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure();
}

#[test]
fn process_missing_file_fails() {
    let home = TempDir::new().unwrap();

    bgx(&home)
        .args(["process", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_rejects_non_pdf() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("bg.txt");
    std::fs::write(&input, GUARANTEE_TEXT).unwrap();

    bgx(&home)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn config_set_geocoding_api_key() {
    let home = TempDir::new().unwrap();

    bgx(&home).args(["config", "init"]).assert().success();

    bgx(&home)
        .args(["config", "set", "geocoding.api_key", "abc123"])
        .assert()
        .success();

    bgx(&home)
        .args(["config", "get", "geocoding.api_key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abc123"));
}

#[test]
fn config_commands_use_explicit_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("custom.json");
    let path = path.to_str().unwrap();

    bgx(&home)
        .args(["-c", path, "config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));

    bgx(&home)
        .args(["-c", path, "config", "set", "extraction.extra_places", r#"{"Naharkatia": "India"}"#])
        .assert()
        .success();
    assert!(home.path().join("custom.json").exists());

    bgx(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    bgx(&home)
        .args(["-c", path, "config", "get", "extraction.extra_places.Naharkatia"])
        .assert()
        .success()
        .stdout(predicate::str::contains("India"));

    bgx(&home)
        .args(["-c", path, "country", "Naharkatia 786610"])
        .assert()
        .success()
        .stdout(predicate::str::contains("India"));

    bgx(&home)
        .args(["country", "Naharkatia 786610"])
        .assert()
        .failure();
}

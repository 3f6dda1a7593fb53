use std::fs;

use assert_cmd::Command;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("legal-lens").expect("binary exists");
    cmd.env("RUST_LOG", "error");
    cmd
}

#[test]
fn cli_help_runs() {
    cli().arg("--help").assert().success();
}

#[test]
fn analyze_prints_three_listings() {
    let output = cli()
        .args([
            "analyze",
            "--html",
            "<html><body><p>Acme Corp signed on January 5.</p></body></html>",
        ])
        .output()
        .expect("run analyze");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let entities_at = stdout.find("Entities:").expect("entities header");
    let clauses_at = stdout.find("Clauses:").expect("clauses header");
    let summaries_at = stdout.find("Summaries:").expect("summaries header");
    assert!(entities_at < clauses_at && clauses_at < summaries_at);
    assert!(stdout.contains("(Acme Corp, ORG)"));
    assert!(stdout.contains("(January 5, DATE)"));
    assert!(stdout[clauses_at..summaries_at].contains("Acme Corp signed on January 5."));
}

#[test]
fn text_reads_from_file_and_strips_markup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.html");
    fs::write(
        &path,
        "<html><head><script>alert(1)</script></head><body><h1>Lease</h1><p>Rent is due.</p></body></html>",
    )
    .unwrap();

    let output = cli()
        .args(["text", "--file"])
        .arg(&path)
        .output()
        .expect("run text");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), "LeaseRent is due.");
}

#[test]
fn entities_read_from_stdin_when_no_source_flag() {
    let output = cli()
        .arg("entities")
        .write_stdin("<p>Fees of $1,000 are owed to Initech LLC.</p>")
        .output()
        .expect("run entities");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "($1,000, MONEY)\n(Initech LLC, ORG)\n");
}

#[test]
fn analyze_save_writes_json_record() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .env("OUTPUTS_DIR", dir.path())
        .args([
            "analyze",
            "--format",
            "json",
            "--save",
            "contract",
            "--html",
            "<p>Globex Inc shall pay $500 by March 1, 2025.</p>",
        ])
        .assert()
        .success();

    let saved = fs::read_to_string(dir.path().join("contract.json")).expect("saved record");
    let record: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(record["source"], "inline");
    assert!(record["analyzed_at"].is_string());
    assert_eq!(record["labels"]["MONEY"], 1);
    assert_eq!(
        record["clauses"].as_array().map(Vec::len),
        record["summaries"].as_array().map(Vec::len)
    );
}

#[test]
fn invalid_summary_bounds_fail_at_startup() {
    let output = cli()
        .env("SUMMARY_MIN_TOKENS", "200")
        .env("SUMMARY_MAX_TOKENS", "100")
        .args(["clauses", "--html", "<p>One.</p>"])
        .output()
        .expect("run clauses");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("SUMMARY_MIN_TOKENS"));
}

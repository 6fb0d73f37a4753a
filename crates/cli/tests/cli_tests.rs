// End-to-end tests for the `stockcheck` binary.
// Run with: cargo test -p stockcheck-cli --test cli_tests

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const CONFIG: &str = r#"
name = "Test shop"
header_labels = ["Article"]

[[categories]]
name = "jeans"
display_name = "Jeans"
[categories.columns]
article = 1
size = 3
amount = 2
[[categories.sources]]
file = "jeans.csv"

[[categories]]
name = "caps"
sized = false
[categories.columns]
article = 1
size = 2
amount = 2
[[categories.sources]]
file = "caps.csv"

[[prefixes]]
prefix = "JN"
categories = ["jeans"]

[[prefixes]]
prefix = "CP"
categories = ["caps"]
"#;

const JEANS: &str = "Article;Amount;Sizes\nJN-1;3;M,L,-2\nJN-2;1;S\n";
const CAPS: &str = "Article;Amount\nCP-5;3\n";

const SCAN_HEADER: &str = "No;Article;Name;Size;Price;Qty\n";

fn stockcheck() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stockcheck"));
    cmd.env_remove("STOCKCHECK_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Config plus catalog exports in one directory, with `scan_body` as the scan.
fn shop(scan_body: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("shop.toml"), CONFIG).unwrap();
    std::fs::write(dir.path().join("jeans.csv"), JEANS).unwrap();
    std::fs::write(dir.path().join("caps.csv"), CAPS).unwrap();
    std::fs::write(dir.path().join("scan.csv"), format!("{SCAN_HEADER}{scan_body}")).unwrap();
    dir
}

fn reconcile(dir: &Path, extra: &[&str]) -> Output {
    stockcheck()
        .arg("reconcile")
        .arg(dir.join("scan.csv"))
        .arg("--config")
        .arg(dir.join("shop.toml"))
        .args(extra)
        .output()
        .unwrap()
}

const CLEAN_SCAN: &str = "\
1;JN-1;Jeans;M;100;1
2;JN-1;Jeans;L;100;2
3;JN-2;Jeans;S;100;1
4;CP-5;Cap;;20;3
";

// ---------------------------------------------------------------------------
// reconcile
// ---------------------------------------------------------------------------

#[test]
fn reconcile_clean_exits_zero() {
    let dir = shop(CLEAN_SCAN);
    let out = reconcile(dir.path(), &[]);

    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(out.status.code(), Some(0), "stderr: {stderr}");
    assert!(stdout.contains("All scanned articles match the catalog."), "{stdout}");
    assert!(stderr.contains("3 articles, 3 matched"), "{stderr}");
}

#[test]
fn reconcile_discrepancies_exit_one_with_json() {
    let scan = "\
1;JN-1;Jeans;M;100;1
2;JN-1;Jeans;L;100;1
3;JN-1;Jeans;XL;100;1
4;ZZ-9;Unknown;M;100;1
5;CP-5;Cap;;20;3
";
    let dir = shop(scan);
    let out = reconcile(dir.path(), &["--json"]);
    assert_eq!(out.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["meta"]["config_name"], "Test shop");
    assert!(json["missing"]["JN-1"].is_array());
    assert!(json["extra"]["JN-1"].is_array());
    assert_eq!(json["not_found"], serde_json::json!(["ZZ-9"]));
    assert!(json["not_scanned"]["JN-2"].is_object());
    assert_eq!(json["matched"], serde_json::json!(["CP-5"]));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: discrepancies found"), "{stderr}");
}

#[test]
fn reconcile_human_report() {
    let scan = "1;JN-1;Jeans;M;100;1\n2;JN-2;Jeans;S;100;1\n3;CP-5;Cap;;20;3\n";
    let dir = shop(scan);
    let out = reconcile(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Missing (1):\n  JN-1: L (need 2 more)\n"), "{stdout}");
    assert!(!stdout.contains("Extra"), "{stdout}");
}

#[test]
fn reconcile_output_file() {
    let dir = shop(CLEAN_SCAN);
    let result_path = dir.path().join("result.json");
    let out = reconcile(dir.path(), &["--output", result_path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("wrote "), "{stderr}");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&result_path).unwrap()).unwrap();
    assert_eq!(written["summary"]["matched_articles"], 3);
}

#[test]
fn reconcile_catalog_dir_override() {
    let dir = shop(CLEAN_SCAN);
    let empty = tempfile::tempdir().unwrap();
    let out = reconcile(
        dir.path(),
        &["--catalog-dir", empty.path().to_str().unwrap(), "--json"],
    );

    // Unreadable catalogs read as empty: every scanned article is not found
    assert_eq!(out.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["not_found"].as_array().map(Vec::len), Some(3));
}

#[test]
fn reconcile_missing_scan_is_io_error() {
    let dir = shop(CLEAN_SCAN);
    let out = stockcheck()
        .arg("reconcile")
        .arg(dir.path().join("nope.csv"))
        .arg("--config")
        .arg(dir.path().join("shop.toml"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error:"), "{stderr}");
    assert!(stderr.contains("hint:"), "{stderr}");
}

// ---------------------------------------------------------------------------
// validate / categories
// ---------------------------------------------------------------------------

#[test]
fn validate_good_config() {
    let dir = shop("");
    let out = stockcheck()
        .arg("validate")
        .arg(dir.path().join("shop.toml"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("config valid: \"Test shop\", 2 categories (1 sized)"), "{stderr}");
}

#[test]
fn validate_unknown_category_exits_four() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, CONFIG.replace("categories = [\"caps\"]", "categories = [\"hats\"]"))
        .unwrap();

    let out = stockcheck().arg("validate").arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("hats"), "{stderr}");
}

#[test]
fn validate_unparseable_config_exits_four() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "name = ").unwrap();

    let out = stockcheck().arg("validate").arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn categories_lists_prefixes() {
    let dir = shop("");
    let out = stockcheck()
        .arg("categories")
        .arg("--config")
        .arg(dir.path().join("shop.toml"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let jeans = stdout.lines().find(|l| l.trim_start().starts_with("jeans")).unwrap();
    assert!(jeans.contains("Jeans"));
    assert!(jeans.contains("prefixes: JN"));
    let caps = stdout.lines().find(|l| l.trim_start().starts_with("caps")).unwrap();
    assert!(caps.contains("sizeless"));
}

#[test]
fn categories_builtin_config() {
    let out = stockcheck().arg("categories").output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert!(!out.stdout.is_empty());
}

// ---------------------------------------------------------------------------
// lookup
// ---------------------------------------------------------------------------

fn lookup(dir: &Path, article: &str) -> Output {
    stockcheck()
        .args(["lookup", article, "--json", "--config"])
        .arg(dir.join("shop.toml"))
        .output()
        .unwrap()
}

#[test]
fn lookup_found_article() {
    let dir = shop("");
    let out = lookup(dir.path(), "jn 1");
    assert_eq!(out.status.code(), Some(0));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["found_in"], "jeans");
    assert_eq!(json["sizes"], serde_json::json!(["M", "L"]));
}

#[test]
fn lookup_absent_article_exits_one() {
    let dir = shop("");
    let out = lookup(dir.path(), "JN-404");
    assert_eq!(out.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["found_in"], serde_json::Value::Null);
    assert_eq!(json["categories"], serde_json::json!(["jeans"]));
}

#[test]
fn lookup_unknown_prefix_hints_categories() {
    let dir = shop("");
    let out = lookup(dir.path(), "QQ-1");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("stockcheck categories"), "{stderr}");
}

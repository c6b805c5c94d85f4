//! End-to-end runs of the `record-kit` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn record_kit() -> Command {
    Command::cargo_bin("record-kit").unwrap()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn help_lists_every_subcommand() {
    record_kit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("area"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("car-age"))
        .stdout(predicate::str::contains("validate-keys"));
}

#[test]
fn area_is_unrounded_by_default() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "circle.json", r#"{"shape":"circle","radius":2}"#);
    record_kit()
        .args(["area", "-i", &input])
        .assert()
        .success()
        .stdout("{\"shape\":\"circle\",\"area\":12.566370614359172}\n");
}

#[test]
fn area_precision_rounds_for_display() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "circle.json", r#"{"shape":"circle","radius":2}"#);
    record_kit()
        .args(["area", "--precision", "2", "-i", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("12.57"));
}

#[test]
fn area_rejects_unknown_shape() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "tri.json", r#"{"shape":"triangle","base":1}"#);
    record_kit()
        .args(["area", "-i", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shape `triangle`"));
}

#[test]
fn area_precision_outside_f64_digits_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "circle.json", r#"{"shape":"circle","radius":2}"#);
    record_kit()
        .args(["area", "--precision", "400", "-i", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--precision"));
    record_kit()
        .args(["area", "--precision", "17", "-i", &input])
        .assert()
        .success()
        .stdout("{\"shape\":\"circle\",\"area\":12.566370614359172}\n");
}

#[test]
fn fatal_errors_are_reported_once() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "tri.json", r#"{"shape":"triangle"}"#);
    record_kit()
        .args(["area", "-i", &input])
        .assert()
        .failure()
        .stderr(predicate::function(|err: &str| err.matches("unknown shape").count() == 1));
}

#[test]
fn area_over_ndjson_with_jq_filter() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "shapes.ndjson",
        "{\"item\":{\"shape\":\"rectangle\",\"height\":2,\"width\":3}}\n\n{\"item\":{\"shape\":\"rectangle\",\"height\":4,\"width\":5}}\n",
    );
    record_kit()
        .args(["area", "--ndjson", "--jq-expr", ".item", "-i", &input])
        .assert()
        .success()
        .stdout("{\"shape\":\"rectangle\",\"area\":6.0}\n{\"shape\":\"rectangle\",\"area\":20.0}\n");
}

#[test]
fn merge_typed_profile() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "merge.json",
        r#"{"profile":{"name":"Ada","age":36,"email":"ada@example.com"},"updates":{"age":37}}"#,
    );
    record_kit()
        .args(["merge", "-i", &input])
        .assert()
        .success()
        .stdout("{\"name\":\"Ada\",\"age\":37,\"email\":\"ada@example.com\"}\n");
}

#[test]
fn merge_untyped_keeps_extra_keys() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "merge.json",
        r#"{"profile":{"name":"Ada","city":"London"},"updates":{"city":null,"pet":"cat"}}"#,
    );
    record_kit()
        .args(["merge", "--untyped", "-i", &input])
        .assert()
        .success()
        .stdout("{\"name\":\"Ada\",\"city\":null,\"pet\":\"cat\"}\n");
}

#[test]
fn merge_reports_bad_field_path() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "merge.json",
        r#"{"profile":{"name":"Ada","age":"thirty","email":"a@b.c"},"updates":{}}"#,
    );
    record_kit()
        .args(["merge", "-i", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile.age"));
}

#[test]
fn car_age_with_pinned_year() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "car.json", r#"{"make":"Toyota","model":"Corolla","year":2016}"#);
    record_kit()
        .args(["car-age", "--current-year", "2026", "-i", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"age\":10"))
        .stdout(predicate::str::contains("10 years old (assuming current year is 2026)"));
}

#[test]
fn car_age_handles_extreme_model_years() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "car.json", r#"{"make":"Old","model":"Cart","year":-2147483648}"#);
    record_kit()
        .args(["car-age", "--current-year", "2026", "-i", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"age\":2147485674"));
}

#[test]
fn validate_keys_reports_first_missing() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "obj.ndjson", "{\"a\":1,\"b\":2}\n{\"a\":1}\n");
    record_kit()
        .args(["validate-keys", "--ndjson", "-k", "a", "-k", "c", "-k", "b", "-i", &input])
        .assert()
        .success()
        .stdout("{\"valid\":false,\"missing\":\"c\"}\n{\"valid\":false,\"missing\":\"c\"}\n");
}

#[test]
fn validate_keys_strict_fails_on_missing() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "obj.json", r#"{"a":1}"#);
    record_kit()
        .args(["validate-keys", "--strict", "-k", "a", "-k", "z", "-i", &input])
        .assert()
        .code(1);
    record_kit()
        .args(["validate-keys", "--strict", "-k", "a", "-i", &input])
        .assert()
        .success()
        .stdout("{\"valid\":true,\"missing\":null}\n");
}

#[test]
fn json_pointer_selects_subnode_and_output_file_is_written() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "doc.json", r#"{"data":{"car":{"make":"VW","model":"Golf","year":2000}}}"#);
    let out = dir.path().join("nested/out.ndjson");
    record_kit()
        .args(["car-age", "--current-year", "2025", "--json-pointer", "/data/car", "-i", &input, "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("\"age\":25"), "{written}");
}

#[test]
fn glob_inputs_expand() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.json", r#"{"shape":"rectangle","height":1,"width":1}"#);
    write(&dir, "b.json", r#"{"shape":"rectangle","height":2,"width":2}"#);
    let pattern = dir.path().join("*.json").to_string_lossy().into_owned();
    record_kit()
        .args(["area", "-i", &pattern])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"area\":1.0").and(predicate::str::contains("\"area\":4.0")));
}

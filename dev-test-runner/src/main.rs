//! Replays `fixtures/*.json` case files against `record_kit`.
//!
//! Usage: `dev-test-runner [FIXTURE_DIR]` (defaults to this crate's `fixtures/`).
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;
use once_cell::sync::Lazy;
use record_kit::{Car, FixedYear, Profile, ProfileUpdate, Shape};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

static FIXTURE_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-]+\.json$").unwrap());

const AREA_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Case {
    Area {
        name: String,
        input: Value,
        #[serde(default)]
        precision: Option<u32>,
        /// `null` means the input must be rejected
        expect: Option<f64>,
    },
    Merge {
        name: String,
        profile: Profile,
        updates: ProfileUpdate,
        expect: Profile,
    },
    CarAge {
        name: String,
        car: Car,
        current_year: i32,
        expect_match: String,
    },
    ValidateKeys {
        name: String,
        obj: Value,
        keys: Vec<String>,
        expect: bool,
    },
}

impl Case {
    fn name(&self) -> &str {
        match self {
            Case::Area { name, .. }
            | Case::Merge { name, .. }
            | Case::CarAge { name, .. }
            | Case::ValidateKeys { name, .. } => name,
        }
    }

    /// `Err` carries a human-readable mismatch.
    fn check(&self) -> Result<(), String> {
        match self {
            Case::Area { input, precision, expect, .. } => {
                let got = Shape::from_value(input).map(|shape| {
                    let area = record_kit::calculate_shape_area(&shape);
                    precision.map_or(area, |places| record_kit::round_area(area, places))
                });
                match (got, expect) {
                    (Ok(got), Some(want)) if (got - want).abs() <= AREA_TOLERANCE => Ok(()),
                    (Err(_), None) => Ok(()),
                    (got, want) => Err(format!("expected {want:?}, got {got:?}")),
                }
            }
            Case::Merge { profile, updates, expect, .. } => {
                let got = record_kit::update_profile(profile, updates);
                if &got == expect { Ok(()) } else { Err(format!("expected {expect:?}, got {got:?}")) }
            }
            Case::CarAge { car, current_year, expect_match, .. } => {
                let pattern = Regex::new(expect_match).map_err(|e| format!("bad expect_match: {e}"))?;
                let got = car.describe_age(&FixedYear(*current_year));
                if pattern.is_match(&got) { Ok(()) } else { Err(format!("`{got}` !~ /{expect_match}/")) }
            }
            Case::ValidateKeys { obj, keys, expect, .. } => {
                let got = record_kit::validate_keys(obj, keys);
                if got == *expect { Ok(()) } else { Err(format!("expected {expect}, got {got}")) }
            }
        }
    }
}

fn fixture_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_fixture = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| FIXTURE_FILE.is_match(name));
        if is_fixture {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn main() -> ExitCode {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));

    let files = match fixture_files(&dir) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("❌ failed to list fixtures in {}: {error}", dir.display());
            return ExitCode::FAILURE;
        }
    };

    let (mut passed, mut failed) = (0usize, 0usize);
    for file in files {
        let source = match std::fs::read_to_string(&file) {
            Ok(x) => x,
            Err(error) => {
                eprintln!("❌ {}: {error}", file.display());
                failed += 1;
                continue;
            }
        };
        let cases = match record_kit::path_de::from_str_with_path::<Vec<Case>>(&source) {
            Ok(x) => x,
            Err(error) => {
                eprintln!("❌ {}: {error}", file.display());
                failed += 1;
                continue;
            }
        };
        eprintln!("—— {} ——", file.display());
        for case in &cases {
            match case.check() {
                Ok(()) => {
                    passed += 1;
                    eprintln!("{} {}", "✅".green(), case.name());
                }
                Err(why) => {
                    failed += 1;
                    eprintln!("{} {}: {why}", "❌".red(), case.name());
                }
            }
        }
    }

    eprintln!("{passed} passed, {failed} failed");
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

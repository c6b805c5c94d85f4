//! CLI: read JSON/NDJSON documents → run one record utility per document
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::car::{Car, Clock, FixedYear, SystemClock};
use crate::profile::{Profile, ProfileUpdate};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// run shape-area, profile-merge, car-age and key-validation over JSON records
#[derive(Parser, Debug)]
#[command(name = "record-kit", version)]
pub struct CommandLineInterface {
    /// more log output on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// area of each `{"shape": "circle"|"rectangle", ...}` document
    Area(AreaOut),
    /// overlay `updates` onto `profile` for each `{"profile", "updates"}` document
    Merge(MergeOut),
    /// describe the age of each `{"make", "model", "year"}` document
    CarAge(CarAgeOut),
    /// check that each document has every `--key`
    ValidateKeys(ValidateKeysOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// output file, one JSON value per line (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct AreaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// round reported areas to this many decimal places (0-17)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=i64::from(crate::shape::MAX_ROUND_PLACES)))]
    precision: Option<u32>,
}

#[derive(clap::Parser, Debug)]
struct MergeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// merge arbitrary objects instead of typed profiles
    #[arg(long)]
    untyped: bool,
}

#[derive(clap::Parser, Debug)]
struct CarAgeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// pin the current calendar year instead of reading the system clock
    #[arg(long)]
    current_year: Option<i32>,
}

#[derive(clap::Parser, Debug)]
struct ValidateKeysOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// key expected on every document (repeatable, checked in order)
    #[arg(long = "key", short = 'k')]
    keys: Vec<String>,

    /// exit with status 1 if any document is missing a key
    #[arg(long)]
    strict: bool,
}

#[derive(Deserialize)]
struct MergeRequest<P, U> {
    profile: P,
    #[serde(default)]
    updates: U,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(Value) -> Result<()>) -> Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow!("failed to resolve input file paths: {error}"))?;
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = if source_path_str == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read stdin")?;
                buf
            } else {
                std::fs::read_to_string(&source_path)
                    .with_context(|| format!("failed to read source file ({source_path_str})"))?
            };
            tracing::debug!(source = %source_path_str, bytes = source.len(), "loaded input");
            for json_value in parse_documents(&source, self.ndjson)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?
            {
                let json_value = match self.json_pointer.as_deref() {
                    None => json_value,
                    Some(pointer) => match json_value.pointer(pointer) {
                        Some(node) => node.clone(),
                        None => {
                            tracing::warn!(source = %source_path_str, pointer, "JSON pointer matched nothing, skipping document");
                            continue;
                        }
                    },
                };
                match self.jq_expr.as_ref() {
                    None => apply(json_value)?,
                    Some(jq_expr) => {
                        let result = crate::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                            format!("failed to apply jq expression to source file ({source_path_str})")
                        })?;
                        for json_value in result {
                            apply(json_value)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl OutputSettings {
    fn emit(&self, lines: &[Value]) -> Result<()> {
        let mut text = String::new();
        for line in lines {
            text.push_str(&serde_json::to_string(line)?);
            text.push('\n');
        }
        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &text)
                .with_context(|| format!("failed to write {}", out.display()))?;
        } else {
            print!("{text}");
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Area(target) => {
                if target.output_settings.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }
                let mut lines = Vec::new();
                target.input_settings.load_process(|value| {
                    let shape = crate::shape::Shape::from_value(&value)?;
                    let area = crate::shape::calculate_shape_area(&shape);
                    let area = match target.precision {
                        Some(places) => crate::shape::round_area(area, places),
                        None => area,
                    };
                    lines.push(json!({"shape": shape.tag(), "area": area}));
                    Ok(())
                })?;
                target.output_settings.emit(&lines)?;
            }
            Command::Merge(target) => {
                if target.output_settings.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }
                let mut lines = Vec::new();
                target.input_settings.load_process(|value| {
                    let merged = if target.untyped {
                        let req: MergeRequest<Map<String, Value>, Map<String, Value>> =
                            crate::path_de::from_value_with_path(&value)?;
                        Value::Object(crate::profile::shallow_merge(&req.profile, &req.updates))
                    } else {
                        let req: MergeRequest<Profile, ProfileUpdate> =
                            crate::path_de::from_value_with_path(&value)?;
                        if req.updates.is_empty() {
                            tracing::debug!(name = %req.profile.name, "empty update, profile unchanged");
                        }
                        serde_json::to_value(crate::profile::update_profile(&req.profile, &req.updates))?
                    };
                    lines.push(merged);
                    Ok(())
                })?;
                target.output_settings.emit(&lines)?;
            }
            Command::CarAge(target) => {
                if target.output_settings.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }
                let clock: Box<dyn Clock> = match target.current_year {
                    Some(year) => Box::new(FixedYear(year)),
                    None => Box::new(SystemClock),
                };
                let current = clock.current_year();
                tracing::info!(current_year = current, pinned = target.current_year.is_some(), "car age clock");
                let mut lines = Vec::new();
                target.input_settings.load_process(|value| {
                    let car: Car = crate::path_de::from_value_with_path(&value)?;
                    lines.push(json!({
                        "make": car.make(),
                        "model": car.model(),
                        "year": car.year(),
                        "age": car.age_in(current),
                        "message": car.describe_age(&FixedYear(current)),
                    }));
                    Ok(())
                })?;
                target.output_settings.emit(&lines)?;
            }
            Command::ValidateKeys(target) => {
                if target.output_settings.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }
                let mut lines = Vec::new();
                let mut invalid = 0usize;
                target.input_settings.load_process(|value| {
                    let missing = crate::keys::first_missing_key(&value, &target.keys);
                    match missing {
                        None => eprintln!("{} document #{}", "✅".green(), lines.len()),
                        Some(key) => {
                            invalid += 1;
                            eprintln!("{} document #{} missing key `{key}`", "❌".red(), lines.len());
                        }
                    }
                    lines.push(json!({"valid": missing.is_none(), "missing": missing}));
                    Ok(())
                })?;
                target.output_settings.emit(&lines)?;
                if target.strict && invalid > 0 {
                    tracing::warn!(invalid, total = lines.len(), "documents failed key validation");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_documents(source: &str, ndjson: bool) -> Result<Vec<Value>> {
    if !ndjson {
        return Ok(vec![crate::path_de::from_str_with_path::<Value>(source)?]);
    }
    let mut out = Vec::new();
    for (index, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value = crate::path_de::from_str_with_path::<Value>(line)
            .with_context(|| format!("line {}", index + 1))?;
        out.push(value);
    }
    Ok(out)
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                match entry {
                    Ok(p) => {
                        matched_any = true;
                        out.push(p);
                    }
                    Err(e) => return Err(Box::new(e)),
                }
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                return Err(format!("glob pattern matched no files: {pattern}").into());
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

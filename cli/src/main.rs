//! keyexpr CLI - driving adapter for the keyexpr expression matcher.
//!
//! Subcommands:
//! - `eval <expression> (--keys k... | --state <file>) [--json]` - print matched keys
//! - `trace <expression> (--keys k... | --state <file>) [--json]` - print the evaluation trace
//! - `check <expression> (--keys k... | --state <file>)` - validate only
//! - `run <fixture.yaml>` - run a conformance fixture file

mod logging;

use std::process;

use keyexpr::{EvalTrace, KeyMatcher, StateConfig, MAX_EXPRESSION_LENGTH};
use keyexpr_test::fixture::Fixture;
use tracing::debug;

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "eval" => cmd_eval(&args[2..]),
        "trace" => cmd_trace(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "run" => cmd_run(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_eval(args: &[String]) -> Result<(), String> {
    let (expression, options) = parse_expression_args("eval", args)?;
    let state = options.load_state()?;
    let matcher = KeyMatcher::new(&state).map_err(|e| e.to_string())?;

    let keys = matcher.evaluate(expression).map_err(|e| e.to_string())?;
    if options.json {
        println!("{}", to_json(&keys)?);
    } else {
        for key in keys {
            println!("{key}");
        }
    }
    Ok(())
}

fn cmd_trace(args: &[String]) -> Result<(), String> {
    let (expression, options) = parse_expression_args("trace", args)?;
    let state = options.load_state()?;
    let matcher = KeyMatcher::new(&state).map_err(|e| e.to_string())?;

    let trace = matcher
        .evaluate_with_trace(expression)
        .map_err(|e| e.to_string())?;
    if options.json {
        println!("{}", to_json(&trace)?);
    } else {
        print!("{}", render_trace(&trace));
    }
    Ok(())
}

fn cmd_check(args: &[String]) -> Result<(), String> {
    let (expression, options) = parse_expression_args("check", args)?;
    let state = options.load_state()?;
    let matcher = KeyMatcher::new(&state).map_err(|e| e.to_string())?;

    let normalized = matcher
        .validate(expression)
        .map_err(|e| format!("expression invalid: {e}"))?;

    println!("Expression valid: {normalized}");
    Ok(())
}

fn cmd_run(args: &[String]) -> Result<(), String> {
    let path = args.first().ok_or("run requires a fixture file path")?;
    let yaml = read_file(path)?;
    let fixtures =
        Fixture::from_yaml_multi(&yaml).map_err(|e| format!("YAML parse error: {e}"))?;

    let mut failed = 0usize;
    let mut total = 0usize;
    for fixture in &fixtures {
        for result in fixture.run() {
            total += 1;
            if result.passed {
                println!("PASS {} / {}", fixture.name, result.case_name);
            } else {
                failed += 1;
                println!(
                    "FAIL {} / {}: expected {}, got {}",
                    fixture.name, result.case_name, result.expected, result.actual
                );
            }
        }
    }

    println!("\n{} passed, {failed} failed", total - failed);
    if failed > 0 {
        return Err(format!("{failed} of {total} cases failed"));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Output
// ═══════════════════════════════════════════════════════════════════════════════

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON encode error: {e}"))
}

fn render_trace(trace: &EvalTrace) -> String {
    let mut out = format!("normalized: {}\n", trace.normalized);

    for (i, group) in trace.groups.iter().enumerate() {
        out.push_str(&format!(
            "group[{i}]: ({}) -> [{}] => {}\n",
            group.group,
            group.matched.join(", "),
            group.rewritten
        ));
    }

    out.push_str(&format!("flat: {}\n", trace.flat.expression));
    for (i, segment) in trace.flat.segments.iter().enumerate() {
        let mark = if segment.satisfied { "+" } else { "-" };
        out.push_str(&format!(
            "  {mark} segment[{i}]: {}\n",
            segment.operands.join(" & ")
        ));
    }

    if trace.matched() {
        out.push_str(&format!("result: [{}]\n", trace.result.join(", ")));
    } else {
        out.push_str("result: (no keys matched)\n");
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// State loading
// ═══════════════════════════════════════════════════════════════════════════════

fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))
}

fn load_state(path: &str) -> Result<StateConfig, String> {
    let content = read_file(path)?;

    let is_json = std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    keys: Option<Vec<String>>,
    state_path: Option<String>,
    json: bool,
}

impl Options {
    fn load_state(&self) -> Result<StateConfig, String> {
        match (&self.keys, &self.state_path) {
            (Some(keys), None) => Ok(keys.iter().cloned().collect()),
            (None, Some(path)) => {
                let state = load_state(path)?;
                debug!(path, keys = state.len(), "loaded state file");
                Ok(state)
            }
            (Some(_), Some(_)) => Err("use either --keys or --state, not both".into()),
            (None, None) => Err("state keys required: pass --keys k... or --state <file>".into()),
        }
    }
}

fn parse_expression_args<'a>(
    command: &str,
    args: &'a [String],
) -> Result<(&'a str, Options), String> {
    let expression = args
        .first()
        .ok_or_else(|| format!("{command} requires an expression"))?;

    if expression.len() > MAX_EXPRESSION_LENGTH {
        return Err(format!(
            "expression length is {}, but maximum allowed is {MAX_EXPRESSION_LENGTH}",
            expression.len()
        ));
    }

    Ok((expression.as_str(), parse_options(&args[1..])?))
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--keys" => {
                i += 1;
                let keys = options.keys.get_or_insert_with(Vec::new);
                while i < args.len() && !args[i].starts_with("--") {
                    keys.extend(
                        args[i]
                            .split(',')
                            .map(str::trim)
                            .filter(|k| !k.is_empty())
                            .map(str::to_owned),
                    );
                    i += 1;
                }
            }
            "--state" => {
                let path = args.get(i + 1).ok_or("--state requires a file path")?;
                options.state_path = Some(path.clone());
                i += 2;
            }
            "--json" => {
                options.json = true;
                i += 1;
            }
            other => return Err(format!("unexpected argument \"{other}\"")),
        }
    }

    Ok(options)
}

fn print_usage() {
    eprintln!(
        "Usage: keyexpr <command> [options]

Commands:
  eval <expression> (--keys k... | --state <file>) [--json]    Print matched keys
  trace <expression> (--keys k... | --state <file>) [--json]   Print the evaluation trace
  check <expression> (--keys k... | --state <file>)            Validate only
  run <fixture.yaml>                                           Run a conformance fixture
  help                                                         Show this help

Set RUST_LOG=keyexpr=debug to log each group rewrite."
    );
}

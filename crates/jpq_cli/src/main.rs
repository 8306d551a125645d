use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use jpq_core::{Error, JsonPath};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!(
        "jpq {VERSION} - dot-notation JSON query tool

Usage: jpq [OPTIONS] <PATH> [FILE]

Arguments:
  <PATH>    Path expression (e.g. \"store.book[0].title\")
  [FILE]    Input JSON file (reads from stdin if omitted)

Options:
  -r, --root <PATH>  Root path prefixed to the query
  -h, --help         Show this help message
  -V, --version      Show version"
    );
}

fn print_version() {
    println!("jpq {VERSION}");
}

enum ParsedArgs {
    Help,
    Version,
    Query {
        path: String,
        file: Option<String>,
        root: Option<String>,
    },
}

fn parse_args() -> Result<ParsedArgs, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        return Err("missing required argument: <PATH>\n\nUsage: jpq [OPTIONS] <PATH> [FILE]\n\nFor more information, try '--help'".to_string());
    }

    let mut positional = Vec::new();
    let mut root = None;
    let mut index = 0;

    while index < args.len() {
        let arg = &args[index];
        match arg.as_str() {
            "-h" | "--help" => return Ok(ParsedArgs::Help),
            "-V" | "--version" => return Ok(ParsedArgs::Version),
            "-r" | "--root" => {
                index += 1;
                match args.get(index) {
                    Some(value) => root = Some(value.clone()),
                    None => {
                        return Err(format!("option '{arg}' requires a value\n\nUsage: jpq [OPTIONS] <PATH> [FILE]\n\nFor more information, try '--help'"));
                    }
                }
            }
            s if s.starts_with('-') && s.len() > 1 => {
                return Err(format!("unknown option: {s}\n\nUsage: jpq [OPTIONS] <PATH> [FILE]\n\nFor more information, try '--help'"));
            }
            _ => positional.push(arg.clone()),
        }
        index += 1;
    }

    match positional.len() {
        0 => Err("missing required argument: <PATH>\n\nUsage: jpq [OPTIONS] <PATH> [FILE]\n\nFor more information, try '--help'".to_string()),
        1 => Ok(ParsedArgs::Query {
            path: positional.into_iter().next().unwrap_or_default(),
            file: None,
            root,
        }),
        2 => {
            let mut iter = positional.into_iter();
            Ok(ParsedArgs::Query {
                path: iter.next().unwrap_or_default(),
                file: iter.next(),
                root,
            })
        }
        _ => Err("too many arguments\n\nUsage: jpq [OPTIONS] <PATH> [FILE]\n\nFor more information, try '--help'".to_string()),
    }
}

fn read_input(file: Option<&str>) -> Result<String, String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("error reading file '{path}': {e}"))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("error reading stdin: {e}"))?;
            Ok(buffer)
        }
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    match args {
        ParsedArgs::Help => {
            print_help();
            Ok(())
        }
        ParsedArgs::Version => {
            print_version();
            Ok(())
        }
        ParsedArgs::Query { path, file, root } => {
            let input = read_input(file.as_deref())?;

            let mut json_path =
                JsonPath::new(&input).map_err(|e| format!("error parsing JSON: {e}"))?;
            if let Some(root) = root {
                json_path.set_root(root);
            }

            let result = json_path.get(&path).map_err(|e| match e {
                Error::Path(e) => format!("error parsing path: {e}"),
                other => format!("error evaluating path: {other}"),
            })?;

            let output = serde_json::to_string_pretty(&result)
                .map_err(|e| format!("error serializing output: {e}"))?;

            println!("{output}");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    // RUST_LOG controls verbosity, defaulting to warn
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("jpq: {e}");
            ExitCode::FAILURE
        }
    }
}

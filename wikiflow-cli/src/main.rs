// Command-line interface for wikiflow
//
// This binary reads wiki-markup event streams (as produced by the upstream markup parser and
// stored as JSON), normalizes their headings and sections, and renders them.
//
// Usage:
//  wikiflow normalize <input> [--section-open] [--to <format>] [--output <file>]
//  wikiflow inspect <input> [<format>]       - Render a stream as is (defaults to "tag")
//  wikiflow check <input> [--section-open]   - Normalize, then verify heading/section balance
//  wikiflow --list-formats                   - List available formats
//
// Configuration:
//
// Defaults are embedded by wikiflow-config. A wikiflow.toml in the working directory is layered
// on top when present, then the file given with --config.
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix; known keys override the configuration, the rest is
// passed to the format.
// Example:
//  wikiflow inspect page.json --extra-show-spans false

use clap::{Arg, ArgAction, Command, ValueHint};
use log::{LevelFilter, Log, Metadata, Record};
use std::collections::HashMap;
use std::fs;
use std::str::FromStr;
use wikiflow::{
    check_balance, Event, EventStream, FormatRegistry, HeadingNormalizer, NormalizeOptions,
    ParseContext,
};
use wikiflow_config::{Loader, WikiflowConfig};

/// Event streams are always read as JSON.
const INPUT_FORMAT: &str = "json";

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Path to a JSON event stream")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn section_open_arg() -> Arg {
    Arg::new("section-open")
        .long("section-open")
        .help("Start as if a section opened earlier on the page were still open")
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("wikiflow")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Normalize headings and sections in wiki-markup event streams")
        .long_about(
            "wikiflow rewrites the flat event stream of a parsed wiki page so that every\n\
            heading is an ENTER/EXIT pair and every outline heading opens a section.\n\n\
            Commands:\n  \
            - normalize: Rewrite a stream and write the result\n  \
            - inspect:   Render a stream without rewriting it\n  \
            - check:     Rewrite a stream and verify that it nests properly\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            wikiflow normalize page.json                 # Normalized stream as JSON\n  \
            wikiflow normalize page.json --to tag        # Normalized stream as tags\n  \
            wikiflow inspect page.json                   # Raw stream as tags\n  \
            wikiflow check page.json --section-open      # Balance report",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a wikiflow.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("normalize")
                .about("Normalize headings and sections")
                .arg(input_arg())
                .arg(section_open_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Output format")
                        .default_value("json")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Render an event stream without normalizing it")
                .arg(input_arg())
                .arg(
                    Arg::new("format")
                        .help("Output format. Defaults to 'tag'")
                        .required(false)
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Normalize, then verify heading and section balance")
                .arg(input_arg())
                .arg(section_open_arg()),
        )
}

/// Writes log records to stderr.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);
    let matches = build_cli().get_matches_from(&cleaned_args);

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    init_logging(log_level(&config, matches.get_flag("verbose")));

    match matches.subcommand() {
        Some(("normalize", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let to = sub_matches
                .get_one::<String>("to")
                .map(|s| s.as_str())
                .unwrap_or("json");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let section_open = sub_matches.get_flag("section-open");
            handle_normalize_command(input, to, output, section_open, &extra_params, &config);
        }
        Some(("inspect", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let format = sub_matches
                .get_one::<String>("format")
                .map(|s| s.as_str())
                .unwrap_or("tag");
            handle_inspect_command(input, format, &extra_params, &config);
        }
        Some(("check", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let section_open = sub_matches.get_flag("section-open");
            handle_check_command(input, section_open, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn read_events(path: &str, registry: &FormatRegistry) -> Vec<Event> {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    registry.parse(&source, INPUT_FORMAT).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    })
}

fn normalize_events(
    events: Vec<Event>,
    section_open: bool,
    normalizer: &HeadingNormalizer,
) -> (EventStream, ParseContext) {
    let mut stream = EventStream::new(events);
    let mut context = ParseContext::with_section_open(section_open);

    normalizer.run(&mut stream, &mut context).unwrap_or_else(|e| {
        eprintln!("Normalization error: {e}");
        std::process::exit(1);
    });
    log::info!(
        "normalized {} events, section open: {}",
        stream.len(),
        context.section_open
    );

    (stream, context)
}

/// Handle the normalize command
fn handle_normalize_command(
    input: &str,
    to: &str,
    output: Option<&str>,
    section_open: bool,
    extra_params: &HashMap<String, String>,
    config: &WikiflowConfig,
) {
    let registry = FormatRegistry::default();
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let events = read_events(input, &registry);
    let normalizer = HeadingNormalizer::new(NormalizeOptions::from(&config.normalize));
    let (stream, _) = normalize_events(events, section_open, &normalizer);

    let params = format_params(config, to, extra_params);
    let result = registry
        .serialize_with_options(stream.as_slice(), to, &params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    input: &str,
    format: &str,
    extra_params: &HashMap<String, String>,
    config: &WikiflowConfig,
) {
    let registry = FormatRegistry::default();
    if let Err(e) = registry.get(format) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let events = read_events(input, &registry);
    let params = format_params(config, format, extra_params);
    let output = registry
        .serialize_with_options(&events, format, &params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the check command
fn handle_check_command(input: &str, section_open: bool, config: &WikiflowConfig) {
    let registry = FormatRegistry::default();
    let events = read_events(input, &registry);
    let normalizer = HeadingNormalizer::new(NormalizeOptions::from(&config.normalize));
    let (stream, _) = normalize_events(events, section_open, &normalizer);

    let report = check_balance(stream.as_slice(), section_open, normalizer.options())
        .unwrap_or_else(|e| {
            eprintln!("Unbalanced stream: {e}");
            std::process::exit(1);
        });

    let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    println!("{json}");
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let mode = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "read/write",
            (true, false) => "read",
            (false, true) => "write",
            (false, false) => "-",
        };
        println!("  {name:<8} {mode:<10} {}", format.description());
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> WikiflowConfig {
    let loader = Loader::new().with_optional_file("wikiflow.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn log_level(config: &WikiflowConfig, verbose: bool) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    LevelFilter::from_str(&config.log.level).unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}' in configuration", config.log.level);
        std::process::exit(1);
    })
}

fn apply_config_overrides(
    config: &mut WikiflowConfig,
    extra_params: &mut HashMap<String, String>,
) {
    if let Some(raw) = extra_params.remove("pretty") {
        config.output.pretty = parse_bool_arg("pretty", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["show-spans", "spans"]) {
        config.inspect.show_spans = parse_bool_arg("show-spans", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["show-attributes", "attributes"]) {
        config.inspect.show_attributes = parse_bool_arg("show-attributes", &raw);
    }
    if let Some(raw) = extra_params.remove("outline-context") {
        config.normalize.outline_context = raw;
    }
}

/// Format options derived from the configuration, then the remaining extras.
fn format_params(
    config: &WikiflowConfig,
    format: &str,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();

    match format {
        "json" => {
            params.insert("pretty".to_string(), config.output.pretty.to_string());
        }
        "tag" => {
            params.insert(
                "show-spans".to_string(),
                config.inspect.show_spans.to_string(),
            );
            params.insert(
                "show-attributes".to_string(),
                config.inspect.show_attributes.to_string(),
            );
        }
        _ => {}
    }

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

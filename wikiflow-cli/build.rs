use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
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

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = build_cli();

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "wikiflow", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "wikiflow", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "wikiflow", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}

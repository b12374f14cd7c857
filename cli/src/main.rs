use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::fs;
use std::path::{Path, PathBuf};

use hexgen_compiler::descriptors::DescriptorExtractor;
use hexgen_compiler::event_specs::read_event_specs;
use hexgen_compiler::prefs::extract_prefs;
use hexgen_compiler::signatures::extract_signatures;
use hexgen_compiler::{
    check_output, compile_events, compile_prefs, rewrite_signatures, write_output, GenError,
    GeneratorConfig,
};

#[derive(Parser)]
#[command(name = "hexgen")]
#[command(about = "Generate print event, preference and plugin handle bindings", long_about = None)]
struct Cli {
    /// JSON file overriding the default generator settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory that relative input and output paths are resolved against
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate `print_event!` lines from the descriptor arrays and the event table
    Events {
        /// C source holding the field label arrays
        #[arg(short, long)]
        descriptors: Option<PathBuf>,

        /// Text event table, five lines per event
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Output `.rs` file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the parsed descriptors and events as JSON instead of generating
        #[arg(long)]
        json: bool,

        /// Fail if the output file is not up to date instead of writing it
        #[arg(long)]
        check: bool,
    },

    /// Generate `pref!` lines from the preference table
    Prefs {
        /// C source holding the preference table
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output `.rs` file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the parsed preferences as JSON instead of generating
        #[arg(long)]
        json: bool,

        /// Fail if the output file is not up to date instead of writing it
        #[arg(long)]
        check: bool,
    },

    /// Rewrite `unsafe fn` vtable declarations into forwarding wrappers
    Rewrite {
        /// Rust source holding the raw declarations
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output `.rs` file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the parsed signatures as JSON instead of rewriting
        #[arg(long)]
        json: bool,

        /// Fail if the output file is not up to date instead of writing it
        #[arg(long)]
        check: bool,
    },

    /// Run every generator with the configured paths
    All {
        /// Fail if any output file is not up to date instead of writing it
        #[arg(long)]
        check: bool,
    },
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn resolve(root: &Path, path: Option<&PathBuf>, default: &Path) -> PathBuf {
    root.join(path.map_or(default, |p| p.as_path()))
}

fn read(path: &Path) -> Result<String, GenError> {
    fs::read_to_string(path).map_err(GenError::Io)
}

fn emit(path: &Path, contents: &str, check: bool) -> Result<(), GenError> {
    if check {
        check_output(path, contents)
    } else {
        write_output(path, contents)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), GenError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), GenError> {
    let cli = Cli::parse();

    let _ = SimpleLogger::new().with_level(level(cli.verbose)).init();

    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(&cli.root.join(path))?,
        None => GeneratorConfig::default(),
    };
    let paths = &config.paths;
    let root = cli.root.as_path();

    match &cli.command {
        Commands::Events { descriptors, events, output, json, check } => {
            let descriptors_text = read(&resolve(root, descriptors.as_ref(), &paths.descriptors))?;
            let events_text = read(&resolve(root, events.as_ref(), &paths.events))?;
            if *json {
                let descriptors = DescriptorExtractor::new(&descriptors_text, config.descriptor_header_lines)
                    .collect::<Result<Vec<_>, _>>()?;
                let events = read_event_specs(&events_text, config.event_stride)?;
                return print_json(&serde_json::json!({
                    "descriptors": descriptors,
                    "events": events,
                }));
            }
            let generated = compile_events(&descriptors_text, &events_text, &config)?;
            emit(&resolve(root, output.as_ref(), &paths.events_output), &generated, *check)
        }

        Commands::Prefs { input, output, json, check } => {
            let text = read(&resolve(root, input.as_ref(), &paths.prefs))?;
            if *json {
                return print_json(&extract_prefs(&text, config.pref_header_lines)?);
            }
            let generated = compile_prefs(&text, &config)?;
            emit(&resolve(root, output.as_ref(), &paths.prefs_output), &generated, *check)
        }

        Commands::Rewrite { input, output, json, check } => {
            let text = read(&resolve(root, input.as_ref(), &paths.signatures))?;
            if *json {
                return print_json(&extract_signatures(&text)?);
            }
            let rewritten = rewrite_signatures(&text, &config)?;
            emit(&resolve(root, output.as_ref(), &paths.signatures_output), &rewritten.text, *check)
        }

        Commands::All { check } => {
            let generated = compile_events(
                &read(&root.join(&paths.descriptors))?,
                &read(&root.join(&paths.events))?,
                &config,
            )?;
            emit(&root.join(&paths.events_output), &generated, *check)?;

            let generated = compile_prefs(&read(&root.join(&paths.prefs))?, &config)?;
            emit(&root.join(&paths.prefs_output), &generated, *check)?;

            let rewritten = rewrite_signatures(&read(&root.join(&paths.signatures))?, &config)?;
            emit(&root.join(&paths.signatures_output), &rewritten.text, *check)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level(0), LevelFilter::Warn);
        assert_eq!(level(2), LevelFilter::Debug);
        assert_eq!(level(9), LevelFilter::Trace);
    }

    #[test]
    fn flags_override_configured_paths() {
        let root = Path::new("/repo");
        let override_path = PathBuf::from("other.c");
        assert_eq!(
            resolve(root, Some(&override_path), Path::new("src/text.c")),
            PathBuf::from("/repo/other.c")
        );
        assert_eq!(resolve(root, None, Path::new("src/text.c")), PathBuf::from("/repo/src/text.c"));
    }
}

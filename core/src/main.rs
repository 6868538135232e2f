use clap::Parser;
use dicat_core::cli::{Cli, Command, InputArgs, OutputFormat};
use dicat_core::{AnonymizeOptions, Anonymizer, ArchiveReport, FieldSet, Result, TextReport};
use log::{error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Show { input, format } => show(&input, format),
        Command::Anonymize {
            input,
            set,
            output,
            remove_source,
        } => {
            let mut options = AnonymizeOptions::default()
                .remove_source(remove_source)
                .with_tool(input.tool);
            if let Some(dir) = output {
                options = options.with_output_dir(dir);
            }
            anonymize(&input, &set, &options)
        }
    }
}

fn load_fields(path: Option<&Path>) -> Result<FieldSet> {
    match path {
        Some(path) => FieldSet::load(path),
        None => FieldSet::default_fields(),
    }
}

fn show(input: &InputArgs, format: OutputFormat) -> Result<()> {
    let mut fields = load_fields(input.fields.as_deref())?;
    let anonymizer = Anonymizer::from_options(&AnonymizeOptions::default().with_tool(input.tool))?;
    let source = anonymizer.read_values(&input.directory, &mut fields)?;

    match format {
        OutputFormat::Text => println!("{}", TextReport::new(&fields, &source)),
        OutputFormat::Json => println!("{}", output_json(&fields, &source, anonymizer.tool_name())?),
    }
    Ok(())
}

fn anonymize(
    input: &InputArgs,
    overrides: &[(String, String)],
    options: &AnonymizeOptions,
) -> Result<()> {
    let mut fields = load_fields(input.fields.as_deref())?;
    let anonymizer = Anonymizer::from_options(options)?;

    info!("Processing directory: {}", input.directory.display());
    anonymizer.read_values(&input.directory, &mut fields)?;
    fields.apply_overrides(overrides)?;

    let pair = anonymizer.anonymize(&input.directory, &fields, options)?;
    println!("{}", ArchiveReport::new(&pair, anonymizer.tool_name()));
    Ok(())
}

fn output_json(fields: &FieldSet, source: &Path, tool: &str) -> Result<String> {
    #[derive(Serialize)]
    struct ShowJson<'a> {
        source: PathBuf,
        tool: &'a str,
        fields: &'a FieldSet,
    }

    let output = ShowJson {
        source: source.to_path_buf(),
        tool,
        fields,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

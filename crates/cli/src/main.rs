mod output;

use anyhow::{Context, Result};
use argspec::{AppInfo, OptionSpec, Palette, ParsedArgs, PositionalSpec, Schema};
use argspec_metadata::SchemaDoc;
use std::{fs, io, path::Path, process::ExitCode};
use tracing_subscriber::{EnvFilter, fmt};

use crate::output::Format;

fn cli_schema() -> Result<Schema> {
    let version = semver::Version::parse(env!("CARGO_PKG_VERSION"))?;
    let app = AppInfo::with_version(
        "argspec",
        "Parse an argument list against a JSON schema document\nand print the typed result.",
        version,
    );
    let schema = Schema::builder(app)
        .option(
            OptionSpec::value("format")
                .short('f')
                .long("format")
                .metavar("FORMAT")
                .description("Output format.")
                .possible_values(["text", "json"])
                .default_value("text"),
        )
        .option(
            OptionSpec::flag("print-help")
                .long("print-help")
                .description("Print the schema's help text instead of parsing.")
                .conflicts_with(["print-shape"]),
        )
        .option(
            OptionSpec::flag("print-shape")
                .long("print-shape")
                .description("Print the result slots the schema synthesizes.")
                .conflicts_with(["print-help"]),
        )
        .option(
            OptionSpec::flag("quiet")
                .short('q')
                .long("quiet")
                .description("Suppress log output."),
        )
        .positional(PositionalSpec::new("schema").description("Path to a JSON schema document."))
        .positional(
            PositionalSpec::new("args")
                .metavar("ARG")
                .description("Arguments to parse against the schema.")
                .capture_remaining(),
        )
        .build()?;
    Ok(schema)
}

fn main() -> Result<ExitCode> {
    let cli = cli_schema()?;
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = cli.parse_or_exit(&argv);

    init_tracing(args.flag("quiet"));
    run(&args)
}

fn run(args: &ParsedArgs<'_>) -> Result<ExitCode> {
    let path = Path::new(args.get("schema").unwrap_or_default());
    let schema = load_schema(path)?;

    if args.flag("print-help") {
        print!("{}", schema.help());
        return Ok(ExitCode::SUCCESS);
    }
    if args.flag("print-shape") {
        print!("{}", output::shape(&schema));
        return Ok(ExitCode::SUCCESS);
    }

    let target_argv = args.get_all("args").unwrap_or_default();
    tracing::debug!(schema = %path.display(), argc = target_argv.len(), "parsing arguments");

    match schema.parse(target_argv) {
        Ok(parsed) => {
            let format = Format::from_arg(args.get("format").unwrap_or_default());
            print!("{}", output::render(&parsed, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if !err.is_fatal() => {
            err.report(&mut io::stdout().lock(), Palette::plain())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(kind = ?err.kind(), "parse failed");
            err.report(&mut io::stderr().lock(), Palette::for_stderr())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_schema(path: &Path) -> Result<Schema> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema document: {}", path.display()))?;
    let doc = SchemaDoc::from_json(&json)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let schema = doc
        .to_schema()
        .with_context(|| format!("invalid schema in {}", path.display()))?;
    tracing::debug!(
        name = schema.app().name(),
        slots = schema.shape().len(),
        "loaded schema"
    );
    Ok(schema)
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

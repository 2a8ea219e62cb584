//! CLI: declarations -> (mock values | parsed model | diagnostics), JSON -> declarations
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing::{Level, info};

use crate::generate::{GenerateConfig, GenerateOutput};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate seeded mock JSON from type declarations, or infer declarations from JSON
#[derive(Parser, Debug)]
#[command(name = "typemock", version)]
pub struct CommandLineInterface {
    /// more log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate mock records from declarations
    Generate(GenerateOut),
    /// print the parsed declaration model as JSON
    Parse(ParseOut),
    /// print advisory diagnostics
    Validate(ValidateOut),
    /// infer declarations from JSON/NDJSON samples
    Infer(InferOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// number of records per input
    #[arg(short = 'n', long)]
    quantity: Option<usize>,

    /// seed for a reproducible run (fresh random seed if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// root declaration to instantiate
    #[arg(long)]
    root: Option<String>,

    /// JSON config file: { "quantity", "seed", "root" }; flags win
    #[arg(long)]
    config: Option<PathBuf>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(clap::Parser, Debug)]
struct ParseOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ValidateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// exit with status 1 when any input has diagnostics
    #[arg(long)]
    strict: bool,
}

#[derive(clap::Parser, Debug)]
struct InferOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// name of the top-level declaration
    #[arg(long, default_value = "Root")]
    root_type: String,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One loaded input: display name and contents.
struct Source {
    name: String,
    text: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> anyhow::Result<Vec<Source>> {
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        let mut sources = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            if source_path.as_os_str() == "-" {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
                sources.push(Source { name: "<stdin>".to_string(), text });
                continue;
            }
            let name = source_path.to_string_lossy().to_string();
            let text = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file: {name}"))?;
            sources.push(Source { name, text });
        }
        Ok(sources)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Stderr log level from `-v` / `--quiet`.
    pub fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::ERROR,
            (false, 0) => Level::WARN,
            (false, 1) => Level::INFO,
            (false, 2) => Level::DEBUG,
            (false, _) => Level::TRACE,
        }
    }

    pub fn run(&self) -> anyhow::Result<ExitCode> {
        match &self.cmd {
            Command::Generate(target) => {
                let config = target.config()?;
                let sources = target.input_settings.load()?;
                let outputs = sources
                    .par_iter()
                    .map(|source| generate_source(source, &config))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let rendered = outputs
                    .iter()
                    .map(|output| render_json(output, target.compact))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                write_output(target.out.as_deref(), &rendered.join("\n"))?;
            }
            Command::Parse(target) => {
                let mut rendered = Vec::new();
                for source in target.input_settings.load()? {
                    let decls = crate::parser::parse_declarations(&source.text)
                        .with_context(|| format!("failed to parse {}", source.name))?;
                    rendered.push(render_json(&decls, false)?);
                }
                write_output(target.out.as_deref(), &rendered.join("\n"))?;
            }
            Command::Validate(target) => {
                let mut all_valid = true;
                for source in target.input_settings.load()? {
                    let report = crate::validate::validate(&source.text);
                    all_valid &= report.valid;
                    if report.valid {
                        println!("{}: {}", source.name, "ok".green());
                    }
                    for diagnostic in &report.diagnostics {
                        println!(
                            "{}:{}:{}: {} {}",
                            source.name,
                            diagnostic.line,
                            diagnostic.column,
                            "warning:".yellow().bold(),
                            diagnostic.message
                        );
                    }
                }
                if target.strict && !all_valid {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Command::Infer(target) => {
                let mut samples = Vec::new();
                for source in target.input_settings.load()? {
                    samples.extend(crate::inference::parse_samples(&source.name, &source.text, target.ndjson)?);
                }
                let declarations = crate::inference::infer_declarations(&samples, &target.root_type)?;
                write_output(target.out.as_deref(), &declarations)?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

impl GenerateOut {
    /// File values first, then any flag given on the command line.
    fn config(&self) -> anyhow::Result<GenerateConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file: {}", path.display()))?;
                crate::config::parse_generate_config(&text)
                    .with_context(|| format!("invalid config file: {}", path.display()))?
            }
            None => GenerateConfig::default(),
        };
        if let Some(quantity) = self.quantity {
            config.quantity = quantity;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.root.is_some() {
            config.root = self.root.clone();
        }
        Ok(config)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn generate_source(source: &Source, config: &GenerateConfig) -> anyhow::Result<GenerateOutput> {
    for diagnostic in crate::validate::validate(&source.text).diagnostics {
        info!(input = %source.name, line = diagnostic.line, column = diagnostic.column, "{}", diagnostic.message);
    }
    let decls = crate::parser::parse_declarations(&source.text)
        .with_context(|| format!("failed to parse {}", source.name))?;
    let output = crate::generate::generate(&decls, config)
        .with_context(|| format!("failed to generate from {}", source.name))?;
    info!(input = %source.name, seed = output.seed, records = output.values.len(), "generated");
    Ok(output)
}

fn render_json<T: serde::Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let text = if compact { serde_json::to_string(value) } else { serde_json::to_string_pretty(value) };
    text.context("failed to serialize output")
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        println!("{text}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            // literal path, or '-' for stdin
            out.push(PathBuf::from(pattern));
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
            out.push(entry?);
        }
        if out.len() == before {
            bail!("glob pattern matched no files: {pattern}");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = CommandLineInterface::try_parse_from(["typemock", "-vv", "generate", "-i", "a.ts", "--seed", "9", "-n", "4"]).unwrap();
        assert_eq!(cli.log_level(), Level::DEBUG);
        let Command::Generate(target) = &cli.cmd else { panic!() };
        let config = target.config().unwrap();
        assert_eq!(config, GenerateConfig { quantity: 4, seed: Some(9), root: None });
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["-", "schema.ts"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("-"), PathBuf::from("schema.ts")]);
        assert!(resolve_file_path_patterns(["definitely-missing-dir/*.ts"]).is_err());
    }

    #[test]
    fn quiet_wins_over_default_level() {
        let cli = CommandLineInterface::try_parse_from(["typemock", "--quiet", "validate", "-i", "a.ts"]).unwrap();
        assert_eq!(cli.log_level(), Level::ERROR);
    }
}

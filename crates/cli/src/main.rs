//! `hvac-translate` CLI entry-point.
//!
//! Available sub-commands:
//! - `bec-to-model`: read a BEC XML file into a model document.
//! - `bec-to-idf`: read a BEC XML file and write EnergyPlus IDF.
//! - `model-to-idf`: write a model document as EnergyPlus IDF.
//! - `model-to-bec`: write a model document as BEC XML.
//! - `idf-setpoints`: read IDF setpoint managers into a model document.
//! - `validate`: check the topology of every loop in a model document.
//! - `template`: build one of the reference system templates.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use model::{templates, validate_model, Model};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hvac-translate",
    about = "Translate HVAC system topologies between BEC XML, EnergyPlus IDF and model documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a BEC XML file into a model JSON document.
    BecToModel {
        input: PathBuf,
        /// Output path; standard output when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Leave capacities and flows unset so the simulation sizes them.
        #[arg(long, env = "HVAC_AUTOSIZE")]
        autosize: bool,
    },
    /// Read a BEC XML file and write EnergyPlus IDF.
    BecToIdf {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, env = "HVAC_AUTOSIZE")]
        autosize: bool,
        /// Write setpoint managers that have no setpoint node.
        #[arg(long)]
        include_unattached: bool,
    },
    /// Write a model JSON document as EnergyPlus IDF.
    ModelToIdf {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        include_unattached: bool,
    },
    /// Write a model JSON document as BEC XML.
    ModelToBec {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Read the setpoint managers and supporting objects of an IDF file,
    /// attaching them to the nodes of an existing model when one is given.
    IdfSetpoints {
        input: PathBuf,
        /// Model JSON document to translate into.
        #[arg(long)]
        into: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check every loop of a model JSON document.
    Validate { input: PathBuf },
    /// Build a reference system template as a model JSON document.
    Template {
        #[arg(value_enum)]
        system: SystemTemplate,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SystemTemplate {
    /// Packaged single-zone rooftop unit.
    Type3,
    /// Packaged VAV with hot water reheat.
    Type5,
    /// Central VAV on chilled and hot water plants.
    Type7,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::BecToModel { input, output, autosize } => {
            let model = read_bec(&input, autosize)?;
            write_output(output.as_deref(), &model.to_json().context("serializing model")?)
        }
        Command::BecToIdf { input, output, autosize, include_unattached } => {
            let model = read_bec(&input, autosize)?;
            let idf = write_idf(&model, include_unattached);
            write_output(output.as_deref(), &idf)
        }
        Command::ModelToIdf { input, output, include_unattached } => {
            let model = read_model(&input)?;
            let idf = write_idf(&model, include_unattached);
            write_output(output.as_deref(), &idf)
        }
        Command::ModelToBec { input, output } => {
            let model = read_model(&input)?;
            let mut translator = bec::ForwardTranslator::new();
            let doc = translator.translate_model(&model);
            report("BEC forward", translator.warnings(), translator.errors());
            write_output(output.as_deref(), &doc.to_xml().context("writing BEC XML")?)
        }
        Command::IdfSetpoints { input, into, output } => {
            let text = read_file(&input)?;
            let idf = energyplus::IdfFile::parse(&text)
                .with_context(|| format!("parsing IDF {}", input.display()))?;
            let mut model = match into {
                Some(path) => read_model(&path)?,
                None => Model::new(),
            };
            let mut translator = energyplus::ReverseTranslator::new();
            let created = translator.translate_into(&idf, &mut model);
            report("IDF reverse", translator.warnings(), translator.errors());
            info!(created = created.len(), "IDF objects translated");
            write_output(output.as_deref(), &model.to_json().context("serializing model")?)
        }
        Command::Validate { input } => {
            let model = read_model(&input)?;
            let loops = model.air_loops().len() + model.plant_loops().len();
            validate_model(&model)
                .with_context(|| format!("validating {}", input.display()))?;
            println!("Model is valid: {loops} loop(s), {} object(s).", model.len());
            Ok(())
        }
        Command::Template { system, output } => {
            let mut model = Model::new();
            let air_loop = match system {
                SystemTemplate::Type3 => templates::add_system_type_3(&mut model),
                SystemTemplate::Type5 => templates::add_system_type_5(&mut model),
                SystemTemplate::Type7 => templates::add_system_type_7(&mut model),
            }
            .context("building template")?;
            info!(air_loop = model.name(air_loop).unwrap_or_default(), "template built");
            write_output(output.as_deref(), &model.to_json().context("serializing model")?)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read file {}", path.display()))
}

fn read_model(path: &Path) -> Result<Model> {
    let json = read_file(path)?;
    Model::from_json(&json).with_context(|| format!("invalid model document {}", path.display()))
}

fn read_bec(path: &Path, autosize: bool) -> Result<Model> {
    let text = read_file(path)?;
    let doc = bec::Element::parse(&text).with_context(|| format!("parsing BEC XML {}", path.display()))?;
    let mut translator = bec::ReverseTranslator::new(bec::ReverseTranslatorOptions { autosize });
    let model = translator.translate(&doc);
    report("BEC reverse", translator.warnings(), translator.errors());
    if model.is_empty() && !translator.errors().is_empty() {
        bail!("{} produced no model objects", path.display());
    }
    Ok(model)
}

fn write_idf(model: &Model, include_unattached: bool) -> String {
    let options = energyplus::ForwardTranslatorOptions {
        include_unattached_setpoint_managers: include_unattached,
    };
    let mut translator = energyplus::ForwardTranslator::new(options);
    let idf = translator.translate_model(model);
    report("IDF forward", translator.warnings(), translator.errors());
    idf.to_string()
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents).with_context(|| format!("cannot write file {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{contents}"),
    }
    Ok(())
}

fn report(stage: &str, warnings: &[String], errors: &[String]) {
    if !errors.is_empty() {
        warn!(stage, count = errors.len(), "translation finished with errors");
    }
    info!(stage, warnings = warnings.len(), errors = errors.len(), "translation finished");
}

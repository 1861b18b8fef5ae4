//! # Fulcrum CLI
//!
//! Loads a weight-problem definition, optionally applies a set of design
//! variable values, and prints what an optimizer would see.
//!
//! ```text
//! wb_cli <definition.json> [--values <values.json>] [--report <stem>]
//! ```
//!
//! `--values` takes a JSON object of fully-qualified DV name to value.
//! `--report` writes `<stem>.dat` and `<stem>.txt`. Set `RUST_LOG` to change
//! log verbosity (default `wb_core=info,wb_cli=info`).

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wb_core::reports::{write_masses_tecplot, write_problem_data};
use wb_core::{load_definition, CalcError, CalcResult, CgLocation, ComponentFilter, OptProblem};

/// Inspect and drive a weight problem from a definition file
#[derive(Parser, Debug)]
#[command(name = "wb_cli")]
#[command(version)]
#[command(about = "Fulcrum - weight-and-balance problem inspector")]
struct Args {
    /// Problem definition JSON file
    definition: PathBuf,

    /// JSON object of fully-qualified DV name to value
    #[arg(long)]
    values: Option<PathBuf>,

    /// Write `<stem>.dat` and `<stem>.txt` reports
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Totals printed alongside the optimizer export
#[derive(Serialize)]
struct Totals {
    mass: f64,
    weight: f64,
    cg: Option<[f64; 3]>,
}

#[derive(Serialize)]
struct Output<'a> {
    design_vars: BTreeMap<String, f64>,
    totals: Totals,
    optimizer: &'a OptProblem,
}

fn load_values(path: &Path) -> CalcResult<HashMap<String, f64>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read values", path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| CalcError::serialization(e.to_string()))
}

fn run(args: &Args) -> CalcResult<()> {
    let definition = load_definition(&args.definition)?;
    let mut problem = definition.build()?;
    info!(
        name = %problem.name,
        components = problem.num_components(),
        fuel_cases = problem.fuel_cases().len(),
        "built weight problem"
    );

    if let Some(path) = &args.values {
        let values = load_values(path)?;
        problem.set_design_vars(&values);
        info!(count = values.len(), "applied design variable values");
    }

    let mut opt = OptProblem::new(&problem.name);
    let num_vars = problem.add_variables(&mut opt);
    let num_cons = problem.add_constraints(&mut opt);

    let all = ComponentFilter::new();
    let totals = Totals {
        mass: problem.total_mass(&all),
        weight: problem.total_weight(&all),
        cg: problem.center_of_gravity(&all, CgLocation::Current),
    };

    println!("═══════════════════════════════════════");
    println!("  WEIGHT PROBLEM");
    println!("═══════════════════════════════════════");
    println!();
    print!("{}", problem);
    println!();
    println!("Optimizer Export:");
    println!("  Variables:   {}", num_vars);
    println!("  Constraints: {}", num_cons);
    println!();
    println!("Totals ({}):", problem.units);
    println!("  Mass   = {:.4} {}", totals.mass, problem.units.mass_unit());
    println!("  Weight = {:.4} {}", totals.weight, problem.units.weight_unit());
    match totals.cg {
        Some(cg) => println!("  CG     = ({:.4}, {:.4}, {:.4})", cg[0], cg[1], cg[2]),
        None => println!("  CG     = n/a"),
    }

    if let Some(stem) = &args.report {
        let dat = write_masses_tecplot(&problem, stem)?;
        let txt = write_problem_data(&problem, stem)?;
        println!();
        println!("Reports:");
        println!("  {}", dat.display());
        println!("  {}", txt.display());
    }

    println!();
    println!("JSON Output (for LLM/API use):");
    let output = Output {
        design_vars: problem.current_dvs(),
        totals,
        optimizer: &opt,
    };
    let json = serde_json::to_string_pretty(&output).map_err(|e| CalcError::serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wb_core=info,wb_cli=info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

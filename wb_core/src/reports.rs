//! Plain-text mass/CG reports for a weight problem.
//!
//! - [`write_masses_tecplot`] writes `<stem>.dat`, one Tecplot POINT zone per
//!   CG location listing every component's CG and mass.
//! - [`write_problem_data`] writes `<stem>.txt`, one line per component in
//!   name order.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::component::CgLocation;
use crate::errors::{CalcError, CalcResult};
use crate::problem::WeightProblem;

/// Tecplot mass data for every component at every CG location
pub fn masses_tecplot(problem: &WeightProblem) -> String {
    let mut out = String::new();
    let count = problem.num_components();
    let _ = writeln!(out, "TITLE = \"{}: Mass Data\"", problem.name);
    let _ = writeln!(out, "VARIABLES = \"X\", \"Y\", \"Z\", \"Mass\"");

    for location in CgLocation::ALL {
        let _ = writeln!(
            out,
            "ZONE T=\"{}\", I={}, J=1, K=1, DATAPACKING=POINT",
            location, count
        );
        for component in problem.components() {
            let cg = component.cg(location);
            let _ = writeln!(out, "{:.6} {:.6} {:.6} {:.6}", cg[0], cg[1], cg[2], component.mass());
        }
        out.push('\n');
    }
    out
}

/// Per-component summary: name, weight, mass and current CG
pub fn problem_data(problem: &WeightProblem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} ({}), generated {}", problem.name, problem.units, Utc::now().to_rfc3339());
    let _ = writeln!(out, "Name, W, Mass, CG");
    for component in problem.components() {
        let cg = component.cg(CgLocation::Current);
        let _ = writeln!(
            out,
            "{}: {:.6}, {:.6}, {:.6} {:.6} {:.6}",
            component.name(),
            component.weight(),
            component.mass(),
            cg[0],
            cg[1],
            cg[2]
        );
    }
    out
}

/// Write [`masses_tecplot`] to `<stem>.dat`. Returns the written path.
pub fn write_masses_tecplot(problem: &WeightProblem, stem: &Path) -> CalcResult<PathBuf> {
    write_report(stem, "dat", &masses_tecplot(problem))
}

/// Write [`problem_data`] to `<stem>.txt`. Returns the written path.
pub fn write_problem_data(problem: &WeightProblem, stem: &Path) -> CalcResult<PathBuf> {
    write_report(stem, "txt", &problem_data(problem))
}

fn write_report(stem: &Path, extension: &str, contents: &str) -> CalcResult<PathBuf> {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    let path = PathBuf::from(path);
    fs::write(&path, contents)
        .map_err(|e| CalcError::file_error("write report", path.display().to_string(), e.to_string()))?;
    Ok(path)
}

//! # Task parser for JSR problems
//!
//! JSR problems are described in JSON files, either a single operating point
//! ```json
//! {
//!   "problem_name": "methane oxidation",
//!   "species": ["CH4", "O2", "N2"],
//!   "problem": {
//!     "Single": {
//!       "conditions": { "T": 1000.0, "P": 101325.0, "tau": 1.0, "V": 0.0001 },
//!       "composition": { "CH4": 0.05, "O2": 0.1, "N2": 0.85 }
//!     }
//!   }
//! }
//! ```
//! or a temperature sweep (`"Sweep": { "P", "tau", "V", "temperatures", "initial_composition" }`).
//! `species` lists the species set of the model the problem runs on.
use crate::ReactorsJSR::SimpleJSR::{JSRConditions, JSRError, JSRTask};
use crate::ReactorsJSR::jsr_sweep::{JSRPoint, JSRSweep, JSRSweepResult};
use crate::ReactorsJSR::kinetics_model::KineticsModel;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JSRTaskError {
    #[error("failed to read or write task file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse task: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid task: {0}")]
    Invalid(#[from] JSRError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JSRProblem {
    Single(JSRTask),
    Sweep(JSRSweep),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JSRTaskFile {
    #[serde(default)]
    pub problem_name: Option<String>,
    #[serde(default)]
    pub problem_description: Option<String>,
    /// species set of the model (chemical formulas)
    pub species: Vec<String>,
    pub problem: JSRProblem,
}

impl JSRTaskFile {
    /// Parse and validate a task
    pub fn from_str(content: &str) -> Result<Self, JSRTaskError> {
        let task: JSRTaskFile = serde_json::from_str(content)?;
        task.check()?;
        Ok(task)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JSRTaskError> {
        let content = fs::read_to_string(path.as_ref())?;
        info!("task file {:?} loaded", path.as_ref());
        Self::from_str(&content)
    }

    /// Checks problem data and that every species of the composition belongs to the species set
    pub fn check(&self) -> Result<(), JSRError> {
        if self.species.is_empty() {
            return Err(JSRError::MissingData("no species in task".to_string()));
        }
        let composition = match &self.problem {
            JSRProblem::Single(task) => {
                task.check_task()?;
                &task.composition
            }
            JSRProblem::Sweep(sweep) => {
                sweep.check_task()?;
                &sweep.initial_composition
            }
        };
        for substance in composition.keys() {
            if !self.species.contains(substance) {
                return Err(JSRError::InvalidConfiguration(format!(
                    "{} is not in the species list",
                    substance
                )));
            }
        }
        Ok(())
    }

    pub fn species_refs(&self) -> Vec<&str> {
        self.species.iter().map(|s| s.as_str()).collect()
    }

    /// Solve the problem on a model built for `species`. A single point gives a one-point result
    pub fn solve<M: KineticsModel>(&self, model: &mut M) -> Result<JSRSweepResult, M::Error> {
        if let Some(name) = &self.problem_name {
            info!("solving task {}", name);
        }
        match &self.problem {
            JSRProblem::Single(task) => {
                let reactor = task.solve(model)?;
                Ok(JSRSweepResult {
                    points: vec![JSRPoint::from_reactor(&task.conditions, &reactor)],
                })
            }
            JSRProblem::Sweep(sweep) => sweep.run(model),
        }
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), JSRTaskError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Template task: methane oxidation in nitrogen, single point
pub fn template() -> JSRTaskFile {
    let composition = HashMap::from([
        ("CH4".to_string(), 0.05),
        ("O2".to_string(), 0.1),
        ("N2".to_string(), 0.85),
    ]);
    let task = JSRTask::new(JSRConditions::new(1000.0, 101325.0, 1.0, 1e-4), composition);
    JSRTaskFile {
        problem_name: Some("methane oxidation".to_string()),
        problem_description: Some("JSR at 1 atm, 1 s residence time".to_string()),
        species: vec!["CH4".to_string(), "O2".to_string(), "N2".to_string()],
        problem: JSRProblem::Single(task),
    }
}

/// Write the template task into `path`
pub fn create_template<P: AsRef<Path>>(path: P) -> Result<(), JSRTaskError> {
    template().to_file(path)
}

//! # Simple JSR
//!
//! `run_jsr` configures a jet-stirred reactor around a kinetics model and advances it to steady state:
//! 1. model state is set to (T, P, X): usually X is the converged composition of a neighbouring
//!    condition, which speeds convergence up considerably
//! 2. isothermal constant-volume reactor of volume V
//! 3. inlet and exhaust reservoirs at the model state
//! 4. mass flow controller inlet -> reactor, `mdot = m/tau`
//! 5. pressure controller reactor -> exhaust, primary = the mass flow controller, `K = 1e-3`
//! 6. reactor network with the reactor only
//! 7. advance to steady state
//! 8. the reactor is returned
//!
//! No validation, retry or translation of errors happens here: whatever the backend reports is
//! returned as is. The model is mutated in place (step 1) and the caller sees its new state.
use crate::ReactorsJSR::kinetics_model::{KineticsModel, ReactorConfig, ReactorState};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Proportional gain of the exhaust pressure controller, kg/(s·Pa)
pub const PRESSURE_CONTROLLER_GAIN: f64 = 1e-3;

/// Run a jet-stirred reactor simulation
///
/// # Arguments
/// * `model` - kinetics model, its thermodynamic state is overwritten with (T, P, X)
/// * `T` - temperature (K)
/// * `P` - pressure (Pa)
/// * `tau` - residence time (s)
/// * `V` - reactor volume (m³)
/// * `X` - starting composition (mole fractions)
///
/// # Returns
/// The reactor at steady state, or the backend error unchanged
#[allow(non_snake_case)]
pub fn run_jsr<M: KineticsModel>(
    model: &mut M,
    T: f64,
    P: f64,
    tau: f64,
    V: f64,
    X: &HashMap<String, f64>,
) -> Result<M::Reactor, M::Error> {
    model.set_state_TPX(T, P, X)?;
    debug!("JSR: model state set to T = {} K, P = {} Pa, X = {:?}", T, P, X);

    // inlet -> flow control -> reactor -> pressure control -> exhaust
    let reactor = model.new_reactor(&ReactorConfig::isothermal(V))?;
    let exhaust = model.new_reservoir()?;
    let inlet = model.new_reservoir()?;
    // residence time is defined with the mass of the freshly filled reactor
    let mdot = reactor.mass() / tau;
    debug!("JSR: reactor mass {} kg, inlet mass flow {} kg/s", reactor.mass(), mdot);
    let mass_flow_controller = model.new_mass_flow_controller(&inlet, &reactor, mdot)?;
    let _pressure_controller = model.new_pressure_controller(
        &reactor,
        &exhaust,
        &mass_flow_controller,
        PRESSURE_CONTROLLER_GAIN,
    )?;

    let mut reactor_net = model.new_reactor_net(&[&reactor])?;
    model.advance_to_steady_state(&mut reactor_net)?;
    info!(
        "JSR steady state reached at T = {} K, P = {} Pa, tau = {} s",
        T, P, tau
    );
    Ok(reactor)
}

#[derive(Debug, Error, PartialEq)]
pub enum JSRError {
    #[error("missing data: {0}")]
    MissingData(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Operating conditions of a JSR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct JSRConditions {
    /// Temperature (K)
    pub T: f64,
    /// Pressure (Pa)
    pub P: f64,
    /// Residence time (s)
    pub tau: f64,
    /// Reactor volume (m³)
    pub V: f64,
}

impl JSRConditions {
    #[allow(non_snake_case)]
    pub fn new(T: f64, P: f64, tau: f64, V: f64) -> Self {
        Self { T, P, tau, V }
    }

    pub fn check(&self) -> Result<(), JSRError> {
        for (name, value) in [("T", self.T), ("P", self.P), ("tau", self.tau), ("V", self.V)] {
            if value.is_nan() {
                return Err(JSRError::MissingData(format!("missing {}", name)));
            }
            if value <= 0.0 || value.is_infinite() {
                return Err(JSRError::InvalidConfiguration(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Starting composition must be non-empty with finite non-negative mole fractions of positive sum
pub fn check_composition(composition: &HashMap<String, f64>) -> Result<(), JSRError> {
    if composition.is_empty() {
        return Err(JSRError::MissingData("empty starting composition".to_string()));
    }
    for (substance, x) in composition {
        if !x.is_finite() || *x < 0.0 {
            return Err(JSRError::InvalidConfiguration(format!(
                "mole fraction of {} must be non-negative, got {}",
                substance, x
            )));
        }
    }
    if composition.values().sum::<f64>() <= 0.0 {
        return Err(JSRError::InvalidConfiguration(
            "sum of mole fractions must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Single JSR problem: conditions and starting composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JSRTask {
    /// Optional problem identifier
    #[serde(default)]
    pub problem_name: Option<String>,
    /// Optional problem description
    #[serde(default)]
    pub problem_description: Option<String>,
    pub conditions: JSRConditions,
    /// Starting composition (mole fractions)
    pub composition: HashMap<String, f64>,
}

impl JSRTask {
    pub fn new(conditions: JSRConditions, composition: HashMap<String, f64>) -> Self {
        Self {
            problem_name: None,
            problem_description: None,
            conditions,
            composition,
        }
    }

    /// Set problem name for identification
    pub fn set_problem_name(&mut self, name: &str) {
        self.problem_name = Some(name.to_string());
    }

    /// Set problem description
    pub fn set_problem_description(&mut self, description: &str) {
        self.problem_description = Some(description.to_string());
    }

    /// Validate the task before it is handed to a backend
    ///
    /// Checks:
    /// - T, P, tau, V are positive and finite
    /// - composition is not empty, all values are non-negative and finite, and not all zero
    pub fn check_task(&self) -> Result<(), JSRError> {
        self.conditions.check()?;
        check_composition(&self.composition)
    }

    /// Run the task on a model (see [`run_jsr`])
    pub fn solve<M: KineticsModel>(&self, model: &mut M) -> Result<M::Reactor, M::Error> {
        if let Some(name) = &self.problem_name {
            info!("solving JSR problem {}", name);
        }
        let c = &self.conditions;
        run_jsr(model, c.T, c.P, c.tau, c.V, &self.composition)
    }
}

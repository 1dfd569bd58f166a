//! # JSR temperature sweep
//!
//! Species profiles of a jet-stirred reactor are usually measured over a temperature ramp at fixed
//! pressure and residence time. Neighbouring temperatures have close steady states, so every point
//! of the sweep starts from the converged composition of the previous one. The same model object
//! is used for all points.
use crate::ReactorsJSR::SimpleJSR::{JSRConditions, JSRError, check_composition, run_jsr};
use crate::ReactorsJSR::kinetics_model::{KineticsModel, ReactorState};
use log::info;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Steady state of one sweep point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct JSRPoint {
    pub T: f64,
    pub P: f64,
    pub tau: f64,
    pub V: f64,
    /// reactor mass at steady state (kg)
    pub mass: f64,
    pub mole_fractions: HashMap<String, f64>,
}

impl JSRPoint {
    pub fn from_reactor<R: ReactorState>(conditions: &JSRConditions, reactor: &R) -> Self {
        Self {
            T: conditions.T,
            P: conditions.P,
            tau: conditions.tau,
            V: conditions.V,
            mass: reactor.mass(),
            mole_fractions: reactor.mole_fractions(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JSRSweepResult {
    pub points: Vec<JSRPoint>,
}

impl JSRSweepResult {
    /// (T, x) pairs of one species, missing values are reported as 0
    pub fn species_profile(&self, substance: &str) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|point| {
                (
                    point.T,
                    point.mole_fractions.get(substance).cloned().unwrap_or(0.0),
                )
            })
            .collect()
    }

    /// species names present in any point, sorted
    pub fn substances(&self) -> Vec<String> {
        let mut substances: Vec<String> = self
            .points
            .iter()
            .flat_map(|point| point.mole_fractions.keys().cloned())
            .collect();
        substances.sort();
        substances.dedup();
        substances
    }

    pub fn table(&self) -> Table {
        let substances = self.substances();
        let mut table = Table::new();
        let mut header = vec![Cell::new("T, K"), Cell::new("mass, kg")];
        header.extend(substances.iter().map(|s| Cell::new(s)));
        table.add_row(Row::new(header));
        for point in &self.points {
            let mut row = vec![
                Cell::new(&format!("{:.2}", point.T)),
                Cell::new(&format!("{:.4e}", point.mass)),
            ];
            row.extend(substances.iter().map(|s| {
                let x = point.mole_fractions.get(s).cloned().unwrap_or(0.0);
                Cell::new(&format!("{:.4e}", x))
            }));
            table.add_row(Row::new(row));
        }
        table
    }

    pub fn pretty_print(&self) {
        self.table().printstd();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Temperature sweep at fixed pressure, residence time and volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct JSRSweep {
    /// Pressure (Pa)
    pub P: f64,
    /// Residence time (s)
    pub tau: f64,
    /// Reactor volume (m³)
    pub V: f64,
    /// Temperatures (K) in the order they are solved
    pub temperatures: Vec<f64>,
    /// Composition of the first point (mole fractions)
    pub initial_composition: HashMap<String, f64>,
}

impl JSRSweep {
    #[allow(non_snake_case)]
    pub fn new(
        P: f64,
        tau: f64,
        V: f64,
        temperatures: Vec<f64>,
        initial_composition: HashMap<String, f64>,
    ) -> Self {
        Self {
            P,
            tau,
            V,
            temperatures,
            initial_composition,
        }
    }

    /// Evenly spaced temperatures from `T_start` to `T_end` inclusive
    #[allow(non_snake_case)]
    pub fn with_temperature_range(mut self, T_start: f64, T_end: f64, n_points: usize) -> Self {
        self.temperatures = match n_points {
            0 => Vec::new(),
            1 => vec![T_start],
            n => {
                let step = (T_end - T_start) / (n - 1) as f64;
                (0..n).map(|i| T_start + step * i as f64).collect()
            }
        };
        self
    }

    pub fn check_task(&self) -> Result<(), JSRError> {
        if self.temperatures.is_empty() {
            return Err(JSRError::MissingData("no temperatures in sweep".to_string()));
        }
        for T in &self.temperatures {
            JSRConditions::new(*T, self.P, self.tau, self.V).check()?;
        }
        check_composition(&self.initial_composition)
    }

    /// Solve all points. The first backend failure stops the sweep and is returned unchanged
    pub fn run<M: KineticsModel>(&self, model: &mut M) -> Result<JSRSweepResult, M::Error> {
        let mut result = JSRSweepResult::default();
        let mut composition = self.initial_composition.clone();
        for (i, T) in self.temperatures.iter().enumerate() {
            info!(
                "sweep point {} of {}: T = {} K",
                i + 1,
                self.temperatures.len(),
                T
            );
            let conditions = JSRConditions::new(*T, self.P, self.tau, self.V);
            let reactor = run_jsr(model, *T, self.P, self.tau, self.V, &composition)?;
            let point = JSRPoint::from_reactor(&conditions, &reactor);
            // next point starts from this steady state
            composition = point.mole_fractions.clone();
            result.points.push(point);
        }
        Ok(result)
    }
}

//! # Kinetics model capability
//!
//! Traits describing what the JSR runner needs from a chemical kinetics/solver library.
//! A backend owns the species set and the thermodynamic state ("the model") and knows how to
//! build reactors, reservoirs, flow devices and reactor networks around it.
//!
//! Handles are backend-defined. A backend is free to share state between handles
//! (for example a reactor referenced by both a network and a flow controller), the runner
//! only passes references around and never inspects them beyond [`ReactorState`].
use std::collections::HashMap;

/// Energy equation switch of a reactor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyEquation {
    #[default]
    On,
    Off,
}

/// Construction parameters of a constant-volume reactor
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorConfig {
    /// Reactor volume (m³)
    pub volume: f64,
    pub energy: EnergyEquation,
}

impl ReactorConfig {
    /// Isothermal reactor: energy equation switched off
    pub fn isothermal(volume: f64) -> Self {
        Self {
            volume,
            energy: EnergyEquation::Off,
        }
    }
}

/// Read access to the state carried by a reactor handle
pub trait ReactorState {
    /// Mass of the reactor contents (kg)
    fn mass(&self) -> f64;
    /// Volume (m³)
    fn volume(&self) -> f64;
    /// Temperature (K)
    fn temperature(&self) -> f64;
    /// Pressure (Pa)
    fn pressure(&self) -> f64;
    /// Mole fractions by species name
    fn mole_fractions(&self) -> HashMap<String, f64>;
}

/// Capability provider: thermodynamic state of a species set plus reactor network constructors
///
/// Every method may fail with the backend's own error type; callers are expected to propagate
/// it unchanged.
#[allow(non_snake_case)]
pub trait KineticsModel {
    type Error: std::error::Error + 'static;
    type Reactor: ReactorState;
    type Reservoir;
    type MassFlowController;
    type PressureController;
    type Network;

    /// Set temperature (K), pressure (Pa) and composition (mole fractions by species name)
    fn set_state_TPX(
        &mut self,
        T: f64,
        P: f64,
        X: &HashMap<String, f64>,
    ) -> Result<(), Self::Error>;

    /// Reactor filled with the current state of the model
    fn new_reactor(&mut self, config: &ReactorConfig) -> Result<Self::Reactor, Self::Error>;

    /// Reservoir with the current state of the model frozen in
    fn new_reservoir(&mut self) -> Result<Self::Reservoir, Self::Error>;

    /// Flow device imposing `mdot` (kg/s) from `upstream` into `downstream`
    fn new_mass_flow_controller(
        &mut self,
        upstream: &Self::Reservoir,
        downstream: &Self::Reactor,
        mdot: f64,
    ) -> Result<Self::MassFlowController, Self::Error>;

    /// Flow device following `primary` with a proportional pressure correction `K`
    fn new_pressure_controller(
        &mut self,
        upstream: &Self::Reactor,
        downstream: &Self::Reservoir,
        primary: &Self::MassFlowController,
        K: f64,
    ) -> Result<Self::PressureController, Self::Error>;

    fn new_reactor_net(&mut self, reactors: &[&Self::Reactor])
    -> Result<Self::Network, Self::Error>;

    /// Integrate the network until its state no longer changes
    fn advance_to_steady_state(&mut self, network: &mut Self::Network) -> Result<(), Self::Error>;
}

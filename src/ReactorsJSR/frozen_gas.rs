//! # Frozen ideal gas backend
//!
//! Non-reacting ideal-gas mixture implementing [`KineticsModel`]. There is no chemistry here:
//! species only carry their molar masses (calculated from their formulas), the reactor is a
//! well-mixed isothermal constant-volume vessel and the network marches the mass and species
//! balances in pseudo-time until they stop changing.
//!
//! ## Balances of a reactor
//! ```text
//! dm/dt      = Σ mdot_in - Σ mdot_out
//! m dY_k/dt  = Σ mdot_in (Y_k,in - Y_k)
//! P          = m R T / (V M),   1/M = Σ Y_k/M_k
//! mdot_out   = mdot_primary + K (P - P_downstream)
//! ```
//! Both balances are advanced with backward Euler steps (the pressure controller makes the mass
//! balance very stiff: K·dP/dm is of order 1e6 1/s for lab-scale reactors), the step grows
//! geometrically from a fraction of the residence time.
//!
//! Handles share state through `Rc<RefCell<..>>`: a reactor is referenced by the network, by its
//! flow devices and by the caller. Everything is single-threaded.
use crate::Kinetics::molmass::{MolmassError, calculate_molar_mass};
use crate::ReactorsJSR::kinetics_model::{
    EnergyEquation, KineticsModel, ReactorConfig, ReactorState,
};
use log::{debug, info, warn};
use nalgebra::DVector;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Universal gas constant in J/(mol·K)
pub const R_G: f64 = 8.314462618;

#[derive(Debug, Error, PartialEq)]
pub enum FrozenGasError {
    #[error("species formula error: {0}")]
    Formula(#[from] MolmassError),
    #[error("no species given")]
    NoSpecies,
    #[error("duplicate species {0}")]
    DuplicateSpecies(String),
    #[error("unknown species {0}")]
    UnknownSpecies(String),
    #[error("invalid thermodynamic state: {0}")]
    InvalidState(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("not supported: {0}")]
    Unsupported(String),
    #[error("reactor network contains no reactors")]
    EmptyNetwork,
    #[error("steady state not reached after {steps} steps, residual {residual:e}")]
    NotConverged { steps: usize, residual: f64 },
}

/// Species set shared by the model and everything built from it
#[derive(Debug)]
struct SpeciesSet {
    names: Vec<String>,
    /// kg/mol
    molar_masses: DVector<f64>,
}

impl SpeciesSet {
    fn mean_molar_mass(&self, Y: &DVector<f64>) -> f64 {
        1.0 / Y.component_div(&self.molar_masses).sum()
    }

    fn mass_fractions(&self, X: &DVector<f64>) -> DVector<f64> {
        let weighted = X.component_mul(&self.molar_masses);
        let total = weighted.sum();
        weighted / total
    }

    fn mole_fractions(&self, Y: &DVector<f64>) -> HashMap<String, f64> {
        let M = self.mean_molar_mass(Y);
        self.names
            .iter()
            .zip(Y.component_div(&self.molar_masses).iter())
            .map(|(name, y_over_m)| (name.clone(), y_over_m * M))
            .collect()
    }
}

/// Thermodynamic state frozen into a reservoir
#[derive(Debug, Clone)]
#[allow(non_snake_case)]
struct GasState {
    T: f64,
    P: f64,
    Y: DVector<f64>,
}

#[derive(Debug)]
struct MassFlowDevice {
    upstream: Rc<GasState>,
    mdot: f64,
}

#[derive(Debug)]
struct PressureDevice {
    primary: Rc<MassFlowDevice>,
    downstream: Rc<GasState>,
    K: f64,
}

#[derive(Debug)]
#[allow(non_snake_case)]
struct ReactorContents {
    species: Rc<SpeciesSet>,
    T: f64,
    V: f64,
    mass: f64,
    Y: DVector<f64>,
    inlets: Vec<Rc<MassFlowDevice>>,
    outlets: Vec<Rc<PressureDevice>>,
}

impl ReactorContents {
    fn pressure(&self) -> f64 {
        self.mass * R_G * self.T / (self.V * self.species.mean_molar_mass(&self.Y))
    }

    fn inflow(&self) -> f64 {
        self.inlets.iter().map(|inlet| inlet.mdot).sum()
    }

    fn outflow(&self) -> f64 {
        let P = self.pressure();
        self.outlets
            .iter()
            .map(|outlet| outlet.primary.mdot + outlet.K * (P - outlet.downstream.P))
            .sum()
    }

    /// time derivatives (dm/dt, dY/dt) at the current state
    fn rates(&self) -> (f64, DVector<f64>) {
        let dm_dt = self.inflow() - self.outflow();
        let mut dY_dt: DVector<f64> = DVector::zeros(self.Y.len());
        for inlet in &self.inlets {
            dY_dt += (&inlet.upstream.Y - &self.Y) * (inlet.mdot / self.mass);
        }
        (dm_dt, dY_dt)
    }

    /// characteristic time of the reactor used to scale residuals and steps
    fn time_scale(&self) -> f64 {
        let inflow = self.inflow();
        if inflow > 0.0 { self.mass / inflow } else { 1.0 }
    }

    /// relative residual of the balances, dimensionless
    fn residual(&self) -> f64 {
        let (dm_dt, dY_dt) = self.rates();
        let t = self.time_scale();
        let mass_residual = (dm_dt * t / self.mass).abs();
        let species_residual = dY_dt.amax() * t;
        mass_residual.max(species_residual)
    }

    /// backward Euler step: species first, then mass with the updated mean molar mass
    fn implicit_step(&mut self, dt: f64) {
        let inflow = self.inflow();
        let mut feed: DVector<f64> = DVector::zeros(self.Y.len());
        for inlet in &self.inlets {
            feed += &inlet.upstream.Y * inlet.mdot;
        }
        self.Y = (&self.Y + feed * (dt / self.mass)) / (1.0 + dt * inflow / self.mass);

        // P = a*m, outflow of each controller is linear in m
        let a = R_G * self.T / (self.V * self.species.mean_molar_mass(&self.Y));
        let mut explicit_part = inflow;
        let mut implicit_coeff = 0.0;
        for outlet in &self.outlets {
            explicit_part -= outlet.primary.mdot - outlet.K * outlet.downstream.P;
            implicit_coeff += outlet.K * a;
        }
        self.mass = (self.mass + dt * explicit_part) / (1.0 + dt * implicit_coeff);
    }
}

/// Reactor handle
#[derive(Debug, Clone)]
pub struct FrozenReactor(Rc<RefCell<ReactorContents>>);

impl ReactorState for FrozenReactor {
    fn mass(&self) -> f64 {
        self.0.borrow().mass
    }
    fn volume(&self) -> f64 {
        self.0.borrow().V
    }
    fn temperature(&self) -> f64 {
        self.0.borrow().T
    }
    fn pressure(&self) -> f64 {
        self.0.borrow().pressure()
    }
    fn mole_fractions(&self) -> HashMap<String, f64> {
        let contents = self.0.borrow();
        contents.species.mole_fractions(&contents.Y)
    }
}

/// Reservoir handle
#[derive(Debug, Clone)]
pub struct FrozenReservoir(Rc<GasState>);

impl FrozenReservoir {
    pub fn pressure(&self) -> f64 {
        self.0.P
    }
}

#[derive(Debug, Clone)]
pub struct FrozenMassFlowController(Rc<MassFlowDevice>);

impl FrozenMassFlowController {
    pub fn mass_flow_rate(&self) -> f64 {
        self.0.mdot
    }
}

#[derive(Debug, Clone)]
pub struct FrozenPressureController(Rc<PressureDevice>);

impl FrozenPressureController {
    pub fn gain(&self) -> f64 {
        self.0.K
    }
}

/// Reactor network handle
#[derive(Debug)]
pub struct FrozenNetwork {
    reactors: Vec<FrozenReactor>,
    /// pseudo-time reached by the last advance (s), counted from the start of that advance
    pub time: f64,
    /// number of steps of the last advance
    pub steps: usize,
}

/// Non-reacting ideal-gas model
#[derive(Debug)]
#[allow(non_snake_case)]
pub struct FrozenIdealGas {
    species: Rc<SpeciesSet>,
    T: f64,
    P: f64,
    X: DVector<f64>,
    /// relative residual at which the network is considered steady
    pub rtol: f64,
    /// maximal number of pseudo-time steps of one advance
    pub max_steps: usize,
}

impl FrozenIdealGas {
    /// Create a model from species formulas. Initial state: 298.15 K, 101325 Pa, pure first species
    pub fn new(species: &[&str]) -> Result<Self, FrozenGasError> {
        if species.is_empty() {
            return Err(FrozenGasError::NoSpecies);
        }
        let mut names: Vec<String> = Vec::with_capacity(species.len());
        let mut molar_masses = Vec::with_capacity(species.len());
        for name in species {
            if names.iter().any(|existing| existing == name) {
                return Err(FrozenGasError::DuplicateSpecies(name.to_string()));
            }
            let (molar_mass, _) = calculate_molar_mass(name)?;
            names.push(name.to_string());
            // g/mol -> kg/mol
            molar_masses.push(molar_mass / 1000.0);
        }
        let mut X: DVector<f64> = DVector::zeros(names.len());
        X[0] = 1.0;
        Ok(Self {
            species: Rc::new(SpeciesSet {
                names,
                molar_masses: DVector::from_vec(molar_masses),
            }),
            T: 298.15,
            P: 101325.0,
            X,
            rtol: 1e-7,
            max_steps: 500,
        })
    }

    pub fn species_names(&self) -> &[String] {
        &self.species.names
    }

    /// Temperature (K)
    #[allow(non_snake_case)]
    pub fn T(&self) -> f64 {
        self.T
    }

    /// Pressure (Pa)
    #[allow(non_snake_case)]
    pub fn P(&self) -> f64 {
        self.P
    }

    /// Mole fractions by species name
    #[allow(non_snake_case)]
    pub fn X(&self) -> HashMap<String, f64> {
        self.species
            .names
            .iter()
            .cloned()
            .zip(self.X.iter().cloned())
            .collect()
    }

    /// Mean molar mass (kg/mol)
    pub fn mean_molar_mass(&self) -> f64 {
        self.X.dot(&self.species.molar_masses)
    }

    /// Density (kg/m³)
    pub fn density(&self) -> f64 {
        self.P * self.mean_molar_mass() / (R_G * self.T)
    }

    fn current_state(&self) -> GasState {
        GasState {
            T: self.T,
            P: self.P,
            Y: self.species.mass_fractions(&self.X),
        }
    }
}

impl KineticsModel for FrozenIdealGas {
    type Error = FrozenGasError;
    type Reactor = FrozenReactor;
    type Reservoir = FrozenReservoir;
    type MassFlowController = FrozenMassFlowController;
    type PressureController = FrozenPressureController;
    type Network = FrozenNetwork;

    fn set_state_TPX(
        &mut self,
        T: f64,
        P: f64,
        X: &HashMap<String, f64>,
    ) -> Result<(), FrozenGasError> {
        if !(T.is_finite() && T > 0.0) {
            return Err(FrozenGasError::InvalidState(format!("temperature {}", T)));
        }
        if !(P.is_finite() && P > 0.0) {
            return Err(FrozenGasError::InvalidState(format!("pressure {}", P)));
        }
        let mut new_X: DVector<f64> = DVector::zeros(self.species.names.len());
        for (name, value) in X {
            let idx = self
                .species
                .names
                .iter()
                .position(|species| species == name)
                .ok_or_else(|| FrozenGasError::UnknownSpecies(name.clone()))?;
            if !(value.is_finite() && *value >= 0.0) {
                return Err(FrozenGasError::InvalidState(format!(
                    "mole fraction of {} is {}",
                    name, value
                )));
            }
            new_X[idx] = *value;
        }
        let total = new_X.sum();
        if total <= 0.0 {
            return Err(FrozenGasError::InvalidState(
                "sum of mole fractions is zero".to_string(),
            ));
        }
        self.T = T;
        self.P = P;
        self.X = new_X / total;
        Ok(())
    }

    fn new_reactor(&mut self, config: &ReactorConfig) -> Result<FrozenReactor, FrozenGasError> {
        if config.energy == EnergyEquation::On {
            return Err(FrozenGasError::Unsupported(
                "energy equation in a frozen gas reactor".to_string(),
            ));
        }
        if !(config.volume.is_finite() && config.volume > 0.0) {
            return Err(FrozenGasError::InvalidParameter(format!(
                "reactor volume {}",
                config.volume
            )));
        }
        let state = self.current_state();
        let contents = ReactorContents {
            species: Rc::clone(&self.species),
            T: state.T,
            V: config.volume,
            mass: self.density() * config.volume,
            Y: state.Y,
            inlets: Vec::new(),
            outlets: Vec::new(),
        };
        Ok(FrozenReactor(Rc::new(RefCell::new(contents))))
    }

    fn new_reservoir(&mut self) -> Result<FrozenReservoir, FrozenGasError> {
        Ok(FrozenReservoir(Rc::new(self.current_state())))
    }

    fn new_mass_flow_controller(
        &mut self,
        upstream: &FrozenReservoir,
        downstream: &FrozenReactor,
        mdot: f64,
    ) -> Result<FrozenMassFlowController, FrozenGasError> {
        if !(mdot.is_finite() && mdot >= 0.0) {
            return Err(FrozenGasError::InvalidParameter(format!(
                "mass flow rate {}",
                mdot
            )));
        }
        let device = Rc::new(MassFlowDevice {
            upstream: Rc::clone(&upstream.0),
            mdot,
        });
        downstream.0.borrow_mut().inlets.push(Rc::clone(&device));
        Ok(FrozenMassFlowController(device))
    }

    fn new_pressure_controller(
        &mut self,
        upstream: &FrozenReactor,
        downstream: &FrozenReservoir,
        primary: &FrozenMassFlowController,
        K: f64,
    ) -> Result<FrozenPressureController, FrozenGasError> {
        if !(K.is_finite() && K >= 0.0) {
            return Err(FrozenGasError::InvalidParameter(format!(
                "pressure controller gain {}",
                K
            )));
        }
        let device = Rc::new(PressureDevice {
            primary: Rc::clone(&primary.0),
            downstream: Rc::clone(&downstream.0),
            K,
        });
        upstream.0.borrow_mut().outlets.push(Rc::clone(&device));
        Ok(FrozenPressureController(device))
    }

    fn new_reactor_net(
        &mut self,
        reactors: &[&FrozenReactor],
    ) -> Result<FrozenNetwork, FrozenGasError> {
        if reactors.is_empty() {
            return Err(FrozenGasError::EmptyNetwork);
        }
        Ok(FrozenNetwork {
            reactors: reactors.iter().map(|reactor| (*reactor).clone()).collect(),
            time: 0.0,
            steps: 0,
        })
    }

    fn advance_to_steady_state(
        &mut self,
        network: &mut FrozenNetwork,
    ) -> Result<(), FrozenGasError> {
        // each advance starts its own pseudo-time from zero
        network.time = 0.0;
        network.steps = 0;
        let mut residual = network
            .reactors
            .iter()
            .map(|reactor| reactor.0.borrow().residual())
            .fold(0.0, f64::max);
        let mut dt = 0.1
            * network
                .reactors
                .iter()
                .map(|reactor| reactor.0.borrow().time_scale())
                .fold(f64::INFINITY, f64::min);
        let mut steps = 0;
        while residual > self.rtol {
            if steps >= self.max_steps {
                warn!(
                    "steady state not reached: {} steps, residual {:e}",
                    steps, residual
                );
                network.steps = steps;
                return Err(FrozenGasError::NotConverged { steps, residual });
            }
            for reactor in &network.reactors {
                reactor.0.borrow_mut().implicit_step(dt);
            }
            network.time += dt;
            steps += 1;
            residual = network
                .reactors
                .iter()
                .map(|reactor| reactor.0.borrow().residual())
                .fold(0.0, f64::max);
            debug!("step {}, t = {:e} s, residual {:e}", steps, network.time, residual);
            dt *= 1.5;
        }
        network.steps = steps;
        info!(
            "steady state reached in {} steps, t = {:e} s, residual {:e}",
            steps, network.time, residual
        );
        Ok(())
    }
}

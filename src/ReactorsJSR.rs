//! # Jet-Stirred Reactor (JSR) Module
//!
//! This module runs steady-state jet-stirred reactor simulations on top of an external
//! kinetics/solver capability. The heavy lifting (reaction kinetics, thermodynamic properties,
//! time integration towards steady state) belongs to the capability provider; this module
//! sets the initial state, wires the reactor topology and asks the network for a steady state.
//!
//! ## Topology
//!
//! ```text
//! inlet (Reservoir) -> MassFlowController -> Reactor -> PressureController -> exhaust (Reservoir)
//! ```
//!
//! ### Nomenclature
//!
//! | Symbol | Description | Units |
//! |--------|-------------|-------|
//! | `T` | Temperature | K |
//! | `P` | Pressure | Pa |
//! | `tau` | Residence time | s |
//! | `V` | Reactor volume | m³ |
//! | `X` | Starting composition (mole fractions) | - |
//! | `m` | Reactor mass | kg |
//! | `mdot` | Inlet mass flow rate, `mdot = m/tau` | kg/s |
//! | `K` | Pressure controller gain, fixed to 1e-3 | kg/(s·Pa) |
//!
//! ### Model Assumptions
//!
//! - The reactor is a constant-volume vessel with the energy equation switched off (isothermal)
//! - The residence time is defined by the reactor mass at construction over the inlet mass flow rate
//! - The pressure controller follows the inlet mass flow and only corrects small pressure deviations
//!
//! ## Main items
//!
//! - **`kinetics_model`**: capability traits a solver backend implements
//! - **`SimpleJSR`**: `run_jsr` and the `JSRTask` wrapper
//! - **`jsr_sweep`**: temperature sweeps seeded with the previously converged composition
//! - **`task_parser_jsr`**: JSON task files
//! - **`frozen_gas`**: non-reacting ideal-gas backend
pub mod SimpleJSR;
pub mod frozen_gas;
pub mod jsr_sweep;
mod jsr_tests;
pub mod kinetics_model;
pub mod task_parser_jsr;

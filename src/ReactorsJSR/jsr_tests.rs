#[cfg(test)]
mod tests {
    use crate::ReactorsJSR::SimpleJSR::{
        JSRConditions, JSRError, JSRTask, PRESSURE_CONTROLLER_GAIN, run_jsr,
    };
    use crate::ReactorsJSR::jsr_sweep::JSRSweep;
    use crate::ReactorsJSR::kinetics_model::{
        EnergyEquation, KineticsModel, ReactorConfig, ReactorState,
    };
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use thiserror::Error;

    /// Everything the runner asks the stub for, in order
    #[derive(Debug, Clone, PartialEq)]
    #[allow(non_snake_case)]
    enum Call {
        SetState {
            T: f64,
            P: f64,
            X: HashMap<String, f64>,
        },
        NewReactor {
            id: usize,
            config: ReactorConfig,
        },
        NewReservoir {
            id: usize,
        },
        MassFlowController {
            id: usize,
            upstream: usize,
            downstream: usize,
            mdot: f64,
        },
        PressureController {
            upstream: usize,
            downstream: usize,
            primary: usize,
            K: f64,
        },
        ReactorNet {
            reactors: Vec<usize>,
        },
        Advance,
    }

    #[derive(Debug, Clone, PartialEq, Error)]
    enum StubError {
        #[error("solver did not converge after {0} iterations")]
        NotConverged(usize),
        #[error("unknown species {0}")]
        UnknownSpecies(String),
    }

    #[derive(Debug)]
    struct StubReactor {
        id: usize,
        mass: f64,
        volume: f64,
        T: f64,
        P: f64,
        X: HashMap<String, f64>,
    }

    impl ReactorState for StubReactor {
        fn mass(&self) -> f64 {
            self.mass
        }
        fn volume(&self) -> f64 {
            self.volume
        }
        fn temperature(&self) -> f64 {
            self.T
        }
        fn pressure(&self) -> f64 {
            self.P
        }
        fn mole_fractions(&self) -> HashMap<String, f64> {
            self.X.clone()
        }
    }

    struct StubReservoir {
        id: usize,
    }
    struct StubMassFlowController {
        id: usize,
    }
    struct StubNetwork;

    /// Records calls; reactor mass is `density*V`, the "steady state" adds 0.1 of H2O to the
    /// composition the reactor was filled with
    #[allow(non_snake_case)]
    struct StubModel {
        calls: Vec<Call>,
        next_id: usize,
        density: f64,
        T: f64,
        P: f64,
        X: HashMap<String, f64>,
        known_species: Option<Vec<String>>,
        /// advance number (1-based) that fails
        fail_advance_at: Option<usize>,
        advances: usize,
    }

    impl StubModel {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                next_id: 0,
                density: 0.35,
                T: 300.0,
                P: 1e5,
                X: HashMap::new(),
                known_species: None,
                fail_advance_at: None,
                advances: 0,
            }
        }

        fn id(&mut self) -> usize {
            self.next_id += 1;
            self.next_id
        }

        fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
            self.calls.iter().position(pred)
        }
    }

    #[allow(non_snake_case)]
    impl KineticsModel for StubModel {
        type Error = StubError;
        type Reactor = StubReactor;
        type Reservoir = StubReservoir;
        type MassFlowController = StubMassFlowController;
        type PressureController = ();
        type Network = StubNetwork;

        fn set_state_TPX(
            &mut self,
            T: f64,
            P: f64,
            X: &HashMap<String, f64>,
        ) -> Result<(), StubError> {
            self.calls.push(Call::SetState {
                T,
                P,
                X: X.clone(),
            });
            if let Some(known) = &self.known_species {
                if let Some(name) = X.keys().find(|name| !known.contains(name)) {
                    return Err(StubError::UnknownSpecies(name.clone()));
                }
            }
            self.T = T;
            self.P = P;
            self.X = X.clone();
            Ok(())
        }

        fn new_reactor(&mut self, config: &ReactorConfig) -> Result<StubReactor, StubError> {
            let id = self.id();
            self.calls.push(Call::NewReactor {
                id,
                config: config.clone(),
            });
            let mut X = self.X.clone();
            *X.entry("H2O".to_string()).or_insert(0.0) += 0.1;
            Ok(StubReactor {
                id,
                mass: self.density * config.volume,
                volume: config.volume,
                T: self.T,
                P: self.P,
                X,
            })
        }

        fn new_reservoir(&mut self) -> Result<StubReservoir, StubError> {
            let id = self.id();
            self.calls.push(Call::NewReservoir { id });
            Ok(StubReservoir { id })
        }

        fn new_mass_flow_controller(
            &mut self,
            upstream: &StubReservoir,
            downstream: &StubReactor,
            mdot: f64,
        ) -> Result<StubMassFlowController, StubError> {
            let id = self.id();
            self.calls.push(Call::MassFlowController {
                id,
                upstream: upstream.id,
                downstream: downstream.id,
                mdot,
            });
            Ok(StubMassFlowController { id })
        }

        fn new_pressure_controller(
            &mut self,
            upstream: &StubReactor,
            downstream: &StubReservoir,
            primary: &StubMassFlowController,
            K: f64,
        ) -> Result<(), StubError> {
            self.calls.push(Call::PressureController {
                upstream: upstream.id,
                downstream: downstream.id,
                primary: primary.id,
                K,
            });
            Ok(())
        }

        fn new_reactor_net(&mut self, reactors: &[&StubReactor]) -> Result<StubNetwork, StubError> {
            self.calls.push(Call::ReactorNet {
                reactors: reactors.iter().map(|r| r.id).collect(),
            });
            Ok(StubNetwork)
        }

        fn advance_to_steady_state(&mut self, _network: &mut StubNetwork) -> Result<(), StubError> {
            self.calls.push(Call::Advance);
            self.advances += 1;
            if self.fail_advance_at == Some(self.advances) {
                return Err(StubError::NotConverged(1000));
            }
            Ok(())
        }
    }

    fn methane_air() -> HashMap<String, f64> {
        HashMap::from([
            ("CH4".to_string(), 0.05),
            ("O2".to_string(), 0.1),
            ("N2".to_string(), 0.85),
        ])
    }

    fn mdot_of(model: &StubModel) -> f64 {
        model
            .calls
            .iter()
            .find_map(|call| match call {
                Call::MassFlowController { mdot, .. } => Some(*mdot),
                _ => None,
            })
            .expect("mass flow controller was not created")
    }

    #[test]
    fn test_methane_scenario_returns_reactor() {
        let mut model = StubModel::new();
        let X = methane_air();
        let reactor = run_jsr(&mut model, 1000.0, 101325.0, 1.0, 1e-4, &X).unwrap();

        assert_eq!(
            model.calls[0],
            Call::SetState {
                T: 1000.0,
                P: 101325.0,
                X: X.clone()
            }
        );
        // the returned handle is the reactor that went into the network
        let reactor_id = model
            .calls
            .iter()
            .find_map(|call| match call {
                Call::NewReactor { id, .. } => Some(*id),
                _ => None,
            })
            .unwrap();
        assert_eq!(reactor.id, reactor_id);
        assert!(model.calls.contains(&Call::ReactorNet {
            reactors: vec![reactor_id]
        }));
        let reservoir_ids: Vec<usize> = model
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::NewReservoir { id } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(reservoir_ids.len(), 2);
        assert!(!reservoir_ids.contains(&reactor.id));
        assert_eq!(model.calls.last(), Some(&Call::Advance));
    }

    #[test]
    fn test_model_state_is_mutated_in_place() {
        let mut model = StubModel::new();
        let X = methane_air();
        run_jsr(&mut model, 1200.0, 2e5, 0.5, 1e-4, &X).unwrap();
        assert_eq!(model.T, 1200.0);
        assert_eq!(model.P, 2e5);
        assert_eq!(model.X, X);
    }

    #[test]
    fn test_state_is_set_before_any_reactor_object() {
        let mut model = StubModel::new();
        run_jsr(&mut model, 1000.0, 101325.0, 1.0, 1e-4, &methane_air()).unwrap();
        let set_state = model
            .position(|call| matches!(call, Call::SetState { .. }))
            .unwrap();
        let first_object = model
            .position(|call| !matches!(call, Call::SetState { .. }))
            .unwrap();
        assert_eq!(set_state, 0);
        assert!(set_state < first_object);
        assert!(matches!(model.calls[1], Call::NewReactor { .. }));
    }

    #[test]
    fn test_reactor_is_isothermal_with_requested_volume() {
        let mut model = StubModel::new();
        let reactor = run_jsr(&mut model, 1000.0, 101325.0, 1.0, 2.5e-4, &methane_air()).unwrap();
        assert_eq!(reactor.volume(), 2.5e-4);
        assert!(model.calls.contains(&Call::NewReactor {
            id: reactor.id,
            config: ReactorConfig {
                volume: 2.5e-4,
                energy: EnergyEquation::Off
            }
        }));
    }

    #[test]
    fn test_flow_devices_wiring() {
        let mut model = StubModel::new();
        let reactor = run_jsr(&mut model, 1000.0, 101325.0, 2.0, 1e-4, &methane_air()).unwrap();
        // mass of the reactor at construction over residence time
        assert_relative_eq!(mdot_of(&model), 0.35 * 1e-4 / 2.0, max_relative = 1e-14);

        let (mfc_id, inlet_id) = model
            .calls
            .iter()
            .find_map(|call| match call {
                Call::MassFlowController {
                    id,
                    upstream,
                    downstream,
                    ..
                } => {
                    assert_eq!(*downstream, reactor.id);
                    Some((*id, *upstream))
                }
                _ => None,
            })
            .unwrap();
        let pressure_controller = model
            .calls
            .iter()
            .find(|call| matches!(call, Call::PressureController { .. }))
            .unwrap();
        match pressure_controller {
            Call::PressureController {
                upstream,
                downstream,
                primary,
                K,
            } => {
                assert_eq!(*upstream, reactor.id);
                assert_eq!(*primary, mfc_id);
                assert_ne!(*downstream, inlet_id);
                assert_ne!(*downstream, reactor.id);
                assert_eq!(*K, PRESSURE_CONTROLLER_GAIN);
                assert_eq!(*K, 1e-3);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_residence_time_limits() {
        let mut model = StubModel::new();
        run_jsr(&mut model, 1000.0, 101325.0, 1e12, 1e-4, &methane_air()).unwrap();
        let slow = mdot_of(&model);
        assert!(slow > 0.0 && slow < 1e-15);

        let mut model = StubModel::new();
        run_jsr(&mut model, 1000.0, 101325.0, 1e-12, 1e-4, &methane_air()).unwrap();
        let fast = mdot_of(&model);
        assert!(fast > 1e6);
    }

    #[test]
    fn test_steady_state_failure_is_returned_unchanged() {
        let mut model = StubModel::new();
        model.fail_advance_at = Some(1);
        let err = run_jsr(&mut model, 1000.0, 101325.0, 1.0, 1e-4, &methane_air()).unwrap_err();
        assert_eq!(err, StubError::NotConverged(1000));
        assert_eq!(err.to_string(), "solver did not converge after 1000 iterations");
    }

    #[test]
    fn test_set_state_failure_stops_before_construction() {
        let mut model = StubModel::new();
        model.known_species = Some(vec!["CH4".to_string(), "N2".to_string()]);
        let err = run_jsr(&mut model, 1000.0, 101325.0, 1.0, 1e-4, &methane_air()).unwrap_err();
        assert_eq!(err, StubError::UnknownSpecies("O2".to_string()));
        assert_eq!(model.calls.len(), 1);
    }

    #[test]
    fn test_task_solve_and_check() {
        let mut task = JSRTask::new(JSRConditions::new(1000.0, 101325.0, 1.0, 1e-4), methane_air());
        task.set_problem_name("methane");
        assert_eq!(task.check_task(), Ok(()));
        let mut model = StubModel::new();
        let reactor = task.solve(&mut model).unwrap();
        assert_eq!(reactor.volume(), 1e-4);

        task.conditions.tau = 0.0;
        assert!(matches!(
            task.check_task(),
            Err(JSRError::InvalidConfiguration(_))
        ));
        task.conditions.tau = f64::NAN;
        assert!(matches!(task.check_task(), Err(JSRError::MissingData(_))));
        task.conditions.tau = 1.0;
        task.composition.insert("CH4".to_string(), -0.1);
        assert!(matches!(
            task.check_task(),
            Err(JSRError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_sweep_seeds_each_point_with_previous_steady_state() {
        let mut model = StubModel::new();
        let sweep = JSRSweep::new(101325.0, 1.0, 1e-4, Vec::new(), methane_air())
            .with_temperature_range(800.0, 1000.0, 3);
        assert_eq!(sweep.temperatures, vec![800.0, 900.0, 1000.0]);
        let result = sweep.run(&mut model).unwrap();
        assert_eq!(result.points.len(), 3);

        let seeds: Vec<HashMap<String, f64>> = model
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::SetState { X, .. } => Some(X.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(seeds[0], methane_air());
        assert_eq!(seeds[1], result.points[0].mole_fractions);
        assert_eq!(seeds[2], result.points[1].mole_fractions);
        let water = result.species_profile("H2O");
        assert_relative_eq!(water[0].1, 0.1, epsilon = 1e-12);
        assert_relative_eq!(water[2].1, 0.3, epsilon = 1e-12);
        assert_eq!(water[1].0, 900.0);
        assert_eq!(result.substances(), vec!["CH4", "H2O", "N2", "O2"]);
        assert_eq!(result.table().len(), 4);
    }

    #[test]
    fn test_sweep_stops_at_first_failure() {
        let mut model = StubModel::new();
        model.fail_advance_at = Some(2);
        let sweep = JSRSweep::new(101325.0, 1.0, 1e-4, vec![800.0, 900.0, 1000.0], methane_air());
        let err = sweep.run(&mut model).unwrap_err();
        assert_eq!(err, StubError::NotConverged(1000));
        assert_eq!(model.advances, 2);
    }

    #[test]
    fn test_sweep_check() {
        let sweep = JSRSweep::new(101325.0, 1.0, 1e-4, Vec::new(), methane_air());
        assert!(matches!(sweep.check_task(), Err(JSRError::MissingData(_))));
        let sweep = sweep.with_temperature_range(-10.0, 1000.0, 5);
        assert!(matches!(
            sweep.check_task(),
            Err(JSRError::InvalidConfiguration(_))
        ));
        // the starting composition of a sweep obeys the same rules as a single point
        let sweep = JSRSweep::new(101325.0, 1.0, 1e-4, vec![1000.0], HashMap::new());
        assert!(matches!(sweep.check_task(), Err(JSRError::MissingData(_))));
        for bad in [-0.5, f64::NAN, f64::INFINITY] {
            let X = HashMap::from([("CH4".to_string(), bad), ("N2".to_string(), 1.0)]);
            let sweep = JSRSweep::new(101325.0, 1.0, 1e-4, vec![1000.0], X);
            assert!(matches!(
                sweep.check_task(),
                Err(JSRError::InvalidConfiguration(_))
            ));
        }
        let X = HashMap::from([("CH4".to_string(), 0.0)]);
        let sweep = JSRSweep::new(101325.0, 1.0, 1e-4, vec![1000.0], X);
        assert!(matches!(
            sweep.check_task(),
            Err(JSRError::InvalidConfiguration(_))
        ));
    }
}

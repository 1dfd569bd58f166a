use crate::ReactorsJSR::SimpleJSR::run_jsr;
use crate::ReactorsJSR::frozen_gas::FrozenIdealGas;
use crate::ReactorsJSR::jsr_sweep::JSRSweep;
use crate::ReactorsJSR::kinetics_model::ReactorState;
use crate::ReactorsJSR::task_parser_jsr::template;
use std::collections::HashMap;

pub fn jsr_examples(jsrtask: usize) {
    let composition = HashMap::from([
        ("CH4".to_string(), 0.05),
        ("O2".to_string(), 0.1),
        ("N2".to_string(), 0.85),
    ]);
    let mut gas = match FrozenIdealGas::new(&["CH4", "O2", "N2"]) {
        Ok(gas) => gas,
        Err(e) => {
            println!("failed to create the model: {}", e);
            return;
        }
    };
    match jsrtask {
        0 => {
            // SINGLE POINT
            match run_jsr(&mut gas, 1000.0, 101325.0, 1.0, 1e-4, &composition) {
                Ok(reactor) => {
                    println!("reactor volume {} m3", reactor.volume());
                    println!("reactor mass {:e} kg", reactor.mass());
                    println!("reactor pressure {} Pa", reactor.pressure());
                    println!("mole fractions {:?}", reactor.mole_fractions());
                }
                Err(e) => println!("JSR failed: {}", e),
            }
        }
        1 => {
            // TEMPERATURE SWEEP, each point seeded with the previous steady state
            let sweep = JSRSweep::new(101325.0, 1.0, 1e-4, Vec::new(), composition)
                .with_temperature_range(800.0, 1200.0, 5);
            match sweep.run(&mut gas) {
                Ok(result) => result.pretty_print(),
                Err(e) => println!("sweep failed: {}", e),
            }
        }
        2 => match serde_json::to_string_pretty(&template()) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("failed to serialize template: {}", e),
        },
        _ => println!("no such example"),
    }
}

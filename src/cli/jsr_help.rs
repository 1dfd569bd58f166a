pub const JSR_ENG_HELPER: &'static str = "
                                General notes \n
All values are in SI units: T in K, P in Pa, tau in s, V in m^3. Compositions are mole fractions, \n
they are normalized by the model, so 1:2:7 is as good as 0.1:0.2:0.7. \n
A task file is a JSON document with the fields: \n
problem_name: optional string; \n
problem_description: optional string; \n
species: list of chemical formulas of the model species (\"CH4\", \"O2\", \"N2\", \"AR\"); \n
problem: either \n
    Single: { conditions: { T, P, tau, V }, composition: { species: value } } \n
or \n
    Sweep: { P, tau, V, temperatures: [..], initial_composition: { species: value } } \n
In a sweep every temperature starts from the steady state of the previous one. \n
Every species of a composition must be listed in species. \n
The reactor is isothermal with constant volume: inlet -> mass flow controller (mdot = m/tau) -> \n
reactor -> pressure controller (K = 1e-3) -> exhaust. \n
Use 'Generate template' to get a ready to edit problem_jsr.json. Files whose names start with \n
'problem' in the current directory are found by 'Auto-discover problem files'. \n
";

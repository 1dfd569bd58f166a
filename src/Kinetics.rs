/// eng
/// The module takes as input a chemical formula of a substance and produces its atomic composition
/// and molar mass. Gas mixtures in the reactor module are described by species named with their formulas,
/// so mean molar masses (and hence reactor masses) are calculated from these names.
/// ----------------------------------------------------------------
/// ru
/// Модуль берет на вход химическую формулу вещества и выдает его атомный состав и молярную массу.
pub mod molmass;

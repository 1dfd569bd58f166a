/// Module to calculate the atomic composition and molar mass of a chemical formula
///
/// Species names of gas mixtures are expected to be chemical formulas ("CH4", "O2", "N2", "AR").
/// Phase marks like "(g)" are dropped before parsing, groups in brackets are expanded with
/// their multiplier.
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

// Define a struct to hold element data
pub struct Element {
    name: &'static str,
    atomic_mass: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum MolmassError {
    #[error("empty formula")]
    EmptyFormula,
    #[error("unknown element '{element}' in formula {formula}")]
    UnknownElement { element: String, formula: String },
    #[error("unexpected character '{character}' in formula {formula}")]
    UnexpectedCharacter { character: char, formula: String },
    #[error("unbalanced brackets in formula {0}")]
    UnbalancedBrackets(String),
    #[error("invalid stoichiometric number '{count}' in formula {formula}")]
    InvalidCount { count: String, formula: String },
}

// Define a list of elements and their atomic masses (g/mol)
const ELEMENTS: &[Element] = &[
    Element { name: "H", atomic_mass: 1.008 },
    Element { name: "He", atomic_mass: 4.0026 },
    Element { name: "Li", atomic_mass: 6.94 },
    Element { name: "Be", atomic_mass: 9.0122 },
    Element { name: "B", atomic_mass: 10.81 },
    Element { name: "C", atomic_mass: 12.011 },
    Element { name: "N", atomic_mass: 14.007 },
    Element { name: "O", atomic_mass: 15.999 },
    Element { name: "F", atomic_mass: 18.998 },
    Element { name: "Ne", atomic_mass: 20.18 },
    Element { name: "Na", atomic_mass: 22.99 },
    Element { name: "Mg", atomic_mass: 24.305 },
    Element { name: "Al", atomic_mass: 26.98 },
    Element { name: "Si", atomic_mass: 28.085 },
    Element { name: "P", atomic_mass: 30.974 },
    Element { name: "S", atomic_mass: 32.065 },
    Element { name: "Cl", atomic_mass: 35.45 },
    Element { name: "Ar", atomic_mass: 39.948 },
    Element { name: "K", atomic_mass: 39.102 },
    Element { name: "Ca", atomic_mass: 40.08 },
    Element { name: "Ti", atomic_mass: 47.867 },
    Element { name: "Cr", atomic_mass: 51.9961 },
    Element { name: "Mn", atomic_mass: 54.938 },
    Element { name: "Fe", atomic_mass: 55.845 },
    Element { name: "Co", atomic_mass: 58.9332 },
    Element { name: "Ni", atomic_mass: 58.6934 },
    Element { name: "Cu", atomic_mass: 63.546 },
    Element { name: "Zn", atomic_mass: 65.38 },
    Element { name: "Br", atomic_mass: 79.904 },
    Element { name: "Kr", atomic_mass: 83.798 },
    Element { name: "I", atomic_mass: 126.904 },
    Element { name: "Xe", atomic_mass: 131.293 },
];

fn atomic_mass(symbol: &str) -> Option<f64> {
    ELEMENTS
        .iter()
        .find(|element| element.name == symbol)
        .map(|element| element.atomic_mass)
}

static PHASE_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((?i:g|l|s|c|cr|aq)\)").expect("valid phase marks pattern"));

fn filter_phases_marks(formula: &str) -> String {
    PHASE_MARKS.replace_all(formula, "").to_string()
}

fn invalid_count(count: String, formula: &str) -> MolmassError {
    MolmassError::InvalidCount {
        count,
        formula: formula.to_string(),
    }
}

/// reads a stoichiometric number starting at position i, returns (number, next position)
fn read_count(chars: &[char], mut i: usize, formula: &str) -> Result<(usize, usize), MolmassError> {
    let start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if start == i {
        return Ok((1, i));
    }
    let digits: String = chars[start..i].iter().collect();
    match digits.parse::<usize>() {
        Ok(count) => Ok((count, i)),
        Err(_) => Err(invalid_count(digits, formula)),
    }
}

/// Parse a chemical formula into a map element -> number of atoms
///
/// "AR"-like uppercase spelling (as used in many mechanism files) is read as "Ar" when one of
/// the two letters is not an element by itself, so "HE" is helium while "CO" stays C + O.
pub fn parse_formula(formula: &str) -> Result<HashMap<String, usize>, MolmassError> {
    let formula = filter_phases_marks(&formula.replace(' ', ""));
    if formula.is_empty() {
        return Err(MolmassError::EmptyFormula);
    }
    let chars: Vec<char> = formula.chars().collect();
    // stack of element counts, one level per open bracket
    let mut stack: Vec<HashMap<String, usize>> = vec![HashMap::new()];
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' | '[' => {
                stack.push(HashMap::new());
                i += 1;
            }
            ')' | ']' => {
                if stack.len() < 2 {
                    return Err(MolmassError::UnbalancedBrackets(formula.clone()));
                }
                let group = stack.pop().unwrap_or_default();
                let (multiplier, next) = read_count(&chars, i + 1, &formula)?;
                i = next;
                let top = stack
                    .last_mut()
                    .ok_or_else(|| MolmassError::UnbalancedBrackets(formula.clone()))?;
                for (element, count) in group {
                    let entry = top.entry(element).or_insert(0);
                    let current = *entry;
                    *entry = count
                        .checked_mul(multiplier)
                        .and_then(|added| current.checked_add(added))
                        .ok_or_else(|| {
                            invalid_count(format!("{}*{}", count, multiplier), &formula)
                        })?;
                }
            }
            c if c.is_ascii_uppercase() => {
                let mut symbol = c.to_string();
                i += 1;
                if let Some(&next) = chars.get(i) {
                    if next.is_ascii_lowercase() {
                        symbol.push(next);
                        i += 1;
                    } else if next.is_ascii_uppercase()
                        && (atomic_mass(&symbol).is_none()
                            || atomic_mass(&next.to_string()).is_none())
                    {
                        // second letter of an element name written in uppercase
                        let candidate = format!("{}{}", c, next.to_ascii_lowercase());
                        if atomic_mass(&candidate).is_some() {
                            symbol = candidate;
                            i += 1;
                        }
                    }
                }
                if atomic_mass(&symbol).is_none() {
                    return Err(MolmassError::UnknownElement {
                        element: symbol,
                        formula: formula.clone(),
                    });
                }
                let (count, next) = read_count(&chars, i, &formula)?;
                i = next;
                let top = stack
                    .last_mut()
                    .ok_or_else(|| MolmassError::UnbalancedBrackets(formula.clone()))?;
                let entry = top.entry(symbol).or_insert(0);
                let current = *entry;
                *entry = current
                    .checked_add(count)
                    .ok_or_else(|| invalid_count(count.to_string(), &formula))?;
            }
            _ => {
                return Err(MolmassError::UnexpectedCharacter {
                    character: c,
                    formula: formula.clone(),
                });
            }
        }
    }
    if stack.len() != 1 {
        return Err(MolmassError::UnbalancedBrackets(formula));
    }
    Ok(stack.pop().unwrap_or_default())
}

/// Molar mass of a substance in g/mol together with its atomic composition
pub fn calculate_molar_mass(formula: &str) -> Result<(f64, HashMap<String, usize>), MolmassError> {
    let counts = parse_formula(formula)?;
    let molar_mass = counts
        .iter()
        .map(|(element, count)| atomic_mass(element).unwrap_or(0.0) * *count as f64)
        .sum();
    Ok((molar_mass, counts))
}

/// Molar masses (g/mol) of a vector of chemical formulas
pub fn calculate_molar_mass_of_vector_of_subs(
    vec_of_formulae: &[&str],
) -> Result<Vec<f64>, MolmassError> {
    vec_of_formulae
        .iter()
        .map(|formula| calculate_molar_mass(formula).map(|(molar_mass, _)| molar_mass))
        .collect()
}

//! Aqueous ions: a composition together with a net charge.

use super::composition::{Composition, ParseFormulaError};
use super::types::Element;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static IONIC_NOTATION: OnceLock<Regex> = OnceLock::new();
static BRACKET_CHARGE: OnceLock<Regex> = OnceLock::new();
static SUFFIX_CHARGE: OnceLock<Regex> = OnceLock::new();

fn ionic_notation() -> &'static Regex {
    IONIC_NOTATION.get_or_init(|| {
        Regex::new(r"\[([^\[\]]+)\]|\(aq\)").expect("ionic notation pattern is valid")
    })
}

fn bracket_charge() -> &'static Regex {
    BRACKET_CHARGE.get_or_init(|| {
        Regex::new(r"\[([\d.]*)([+-]+)([\d.]*)\]").expect("bracket charge pattern is valid")
    })
}

fn suffix_charge() -> &'static Regex {
    SUFFIX_CHARGE
        .get_or_init(|| Regex::new(r"([+-]+)([\d.]*)$").expect("suffix charge pattern is valid"))
}

/// Whether `formula` is written in ionic notation.
///
/// A formula is ionic when it carries a bracketed annotation such as
/// `Fe[2+]` or the aqueous suffix `(aq)`.
pub fn is_ionic_notation(formula: &str) -> bool {
    ionic_notation().is_match(formula)
}

/// A dissolved species with a net charge in elementary charge units.
#[derive(Debug, Clone, PartialEq)]
pub struct Ion {
    composition: Composition,
    charge: f64,
}

impl Ion {
    pub fn new(composition: Composition, charge: f64) -> Self {
        Self {
            composition,
            charge,
        }
    }

    /// Parses an ionic formula.
    ///
    /// Accepted charge notations: `Fe[2+]`, `Fe[+2]`, `Fe[++]`, `MnO4[-]`,
    /// `Fe+3`, `SO4--`. An `(aq)` suffix is stripped. A formula without any
    /// charge annotation parses as a neutral aqueous species.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFormulaError`] if the charge annotation is malformed
    /// or the remaining formula is not a valid composition.
    pub fn from_formula(formula: &str) -> Result<Self, ParseFormulaError> {
        let mut rest = formula.trim().to_string();
        let mut charge = 0.0;

        if let Some(caps) = bracket_charge().captures(&rest) {
            charge += parse_charge(formula, &caps[1], &caps[2], &caps[3])?;
            let whole = caps[0].to_string();
            rest = rest.replacen(&whole, "", 1);
        }

        rest = rest.replacen("(aq)", "", 1);

        if let Some(caps) = suffix_charge().captures(&rest) {
            charge += parse_charge(formula, "", &caps[1], &caps[2])?;
            let whole = caps[0].to_string();
            let cut = rest.len() - whole.len();
            rest.truncate(cut);
        }

        let composition = Composition::from_formula(&rest)
            .map_err(|e| ParseFormulaError::new(formula, e.detail()))?;

        Ok(Self {
            composition,
            charge,
        })
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    #[inline]
    pub fn charge(&self) -> f64 {
        self.charge
    }

    /// Amount of `element` in the ion.
    pub fn get(&self, element: Element) -> f64 {
        self.composition.get(element)
    }
}

fn parse_charge(
    formula: &str,
    leading: &str,
    signs: &str,
    trailing: &str,
) -> Result<f64, ParseFormulaError> {
    let sign = if signs.chars().all(|c| c == '+') {
        1.0
    } else if signs.chars().all(|c| c == '-') {
        -1.0
    } else {
        return Err(ParseFormulaError::new(
            formula,
            format!("mixed charge signs '{}'", signs),
        ));
    };

    let digits = match (leading.is_empty(), trailing.is_empty()) {
        (true, true) => return Ok(sign * signs.len() as f64),
        (false, true) => leading,
        (true, false) => trailing,
        (false, false) => {
            return Err(ParseFormulaError::new(
                formula,
                "charge magnitude given on both sides of the sign",
            ));
        }
    };

    if signs.len() > 1 {
        return Err(ParseFormulaError::new(
            formula,
            "charge magnitude combined with repeated signs",
        ));
    }

    digits
        .parse::<f64>()
        .map(|magnitude| sign * magnitude)
        .map_err(|_| ParseFormulaError::new(formula, format!("invalid charge '{}'", digits)))
}

impl FromStr for Ion {
    type Err = ParseFormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_formula(s)
    }
}

impl fmt::Display for Ion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.composition)?;
        let magnitude = self.charge.abs();
        let sign = if self.charge < 0.0 { '-' } else { '+' };
        if magnitude == 0.0 {
            write!(f, "(aq)")
        } else if (magnitude - 1.0).abs() < 1e-8 {
            write!(f, "[{}]", sign)
        } else if (magnitude - magnitude.round()).abs() < 1e-8 {
            write!(f, "[{}{}]", magnitude.round() as i64, sign)
        } else {
            write!(f, "[{}{}]", magnitude, sign)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(symbol: &str) -> Element {
        symbol.parse().unwrap()
    }

    #[test]
    fn detects_ionic_notation() {
        assert!(is_ionic_notation("Mn[2+]"));
        assert!(is_ionic_notation("MnO4[-]"));
        assert!(is_ionic_notation("HMnO2(aq)"));
        assert!(!is_ionic_notation("MnO2"));
        assert!(!is_ionic_notation("Fe(OH)3"));
    }

    #[test]
    fn parses_bracketed_charges() {
        assert_eq!(Ion::from_formula("Mn[2+]").unwrap().charge(), 2.0);
        assert_eq!(Ion::from_formula("Fe[+3]").unwrap().charge(), 3.0);
        assert_eq!(Ion::from_formula("Fe[++]").unwrap().charge(), 2.0);
        assert_eq!(Ion::from_formula("MnO4[-]").unwrap().charge(), -1.0);
        assert_eq!(Ion::from_formula("SO4[2-]").unwrap().charge(), -2.0);
    }

    #[test]
    fn parses_suffix_charges() {
        assert_eq!(Ion::from_formula("Fe+3").unwrap().charge(), 3.0);
        assert_eq!(Ion::from_formula("SO4--").unwrap().charge(), -2.0);
        let ion = Ion::from_formula("MnO4-").unwrap();
        assert_eq!(ion.charge(), -1.0);
        assert_eq!(ion.get(Element::O), 4.0);
    }

    #[test]
    fn strips_aqueous_suffix() {
        let ion = Ion::from_formula("HMnO2(aq)").unwrap();
        assert_eq!(ion.charge(), 0.0);
        assert_eq!(ion.get(Element::H), 1.0);
        assert_eq!(ion.get(el("Mn")), 1.0);
        assert_eq!(ion.get(Element::O), 2.0);
    }

    #[test]
    fn charge_is_not_part_of_composition() {
        let ion = Ion::from_formula("MnO4[-]").unwrap();
        assert_eq!(ion.composition().num_atoms(), 5.0);
    }

    #[test]
    fn rejects_malformed_charges() {
        assert!(Ion::from_formula("Fe[+-]").is_err());
        assert!(Ion::from_formula("Fe[2+3]").is_err());
        assert!(Ion::from_formula("Xx[2+]").is_err());
        assert!(Ion::from_formula("[2+]").is_err());
    }

    #[test]
    fn display_round_trips_charge() {
        assert_eq!(Ion::from_formula("Mn[2+]").unwrap().to_string(), "Mn[2+]");
        assert_eq!(Ion::from_formula("MnO4[-]").unwrap().to_string(), "MnO4[-]");
        assert_eq!(Ion::from_formula("HMnO2(aq)").unwrap().to_string(), "HMnO2(aq)");
    }
}

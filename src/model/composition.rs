//! Elemental compositions and chemical formula parsing.
//!
//! A [`Composition`] keeps element amounts in the order the elements were
//! first encountered, which is the order formulas are written in. Parsing
//! accepts element symbols with optional integer or decimal multipliers and
//! nested `()` / `[]` groups, e.g. `Fe(OH)3` or `Mn0.5Fe0.5O`.

use super::types::Element;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const INTEGER_TOLERANCE: f64 = 1e-8;

/// A chemical formula could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid formula '{formula}': {detail}")]
pub struct ParseFormulaError {
    formula: String,
    detail: String,
}

impl ParseFormulaError {
    pub(crate) fn new(formula: &str, detail: impl Into<String>) -> Self {
        Self {
            formula: formula.to_string(),
            detail: detail.into(),
        }
    }

    /// The formula text that failed to parse.
    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Amounts of each element in a species, in first-encountered order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    amounts: Vec<(Element, f64)>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a neutral chemical formula such as `MnO2` or `Fe(OH)3`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFormulaError`] for unknown element symbols, unbalanced
    /// groups, malformed multipliers, or formulas without any element.
    pub fn from_formula(formula: &str) -> Result<Self, ParseFormulaError> {
        let chars: Vec<char> = formula.chars().collect();
        let mut parser = FormulaParser {
            formula,
            chars: &chars,
            pos: 0,
        };
        let composition = parser.parse_group(None)?;
        if composition.is_empty() {
            return Err(ParseFormulaError::new(formula, "formula contains no elements"));
        }
        Ok(composition)
    }

    /// Adds `amount` of `element`, merging with any existing amount.
    pub fn add_amount(&mut self, element: Element, amount: f64) {
        match self.amounts.iter_mut().find(|(el, _)| *el == element) {
            Some((_, existing)) => *existing += amount,
            None => self.amounts.push((element, amount)),
        }
    }

    /// Adds every amount of `other`, multiplied by `factor`.
    pub fn add_scaled(&mut self, other: &Composition, factor: f64) {
        for (element, amount) in other.iter() {
            self.add_amount(element, amount * factor);
        }
    }

    /// Returns a copy with every amount multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            amounts: self
                .amounts
                .iter()
                .map(|&(el, amount)| (el, amount * factor))
                .collect(),
        }
    }

    /// Amount of `element`, or zero when absent.
    pub fn get(&self, element: Element) -> f64 {
        self.amounts
            .iter()
            .find(|(el, _)| *el == element)
            .map_or(0.0, |&(_, amount)| amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        self.amounts.iter().copied()
    }

    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.amounts.iter().map(|&(el, _)| el)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Total number of atoms.
    pub fn num_atoms(&self) -> f64 {
        self.amounts.iter().map(|&(_, amount)| amount).sum()
    }

    /// Number of atoms that are neither hydrogen nor oxygen.
    pub fn solute_atoms(&self) -> f64 {
        self.amounts
            .iter()
            .filter(|(el, _)| !el.is_solvent())
            .map(|&(_, amount)| amount)
            .sum()
    }

    /// Factor by which the formula exceeds its reduced formula.
    ///
    /// For integral amounts this is their greatest common divisor
    /// (`Mn2O4` → 2); compositions with fractional amounts are already
    /// reduced and return 1.
    pub fn reduced_factor(&self) -> f64 {
        let mut factor: u64 = 0;
        for &(_, amount) in &self.amounts {
            let rounded = amount.round();
            if (amount - rounded).abs() > INTEGER_TOLERANCE || rounded < 0.0 {
                return 1.0;
            }
            factor = gcd(factor, rounded as u64);
        }
        if factor == 0 { 1.0 } else { factor as f64 }
    }
}

impl FromStr for Composition {
    type Err = ParseFormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_formula(s)
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &(element, amount) in &self.amounts {
            f.write_str(element.symbol())?;
            let rounded = amount.round();
            if (amount - 1.0).abs() <= INTEGER_TOLERANCE {
                continue;
            } else if (amount - rounded).abs() <= INTEGER_TOLERANCE {
                write!(f, "{}", rounded as i64)?;
            } else {
                write!(f, "{}", amount)?;
            }
        }
        Ok(())
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

struct FormulaParser<'a> {
    formula: &'a str,
    chars: &'a [char],
    pos: usize,
}

impl FormulaParser<'_> {
    fn error(&self, detail: impl Into<String>) -> ParseFormulaError {
        ParseFormulaError::new(self.formula, detail)
    }

    fn parse_group(&mut self, closing: Option<char>) -> Result<Composition, ParseFormulaError> {
        let mut composition = Composition::new();

        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                '(' | '[' => {
                    self.pos += 1;
                    let close = if c == '(' { ')' } else { ']' };
                    let inner = self.parse_group(Some(close))?;
                    let multiplier = self.parse_number()?.unwrap_or(1.0);
                    composition.add_scaled(&inner, multiplier);
                }
                ')' | ']' => {
                    if closing == Some(c) {
                        self.pos += 1;
                        return Ok(composition);
                    }
                    return Err(self.error(format!(
                        "unexpected '{}' at position {}",
                        c, self.pos
                    )));
                }
                c if c.is_ascii_uppercase() => {
                    let element = self.parse_element()?;
                    let amount = self.parse_number()?.unwrap_or(1.0);
                    composition.add_amount(element, amount);
                }
                c if c.is_whitespace() => self.pos += 1,
                _ => {
                    return Err(self.error(format!(
                        "unexpected character '{}' at position {}",
                        c, self.pos
                    )));
                }
            }
        }

        match closing {
            Some(close) => Err(self.error(format!("missing closing '{}'", close))),
            None => Ok(composition),
        }
    }

    fn parse_element(&mut self) -> Result<Element, ParseFormulaError> {
        let start = self.pos;
        self.pos += 1;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_lowercase())
        {
            self.pos += 1;
        }
        let symbol: String = self.chars[start..self.pos].iter().collect();
        symbol
            .parse::<Element>()
            .map_err(|_| self.error(format!("unknown element symbol '{}'", symbol)))
    }

    fn parse_number(&mut self) -> Result<Option<f64>, ParseFormulaError> {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == '.')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(Some)
            .map_err(|_| self.error(format!("invalid multiplier '{}'", text)))
    }
}

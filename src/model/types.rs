use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid phase type string: '{0}' (expected 'Solid' or 'Ion')")]
pub struct ParsePhaseTypeError(String);

#[rustfmt::skip]
const SYMBOLS: [&str; 118] = [
    "H",  "He", "Li", "Be", "B",  "C",  "N",  "O",  "F",  "Ne",
    "Na", "Mg", "Al", "Si", "P",  "S",  "Cl", "Ar", "K",  "Ca",
    "Sc", "Ti", "V",  "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y",  "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I",  "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W",  "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U",  "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// A chemical element, identified by its atomic number.
///
/// Elements order by atomic number, so sorted collections of elements
/// follow the periodic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    /// Hydrogen.
    pub const H: Element = Element(1);
    /// Oxygen.
    pub const O: Element = Element(8);

    /// Returns the element with atomic number `z`, if it exists.
    pub fn from_atomic_number(z: u8) -> Option<Self> {
        (1..=SYMBOLS.len() as u8).contains(&z).then_some(Element(z))
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS[usize::from(self.0) - 1]
    }

    /// Whether the element is supplied by the aqueous solvent (H or O).
    ///
    /// Solvent elements do not count towards an entry's normalization.
    #[inline]
    pub fn is_solvent(&self) -> bool {
        *self == Element::H || *self == Element::O
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SYMBOLS
            .iter()
            .position(|&symbol| symbol == s)
            .map(|idx| Element(idx as u8 + 1))
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

/// Phase classification of a Pourbaix entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseType {
    Solid,
    Ion,
}

impl fmt::Display for PhaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseType::Solid => write!(f, "Solid"),
            PhaseType::Ion => write!(f, "Ion"),
        }
    }
}

impl FromStr for PhaseType {
    type Err = ParsePhaseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Solid" => Ok(PhaseType::Solid),
            "Ion" => Ok(PhaseType::Ion),
            _ => Err(ParsePhaseTypeError(s.to_string())),
        }
    }
}

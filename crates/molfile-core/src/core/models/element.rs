use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A chemical element, identified by its atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    Rb,
    Sr,
    Y,
    Zr,
    Nb,
    Mo,
    Tc,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    In,
    Sn,
    Sb,
    Te,
    I,
    Xe,
    Cs,
    Ba,
    La,
    Ce,
    Pr,
    Nd,
    Pm,
    Sm,
    Eu,
    Gd,
    Tb,
    Dy,
    Ho,
    Er,
    Tm,
    Yb,
    Lu,
    Hf,
    Ta,
    W,
    Re,
    Os,
    Ir,
    Pt,
    Au,
    Hg,
    Tl,
    Pb,
    Bi,
    Po,
    At,
    Rn,
    Fr,
    Ra,
    Ac,
    Th,
    Pa,
    U,
    Np,
    Pu,
    Am,
    Cm,
    Bk,
    Cf,
    Es,
    Fm,
    Md,
    No,
    Lr,
    Rf,
    Db,
    Sg,
    Bh,
    Hs,
    Mt,
    Ds,
    Rg,
    Cn,
    Nh,
    Fl,
    Mc,
    Lv,
    Ts,
    Og,
}

#[rustfmt::skip]
const ALL_ELEMENTS: [Element; 118] = [
    Element::H, Element::He, Element::Li, Element::Be, Element::B, Element::C, Element::N, Element::O,
    Element::F, Element::Ne, Element::Na, Element::Mg, Element::Al, Element::Si, Element::P, Element::S,
    Element::Cl, Element::Ar, Element::K, Element::Ca, Element::Sc, Element::Ti, Element::V, Element::Cr,
    Element::Mn, Element::Fe, Element::Co, Element::Ni, Element::Cu, Element::Zn, Element::Ga, Element::Ge,
    Element::As, Element::Se, Element::Br, Element::Kr, Element::Rb, Element::Sr, Element::Y, Element::Zr,
    Element::Nb, Element::Mo, Element::Tc, Element::Ru, Element::Rh, Element::Pd, Element::Ag, Element::Cd,
    Element::In, Element::Sn, Element::Sb, Element::Te, Element::I, Element::Xe, Element::Cs, Element::Ba,
    Element::La, Element::Ce, Element::Pr, Element::Nd, Element::Pm, Element::Sm, Element::Eu, Element::Gd,
    Element::Tb, Element::Dy, Element::Ho, Element::Er, Element::Tm, Element::Yb, Element::Lu, Element::Hf,
    Element::Ta, Element::W, Element::Re, Element::Os, Element::Ir, Element::Pt, Element::Au, Element::Hg,
    Element::Tl, Element::Pb, Element::Bi, Element::Po, Element::At, Element::Rn, Element::Fr, Element::Ra,
    Element::Ac, Element::Th, Element::Pa, Element::U, Element::Np, Element::Pu, Element::Am, Element::Cm,
    Element::Bk, Element::Cf, Element::Es, Element::Fm, Element::Md, Element::No, Element::Lr, Element::Rf,
    Element::Db, Element::Sg, Element::Bh, Element::Hs, Element::Mt, Element::Ds, Element::Rg, Element::Cn,
    Element::Nh, Element::Fl, Element::Mc, Element::Lv, Element::Ts, Element::Og,
];

#[rustfmt::skip]
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg",
    "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr",
    "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf",
    "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po",
    "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs",
    "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

#[rustfmt::skip]
static SYMBOL_LOOKUP: Map<&'static str, Element> = phf_map! {
    "H" => Element::H, "He" => Element::He, "Li" => Element::Li, "Be" => Element::Be, "B" => Element::B,
    "C" => Element::C, "N" => Element::N, "O" => Element::O, "F" => Element::F, "Ne" => Element::Ne,
    "Na" => Element::Na, "Mg" => Element::Mg, "Al" => Element::Al, "Si" => Element::Si, "P" => Element::P,
    "S" => Element::S, "Cl" => Element::Cl, "Ar" => Element::Ar, "K" => Element::K, "Ca" => Element::Ca,
    "Sc" => Element::Sc, "Ti" => Element::Ti, "V" => Element::V, "Cr" => Element::Cr, "Mn" => Element::Mn,
    "Fe" => Element::Fe, "Co" => Element::Co, "Ni" => Element::Ni, "Cu" => Element::Cu, "Zn" => Element::Zn,
    "Ga" => Element::Ga, "Ge" => Element::Ge, "As" => Element::As, "Se" => Element::Se, "Br" => Element::Br,
    "Kr" => Element::Kr, "Rb" => Element::Rb, "Sr" => Element::Sr, "Y" => Element::Y, "Zr" => Element::Zr,
    "Nb" => Element::Nb, "Mo" => Element::Mo, "Tc" => Element::Tc, "Ru" => Element::Ru, "Rh" => Element::Rh,
    "Pd" => Element::Pd, "Ag" => Element::Ag, "Cd" => Element::Cd, "In" => Element::In, "Sn" => Element::Sn,
    "Sb" => Element::Sb, "Te" => Element::Te, "I" => Element::I, "Xe" => Element::Xe, "Cs" => Element::Cs,
    "Ba" => Element::Ba, "La" => Element::La, "Ce" => Element::Ce, "Pr" => Element::Pr, "Nd" => Element::Nd,
    "Pm" => Element::Pm, "Sm" => Element::Sm, "Eu" => Element::Eu, "Gd" => Element::Gd, "Tb" => Element::Tb,
    "Dy" => Element::Dy, "Ho" => Element::Ho, "Er" => Element::Er, "Tm" => Element::Tm, "Yb" => Element::Yb,
    "Lu" => Element::Lu, "Hf" => Element::Hf, "Ta" => Element::Ta, "W" => Element::W, "Re" => Element::Re,
    "Os" => Element::Os, "Ir" => Element::Ir, "Pt" => Element::Pt, "Au" => Element::Au, "Hg" => Element::Hg,
    "Tl" => Element::Tl, "Pb" => Element::Pb, "Bi" => Element::Bi, "Po" => Element::Po, "At" => Element::At,
    "Rn" => Element::Rn, "Fr" => Element::Fr, "Ra" => Element::Ra, "Ac" => Element::Ac, "Th" => Element::Th,
    "Pa" => Element::Pa, "U" => Element::U, "Np" => Element::Np, "Pu" => Element::Pu, "Am" => Element::Am,
    "Cm" => Element::Cm, "Bk" => Element::Bk, "Cf" => Element::Cf, "Es" => Element::Es, "Fm" => Element::Fm,
    "Md" => Element::Md, "No" => Element::No, "Lr" => Element::Lr, "Rf" => Element::Rf, "Db" => Element::Db,
    "Sg" => Element::Sg, "Bh" => Element::Bh, "Hs" => Element::Hs, "Mt" => Element::Mt, "Ds" => Element::Ds,
    "Rg" => Element::Rg, "Cn" => Element::Cn, "Nh" => Element::Nh, "Fl" => Element::Fl, "Mc" => Element::Mc,
    "Lv" => Element::Lv, "Ts" => Element::Ts, "Og" => Element::Og,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a known element symbol")]
pub struct ParseElementError(pub String);

impl Element {
    /// Returns the atomic number (1 for hydrogen, 118 for oganesson).
    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    /// Looks up an element by atomic number.
    pub fn from_atomic_number(z: u8) -> Option<Self> {
        ALL_ELEMENTS.get(usize::from(z).checked_sub(1)?).copied()
    }

    /// Returns the canonical symbol, e.g. `"Cl"`.
    pub fn symbol(self) -> &'static str {
        SYMBOLS[usize::from(self.atomic_number()) - 1]
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Resolves a canonically capitalised symbol ("C", "Cl"). Lookup is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SYMBOL_LOOKUP
            .get(s)
            .copied()
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

/// An element together with an optional isotope mass number.
///
/// This is the element identity stored for every atom of an
/// [`AtomCollection`](super::atoms::AtomCollection). `mass_number` is `None` for
/// the natural isotope mixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementType {
    pub element: Element,
    pub mass_number: Option<u16>,
}

impl ElementType {
    pub const fn new(element: Element) -> Self {
        Self {
            element,
            mass_number: None,
        }
    }

    pub const fn isotope(element: Element, mass_number: u16) -> Self {
        Self {
            element,
            mass_number: Some(mass_number),
        }
    }

    /// Translates a symbol string into an element identity.
    ///
    /// Accepts canonical symbols (`"C"`, `"Cl"`), the hydrogen isotope aliases
    /// `"D"` and `"T"`, and symbols with a mass number either prefixed or
    /// postfixed (`"13C"`, `"C13"`, `"2H"`). The symbol part is matched
    /// case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ParseElementError`] if the symbol does not name an element.
    pub fn from_symbol(symbol: &str) -> Result<Self, ParseElementError> {
        let fail = || ParseElementError(symbol.to_string());

        match symbol {
            "D" => return Ok(Self::isotope(Element::H, 2)),
            "T" => return Ok(Self::isotope(Element::H, 3)),
            _ => {}
        }

        let letters_start = symbol
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(fail)?;
        let (prefix, rest) = symbol.split_at(letters_start);
        let letters_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (letters, suffix) = rest.split_at(letters_end);

        let element = letters.parse::<Element>().map_err(|_| fail())?;
        let digits = match (prefix.is_empty(), suffix.is_empty()) {
            (true, true) => return Ok(Self::new(element)),
            (false, true) => prefix,
            (true, false) => suffix,
            (false, false) => return Err(fail()),
        };
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail());
        }

        let mass_number: u16 = digits.parse().map_err(|_| fail())?;
        if mass_number < u16::from(element.atomic_number()) {
            return Err(fail());
        }
        Ok(Self::isotope(element, mass_number))
    }

    /// Renders the symbol written to file formats.
    ///
    /// Deuterium and tritium are rendered as `"D"` and `"T"`; every other isotope
    /// collapses to its plain element symbol.
    pub fn symbol(&self) -> &'static str {
        match (self.element, self.mass_number) {
            (Element::H, Some(2)) => "D",
            (Element::H, Some(3)) => "T",
            (element, _) => element.symbol(),
        }
    }
}

impl From<Element> for ElementType {
    fn from(element: Element) -> Self {
        Self::new(element)
    }
}

impl FromStr for ElementType {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.element, self.mass_number) {
            (Element::H, Some(2 | 3)) | (_, None) => f.write_str(self.symbol()),
            (element, Some(mass)) => write!(f, "{}{}", mass, element.symbol()),
        }
    }
}

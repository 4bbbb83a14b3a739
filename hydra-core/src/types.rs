//! Runtime values.

use std::fmt;

use hydra_geometry::polar::Pol;

/// The value of an evaluated node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The result of a statement that produces nothing, such as
    /// `circle(...)`. Distinct from every real value, including `0`.
    #[default]
    Vacuous,
    Number(f64),
    String(String),
    /// A point in polar coordinates.
    Point(Pol),
}

impl Value {
    /// Name of the value's type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Vacuous => "vacuous",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Point(_) => "point",
        }
    }

    #[must_use]
    pub const fn is_vacuous(&self) -> bool {
        matches!(self, Self::Vacuous)
    }

    /// The text used when the value is printed or interpolated into a
    /// string. Vacuous values have no display form.
    #[must_use]
    pub fn display_string(&self) -> Option<String> {
        match self {
            Self::Vacuous => None,
            Self::Number(n) => Some(format!("{n:.6}")),
            Self::String(s) => Some(s.clone()),
            Self::Point(p) => Some(p.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_string() {
            Some(s) => f.write_str(&s),
            None => f.write_str("<vacuous>"),
        }
    }
}

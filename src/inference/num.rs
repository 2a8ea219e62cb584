use ordered_float::OrderedFloat;

use crate::schema::json_number;

/// Observed numeric range.
#[derive(Clone, Debug, PartialEq)]
pub struct NumC {
    pub min: OrderedFloat<f64>,
    pub max: OrderedFloat<f64>,
    pub fractional: bool,
}

impl NumC {
    pub fn point(n: f64) -> Self {
        Self { min: OrderedFloat(n), max: OrderedFloat(n), fractional: n.fract() != 0.0 }
    }

    pub(super) fn join(a: &Self, b: &Self) -> Self {
        Self { min: a.min.min(b.min), max: a.max.max(b.max), fractional: a.fractional || b.fractional }
    }

    /// Trailing annotation for an emitted `number` field.
    pub fn describe(&self) -> String {
        let kind = if self.fractional { "number" } else { "integer" };
        if self.min == self.max {
            return format!("{kind}, always {}", json_number(self.min.0));
        }
        format!("{kind}, {} to {}", json_number(self.min.0), json_number(self.max.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_widens_the_range() {
        let joined = NumC::join(&NumC::point(18.0), &NumC::point(80.0));
        assert_eq!(joined.describe(), "integer, 18 to 80");
        let joined = NumC::join(&joined, &NumC::point(2.5));
        assert_eq!(joined.describe(), "number, 2.5 to 80");
        assert_eq!(NumC::point(3.0).describe(), "integer, always 3");
    }
}

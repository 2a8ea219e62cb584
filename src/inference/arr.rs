use super::Shape;

/// Array evidence: one list hypothesis plus per-position columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrC {
    pub len_min: usize,
    pub len_max: usize,
    pub item: Box<Shape>,
    pub cols: Vec<Shape>,
    /// Arrays long enough to have position `i`.
    pub present: Vec<u64>,
    pub non_null: Vec<u64>,
    pub samples: u64,
}

impl ArrC {
    pub(super) fn join(a: &Self, b: &Self) -> Self {
        let width = a.cols.len().max(b.cols.len());
        let column = |i: usize| {
            let pad = Shape::null;
            let left = a.cols.get(i).cloned().unwrap_or_else(pad);
            let right = b.cols.get(i).cloned().unwrap_or_else(pad);
            Shape::join(&left, &right)
        };
        let sum = |xs: &[u64], ys: &[u64], i: usize| xs.get(i).copied().unwrap_or(0) + ys.get(i).copied().unwrap_or(0);
        Self {
            len_min: a.len_min.min(b.len_min),
            len_max: a.len_max.max(b.len_max),
            item: Box::new(Shape::join(&a.item, &b.item)),
            cols: (0..width).map(column).collect(),
            present: (0..width).map(|i| sum(&a.present, &b.present, i)).collect(),
            non_null: (0..width).map(|i| sum(&a.non_null, &b.non_null, i)).collect(),
            samples: a.samples + b.samples,
        }
    }

    /// Positional typing needs proof: two or more arrays of one arity whose
    /// columns disagree in kind, or a column that is null in every array.
    pub fn is_tuple(&self) -> bool {
        if self.samples < 2 || self.cols.is_empty() {
            return false;
        }
        let null_pad = (0..self.cols.len()).any(|i| self.present[i] == self.samples && self.non_null[i] == 0);
        if null_pad {
            return true;
        }
        let exact = self.len_min == self.len_max;
        let first = self.cols[0].kinds();
        exact && self.cols.iter().any(|c| c.kinds() != first)
    }

    /// Positions `0..n` are present in every array.
    pub fn required_prefix(&self) -> usize {
        self.present.iter().take_while(|p| **p == self.samples).count()
    }
}

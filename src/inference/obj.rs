use indexmap::IndexMap;

use super::Shape;

/// Object evidence. Fields keep first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjC {
    pub fields: IndexMap<String, FieldC>,
    pub seen: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldC {
    pub shape: Shape,
    pub present_in: u64,
    pub non_null_in: u64,
}

impl ObjC {
    pub(super) fn join(a: &Self, b: &Self) -> Self {
        let mut fields = a.fields.clone();
        for (name, fb) in &b.fields {
            match fields.get_mut(name) {
                Some(fa) => {
                    fa.shape = Shape::join(&fa.shape, &fb.shape);
                    fa.present_in += fb.present_in;
                    fa.non_null_in += fb.non_null_in;
                }
                None => {
                    fields.insert(name.clone(), fb.clone());
                }
            }
        }
        Self { fields, seen: a.seen + b.seen }
    }
}

impl FieldC {
    /// Absent, or null, in at least one observed object.
    pub fn is_optional(&self, seen: u64) -> bool {
        self.non_null_in < seen
    }
}

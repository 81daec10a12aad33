//! Label bounding-box geometry

pub use cartera_types::LabelBox;

/// Padding used when none (or a non-finite one) is supplied.
pub const DEFAULT_LABEL_PADDING: f64 = 2.0;

/// Resolve an optional padding to the value actually used for testing
#[inline]
pub fn effective_padding(padding: Option<f64>) -> f64 {
    match padding {
        Some(p) if p.is_finite() => p,
        _ => DEFAULT_LABEL_PADDING,
    }
}

/// Test whether two label boxes overlap within `padding` pixels.
///
/// Comparisons are strict: with a padding of 0, boxes that only share an
/// edge do not overlap. The test is symmetric in `a` and `b`.
pub fn overlaps(a: &LabelBox, b: &LabelBox, padding: Option<f64>) -> bool {
    let pad = effective_padding(padding);
    b.left < a.right + pad
        && a.left < b.right + pad
        && b.top < a.bottom + pad
        && a.top < b.bottom + pad
}

/// Extension methods on [`LabelBox`] that depend on core geometry rules
pub trait LabelBoxExt {
    fn overlaps(&self, other: &LabelBox, padding: Option<f64>) -> bool;
    fn overlaps_any<'a, I>(&self, others: I, padding: Option<f64>) -> bool
    where
        I: IntoIterator<Item = &'a LabelBox>;
}

impl LabelBoxExt for LabelBox {
    fn overlaps(&self, other: &LabelBox, padding: Option<f64>) -> bool {
        overlaps(self, other, padding)
    }

    fn overlaps_any<'a, I>(&self, others: I, padding: Option<f64>) -> bool
    where
        I: IntoIterator<Item = &'a LabelBox>,
    {
        others.into_iter().any(|o| overlaps(self, o, padding))
    }
}

//! Totally ordered floats, for keying the event queue.

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the wrappers in the `ordered_float` crate, this one doesn't order
/// NaNs or guard against them on construction: a NaN compares equal to
/// everything. Event positions are computed from validated, finite sites, so
/// the queue never holds one.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl From<f64> for CheapOrderedFloat {
    fn from(x: f64) -> Self {
        CheapOrderedFloat(x)
    }
}

// Now comes the fishy stuff.
impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    // Kind of like Arbitrary, but
    // - it's a local trait, so we can impl it for whatever we want, and
    // - it only returns "reasonable" values.
    pub trait Reasonable {
        type Strategy: Strategy<Value = Self>;
        fn reasonable() -> Self::Strategy;
    }

    impl<S: Reasonable, T: Reasonable> Reasonable for (S, T) {
        type Strategy = (S::Strategy, T::Strategy);

        fn reasonable() -> Self::Strategy {
            (S::reasonable(), T::reasonable())
        }
    }

    impl Reasonable for f64 {
        type Strategy = BoxedStrategy<f64>;

        fn reasonable() -> Self::Strategy {
            (-1e6..1e6).boxed()
        }
    }

    #[test]
    fn orders_like_f64() {
        let mut xs: Vec<CheapOrderedFloat> = [3.0, -1.0, 0.5, -0.0, 2.0]
            .into_iter()
            .map(CheapOrderedFloat::from)
            .collect();
        xs.sort();
        let xs: Vec<f64> = xs.into_iter().map(|x| x.0).collect();
        assert_eq!(xs, vec![-1.0, -0.0, 0.5, 2.0, 3.0]);
    }

    proptest! {
        #[test]
        fn agrees_with_partial_cmp(x in f64::reasonable(), y in f64::reasonable()) {
            let ordered = CheapOrderedFloat::from(x).cmp(&CheapOrderedFloat::from(y));
            prop_assert_eq!(Some(ordered), x.partial_cmp(&y));
        }
    }
}

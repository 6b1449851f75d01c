/// How a band's lower bound is compared against a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// `score >= bound`
    AtLeast,
    /// `score > bound`
    Above,
}

/// Ordered partition of a score range into labels.
///
/// `bands` are listed by descending lower bound and evaluated in order; a
/// score that clears none of them (NaN included) gets `floor`.
#[derive(Debug, Clone, Copy)]
pub struct BandTable<T: 'static> {
    pub bands: &'static [(f64, T)],
    pub floor: T,
    pub threshold: Threshold,
}

impl<T: Copy> BandTable<T> {
    pub fn classify(&self, score: f64) -> T {
        self.bands
            .iter()
            .find(|(bound, _)| match self.threshold {
                Threshold::AtLeast => score >= *bound,
                Threshold::Above => score > *bound,
            })
            .map(|(_, label)| *label)
            .unwrap_or(self.floor)
    }

    #[cfg(test)]
    pub fn is_descending(&self) -> bool {
        self.bands.windows(2).all(|pair| pair[0].0 > pair[1].0)
    }
}

#[cfg(test)]
mod tests {
    use super::{BandTable, Threshold};

    const INCLUSIVE: BandTable<&str> = BandTable {
        bands: &[(0.8, "top"), (0.4, "mid")],
        floor: "low",
        threshold: Threshold::AtLeast,
    };

    const STRICT: BandTable<&str> = BandTable {
        bands: &[(0.8, "top"), (0.4, "mid")],
        floor: "low",
        threshold: Threshold::Above,
    };

    #[test]
    fn inclusive_bands_include_their_lower_bound() {
        assert_eq!(INCLUSIVE.classify(0.8), "top");
        assert_eq!(INCLUSIVE.classify(0.79), "mid");
        assert_eq!(INCLUSIVE.classify(0.4), "mid");
        assert_eq!(INCLUSIVE.classify(0.0), "low");
        assert!(INCLUSIVE.is_descending());
    }

    #[test]
    fn strict_bands_exclude_their_lower_bound() {
        assert_eq!(STRICT.classify(0.8), "mid");
        assert_eq!(STRICT.classify(0.81), "top");
        assert_eq!(STRICT.classify(0.4), "low");
    }

    #[test]
    fn nan_falls_through_to_floor() {
        assert_eq!(INCLUSIVE.classify(f64::NAN), "low");
    }
}

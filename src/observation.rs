//! Observed data for the exact (chi-square) criterion.

use crate::error::ObservationError;

/// Independent variable, measured values and their one-sigma uncertainties.
///
/// Constructed only through [`Observation::new`], which guarantees equal, non-zero
/// lengths, finite entries and strictly positive uncertainties.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    x: Vec<f64>,
    y: Vec<f64>,
    yerr: Vec<f64>,
}

impl Observation {
    /**
    Validates and wraps an observation triple.

    # Errors

    Returns [`ObservationError`] if the sequences are empty, differ in length, contain
    non-finite values or if any uncertainty is not strictly positive.

    # Examples

    ```rust
    use mh_fit::observation::Observation;

    let obs = Observation::new(vec![0.0, 1.0], vec![0.1, 0.9], vec![0.1, 0.1]).unwrap();
    assert_eq!(obs.len(), 2);
    assert!(Observation::new(vec![0.0], vec![0.0], vec![0.0]).is_err());
    ```
    */
    pub fn new(x: Vec<f64>, y: Vec<f64>, yerr: Vec<f64>) -> Result<Self, ObservationError> {
        if x.len() != y.len() || x.len() != yerr.len() {
            return Err(ObservationError::LengthMismatch {
                x: x.len(),
                y: y.len(),
                yerr: yerr.len(),
            });
        }
        if x.is_empty() {
            return Err(ObservationError::Empty);
        }
        if let Some(index) = x
            .iter()
            .zip(&y)
            .position(|(xi, yi)| !xi.is_finite() || !yi.is_finite())
        {
            return Err(ObservationError::NonFinite { index });
        }
        if let Some((index, &value)) = yerr
            .iter()
            .enumerate()
            .find(|(_, e)| !(e.is_finite() && **e > 0.0))
        {
            return Err(ObservationError::NonPositiveUncertainty { index, value });
        }
        Ok(Self { x, y, yerr })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn yerr(&self) -> &[f64] {
        &self.yerr
    }

    /// Number of data points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always `false` for a constructed observation.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

use ndarray::{Array1, ArrayView1};

use crate::BpError;

type Proba = f64;

/// The minimum non-zero probability (to avoid denormalization, etc.)
pub const MIN_PROBA: Proba = 1e-40;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
enum DistrRepr {
    Uniform,
    Full(Array1<Proba>),
}

/// Probability distribution over `nc` classes.
///
/// The uniform distribution is not materialized until it has to be.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Distribution {
    nc: usize,
    value: DistrRepr,
}

impl Default for Distribution {
    /// Empty placeholder, meant to be overwritten at initialization.
    fn default() -> Self {
        Self::new(0)
    }
}

impl Distribution {
    /// Uniform distribution over `nc` classes.
    pub fn new(nc: usize) -> Self {
        Self {
            nc,
            value: DistrRepr::Uniform,
        }
    }
    pub fn from_array(array: Array1<Proba>) -> Result<Self, BpError> {
        if array.is_empty() {
            return Err(BpError::InvalidDistribution("no class"));
        }
        if array.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(BpError::InvalidDistribution(
                "probabilities must be finite and non-negative",
            ));
        }
        if array.sum() <= 0.0 {
            return Err(BpError::InvalidDistribution("probabilities sum to zero"));
        }
        Ok(Self {
            nc: array.len(),
            value: DistrRepr::Full(array),
        })
    }
    /// Unnormalized distribution, the caller is responsible for calling `normalize`.
    pub(crate) fn from_full(array: Array1<Proba>) -> Self {
        Self {
            nc: array.len(),
            value: DistrRepr::Full(array),
        }
    }
    /// Distribution that puts all the mass on class `c`.
    pub fn new_constant(nc: usize, c: usize) -> Self {
        assert!(c < nc, "Class out of bounds.");
        let mut value = Array1::zeros(nc);
        value[c] = 1.0;
        Self {
            nc,
            value: DistrRepr::Full(value),
        }
    }
    pub fn nc(&self) -> usize {
        self.nc
    }
    pub fn as_uniform(&self) -> Self {
        Self::new(self.nc)
    }
    pub fn is_full(&self) -> bool {
        match &self.value {
            DistrRepr::Full(_) => true,
            DistrRepr::Uniform => false,
        }
    }
    /// Probabilities, None if the distribution is uniform.
    pub fn value(&self) -> Option<ArrayView1<Proba>> {
        if let DistrRepr::Full(v) = &self.value {
            Some(v.view())
        } else {
            None
        }
    }
    /// Probabilities, including for the uniform distribution.
    pub fn to_array(&self) -> Array1<Proba> {
        match &self.value {
            DistrRepr::Full(v) => v.clone(),
            DistrRepr::Uniform => Array1::from_elem(self.nc, 1.0 / (self.nc as Proba)),
        }
    }
    /// Pointwise product with `factors`. Uniform factors are skipped.
    pub fn multiply<'a>(
        &mut self,
        factors: impl Iterator<Item = &'a Distribution>,
    ) -> Result<(), BpError> {
        for factor in factors {
            if factor.nc != self.nc {
                return Err(BpError::WrongDistributionNc(factor.nc, self.nc));
            }
            if let DistrRepr::Full(d) = &factor.value {
                match &mut self.value {
                    DistrRepr::Uniform => {
                        self.value = DistrRepr::Full(d.clone());
                    }
                    DistrRepr::Full(v) => {
                        *v *= d;
                    }
                }
            }
        }
        Ok(())
    }
    /// Make it such that the sum of the probabilities is 1.0, and clip them to `MIN_PROBA`.
    pub fn normalize(&mut self) {
        if let DistrRepr::Full(v) = &mut self.value {
            let s = v.sum();
            if s > 0.0 {
                *v /= s;
            } else {
                v.fill(1.0 / (self.nc as Proba));
            }
            v.mapv_inplace(|p| p.max(MIN_PROBA));
        }
    }
    /// Most likely class (the first one for ties).
    pub fn argmax(&self) -> Option<usize> {
        match &self.value {
            DistrRepr::Uniform => (self.nc > 0).then_some(0),
            DistrRepr::Full(v) => v
                .iter()
                .enumerate()
                .fold(None, |best: Option<(usize, Proba)>, (i, p)| match best {
                    Some((_, bp)) if bp >= *p => best,
                    _ => Some((i, *p)),
                })
                .map(|(i, _)| i),
        }
    }
}

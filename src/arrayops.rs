use std::borrow::Cow;
use std::iter::Sum;

use num_traits::{AsPrimitive, Float, ToPrimitive};

/// Create an evenly spaced grid from `start` to `end` with spacing `step`
pub fn gridspace<T: Float + ToPrimitive>(start: T, end: T, step: T) -> Vec<T> {
    let distance = end - start;
    let steps = (distance / step).to_usize().unwrap();
    let mut result = Vec::with_capacity(steps);
    for i in 0..steps {
        result.push(start + T::from(i).unwrap() * step);
    }
    result
}

/// Trapezoidal integral of sampled signal `y` over `x`
pub fn trapz<A: Float + Clone + AsPrimitive<B> + 'static, B: Float + Clone + AsPrimitive<A> + 'static + Sum>(x: &[A], y: &[B]) -> B {
    let n = x.len();
    (0..n - 1).map(|i| {
        let delta = x[i + 1] - x[i];
        delta.as_() * B::from(0.5).unwrap() * (y[i + 1] + y[i])
    }).sum()
}

/// A pair of chemical shift and intensity arrays of equal length, either
/// borrowed or owned.
#[derive(Debug, Default, Clone)]
pub struct ArrayPair<'lifespan> {
    pub shift_array: Cow<'lifespan, [f64]>,
    pub intensity_array: Cow<'lifespan, [f64]>,
    pub min_shift: f64,
    pub max_shift: f64,
}

impl<'lifespan> ArrayPair<'lifespan> {
    pub fn new(shift_array: Cow<'lifespan, [f64]>, intensity_array: Cow<'lifespan, [f64]>) -> Self {
        let min_shift = shift_array.first().copied().unwrap_or(0.0);
        let max_shift = shift_array.last().copied().unwrap_or(0.0);
        Self {
            shift_array,
            intensity_array,
            min_shift,
            max_shift,
        }
    }

    /// Borrow a pair of slices without copying
    pub fn wrap(shift_array: &'lifespan [f64], intensity_array: &'lifespan [f64]) -> Self {
        Self::new(Cow::Borrowed(shift_array), Cow::Borrowed(intensity_array))
    }

    /// Take ownership of a pair of buffers
    pub fn from_vecs(shift_array: Vec<f64>, intensity_array: Vec<f64>) -> Self {
        Self::new(Cow::Owned(shift_array), Cow::Owned(intensity_array))
    }

    pub fn len(&self) -> usize {
        self.shift_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shift_array.is_empty()
    }

    /// The index of the grid point nearest to `shift` by binary search
    pub fn find(&self, shift: f64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        match self
            .shift_array
            .binary_search_by(|x| x.partial_cmp(&shift).unwrap())
        {
            Ok(i) => i,
            Err(i) => i.min(n - 1),
        }
    }

    pub fn borrow(&'lifespan self) -> ArrayPair<'lifespan> {
        Self::wrap(&self.shift_array, &self.intensity_array)
    }

    pub fn to_owned(&self) -> ArrayPair<'static> {
        ArrayPair::from_vecs(self.shift_array.to_vec(), self.intensity_array.to_vec())
    }
}

impl<'lifespan> From<(Vec<f64>, Vec<f64>)> for ArrayPair<'lifespan> {
    fn from(pair: (Vec<f64>, Vec<f64>)) -> Self {
        Self::from_vecs(pair.0, pair.1)
    }
}

//! Best-effort parallel behaviour with numpy's array primitives.
//!
//! Only the primitives the Gaussian-Noise integration engine leans on are
//! provided: half-open range generation, first differences, and trapezoidal
//! integration over a non-uniform axis.

use crate::{Error, Result};
use alloc::format;
use alloc::string::ToString;
use ndarray::{Array1, ArrayView1};
use num_traits::{Float, NumCast, ToPrimitive};

/// Best effort parallel behaviour with numpy's `arange`.
///
/// Returns evenly spaced values within the half-open interval `[start, stop)`.
/// The number of samples is `ceil((stop - start) / step)`; a non-positive or
/// non-finite sample count yields an empty array rather than an error, which
/// mirrors numpy's behaviour for an already-exhausted range.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use gn_rs_core::num_rs::arange;
///
/// let x = arange(0.0, 1.0, 0.25);
/// assert_eq!(x, array![0.0, 0.25, 0.5, 0.75]);
///
/// let empty = arange(1.0, 0.0, 0.25);
/// assert!(empty.is_empty());
/// ```
pub fn arange<F>(start: F, stop: F, step: F) -> Array1<F>
where
    F: Float,
{
    let span = (stop - start) / step;
    let count = span.ceil().to_usize().unwrap_or(0);
    Array1::from_iter(
        (0..count).map(|i| start + step * F::from(i).expect("index conversion")),
    )
}

/// Best effort parallel behaviour with numpy's `diff` for 1D input.
///
/// Returns the first differences `x[i+1] - x[i]`, one element shorter than the
/// input.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use gn_rs_core::num_rs::diff;
///
/// let x = array![1.0, 2.0, 4.0, 7.0];
/// assert_eq!(diff(x.view()), array![1.0, 2.0, 3.0]);
/// ```
pub fn diff<F>(x: ArrayView1<F>) -> Array1<F>
where
    F: Float,
{
    Array1::from_iter(x.iter().zip(x.iter().skip(1)).map(|(a, b)| *b - *a))
}

/// Best effort parallel behaviour with numpy's `trapz` with an explicit
/// sample-point axis.
///
/// Integrates `y` over `x` with the composite trapezoidal rule. `x` need not
/// be uniformly spaced. Fewer than two samples integrate to zero.
///
/// # Errors
/// Returns [`Error::InvalidArg`] when `y` and `x` differ in length.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use gn_rs_core::num_rs::trapz;
///
/// let x = array![0.0, 1.0, 3.0];
/// let y = array![0.0, 1.0, 3.0];
/// assert_eq!(trapz(y.view(), x.view()).unwrap(), 4.5);
/// ```
pub fn trapz<F>(y: ArrayView1<F>, x: ArrayView1<F>) -> Result<F>
where
    F: Float,
{
    if y.len() != x.len() {
        return Err(Error::InvalidArg {
            arg: "x".to_string(),
            reason: format!(
                "sample points must match the integrand length ({} != {})",
                x.len(),
                y.len()
            ),
        });
    }
    let two = F::one() + F::one();
    let mut acc = F::zero();
    for i in 1..y.len() {
        acc = acc + (y[i] + y[i - 1]) * (x[i] - x[i - 1]) / two;
    }
    Ok(acc)
}

//! Single Cooley-Tukey NTT butterfly stage (spec.md §4.10).
//!
//! Twiddle-factor precomputation, bit-reversal permutation, and the outer
//! loop over `log2(n)` stages are the caller's responsibility (spec.md §1);
//! this core only performs one butterfly stage in place.

use crate::scalar::MontScalar;

/// Applies one butterfly stage to `coeffs` in place.
///
/// `m` is the current block size (even, `2 <= m <= n`); `twiddles` must
/// have length `m / 2`. For each block of size `m` and each `j` in
/// `0..m/2`:
///
/// ```text
/// w = twiddles[j]
/// u = coeffs[k + j]
/// v = coeffs[k + j + m/2]
/// t = MontMul(w, v)
/// coeffs[k + j + m/2] = u - t
/// coeffs[k + j]       = u + t
/// ```
///
/// `u` is read before either store so the new `v` always uses the old `u`
/// (spec.md §9's butterfly ordering note). All inputs and twiddles are in
/// Montgomery form; outputs remain in Montgomery form.
///
/// `m` must be a power of two with `2 <= m <= n`, and `n` (`coeffs.len()`)
/// must be a multiple of `m`; violating this is a caller bug with
/// unspecified behaviour (spec.md §7).
pub fn ntt_round(coeffs: &mut [MontScalar], twiddles: &[MontScalar], m: usize) {
    let n = coeffs.len();
    let half_m = m / 2;

    let mut k = 0;
    while k < n {
        for j in 0..half_m {
            let w = twiddles[j];
            let u = coeffs[k + j];
            let v = coeffs[k + j + half_m];

            let t = w.mul(&v);

            coeffs[k + j + half_m] = u.sub(&t);
            coeffs[k + j] = u.add(&t);
        }
        k += m;
    }
}

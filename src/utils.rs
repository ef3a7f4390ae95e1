//! # Library-Internal Utilities

/// Computes the binomial coefficient `n choose k`, or [`None`] if it does not
/// fit in a `usize`. Returns `0` if `k > n`.
#[must_use]
pub(crate) fn checked_binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = std::cmp::min(k, n - k);
    // after step `i` the accumulator is `n choose (i + 1)`, which only grows
    // with `i` since `k <= n / 2`
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc.checked_mul((n - i) as u128)? / (i as u128 + 1);
        if acc > usize::MAX as u128 {
            return None;
        }
    }
    usize::try_from(acc).ok()
}

/// Computes the number of bits needed to give distinct codes to `number`
/// elements, i.e., `ceil(log2(number))`. Zero and one element need no bits.
#[must_use]
pub(crate) fn bits_needed(number: usize) -> u32 {
    if number <= 1 {
        return 0;
    }
    usize::BITS - (number - 1).leading_zeros()
}

#[cfg(test)]
mod tests {
    #[test]
    fn binomial() {
        assert_eq!(super::checked_binomial(3, 2), Some(3));
        assert_eq!(super::checked_binomial(5, 0), Some(1));
        assert_eq!(super::checked_binomial(5, 5), Some(1));
        assert_eq!(super::checked_binomial(10, 3), Some(120));
        assert_eq!(super::checked_binomial(2, 3), Some(0));
        assert_eq!(super::checked_binomial(0, 0), Some(1));
        assert_eq!(super::checked_binomial(60, 30), Some(118_264_581_564_861_424));
    }

    #[test]
    fn binomial_large() {
        // intermediate products exceed 64 bits
        assert_eq!(
            super::checked_binomial(64, 32),
            Some(1_832_624_140_942_590_534)
        );
        assert_eq!(super::checked_binomial(64, 1), Some(64));
        assert_eq!(super::checked_binomial(1000, 2), Some(499_500));
        assert_eq!(super::checked_binomial(100, 50), None);
        assert_eq!(super::checked_binomial(1000, 500), None);
    }

    #[test]
    fn bits_needed() {
        assert_eq!(super::bits_needed(0), 0);
        assert_eq!(super::bits_needed(1), 0);
        assert_eq!(super::bits_needed(2), 1);
        assert_eq!(super::bits_needed(3), 2);
        assert_eq!(super::bits_needed(4), 2);
        assert_eq!(super::bits_needed(5), 3);
        assert_eq!(super::bits_needed(8), 3);
        assert_eq!(super::bits_needed(9), 4);
    }
}

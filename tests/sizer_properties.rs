//! Property tests for the checked buffer length computation.

use pixel_pool::checked_buffer_length;
use proptest::prelude::*;

proptest! {
    #[test]
    fn exact_when_product_fits(b in 0isize..=8, w in 0isize..=1 << 12, h in 0isize..=1 << 12) {
        let expected = (b as i128) * (w as i128) * (h as i128);
        prop_assert_eq!(checked_buffer_length(b, w, h), Some(expected as usize));
    }

    #[test]
    fn agrees_with_wide_arithmetic(b in 0isize..=8, w in 0isize..=isize::MAX, h in 0isize..=isize::MAX) {
        let wide = (b as i128).checked_mul(w as i128).and_then(|p| p.checked_mul(h as i128));
        let expected = wide
            .filter(|&p| p <= isize::MAX as i128)
            .map(|p| p as usize);
        prop_assert_eq!(checked_buffer_length(b, w, h), expected);
    }

    #[test]
    fn any_negative_operand_fails(
        b in any::<isize>(),
        w in any::<isize>(),
        h in any::<isize>(),
    ) {
        prop_assume!(b < 0 || w < 0 || h < 0);
        prop_assert_eq!(checked_buffer_length(b, w, h), None);
    }
}

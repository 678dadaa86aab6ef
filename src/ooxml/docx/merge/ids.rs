//! Identifier renaming rules shared by the remappers.
//!
//! Named identifiers (style ids, style links) get a `_<index>` suffix.
//! Numeric identifiers (`w:numId`, `w:abstractNumId`) get the source index
//! appended as digits so they stay valid decimal numbers.

/// Attribute holding the value of most WordprocessingML reference elements
pub(crate) const W_VAL: &str = "w:val";

/// `Heading1` from source 2 becomes `Heading1_2`.
pub(crate) fn suffixed(value: &str, index: usize) -> String {
    let mut buffer = itoa::Buffer::new();
    let digits = buffer.format(index);
    let mut out = String::with_capacity(value.len() + digits.len() + 1);
    out.push_str(value);
    out.push('_');
    out.push_str(digits);
    out
}

/// `5` from source 2 becomes `52`.
pub(crate) fn concatenated(value: &str, index: usize) -> String {
    let mut buffer = itoa::Buffer::new();
    let digits = buffer.format(index);
    let mut out = String::with_capacity(value.len() + digits.len());
    out.push_str(value);
    out.push_str(digits);
    out
}

/// `w:numId w:val="0"` removes numbering and must never be renumbered.
#[inline]
pub(crate) fn is_no_numbering(value: &str) -> bool {
    value == "0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixed() {
        assert_eq!(suffixed("Heading1", 0), "Heading1_0");
        assert_eq!(suffixed("ListParagraph", 12), "ListParagraph_12");
    }

    #[test]
    fn test_concatenated() {
        assert_eq!(concatenated("5", 0), "50");
        assert_eq!(concatenated("12", 3), "123");
    }

    #[test]
    fn test_no_numbering() {
        assert!(is_no_numbering("0"));
        assert!(!is_no_numbering("10"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_suffixed_separates_sources(
                id in "[A-Za-z][A-Za-z0-9]{0,16}",
                a in 0usize..64,
                b in 0usize..64,
            ) {
                prop_assume!(a != b);
                prop_assert_ne!(suffixed(&id, a), suffixed(&id, b));
            }

            #[test]
            fn prop_suffixed_is_injective_per_source(
                x in "[A-Za-z][A-Za-z0-9]{0,16}",
                y in "[A-Za-z][A-Za-z0-9]{0,16}",
                index in 0usize..64,
            ) {
                prop_assume!(x != y);
                prop_assert_ne!(suffixed(&x, index), suffixed(&y, index));
            }

            #[test]
            fn prop_concatenated_stays_numeric(value in 0u32..100_000, index in 0usize..10) {
                let renamed = concatenated(&value.to_string(), index);
                prop_assert!(renamed.parse::<u64>().is_ok());
                prop_assert_eq!(renamed.parse::<u64>().unwrap(), value as u64 * 10 + index as u64);
            }
        }
    }
}

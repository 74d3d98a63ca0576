//! Human-readable order numbers.
//!
//! An order id is an alphabetic prefix followed by a zero-padded number: `ORD0001`,
//! `CST0002`. Standard and custom-print orders use different prefixes but draw from
//! one sequence, so a number is never issued twice across prefixes. The order actor
//! resumes the sequence after the highest number among the orders it was seeded with
//! and allocates each id in the same turn that stores the order.

use crate::model::OrderDraft;

/// The numeric part of a sequence id, if `id` is one.
///
/// A sequence id is one or more ASCII letters followed by one or more ASCII digits.
/// Anything else (`ord-12`, `12`, `ORD`, `ORD12A`) is not.
pub fn parse_suffix(id: &str) -> Option<u64> {
    let split = id.find(|c: char| !c.is_ascii_alphabetic())?;
    let (prefix, digits) = id.split_at(split);
    if prefix.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `prefix` followed by `n` padded to `width` digits. Wider numbers are not truncated.
pub fn format_order_id(prefix: &str, n: u64, width: usize) -> String {
    format!("{prefix}{n:0width$}")
}

/// Which prefix an order gets and how wide its number is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    pub standard_prefix: String,
    pub custom_prefix: String,
    pub width: usize,
}

impl Default for IdScheme {
    fn default() -> Self {
        Self {
            standard_prefix: "ORD".into(),
            custom_prefix: "CST".into(),
            width: 4,
        }
    }
}

impl IdScheme {
    pub fn prefix_for(&self, draft: &OrderDraft) -> &str {
        if draft.is_custom() {
            &self.custom_prefix
        } else {
            &self.standard_prefix
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffix() {
        assert_eq!(parse_suffix("ORD0042"), Some(42));
        assert_eq!(parse_suffix("CST7"), Some(7));
        assert_eq!(parse_suffix("ORD"), None);
        assert_eq!(parse_suffix("0042"), None);
        assert_eq!(parse_suffix("ORD-0042"), None);
        assert_eq!(parse_suffix("ORD12A"), None);
        assert_eq!(parse_suffix(""), None);
        assert_eq!(parse_suffix("ORD18446744073709551616"), None);
    }

    #[test]
    fn test_format_pads_without_truncating() {
        assert_eq!(format_order_id("ORD", 1, 4), "ORD0001");
        assert_eq!(format_order_id("CST", 12, 4), "CST0012");
        assert_eq!(format_order_id("ORD", 123_456, 4), "ORD123456");
    }

    #[test]
    fn test_format_then_parse_agree() {
        for n in [1, 99, 10_000] {
            assert_eq!(parse_suffix(&format_order_id("ORD", n, 4)), Some(n));
        }
    }
}

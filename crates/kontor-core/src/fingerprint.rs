//! Transaction content hashing for duplicate detection
//!
//! Each transaction is fingerprinted from its canonical fields so that
//! re-importing overlapping date ranges never inserts the same row twice.
//! The fingerprint is the sole duplicate-detection mechanism.

use sha2::{Digest, Sha256};

use crate::models::ParsedRow;

/// Separator between fields in the pre-hash string
const FIELD_SEPARATOR: char = ':';

/// Escape a field value so the separator cannot appear un-escaped inside
/// it. Backslash is escaped first so the mapping is injective: without it,
/// the tuples ("a\\", "b") and ("a", "b") would join to the same string.
fn escape_field(s: &str) -> String {
    s.replace('\\', "\\\\").replace(':', "\\:")
}

/// Compute the stable content hash of a parsed row.
///
/// The fields are joined as `date:amount:description:creditAccount:debitAccount`
/// and digested with SHA-256. The date is serialized as `%Y-%m-%d` and the
/// amount as its normalized decimal string, so `100` and `100.00` hash
/// identically. The description is taken literally, whitespace included:
/// rows differing only in incidental whitespace are not guaranteed
/// duplicates by this design.
///
/// Hashing the same logical transaction twice, even across separate import
/// runs or after the amount round-trips through decimal parsing, yields the
/// identical hash.
pub fn content_hash(row: &ParsedRow) -> String {
    let date = row.booked_at.format("%Y-%m-%d").to_string();
    let amount = row.amount.normalize().to_string();

    let joined = [
        escape_field(&date),
        escape_field(&amount),
        escape_field(&row.description),
        escape_field(&row.credit_account_code),
        escape_field(&row.debit_account_code),
    ]
    .join(&FIELD_SEPARATOR.to_string());

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn row(amount: &str, description: &str, debit: &str, credit: &str) -> ParsedRow {
        ParsedRow {
            booked_at: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            amount: Decimal::from_str(amount).unwrap(),
            description: description.to_string(),
            debit_account_code: debit.to_string(),
            credit_account_code: credit.to_string(),
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = row("100.50", "Miete März", "1200", "4210");
        let b = row("100.50", "Miete März", "1200", "4210");
        assert_eq!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_amount_formatting_normalized() {
        // "100", "100.0" and "100.00" are the same monetary value and must
        // produce the same fingerprint
        let a = row("100", "x", "1200", "4210");
        let b = row("100.0", "x", "1200", "4210");
        let c = row("100.00", "x", "1200", "4210");
        assert_eq!(content_hash(&a), content_hash(&b));
        assert_eq!(content_hash(&b), content_hash(&c));
    }

    #[test]
    fn test_distinct_fields_do_not_collide() {
        let base = row("10", "desc", "1000", "2000");
        let variants = [
            row("11", "desc", "1000", "2000"),
            row("10", "desc2", "1000", "2000"),
            row("10", "desc", "1001", "2000"),
            row("10", "desc", "1000", "2001"),
        ];
        for v in &variants {
            assert_ne!(content_hash(&base), content_hash(v));
        }
    }

    #[test]
    fn test_separator_in_field_does_not_collide() {
        // Without escaping, ("a:b", "c") and ("a", "b:c") would join to the
        // same string
        let a = row("10", "a:b", "c", "2000");
        let b = row("10", "a", "b:c", "2000");
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_trailing_backslash_does_not_collide() {
        let a = row("10", "a\\", "b", "2000");
        let b = row("10", "a", "b", "2000");
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_whitespace_is_significant() {
        // Deliberate: descriptions differing only in whitespace are treated
        // as distinct transactions
        let a = row("10", "desc", "1000", "2000");
        let b = row("10", "desc ", "1000", "2000");
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_hash_shape() {
        let h = content_hash(&row("10", "desc", "1000", "2000"));
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

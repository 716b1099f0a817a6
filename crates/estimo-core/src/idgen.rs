//! SHA256 + base36 ID generation for curated corpus entries.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

/// Base36 alphabet (0-9, a-z).
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Converts a byte slice to a base36 string of the specified length.
pub fn encode_base36(data: &[u8], length: usize) -> String {
    let mut num = BigUint::from_bytes_be(data);
    let base = BigUint::from(36u32);
    let zero = BigUint::zero();

    // Build the string in reverse.
    let mut chars: Vec<u8> = Vec::with_capacity(length);
    while num > zero {
        let rem = &num % &base;
        num /= &base;
        let idx = rem.to_u32_digits();
        let i = if idx.is_empty() { 0 } else { idx[0] as usize };
        chars.push(BASE36_ALPHABET[i]);
    }
    chars.reverse();

    let mut s = String::from_utf8(chars).expect("base36 chars are valid UTF-8");
    if s.len() < length {
        let padding = "0".repeat(length - s.len());
        s = padding + &s;
    }
    if s.len() > length {
        s = s[s.len() - length..].to_owned();
    }
    s
}

/// Content-derived ID for a question definition: `q-` + 6 base36 chars of
/// SHA256(category|subcategory|text). Stable across re-seeds, so re-importing
/// the same library never duplicates questions.
pub fn question_id(category: &str, subcategory: Option<&str>, text: &str) -> String {
    let content = format!("{}|{}|{}", category, subcategory.unwrap_or(""), text);
    let hash = Sha256::digest(content.as_bytes());
    format!("q-{}", encode_base36(&hash[..4], 6))
}

/// Content-derived ID for a historical job: `job-` + 6 base36 chars of
/// SHA256(category|description|completed_at).
pub fn job_id(category: &str, description: &str, completed_at: DateTime<Utc>) -> String {
    let content = format!(
        "{}|{}|{}",
        category,
        description,
        completed_at.timestamp_nanos_opt().unwrap_or(0)
    );
    let hash = Sha256::digest(content.as_bytes());
    format!("job-{}", encode_base36(&hash[..4], 6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encoding_pads_and_truncates() {
        assert_eq!(encode_base36(&[0], 4), "0000");
        assert_eq!(encode_base36(&[255, 255], 4), "1ekf");
    }

    #[test]
    fn question_ids_are_stable_and_distinct() {
        let a = question_id("hvac", Some("furnace repair"), "Is the pilot light on?");
        let b = question_id("hvac", Some("furnace repair"), "Is the pilot light on?");
        let c = question_id("hvac", Some("furnace repair"), "How old is the furnace?");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("q-"));
        assert_eq!(a.len(), 2 + 6);
    }
}

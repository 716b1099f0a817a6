//! Integer-cent money helpers.
//!
//! All costs in the system are integer minor currency units (cents). Floats
//! appear only transiently when a unit cost is scaled by a fractional
//! quantity, and are rounded back to cents immediately.

/// Integer cents.
pub type Cents = i64;

/// Scales a per-unit cost by a (possibly fractional) quantity, rounding half
/// away from zero.
pub fn scale(unit_cents: Cents, quantity: f64) -> Cents {
    (unit_cents as f64 * quantity).round() as Cents
}

/// Formats cents as a dollar string, e.g. `123456` -> `"$1,234.56"`.
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    let dollars = abs / 100;
    let rem = abs % 100;

    // Insert thousands separators.
    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{rem:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(123456), "$1,234.56");
        assert_eq!(format_cents(100000000), "$1,000,000.00");
        assert_eq!(format_cents(-1999), "-$19.99");
    }

    #[test]
    fn scale_rounds_to_nearest_cent() {
        assert_eq!(scale(1000, 2.5), 2500);
        assert_eq!(scale(333, 3.0), 999);
        assert_eq!(scale(100, 0.005), 1);
    }
}

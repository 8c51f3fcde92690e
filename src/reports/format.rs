// Small formatting helpers shared by the reports.

/// Rewrites a raw district identifier ("NY 017") into the compact "NY-17"
/// form, stripping leading zeros from the number.
///
/// Only the raw two-token form is rewritten. Anything else, including an
/// identifier already in the compact form, passes through unchanged, which
/// makes the rewrite idempotent.
pub fn canonical_district(district: &str) -> String {
    let parts: Vec<&str> = district.split_whitespace().collect();
    match parts.as_slice() {
        [state, number] => match number.parse::<u32>() {
            Ok(n) => format!("{}-{}", state, n),
            Err(_) => district.to_string(),
        },
        _ => district.to_string(),
    }
}

/// Rewrites a "Last, First" name into "First Last" and appends the `*`
/// marker for incumbents. Names without exactly one comma pass through.
pub fn display_name(name: &str, incumbent: bool) -> String {
    let parts: Vec<&str> = name.split(',').map(|p| p.trim()).collect();
    let mut formatted = match parts.as_slice() {
        [last, first] => format!("{} {}", first, last),
        _ => name.to_string(),
    };
    if incumbent {
        formatted.push('*');
    }
    formatted
}

/// Comma-grouped dollar rendering for the console report.
pub fn money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = format!("{:.2}", amount.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let mut grouped = String::new();
    for (idx, c) in whole.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let whole: String = grouped.chars().rev().collect();
    let sign = if negative { "-" } else { "" };
    format!("{}${}.{}", sign, whole, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_strips_leading_zeros() {
        assert_eq!(canonical_district("NY 017"), "NY-17");
        assert_eq!(canonical_district("CA 001"), "CA-1");
        assert_eq!(canonical_district("AK 000"), "AK-0");
    }

    #[test]
    fn district_rewrite_is_idempotent() {
        let once = canonical_district("NY 017");
        assert_eq!(canonical_district(&once), once);
        // Already-compact and odd inputs pass through.
        assert_eq!(canonical_district("NY-17"), "NY-17");
        assert_eq!(canonical_district("statewide"), "statewide");
        assert_eq!(canonical_district("NY 1a7"), "NY 1a7");
    }

    #[test]
    fn names_are_reordered_and_marked() {
        assert_eq!(display_name("Smith, Jane", true), "Jane Smith*");
        assert_eq!(display_name("Doe, John", false), "John Doe");
        assert_eq!(display_name("Cher", false), "Cher");
        // More than one comma: leave the name alone.
        assert_eq!(display_name("a, b, c", false), "a, b, c");
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1234.5), "$1,234.50");
        assert_eq!(money(1234567.891), "$1,234,567.89");
        assert_eq!(money(-42.0), "-$42.00");
    }
}

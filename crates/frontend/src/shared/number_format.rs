//! Number formatting helpers for tables.

/// Format a value with a thousands separator (".") and a decimal comma,
/// Brazilian style, with the given number of decimal places.
pub fn format_number_with_decimals(value: f64, decimals: u8) -> String {
    let formatted = match decimals {
        0 => format!("{:.0}", value),
        1 => format!("{:.1}", value),
        2 => format!("{:.2}", value),
        _ => format!("{:.2}", value),
    };

    let parts: Vec<&str> = formatted.split('.').collect();
    let integer_part = parts[0];
    let decimal_part = parts.get(1);

    // Insert a dot every 3 digits from the end of the integer part.
    let mut reversed = String::new();
    let chars: Vec<char> = integer_part.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 && *c != '-' {
            reversed.push('.');
        }
        reversed.push(*c);
    }
    let formatted_integer = reversed.chars().rev().collect::<String>();

    match decimal_part {
        Some(d) => format!("{},{}", formatted_integer, d),
        None => formatted_integer,
    }
}

/// Monetary value: two decimals, thousands separator.
pub fn format_money(value: f64) -> String {
    format_number_with_decimals(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234.56), "1.234,56");
        assert_eq!(format_money(1234567.89), "1.234.567,89");
        assert_eq!(format_money(0.0), "0,00");
        assert_eq!(format_money(-1234.56), "-1.234,56");
    }

    #[test]
    fn test_format_without_decimals() {
        assert_eq!(format_number_with_decimals(1234567.0, 0), "1.234.567");
        assert_eq!(format_number_with_decimals(999.4, 0), "999");
    }
}

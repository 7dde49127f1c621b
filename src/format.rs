//! Number formatting for displaying amounts.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `number` as a dollar amount with two decimal places, e.g. "$12.50"
/// or "-$3.00".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    // numfmt switches to scientific notation for tiny magnitudes, so round to
    // whole cents first.
    let cents = (number * 100.0).round() / 100.0;

    let formatted_string = if cents < 0.0 {
        negative_fmt.fmt_string(cents.abs())
    } else if cents > 0.0 {
        positive_fmt.fmt_string(cents)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    pad_decimals(formatted_string)
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3" and "12.00"
/// as "12".
fn pad_decimals(formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        Some(dot) if formatted_string.len() - dot == 2 => format!("{formatted_string}0"),
        Some(_) => formatted_string,
        None => format!("{formatted_string}.00"),
    }
}

/// Format a percentage with one decimal place, e.g. "62.5%".
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_percentage, pad_decimals};

    #[test]
    fn pads_missing_decimals() {
        assert_eq!(pad_decimals("$12.3".to_owned()), "$12.30");
        assert_eq!(pad_decimals("$12".to_owned()), "$12.00");
        assert_eq!(pad_decimals("$12.34".to_owned()), "$12.34");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn formats_positive_amounts() {
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(0.01), "$0.01");
        assert_eq!(format_currency(0.1), "$0.10");
        assert_eq!(format_currency(7.0), "$7.00");
    }

    #[test]
    fn sub_cent_amounts_round_to_zero() {
        assert_eq!(format_currency(0.004), "$0.00");
        assert_eq!(format_currency(1e-7), "$0.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn rounds_to_the_nearest_cent() {
        assert_eq!(format_currency(0.006), "$0.01");
        assert_eq!(format_currency(-0.006), "-$0.01");
    }

    #[test]
    fn negative_amounts_have_leading_minus() {
        assert!(format_currency(-3.0).starts_with("-$"));
    }

    #[test]
    fn formats_percentage_with_one_decimal() {
        assert_eq!(format_percentage(62.5), "62.5%");
        assert_eq!(format_percentage(100.0 / 3.0), "33.3%");
    }
}

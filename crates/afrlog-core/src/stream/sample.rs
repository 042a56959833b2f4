//! Record to sample conversion

/// Length of the run of ASCII digits at the start of `bytes`
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parse the numeric prefix of a record.
///
/// Follows "parse leading float" rules: leading whitespace is skipped, the
/// longest decimal prefix (sign, digits, fraction, exponent) is read and
/// anything after it is ignored, so `"14.7xyz"` reads as `14.7`.
///
/// Returns `None` when there is no numeric prefix or the value is not finite
/// (`"NaN"`, `"Infinity"`, `"1e999"`). Callers drop such records without
/// reporting anything.
pub fn parse_sample(record: &str) -> Option<f64> {
    let text = record.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values() {
        assert_eq!(parse_sample("14.7"), Some(14.7));
        assert_eq!(parse_sample("-3"), Some(-3.0));
        assert_eq!(parse_sample("+0.5"), Some(0.5));
        assert_eq!(parse_sample(".5"), Some(0.5));
        assert_eq!(parse_sample("12."), Some(12.0));
    }

    #[test]
    fn test_trailing_garbage_ignored() {
        assert_eq!(parse_sample("14.7xyz"), Some(14.7));
        assert_eq!(parse_sample("13.1 AFR"), Some(13.1));
        assert_eq!(parse_sample("1.2.3"), Some(1.2));
    }

    #[test]
    fn test_leading_whitespace_skipped() {
        assert_eq!(parse_sample("  14.2"), Some(14.2));
        assert_eq!(parse_sample("\t9"), Some(9.0));
    }

    #[test]
    fn test_exponent() {
        assert_eq!(parse_sample("1.47e1"), Some(14.7));
        assert_eq!(parse_sample("2E-1"), Some(0.2));
        // Dangling exponent marker is garbage
        assert_eq!(parse_sample("15e"), Some(15.0));
        assert_eq!(parse_sample("15e+"), Some(15.0));
    }

    #[test]
    fn test_rejected_records() {
        assert_eq!(parse_sample(""), None);
        assert_eq!(parse_sample("abc"), None);
        assert_eq!(parse_sample("NaN"), None);
        assert_eq!(parse_sample("."), None);
        assert_eq!(parse_sample("-"), None);
        assert_eq!(parse_sample("x14.7"), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(parse_sample("Infinity"), None);
        assert_eq!(parse_sample("-Infinity"), None);
        assert_eq!(parse_sample("1e999"), None);
    }
}

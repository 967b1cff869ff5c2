use crate::f;

/// Extends reals with fixed-width bulk data field formatting
pub trait FieldExt {
    /// Format a real to fit an 8-column small-field slot
    ///
    /// Uses positional notation wherever it fits and falls back to the
    /// marker-free exponent form (`2.1+11` meaning 2.1e11) otherwise. The
    /// result always contains a decimal point and never exceeds 8
    /// characters, sign included.
    ///
    /// ```rust
    /// # use fetools_utils::FieldExt;
    /// assert_eq!(7850.0.field8(), "7850.");
    /// assert_eq!(0.005.field8(), "0.005");
    /// assert_eq!(2.1e11.field8(), "2.1+11");
    /// assert_eq!((-0.0012).field8(), "-0.0012");
    /// ```
    fn field8(&self) -> String;

    /// Format a real to fit a 16-column large-field slot
    fn field16(&self) -> String;
}

impl FieldExt for f64 {
    fn field8(&self) -> String {
        field(*self, 8)
    }

    fn field16(&self) -> String {
        field(*self, 16)
    }
}

/// Squeeze `value` into at most `width` characters
fn field(value: f64, width: usize) -> String {
    if value == 0.0 {
        return "0.".to_string();
    }

    let magnitude = value.abs();
    if (1e-3..1e8).contains(&magnitude) {
        // Highest positional precision that still fits the column
        for precision in (0..=width).rev() {
            let text = ensure_point(f!("{value:.precision$}"));
            if text.len() <= width {
                return trim_zeros(text);
            }
        }
    }

    exponent_form(value, width)
}

/// Marker-free scientific form, e.g. `1.5-7` for 1.5e-7
fn exponent_form(value: f64, width: usize) -> String {
    let mut precision = width;
    loop {
        let text = f!("{value:.precision$e}");
        // Guaranteed to contain 'e' for any finite float
        let (mantissa, exponent) = text.split_once('e').unwrap();
        let exponent = match exponent.strip_prefix('-') {
            Some(digits) => f!("-{digits}"),
            None => f!("+{exponent}"),
        };
        let out = f!("{}{exponent}", ensure_point(mantissa.to_string()));
        if out.len() <= width || precision == 0 {
            let mantissa_len = out.len() - exponent.len();
            let trimmed = trim_zeros(out[..mantissa_len].to_string());
            return f!("{trimmed}{exponent}");
        }
        precision -= 1;
    }
}

/// A bulk data real must carry a decimal point
fn ensure_point(mut text: String) -> String {
    if !text.contains('.') {
        text.push('.');
    }
    text
}

/// Drop trailing zeros after the decimal point, keeping the point itself
fn trim_zeros(text: String) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_fits() {
        assert_eq!(1.0.field8(), "1.");
        assert_eq!(0.3.field8(), "0.3");
        assert_eq!((-100.0).field8(), "-100.");
        assert_eq!(1234567.0.field8(), "1234567.");
    }

    #[test]
    fn exponent_fallback() {
        assert_eq!(2.1e11.field8(), "2.1+11");
        assert_eq!(1.5e-7.field8(), "1.5-7");
        assert_eq!((-3.0e9).field8(), "-3.+9");
    }

    #[test]
    fn tight_precision() {
        // Nine significant digits cannot fit, so precision is dropped
        let text = 0.123456789.field8();
        assert!(text.len() <= 8);
        assert!(text.starts_with("0.123"));
    }
}

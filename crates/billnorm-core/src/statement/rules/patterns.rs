//! Common regex patterns for hospital statement processing.

use lazy_static::lazy_static;
use regex::Regex;

/// Physician billing code with trailing dash, e.g. "1203-2050360-5- DABALOS".
pub const BILLING_CODE_DASHED: &str = r"\d{4}-\d{7}-\d-\s*.*";

/// Physician billing code, e.g. "1203-2050360-5 DABALOS".
pub const BILLING_CODE: &str = r"\d{4}-\d{7}-\d\s*.*";

/// Plain consultation fee line.
pub const CONSULTATION_FEE: &str = r"Consultation Fee";

/// Standard label for emergency consultation lines.
pub const EMERGENT_CONSULTATION: &str = "Emergent ER Consultation";

lazy_static! {
    // Anything that cannot be part of a plain decimal amount
    pub static ref MONEY_NOISE: Regex = Regex::new(r"[^0-9.\-]").unwrap();

    // Detailed charges table header keywords
    pub static ref DETAILED_HEADER: Regex = Regex::new(r"(?i)PARTICULARS|UNIT PRICE").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_noise_keeps_digits_and_signs() {
        assert_eq!(MONEY_NOISE.replace_all("PHP -1,234.50", ""), "-1234.50");
    }

    #[test]
    fn test_detailed_header() {
        assert!(DETAILED_HEADER.is_match("DATE REF. NO. QTY Particulars"));
        assert!(DETAILED_HEADER.is_match("unit price"));
        assert!(!DETAILED_HEADER.is_match("SUMMARY OF CHARGES"));
    }

    #[test]
    fn test_billing_code_patterns() {
        let dashed = Regex::new(BILLING_CODE_DASHED).unwrap();
        let plain = Regex::new(BILLING_CODE).unwrap();
        assert!(dashed.is_match("1203-2050360-5- DABALOS, MARIA"));
        assert!(plain.is_match("1203-2050360-5 DABALOS, MARIA"));
        assert!(!plain.is_match("Room and Board"));
    }
}

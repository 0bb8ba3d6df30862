use strum_macros::{Display, EnumIter};

/// A monetary field as the user typed it, together with its parsed value.
///
/// The text is what gets exported; the value is what arithmetic uses. Input
/// with no numeric prefix parses to `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    raw: String,
    value: f64,
}

impl Amount {
    pub fn parse(input: &str) -> Self {
        let raw = input.trim().to_string();
        let value = leading_number(&raw).unwrap_or(f64::NAN);
        Self { raw, value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Longest numeric prefix of `s`: sign, digits, fraction, exponent.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        let sign = if bytes[0] == b'-' { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let mut digits = 0;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }

    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            digits += 1;
        }
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// One employee's payroll entry for a single pay period.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRecord {
    pub name: String,
    pub position: String,
    pub department: String,
    pub basic_salary: Amount,
    pub bonus: Amount,
    pub deductions: Amount,
    pub payment_date: String,
}

impl PayrollRecord {
    /// Basic salary plus bonus minus deductions, recomputed on every call.
    pub fn net_pay(&self) -> f64 {
        self.basic_salary.value() + self.bonus.value() - self.deductions.value()
    }

    /// Exported text of a single column.
    pub fn field(&self, field: PayrollField) -> &str {
        match field {
            PayrollField::Name => &self.name,
            PayrollField::Position => &self.position,
            PayrollField::Department => &self.department,
            PayrollField::BasicSalary => self.basic_salary.as_str(),
            PayrollField::Bonus => self.bonus.as_str(),
            PayrollField::Deductions => self.deductions.as_str(),
            PayrollField::PaymentDate => &self.payment_date,
        }
    }
}

/// Exported columns, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum PayrollField {
    Name,
    Position,
    Department,
    #[strum(serialize = "Basic Salary")]
    BasicSalary,
    Bonus,
    Deductions,
    #[strum(serialize = "Payment Date")]
    PaymentDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn record(basic: &str, bonus: &str, deductions: &str) -> PayrollRecord {
        PayrollRecord {
            name: "Alice Uwase".into(),
            position: "Accountant".into(),
            department: "Finance".into(),
            basic_salary: Amount::parse(basic),
            bonus: Amount::parse(bonus),
            deductions: Amount::parse(deductions),
            payment_date: "2025/08/01".into(),
        }
    }

    #[test]
    fn net_pay_adds_bonus_and_subtracts_deductions() {
        assert_eq!(record("450000", "25000", "15000").net_pay(), 460000.0);
        assert_eq!(record("1.5", "0.25", "0.5").net_pay(), 1.25);
    }

    #[test]
    fn net_pay_can_go_negative() {
        assert_eq!(record("1000", "0", "2500").net_pay(), -1500.0);
    }

    #[test]
    fn net_pay_follows_field_changes() {
        let mut r = record("1000", "0", "0");
        assert_eq!(r.net_pay(), 1000.0);
        r.bonus = Amount::parse("500");
        assert_eq!(r.net_pay(), 1500.0);
    }

    #[test]
    fn amount_parses_numeric_prefix() {
        assert_eq!(Amount::parse("  450000 RWF").value(), 450000.0);
        assert_eq!(Amount::parse("12.5abc").value(), 12.5);
        assert_eq!(Amount::parse("-.5").value(), -0.5);
        assert_eq!(Amount::parse("3e2x").value(), 300.0);
        assert_eq!(Amount::parse("7e").value(), 7.0);
        assert_eq!(Amount::parse("-Infinity").value(), f64::NEG_INFINITY);
    }

    #[test]
    fn amount_without_digits_is_nan() {
        assert!(Amount::parse("abc").value().is_nan());
        assert!(Amount::parse(".").value().is_nan());
        assert!(Amount::parse("-").value().is_nan());
        assert!(record("abc", "0", "0").net_pay().is_nan());
    }

    #[test]
    fn amount_keeps_trimmed_text() {
        let amount = Amount::parse(" 1,200 ");
        assert_eq!(amount.as_str(), "1,200");
        assert_eq!(amount.value(), 1.0);
    }

    #[test]
    fn field_labels_follow_header_order() {
        let labels: Vec<String> = PayrollField::iter().map(|f| f.to_string()).collect();
        assert_eq!(
            labels.join(","),
            "Name,Position,Department,Basic Salary,Bonus,Deductions,Payment Date"
        );
    }

    #[test]
    fn field_returns_exported_text() {
        let r = record("450000", "0", "0");
        let values: Vec<&str> = PayrollField::iter().map(|f| r.field(f)).collect();
        assert_eq!(
            values,
            ["Alice Uwase", "Accountant", "Finance", "450000", "0", "0", "2025/08/01"]
        );
    }
}

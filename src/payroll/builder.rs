use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::error::PayrollError;
use crate::model::payroll::{Amount, PayrollRecord};

/// Raw payroll form input. Keys left out of the request body, or sent as
/// `null`, count as empty. Numbers are taken as their JSON text.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PayrollForm {
    #[schema(example = "Alice Uwase")]
    #[serde(deserialize_with = "form_text")]
    pub name: String,

    #[schema(example = "Accountant")]
    #[serde(deserialize_with = "form_text")]
    pub position: String,

    #[schema(example = "Finance")]
    #[serde(deserialize_with = "form_text")]
    pub department: String,

    #[schema(example = "450000")]
    #[serde(deserialize_with = "form_text")]
    pub basic_salary: String,

    #[schema(example = "0")]
    #[serde(deserialize_with = "form_text")]
    pub bonus: String,

    #[schema(example = "0")]
    #[serde(deserialize_with = "form_text")]
    pub deductions: String,

    #[schema(example = "2025/08/01")]
    #[serde(deserialize_with = "form_text")]
    pub payment_date: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormValue {
    Text(String),
    Number(serde_json::Number),
}

fn form_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FormValue>::deserialize(deserializer)? {
        Some(FormValue::Text(text)) => text,
        Some(FormValue::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

impl PayrollForm {
    /// Names of required fields that are empty or whitespace, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("position", &self.position),
            ("department", &self.department),
            ("basicSalary", &self.basic_salary),
            ("bonus", &self.bonus),
            ("deductions", &self.deductions),
            ("paymentDate", &self.payment_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect()
    }

    /// Validates presence of every field and builds the record.
    ///
    /// Monetary fields are parsed permissively; see [`Amount::parse`].
    pub fn build(&self) -> Result<PayrollRecord, PayrollError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(PayrollError::MissingFields(missing));
        }

        Ok(PayrollRecord {
            name: self.name.trim().to_string(),
            position: self.position.trim().to_string(),
            department: self.department.trim().to_string(),
            basic_salary: Amount::parse(&self.basic_salary),
            bonus: Amount::parse(&self.bonus),
            deductions: Amount::parse(&self.deductions),
            payment_date: self.payment_date.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PayrollForm {
        PayrollForm {
            name: "Alice Uwase".into(),
            position: "Accountant".into(),
            department: "Finance".into(),
            basic_salary: "450000".into(),
            bonus: "0".into(),
            deductions: "0".into(),
            payment_date: "2025/08/01".into(),
        }
    }

    #[test]
    fn builds_record_from_complete_form() {
        let record = form().build().unwrap();
        assert_eq!(record.name, "Alice Uwase");
        assert_eq!(record.basic_salary.value(), 450000.0);
        assert_eq!(record.payment_date, "2025/08/01");
        assert_eq!(record.net_pay(), 450000.0);
    }

    #[test]
    fn trims_text_fields() {
        let record = PayrollForm {
            name: "  Eric Mugisha ".into(),
            ..form()
        }
        .build()
        .unwrap();
        assert_eq!(record.name, "Eric Mugisha");
    }

    #[test]
    fn rejects_empty_name() {
        let err = PayrollForm {
            name: String::new(),
            ..form()
        }
        .build()
        .unwrap_err();

        match err {
            PayrollError::MissingFields(fields) => assert_eq!(fields, ["name"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let form = PayrollForm {
            bonus: "   ".into(),
            payment_date: "\t".into(),
            ..form()
        };
        assert_eq!(form.missing_fields(), ["bonus", "paymentDate"]);
        assert!(form.build().is_err());
    }

    #[test]
    fn default_form_reports_every_field() {
        assert_eq!(PayrollForm::default().missing_fields().len(), 7);
    }

    #[test]
    fn non_numeric_amount_propagates_nan() {
        let record = PayrollForm {
            deductions: "none".into(),
            ..form()
        }
        .build()
        .unwrap();
        assert!(record.deductions.value().is_nan());
        assert!(record.net_pay().is_nan());
    }

    #[test]
    fn null_values_deserialize_as_empty() {
        let form: PayrollForm =
            serde_json::from_str(r#"{"name":null,"position":"Accountant"}"#).unwrap();
        assert_eq!(form.name, "");
        assert_eq!(form.missing_fields()[0], "name");
    }

    #[test]
    fn numeric_values_keep_their_json_text() {
        let form: PayrollForm =
            serde_json::from_str(r#"{"basicSalary":450000,"bonus":1500.5,"deductions":0}"#)
                .unwrap();
        assert_eq!(form.basic_salary, "450000");
        assert_eq!(form.bonus, "1500.5");
        assert_eq!(form.deductions, "0");
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(serde_json::from_str::<PayrollForm>(r#"{"bonus":[1]}"#).is_err());
    }

    #[test]
    fn absent_json_keys_deserialize_as_empty() {
        let form: PayrollForm =
            serde_json::from_str(r#"{"name":"Alice","basicSalary":"100"}"#).unwrap();
        assert_eq!(form.basic_salary, "100");
        assert_eq!(
            form.missing_fields(),
            ["position", "department", "bonus", "deductions", "paymentDate"]
        );
    }
}

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

#[derive(Debug, Display)]
pub enum PayrollError {
    #[display(fmt = "Please fill in all required fields: {}", "_0.join(\", \")")]
    MissingFields(Vec<&'static str>),

    #[display(fmt = "Invalid payroll form: {}", _0)]
    InvalidPayload(String),

    #[display(fmt = "Payroll record {} not found", _0)]
    NotFound(u64),

    #[display(fmt = "Failed to render payslip: {}", _0)]
    Pdf(String),

    #[display(fmt = "Failed to export payroll history: {}", _0)]
    Csv(String),
}

impl std::error::Error for PayrollError {}

impl From<printpdf::Error> for PayrollError {
    fn from(e: printpdf::Error) -> Self {
        PayrollError::Pdf(e.to_string())
    }
}

impl From<csv::Error> for PayrollError {
    fn from(e: csv::Error) -> Self {
        PayrollError::Csv(e.to_string())
    }
}

impl ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::MissingFields(_) | PayrollError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            PayrollError::NotFound(_) => StatusCode::NOT_FOUND,
            PayrollError::Pdf(_) | PayrollError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({ "message": self.to_string() });
        if let PayrollError::MissingFields(fields) = self {
            body["missing"] = json!(fields);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

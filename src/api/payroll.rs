use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::error::PayrollError;
use crate::model::history::{PayrollEntry, PayrollHistory};
use crate::payroll::builder::PayrollForm;
use crate::payroll::exporter::{ExportFile, PayslipExporter, ascii_fallback};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollResponse {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Alice Uwase")]
    pub name: String,

    #[schema(example = "Accountant")]
    pub position: String,

    #[schema(example = "Finance")]
    pub department: String,

    #[schema(example = 450000.0, nullable = true)]
    pub basic_salary: Option<f64>,

    #[schema(example = 0.0, nullable = true)]
    pub bonus: Option<f64>,

    #[schema(example = 0.0, nullable = true)]
    pub deductions: Option<f64>,

    #[schema(example = "2025/08/01")]
    pub payment_date: String,

    /// Null when the inputs do not add up to a finite number.
    #[schema(example = 450000.0, nullable = true)]
    pub net_pay: Option<f64>,

    #[schema(example = "RWF 450000")]
    pub net_pay_display: String,

    #[schema(value_type = String, format = DateTime)]
    pub submitted_at: DateTime<Utc>,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl PayrollResponse {
    pub fn new(entry: &PayrollEntry, exporter: &PayslipExporter) -> Self {
        let record = &entry.record;
        Self {
            id: entry.id,
            name: record.name.clone(),
            position: record.position.clone(),
            department: record.department.clone(),
            basic_salary: finite(record.basic_salary.value()),
            bonus: finite(record.bonus.value()),
            deductions: finite(record.deductions.value()),
            payment_date: record.payment_date.clone(),
            net_pay: finite(record.net_pay()),
            net_pay_display: exporter.net_pay_display(record),
            submitted_at: entry.submitted_at,
        }
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
}

// Non-ASCII names also go out as RFC 5987 `filename*`.
fn download(file: ExportFile) -> HttpResponse {
    let mut parameters = vec![DispositionParam::Filename(ascii_fallback(&file.filename))];
    if !file.filename.is_ascii() {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: file.filename.into_bytes(),
        }));
    }

    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters,
        })
        .body(file.bytes)
}

#[utoipa::path(
    post,
    path = "/api/payroll",
    request_body = PayrollForm,
    responses(
        (status = 201, description = "Record added to history", body = PayrollResponse),
        (status = 400, description = "A required field is empty", body = Object, example = json!({
            "message": "Please fill in all required fields: name",
            "missing": ["name"]
        }))
    ),
    tag = "Payroll"
)]
pub async fn create_payroll(
    history: web::Data<PayrollHistory>,
    exporter: web::Data<PayslipExporter>,
    form: web::Json<PayrollForm>,
) -> actix_web::Result<impl Responder> {
    let record = form.build().inspect_err(|e| {
        warn!(error = %e, "Payroll submission rejected");
    })?;

    let entry = history.append(record);
    info!(
        id = entry.id,
        employee = %entry.record.name,
        history_len = history.len(),
        "Payroll record added to history"
    );

    Ok(HttpResponse::Created().json(PayrollResponse::new(&entry, &exporter)))
}

#[utoipa::path(
    get,
    path = "/api/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse)
    ),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    history: web::Data<PayrollHistory>,
    exporter: web::Data<PayslipExporter>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    let (entries, total) = history.page(page, per_page);
    let data = entries
        .iter()
        .map(|entry| PayrollResponse::new(entry, &exporter))
        .collect();

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, body = PayrollResponse),
        (status = 404, description = "Payroll record not found")
    ),
    tag = "Payroll"
)]
pub async fn get_payroll(
    history: web::Data<PayrollHistory>,
    exporter: web::Data<PayslipExporter>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();
    let entry = history
        .get(payroll_id)
        .ok_or(PayrollError::NotFound(payroll_id))?;

    Ok(HttpResponse::Ok().json(PayrollResponse::new(&entry, &exporter)))
}

#[utoipa::path(
    get,
    path = "/api/payroll/{payroll_id}/payslip",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "Payslip PDF (application/pdf) attachment"),
        (status = 404, description = "Payroll record not found"),
        (status = 500, description = "Payslip could not be rendered")
    ),
    tag = "Payroll"
)]
pub async fn download_payslip(
    history: web::Data<PayrollHistory>,
    exporter: web::Data<PayslipExporter>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll_id = path.into_inner();
    let entry = history
        .get(payroll_id)
        .ok_or(PayrollError::NotFound(payroll_id))?;

    let file = exporter.render_single_payslip(&entry.record).map_err(|e| {
        error!(error = %e, payroll_id, "Failed to render payslip");
        e
    })?;
    info!(payroll_id, filename = %file.filename, "Payslip exported");

    Ok(download(file))
}

#[utoipa::path(
    get,
    path = "/api/payroll/export.csv",
    responses(
        (status = 200, description = "Payroll history CSV (text/csv) attachment"),
        (status = 500, description = "History could not be exported")
    ),
    tag = "Payroll"
)]
pub async fn export_history_csv(
    history: web::Data<PayrollHistory>,
    exporter: web::Data<PayslipExporter>,
) -> actix_web::Result<impl Responder> {
    let entries = history.snapshot();
    let file = exporter
        .render_history_csv(entries.iter().map(|entry| &entry.record))
        .map_err(|e| {
            error!(error = %e, "Failed to export payroll history");
            e
        })?;
    info!(rows = entries.len(), "Payroll history exported");

    Ok(download(file))
}

#[utoipa::path(
    delete,
    path = "/api/payroll",
    responses(
        (status = 200, description = "History cleared", body = Object, example = json!({
            "message": "Payroll history cleared",
            "removed": 3
        }))
    ),
    tag = "Payroll"
)]
pub async fn clear_history(history: web::Data<PayrollHistory>) -> actix_web::Result<impl Responder> {
    let removed = history.clear();
    info!(removed, "Payroll history cleared");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payroll history cleared",
        "removed": removed
    })))
}

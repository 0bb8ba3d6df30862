use crate::api::payroll::{PaginatedPayrollResponse, PayrollQuery, PayrollResponse};
use crate::payroll::builder::PayrollForm;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll API",
        version = "0.1.0",
        description = r#"
## Payroll & Payslip Service

Back end for the payroll dashboard: records payroll entries for the current
session and exports them as documents.

### 🔹 Features
- **Payroll entry**
  - Submit a payroll form; net pay is basic salary plus bonus minus deductions
- **Payslips**
  - Download a single record as `Payslip_<Name>_<Date>.pdf`
- **History export**
  - Download the whole session history as `payroll_history.csv`

### 📦 Notes
- History lives in memory only and is lost on restart
- Monetary fields are accepted as text and parsed leniently
"#,
    ),
    paths(
        crate::api::payroll::create_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::get_payroll,
        crate::api::payroll::download_payslip,
        crate::api::payroll::export_history_csv,
        crate::api::payroll::clear_history
    ),
    components(
        schemas(
            PayrollForm,
            PayrollResponse,
            PaginatedPayrollResponse,
            PayrollQuery
        )
    ),
    tags(
        (name = "Payroll", description = "Payroll history and payslip export APIs"),
    )
)]
pub struct ApiDoc;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use strum::IntoEnumIterator;

use crate::config::Config;
use crate::error::PayrollError;
use crate::model::payroll::{PayrollField, PayrollRecord};

pub const HISTORY_CSV_FILENAME: &str = "payroll_history.csv";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const LINE_HEIGHT: f32 = 10.0;

/// A rendered download: bytes plus the name and type to serve them under.
#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Renders payroll records into payslip PDFs and the history CSV.
#[derive(Debug, Clone)]
pub struct PayslipExporter {
    organization: String,
    currency: String,
}

impl PayslipExporter {
    pub fn new(organization: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            currency: currency.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.organization_name, &config.currency)
    }

    fn money(&self, amount: f64) -> String {
        format!("{} {}", self.currency, format_amount(amount))
    }

    /// Net pay as shown to the user, e.g. `RWF 450000`.
    pub fn net_pay_display(&self, record: &PayrollRecord) -> String {
        self.money(record.net_pay())
    }

    /// The labeled payslip lines, in print order.
    pub fn payslip_lines(&self, record: &PayrollRecord) -> Vec<String> {
        vec![
            format!("Employee Name: {}", record.name),
            format!("Position: {}", record.position),
            format!("Payment Date: {}", record.payment_date),
            format!("Basic Salary: {}", self.money(record.basic_salary.value())),
            format!("Bonus: {}", self.money(record.bonus.value())),
            format!("Deductions: {}", self.money(record.deductions.value())),
            format!("Net Pay: {}", self.net_pay_display(record)),
        ]
    }

    /// One-page A4 payslip for a single record.
    pub fn render_single_payslip(&self, record: &PayrollRecord) -> Result<ExportFile, PayrollError> {
        let filename = payslip_filename(record);
        let (doc, page, layer) =
            PdfDocument::new(filename.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Payslip");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut y = PAGE_HEIGHT - 25.0;
        layer.use_text(self.organization.as_str(), 18.0, Mm(MARGIN_LEFT), Mm(y), &bold);
        y -= LINE_HEIGHT;
        layer.use_text("Payslip", 14.0, Mm(MARGIN_LEFT), Mm(y), &bold);
        y -= LINE_HEIGHT * 1.5;

        for line in self.payslip_lines(record) {
            layer.use_text(line, 12.0, Mm(MARGIN_LEFT), Mm(y), &regular);
            y -= LINE_HEIGHT;
        }

        let bytes = doc.save_to_bytes()?;
        tracing::debug!(filename = %filename, size = bytes.len(), "Payslip rendered");

        Ok(ExportFile {
            filename,
            content_type: "application/pdf",
            bytes,
        })
    }

    /// Header line plus one comma-joined row per record.
    ///
    /// Fields are written as-is: a value containing a comma shifts the
    /// columns of its row.
    pub fn render_history_csv<'a, I>(&self, records: I) -> Result<ExportFile, PayrollError>
    where
        I: IntoIterator<Item = &'a PayrollRecord>,
    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(PayrollField::iter().map(|f| f.to_string()))?;
        let mut rows = 0usize;
        for record in records {
            writer.write_record(PayrollField::iter().map(|f| record.field(f)))?;
            rows += 1;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| PayrollError::Csv(e.error().to_string()))?;
        tracing::debug!(rows, size = bytes.len(), "Payroll history CSV rendered");

        Ok(ExportFile {
            filename: HISTORY_CSV_FILENAME.to_string(),
            content_type: "text/csv",
            bytes,
        })
    }
}

// Non-finite values use the dashboard's spelling, not Rust's `inf`.
fn format_amount(amount: f64) -> String {
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{sign}Infinity")
    } else {
        amount.to_string()
    }
}

/// `Payslip_<Name>_<Date>.pdf`, with whitespace as `_` and `/` as `-`.
///
/// Letters and digits from any script are kept; see [`ascii_fallback`] for
/// the plain `filename` header parameter.
pub fn payslip_filename(record: &PayrollRecord) -> String {
    format!(
        "Payslip_{}_{}.pdf",
        filename_part(&record.name),
        filename_part(&record.payment_date)
    )
}

fn filename_part(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' => '-',
            c if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') => c,
            _ => '_',
        })
        .collect()
}

/// `filename` with every non-ASCII character replaced by `_`.
pub fn ascii_fallback(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect()
}

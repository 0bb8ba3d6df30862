pub mod history;
pub mod payroll;

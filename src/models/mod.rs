//! Domain models for billtrack.

mod company;
mod invoice;

pub use company::{Company, CompanyDetail, CompanySummary, CreateCompany, UpdateCompany};
pub use invoice::{
    CreateInvoice, Invoice, InvoiceDetail, InvoiceSummary, InvoiceWithCompanyRow, UpdateInvoice,
};

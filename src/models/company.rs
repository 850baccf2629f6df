//! Company model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Company record. The code is the primary key and never changes after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Listing row for companies.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// Company together with the ids of the invoices referencing it. The id
/// list is derived from the invoices table on read, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub invoices: Vec<i32>,
}

impl CompanyDetail {
    pub fn from_company(company: Company, invoices: Vec<i32>) -> Self {
        Self {
            code: company.code,
            name: company.name,
            description: company.description,
            invoices,
        }
    }
}

/// Input for creating a company.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Input for updating a company. The code is taken from the path, not the
/// body, so it cannot be edited.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompany {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

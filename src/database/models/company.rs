use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::database::executor::QueryExecutor;
use crate::database::manager::DatabaseError;
use crate::database::models::ModelError;
use crate::database::repository::{decode_rows, Repository, Table};
use crate::filter::{ColumnMap, FilterOp, FilterPayload, FilterRule, FilterSpec, UpdatePayload, ValueTransform};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A company together with its job postings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

pub const COMPANY_COLUMNS: ColumnMap = ColumnMap::new(&[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
]);

pub const COMPANY_FILTERS: FilterSpec = FilterSpec::new(&[
    FilterRule::new("nameLike", "name", FilterOp::ILike, ValueTransform::Contains),
    FilterRule::new("minEmployees", "num_employees", FilterOp::Gte, ValueTransform::Raw),
    FilterRule::new("maxEmployees", "num_employees", FilterOp::Lte, ValueTransform::Raw),
]);

static COMPANIES: Table = Table {
    label: "company",
    name: "companies",
    key: "handle",
    columns: r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#,
    order_by: "name, handle",
};

pub struct CompanyRepository {
    repo: Repository<Company>,
}

impl CompanyRepository {
    pub fn new(db: Arc<dyn QueryExecutor>) -> Self {
        Self {
            repo: Repository::new(&COMPANIES, db),
        }
    }

    /// Fails with `Duplicate` when the handle or the name is taken.
    pub async fn create(&self, data: NewCompany) -> Result<Company, ModelError> {
        let handle = Value::String(data.handle.clone());
        if self.repo.exists(&handle).await? {
            return Err(ModelError::Duplicate(format!("Duplicate company: {}", data.handle)));
        }

        let company = self
            .repo
            .insert(vec![
                ("handle", handle),
                ("name", Value::String(data.name.clone())),
                ("description", Value::String(data.description)),
                ("num_employees", data.num_employees.map(Value::from).unwrap_or(Value::Null)),
                ("logo_url", data.logo_url.map(Value::String).unwrap_or(Value::Null)),
            ])
            .await
            .map_err(|err| duplicate_company(err, &data.handle, Some(&data.name)))?;
        tracing::info!("Created company {}", company.handle);
        Ok(company)
    }

    /// All companies matching `filters`, ordered by name. No filters returns every company.
    pub async fn list(&self, filters: &FilterPayload) -> Result<Vec<Company>, ModelError> {
        self.repo.select_any(filters, &COMPANY_FILTERS).await
    }

    pub async fn get(&self, handle: &str) -> Result<CompanyDetail, ModelError> {
        let key = Value::String(handle.to_string());
        let company = self.repo.select_404(&key).await?;

        let rows = self
            .repo
            .executor()
            .query(
                "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
                &[key],
            )
            .await?;

        Ok(CompanyDetail {
            company,
            jobs: decode_rows(rows)?,
        })
    }

    /// Partial update; only the supplied fields change.
    pub async fn update(&self, handle: &str, data: &UpdatePayload) -> Result<Company, ModelError> {
        let name = data.get("name").and_then(Value::as_str);
        self.repo
            .update_404(&Value::String(handle.to_string()), data, &COMPANY_COLUMNS)
            .await
            .map_err(|err| duplicate_company(err, handle, name))
    }

    pub async fn remove(&self, handle: &str) -> Result<(), ModelError> {
        self.repo.delete_404(&Value::String(handle.to_string())).await
    }
}

// Unique constraint failures, named by the colliding value.
fn duplicate_company(err: ModelError, handle: &str, name: Option<&str>) -> ModelError {
    match err {
        ModelError::Database(DatabaseError::UniqueViolation(constraint)) => match name {
            Some(name) if constraint == "companies_name_key" => {
                ModelError::Duplicate(format!("Duplicate company name: {}", name))
            }
            _ => ModelError::Duplicate(format!("Duplicate company: {}", handle)),
        },
        other => other,
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::database::executor::QueryExecutor;
use crate::database::manager::DatabaseError;
use crate::database::models::ModelError;
use crate::database::repository::{Repository, Table};
use crate::filter::{ColumnMap, FilterOp, FilterPayload, FilterRule, FilterSpec, UpdatePayload, ValueTransform};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<f64>,
    pub company_handle: String,
}

pub const JOB_COLUMNS: ColumnMap = ColumnMap::new(&[("companyHandle", "company_handle")]);

// `equity` is accepted as a synonym of `hasEquity`
pub const JOB_FILTERS: FilterSpec = FilterSpec::new(&[
    FilterRule::new("titleLike", "title", FilterOp::ILike, ValueTransform::Contains),
    FilterRule::new("minSalary", "salary", FilterOp::Gte, ValueTransform::Raw),
    FilterRule::new("hasEquity", "equity", FilterOp::Gt, ValueTransform::Presence),
    FilterRule::new("equity", "equity", FilterOp::Gt, ValueTransform::Presence),
]);

static JOBS: Table = Table {
    label: "job",
    name: "jobs",
    key: "id",
    columns: r#"id, title, salary, equity, company_handle AS "companyHandle""#,
    order_by: "title, id",
};

pub struct JobRepository {
    repo: Repository<Job>,
}

impl JobRepository {
    pub fn new(db: Arc<dyn QueryExecutor>) -> Self {
        Self {
            repo: Repository::new(&JOBS, db),
        }
    }

    /// Fails with `NotFound` when the owning company does not exist.
    pub async fn create(&self, data: NewJob) -> Result<Job, ModelError> {
        let company = self
            .repo
            .executor()
            .query(
                "SELECT handle FROM companies WHERE handle = $1",
                &[Value::String(data.company_handle.clone())],
            )
            .await?;
        if company.is_empty() {
            return Err(ModelError::NotFound(format!("No company: {}", data.company_handle)));
        }

        // The company can be deleted between the check and the insert
        let job = self
            .repo
            .insert(vec![
                ("title", Value::String(data.title)),
                ("salary", data.salary.map(Value::from).unwrap_or(Value::Null)),
                ("equity", data.equity.map(Value::from).unwrap_or(Value::Null)),
                ("company_handle", Value::String(data.company_handle.clone())),
            ])
            .await
            .map_err(|err| match err {
                ModelError::Database(DatabaseError::ForeignKeyViolation(_)) => {
                    ModelError::NotFound(format!("No company: {}", data.company_handle))
                }
                other => other,
            })?;
        tracing::info!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    /// All jobs matching `filters`, ordered by title.
    pub async fn list(&self, filters: &FilterPayload) -> Result<Vec<Job>, ModelError> {
        self.repo.select_any(filters, &JOB_FILTERS).await
    }

    pub async fn get(&self, id: i32) -> Result<Job, ModelError> {
        self.repo.select_404(&Value::from(id)).await
    }

    pub async fn update(&self, id: i32, data: &UpdatePayload) -> Result<Job, ModelError> {
        self.repo.update_404(&Value::from(id), data, &JOB_COLUMNS).await
    }

    pub async fn remove(&self, id: i32) -> Result<(), ModelError> {
        self.repo.delete_404(&Value::from(id)).await
    }

    /// Path ids that are not integers can never match a row.
    pub fn parse_id(raw: &str) -> Result<i32, ModelError> {
        raw.parse()
            .map_err(|_| ModelError::NotFound(format!("No job: {}", raw)))
    }
}

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::database::executor::{QueryExecutor, Row};
use crate::database::manager::DatabaseError;

/// A statement the fake was asked to run
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl RecordedQuery {
    /// SQL with runs of whitespace collapsed, for comparing multi-line statements
    pub fn compact_sql(&self) -> String {
        self.sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Scripted stand-in for the database. Each query pops the next scripted
/// response; once the script runs out every query returns no rows.
#[derive(Default)]
pub struct FakeExecutor {
    responses: Mutex<VecDeque<Result<Vec<Row>, DatabaseError>>>,
    calls: Mutex<Vec<RecordedQuery>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response; `rows` must be a JSON array of objects
    pub fn respond(self, rows: Value) -> Self {
        let rows = match rows {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => map,
                    other => panic!("fake rows must be objects, got {other}"),
                })
                .collect(),
            other => panic!("fake response must be an array, got {other}"),
        };
        self.responses.lock().unwrap().push_back(Ok(rows));
        self
    }

    /// Queue a failing response
    pub fn fail(self, message: &str) -> Self {
        self.fail_with(DatabaseError::QueryError(message.to_string()))
    }

    /// Queue a specific database error, e.g. a constraint violation
    pub fn fail_with(self, err: DatabaseError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for FakeExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError> {
        self.calls.lock().unwrap().push(RecordedQuery {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(err)) => Err(err),
            None => Ok(vec![]),
        }
    }
}

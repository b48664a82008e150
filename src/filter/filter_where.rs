use serde_json::Value;

use super::types::{FilterPayload, FilterRule, FilterSpec, SqlFragment};

/// Builds the condition list of a `WHERE` clause from a sparse filter payload.
///
/// Placeholders are numbered from the values actually bound, so a condition
/// dropped by its transform never leaves a gap in `$1..$N`.
pub struct FilterWhere<'s> {
    spec: &'s FilterSpec,
    param_values: Vec<Value>,
    conditions: Vec<String>,
}

impl<'s> FilterWhere<'s> {
    pub fn new(spec: &'s FilterSpec) -> Self {
        Self {
            spec,
            param_values: vec![],
            conditions: vec![],
        }
    }

    pub fn generate(payload: &FilterPayload, spec: &'s FilterSpec) -> SqlFragment {
        let mut filter_where = Self::new(spec);
        filter_where.build(payload)
    }

    fn build(&mut self, payload: &FilterPayload) -> SqlFragment {
        self.param_values.clear();
        self.conditions.clear();

        let spec = self.spec;
        for (key, raw) in payload {
            let Some(rule) = spec.rule(key) else {
                tracing::debug!("Ignoring unsupported filter key: {}", key);
                continue;
            };
            if let Some(sql) = self.build_sql_condition(rule, raw) {
                self.conditions.push(sql);
            }
        }

        SqlFragment {
            clause: self.conditions.join(" AND "),
            values: std::mem::take(&mut self.param_values),
        }
    }

    fn build_sql_condition(&mut self, rule: &FilterRule, raw: &Value) -> Option<String> {
        let value = rule.transform.apply(raw)?;
        Some(format!("{} {} {}", rule.column, rule.operator.to_sql(), self.param(value)))
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}

/// Convenience wrapper over [`FilterWhere::generate`].
pub fn build_where_clause(payload: &FilterPayload, spec: &FilterSpec) -> SqlFragment {
    FilterWhere::generate(payload, spec)
}

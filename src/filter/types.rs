use serde_json::{Map, Value};

/// Sparse field assignments for a partial update, in the order the caller sent them.
pub type UpdatePayload = Map<String, Value>;

/// Sparse search constraints for a list operation, in the order the caller sent them.
pub type FilterPayload = Map<String, Value>;

/// Clause text whose `$N` placeholders refer, in order, to `values`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub clause: String,
    pub values: Vec<Value>,
}

impl SqlFragment {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// Index of the next free placeholder after this fragment's own.
    pub fn next_param_index(&self) -> usize {
        self.values.len() + 1
    }

    /// `WHERE <clause>` or nothing at all when there is no condition.
    pub fn where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clause)
        }
    }
}

/// Caller-side field name to storage column name. Unlisted fields map to themselves.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap(&'static [(&'static str, &'static str)]);

impl ColumnMap {
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self(pairs)
    }

    pub const fn identity() -> Self {
        Self(&[])
    }

    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|(from, _)| *from == field)
            .map(|(_, to)| *to)
            .unwrap_or(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Gt,
    Gte,
    Lte,
    ILike,
}

impl FilterOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
            FilterOp::ILike => "ILIKE",
        }
    }
}

/// How a raw filter value becomes the bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// Bind as supplied.
    Raw,
    /// Case-insensitive substring match: `bak` binds as `%bak%`.
    ///
    /// `%`, `_` and `\` in the input are escaped first, so the text always
    /// matches as a literal substring and never as a pattern.
    Contains,
    /// A truthy flag binds the threshold `0`; a falsy flag drops the condition.
    Presence,
}

impl ValueTransform {
    /// `None` means the condition must not appear in the clause at all.
    pub fn apply(&self, value: &Value) -> Option<Value> {
        match self {
            ValueTransform::Raw => Some(value.clone()),
            ValueTransform::Contains => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some(Value::String(format!("%{}%", escape_like(&text))))
            }
            ValueTransform::Presence => is_truthy(value).then(|| Value::from(0)),
        }
    }
}

/// One supported search key and the predicate it produces.
#[derive(Debug, Clone, Copy)]
pub struct FilterRule {
    pub key: &'static str,
    pub column: &'static str,
    pub operator: FilterOp,
    pub transform: ValueTransform,
}

impl FilterRule {
    pub const fn new(
        key: &'static str,
        column: &'static str,
        operator: FilterOp,
        transform: ValueTransform,
    ) -> Self {
        Self { key, column, operator, transform }
    }
}

/// The complete set of search keys an entity supports.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    rules: &'static [FilterRule],
}

impl FilterSpec {
    pub const fn new(rules: &'static [FilterRule]) -> Self {
        Self { rules }
    }

    pub fn rule(&self, key: &str) -> Option<&FilterRule> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.key)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Backslash is the default LIKE escape character in Postgres.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

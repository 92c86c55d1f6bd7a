use super::types::{BindValue, CmpOp};

/// A single WHERE-clause condition. Conditions are combined with AND;
/// columns are validated against the resource schema before one is built.
#[derive(Debug, Clone)]
pub enum Condition {
    Compare {
        column: String,
        op: CmpOp,
        value: BindValue,
    },
    /// Case-insensitive substring match (LIKE metacharacters escaped)
    Contains { column: String, needle: String },
    In {
        column: String,
        values: Vec<BindValue>,
    },
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: BindValue) -> Self {
        Condition::Compare {
            column: column.into(),
            op: CmpOp::Eq,
            value,
        }
    }

    pub fn compare(column: impl Into<String>, op: CmpOp, value: BindValue) -> Self {
        Condition::Compare {
            column: column.into(),
            op,
            value,
        }
    }

    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Condition::Contains {
            column: column.into(),
            needle: needle.into(),
        }
    }
}

/// Renders conditions to a parameterized SQL fragment.
pub struct ConditionRenderer {
    params: Vec<BindValue>,
}

impl ConditionRenderer {
    pub fn new() -> Self {
        Self { params: vec![] }
    }

    pub fn render(conditions: &[Condition]) -> (String, Vec<BindValue>) {
        let mut renderer = Self::new();
        let mut sql_conditions = Vec::with_capacity(conditions.len());
        for condition in conditions {
            sql_conditions.push(renderer.build_sql_condition(condition));
        }
        let where_clause = if sql_conditions.is_empty() {
            "1=1".to_string()
        } else {
            sql_conditions.join(" AND ")
        };
        (where_clause, renderer.params)
    }

    fn build_sql_condition(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::Compare { column, op, value } => {
                format!(
                    "\"{}\" {} {}",
                    column,
                    op.to_sql(),
                    self.param(value.clone())
                )
            }
            Condition::Contains { column, needle } => {
                let pattern = format!("%{}%", escape_like(needle));
                format!(
                    "\"{}\" ILIKE {} ESCAPE '\\'",
                    column,
                    self.param(BindValue::Text(pattern))
                )
            }
            Condition::In { column, values } => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let params: Vec<String> =
                    values.iter().map(|v| self.param(v.clone())).collect();
                format!("\"{}\" IN ({})", column, params.join(", "))
            }
        }
    }

    fn param(&mut self, value: BindValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

/// Escape LIKE metacharacters so user input matches literally.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == '%' || c == '_' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn renders_empty_as_tautology() {
        let (sql, params) = ConditionRenderer::render(&[]);
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn numbers_params_in_order() {
        let user = Uuid::new_v4();
        let conditions = vec![
            Condition::eq("user_id", BindValue::Uuid(user)),
            Condition::compare("amount", CmpOp::Gte, BindValue::Float(10.0)),
            Condition::compare("amount", CmpOp::Lte, BindValue::Float(99.5)),
        ];
        let (sql, params) = ConditionRenderer::render(&conditions);
        assert_eq!(
            sql,
            "\"user_id\" = $1 AND \"amount\" >= $2 AND \"amount\" <= $3"
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params[0], BindValue::Uuid(user));
    }

    #[test]
    fn contains_escapes_like_metacharacters() {
        let conditions = vec![Condition::contains("name", "50%_off\\deal")];
        let (sql, params) = ConditionRenderer::render(&conditions);
        assert_eq!(sql, "\"name\" ILIKE $1 ESCAPE '\\'");
        assert_eq!(
            params[0],
            BindValue::Text("%50\\%\\_off\\\\deal%".to_string())
        );
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let conditions = vec![Condition::In {
            column: "customer_id".to_string(),
            values: vec![],
        }];
        let (sql, params) = ConditionRenderer::render(&conditions);
        assert_eq!(sql, "1=0");
        assert!(params.is_empty());
    }
}

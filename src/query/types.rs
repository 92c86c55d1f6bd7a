use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Column types a filter value can be parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    Text,
    Float,
    Timestamp,
}

/// A typed bind parameter. Rendering a query collects these in `$n` order.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Uuid(Uuid),
    Text(String),
    Float(f64),
    Int(i64),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
        }
    }

    /// Map the `field[op]=value` passthrough suffix to an operator.
    pub fn from_suffix(op_key: &str) -> Option<CmpOp> {
        Some(match op_key {
            "eq" => CmpOp::Eq,
            "ne" => CmpOp::Ne,
            "gt" => CmpOp::Gt,
            "gte" => CmpOp::Gte,
            "lt" => CmpOp::Lt,
            "lte" => CmpOp::Lte,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// A rendered SQL fragment or statement plus its bind parameters.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub query: String,
    pub params: Vec<BindValue>,
}

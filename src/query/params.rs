use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc};
use uuid::Uuid;

use super::conditions::Condition;
use super::dates;
use super::error::QueryError;
use super::order;
use super::schema::{FieldSpec, ResourceSchema};
use super::types::{BindValue, CmpOp, ColumnType, OrderInfo};
use crate::pagination::PageRequest;

/// Raw query-string pairs. Empty values are treated as absent, matching the
/// behavior of omitted parameters.
#[derive(Debug, Default)]
pub struct RawParams(HashMap<String, String>);

impl RawParams {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str()).filter(|s| !s.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Control parameters shared by every list endpoint: projection, ordering,
/// and the page window.
#[derive(Debug)]
pub struct ListOptions {
    pub select: Option<Vec<String>>,
    pub sort: Vec<OrderInfo>,
    pub page: PageRequest,
}

pub fn parse_list_options(
    raw: &RawParams,
    schema: &ResourceSchema,
) -> Result<ListOptions, QueryError> {
    let select = raw
        .get("select")
        .map(|s| parse_select(s, schema))
        .transpose()?;

    let sort = match raw.get("sort") {
        Some(spec) => {
            let parsed = order::parse_sort(spec, schema)?;
            if parsed.is_empty() {
                order::default_sort(schema)
            } else {
                parsed
            }
        }
        None => order::default_sort(schema),
    };

    let page = PageRequest::from_raw(raw.get("page"), raw.get("limit"));

    Ok(ListOptions { select, sort, page })
}

/// Remaining (non-reserved) keys become typed equality filters, with
/// `field[op]=value` mapping to comparison operators and `field[in]=a,b`
/// to a membership test. Unknown columns and the owner column are rejected.
pub fn passthrough_conditions(
    raw: &RawParams,
    schema: &ResourceSchema,
    reserved: &[&str],
) -> Result<Vec<Condition>, QueryError> {
    let mut out = Vec::new();
    for (key, value) in raw.iter() {
        if reserved.contains(&key) {
            continue;
        }

        let (column, op_suffix) = split_operator(key);
        if column == schema.owner_column {
            return Err(QueryError::invalid_param(
                column,
                "Field is not filterable",
            ));
        }
        let field = schema.field(column).ok_or_else(|| {
            QueryError::invalid_param(column, format!("Unknown filter field: {}", column))
        })?;

        match op_suffix {
            None => out.push(Condition::eq(column, parse_value(field, column, value)?)),
            Some("in") => {
                let values = value
                    .split(',')
                    .map(|v| parse_value(field, column, v.trim()))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push(Condition::In {
                    column: column.to_string(),
                    values,
                });
            }
            Some(op_key) => {
                let op = CmpOp::from_suffix(op_key)
                    .ok_or_else(|| QueryError::UnsupportedOperator(op_key.to_string()))?;
                out.push(Condition::compare(
                    column,
                    op,
                    parse_value(field, column, value)?,
                ));
            }
        }
    }
    Ok(out)
}

/// Amount filtering: an exact `amountEquals` wins outright; otherwise
/// `amountGreaterThan` / `amountLessThan` are inclusive bounds that combine.
pub fn amount_conditions(raw: &RawParams, column: &str) -> Result<Vec<Condition>, QueryError> {
    if let Some(exact) = raw.get("amountEquals") {
        let value = parse_f64("amountEquals", exact)?;
        return Ok(vec![Condition::eq(column, BindValue::Float(value))]);
    }

    let mut out = Vec::new();
    if let Some(min) = raw.get("amountGreaterThan") {
        let value = parse_f64("amountGreaterThan", min)?;
        out.push(Condition::compare(column, CmpOp::Gte, BindValue::Float(value)));
    }
    if let Some(max) = raw.get("amountLessThan") {
        let value = parse_f64("amountLessThan", max)?;
        out.push(Condition::compare(column, CmpOp::Lte, BindValue::Float(value)));
    }
    Ok(out)
}

pub fn parse_uuid(field: &str, s: &str) -> Result<Uuid, QueryError> {
    Uuid::parse_str(s)
        .map_err(|_| QueryError::invalid_param(field, format!("Invalid identifier: {}", s)))
}

pub fn parse_f64(field: &str, s: &str) -> Result<f64, QueryError> {
    let value: f64 = s
        .parse()
        .map_err(|_| QueryError::invalid_param(field, format!("Invalid number: {}", s)))?;
    if !value.is_finite() {
        return Err(QueryError::invalid_param(
            field,
            format!("Invalid number: {}", s),
        ));
    }
    Ok(value)
}

fn parse_select(spec: &str, schema: &ResourceSchema) -> Result<Vec<String>, QueryError> {
    let mut out = Vec::new();
    for part in spec.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed != "id" && !schema.has_column(trimmed) {
            return Err(QueryError::invalid_param(
                "select",
                format!("Unknown field: {}", trimmed),
            ));
        }
        out.push(trimmed.to_string());
    }
    Ok(out)
}

/// `amount[gte]` → (`amount`, Some("gte")); keys without a well-formed
/// bracket suffix are treated as plain column names.
fn split_operator(key: &str) -> (&str, Option<&str>) {
    if let Some(open) = key.find('[') {
        if key.ends_with(']') && open + 1 < key.len() - 1 {
            return (&key[..open], Some(&key[open + 1..key.len() - 1]));
        }
    }
    (key, None)
}

fn parse_value(field: &FieldSpec, name: &str, raw: &str) -> Result<BindValue, QueryError> {
    match field.ty {
        ColumnType::Uuid => Ok(BindValue::Uuid(parse_uuid(name, raw)?)),
        ColumnType::Text => Ok(BindValue::Text(raw.to_string())),
        ColumnType::Float => Ok(BindValue::Float(parse_f64(name, raw)?)),
        ColumnType::Timestamp => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                return Ok(BindValue::Timestamp(dt.with_timezone(&Utc)));
            }
            let date = dates::parse_date(name, raw)?;
            Ok(BindValue::Timestamp(
                date.and_time(NaiveTime::MIN).and_utc(),
            ))
        }
    }
}

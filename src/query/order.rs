use super::error::QueryError;
use super::schema::ResourceSchema;
use super::types::{OrderInfo, SortDirection};

/// Parse a comma-separated sort spec. A leading `-` means descending,
/// e.g. `sort=-date,item`. Columns are validated against the schema.
pub fn parse_sort(spec: &str, schema: &ResourceSchema) -> Result<Vec<OrderInfo>, QueryError> {
    let mut out = Vec::new();
    for part in spec.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (column, sort) = match trimmed.strip_prefix('-') {
            Some(col) => (col, SortDirection::Desc),
            None => (trimmed, SortDirection::Asc),
        };
        if !schema.has_column(column) {
            return Err(QueryError::invalid_param(
                "sort",
                format!("Unknown sort field: {}", column),
            ));
        }
        out.push(OrderInfo {
            column: column.to_string(),
            sort,
        });
    }
    Ok(out)
}

/// The resource's default ordering, used when no `sort` param is supplied.
pub fn default_sort(schema: &ResourceSchema) -> Vec<OrderInfo> {
    let (column, sort) = schema.default_sort;
    vec![OrderInfo {
        column: column.to_string(),
        sort,
    }]
}

pub fn generate(infos: &[OrderInfo]) -> String {
    if infos.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = infos
        .iter()
        .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
        .collect();
    format!("ORDER BY {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::expense::EXPENSE_SCHEMA;

    #[test]
    fn parses_directions_from_prefix() {
        let infos = parse_sort("-date,item", &EXPENSE_SCHEMA).unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].column, "date");
        assert_eq!(infos[0].sort, SortDirection::Desc);
        assert_eq!(infos[1].column, "item");
        assert_eq!(infos[1].sort, SortDirection::Asc);
    }

    #[test]
    fn rejects_unknown_columns() {
        assert!(parse_sort("secret", &EXPENSE_SCHEMA).is_err());
        // injection attempts never reach SQL
        assert!(parse_sort("date; DROP TABLE expenses", &EXPENSE_SCHEMA).is_err());
    }

    #[test]
    fn generates_order_clause() {
        let infos = parse_sort("-date", &EXPENSE_SCHEMA).unwrap();
        assert_eq!(generate(&infos), "ORDER BY \"date\" DESC");
        assert_eq!(generate(&[]), "");
    }
}

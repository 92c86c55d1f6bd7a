pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a path id. A structurally invalid id is indistinguishable from a
/// missing record: both answer 404.
pub fn parse_path_id(id: &str, resource: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::not_found(format!("{} not found", resource)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_maps_to_not_found() {
        let err = parse_path_id("not-a-uuid", "Expense").unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Expense not found");
    }

    #[test]
    fn well_formed_id_parses() {
        assert!(parse_path_id("11111111-1111-1111-1111-111111111111", "Expense").is_ok());
    }
}

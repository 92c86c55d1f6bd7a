use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("{message}")]
    InvalidParam { field: String, message: String },

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
}

impl QueryError {
    pub fn invalid_param(field: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::InvalidParam {
            field: field.into(),
            message: message.into(),
        }
    }
}

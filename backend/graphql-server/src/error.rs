use async_graphql::{Error as GraphQLError, ErrorExtensions};
use thiserror::Error;
use validator::ValidationErrors;

pub const NOT_AUTHORISED: &str = "Not Authorised!";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not Authorised!")]
    Authorization,

    #[error("{0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Value of `extensions.code` on the GraphQL error
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Authorization => "UNAUTHORISED",
            ApiError::Validation(_) => "BAD_USER_INPUT",
            ApiError::Store(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> GraphQLError {
        let message = match self {
            ApiError::Store(e) => {
                tracing::error!("Store error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let code = self.code();
        GraphQLError::new(message).extend_with(|_, e| e.set("code", code))
    }
}

impl From<ValidationErrors> for ApiError {
    /// Keeps the first message, ordered by field name
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid input".to_string());

        ApiError::Validation(message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Hand an [`ApiResult`] to async-graphql with `extensions.code` attached
pub trait GraphQLResultExt<T> {
    fn extended(self) -> async_graphql::Result<T>;
}

impl<T> GraphQLResultExt<T> for ApiResult<T> {
    fn extended(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.extend())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_error_message() {
        let error = ApiError::Authorization.extend();
        assert_eq!(error.message, NOT_AUTHORISED);
    }

    #[test]
    fn test_store_error_is_opaque() {
        let error = ApiError::from(anyhow::anyhow!("bolt connection reset")).extend();
        assert_eq!(error.message, "Internal server error");
    }

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::validation("x").code(), "BAD_USER_INPUT");
        assert_eq!(ApiError::Authorization.code(), "UNAUTHORISED");
        assert_eq!(
            ApiError::from(anyhow::anyhow!("timeout")).code(),
            "INTERNAL_SERVER_ERROR"
        );
    }
}

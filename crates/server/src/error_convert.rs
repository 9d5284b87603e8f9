use dioxus::prelude::ServerFnError;
use shared_types::AppError;

/// Convert a sqlx::Error into an AppError.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Profile not found"),
        sqlx::Error::Database(db_err) => {
            // 23505 unique_violation, 23514 check_violation
            match db_err.code().as_deref() {
                Some("23505") => AppError::conflict("A profile with this value already exists"),
                Some("23514") => AppError::bad_request("Value rejected by a database constraint"),
                _ => AppError::database(err.to_string()),
            }
        }
        _ => AppError::database(err.to_string()),
    }
}

/// Convert an AppError into a ServerFnError by serializing as JSON.
pub fn app_error_to_server_fn_error(err: AppError) -> ServerFnError {
    let json = serde_json::to_string(&err).unwrap_or_else(|_| err.message.clone());
    ServerFnError::new(json)
}

/// Extension trait providing `.into_app_error()` on sqlx::Error.
pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

/// Extension trait providing `.into_server_fn_error()` on AppError.
pub trait AppErrorExt {
    fn into_server_fn_error(self) -> ServerFnError;
}

impl AppErrorExt for AppError {
    fn into_server_fn_error(self) -> ServerFnError {
        app_error_to_server_fn_error(self)
    }
}

/// Trait for validating request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AppErrorKind, UpdateRoleRequest};

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = sqlx::Error::RowNotFound.into_app_error();
        assert_eq!(err.kind, AppErrorKind::NotFound);
    }

    #[test]
    fn pool_errors_map_to_database() {
        let err = sqlx::Error::PoolTimedOut.into_app_error();
        assert_eq!(err.kind, AppErrorKind::DatabaseError);
    }

    #[test]
    fn server_fn_error_carries_app_error_json() {
        let err = AppError::forbidden("Admin role required").into_server_fn_error();
        let parsed = AppError::from_server_error(&err.to_string()).unwrap();
        assert_eq!(parsed.kind, AppErrorKind::Forbidden);
        assert_eq!(parsed.message, "Admin role required");
    }

    #[test]
    fn empty_role_fails_validation() {
        let err = UpdateRoleRequest {
            role: String::new(),
        }
        .validate_request()
        .unwrap_err();
        assert_eq!(err.kind, AppErrorKind::ValidationError);
        assert!(err.field_errors.contains_key("role"));
    }
}

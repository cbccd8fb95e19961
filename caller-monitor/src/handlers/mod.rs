pub mod calls;
pub mod logs;
pub mod numbers;
pub mod settings;

use shared_types::MonitorError;

/// Map a monitor failure onto the HTTP status the UI shows it with
pub fn to_http_error(err: MonitorError) -> actix_web::Error {
    let message = err.to_string();
    match err {
        MonitorError::PermissionDenied(_) => actix_web::error::ErrorForbidden(message),
        MonitorError::NotFound(_) => actix_web::error::ErrorNotFound(message),
        MonitorError::Parse(_) => actix_web::error::ErrorBadRequest(message),
        MonitorError::Transport(_) => actix_web::error::ErrorBadGateway(message),
        MonitorError::Provider(_) => actix_web::error::ErrorServiceUnavailable(message),
        MonitorError::Storage(_) => actix_web::error::ErrorInternalServerError(message),
    }
}

use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::{ExportRequest, RestoreRequest, RestoreResponse, UnknownCallLogsResponse};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use super::to_http_error;
use crate::actions::RemediationActions;
use crate::repository::CallerRepository;

/// Current log list, served from the stream snapshot
pub async fn list_logs(repository: web::Data<Arc<CallerRepository>>) -> ActixResult<HttpResponse> {
    let logs = repository.log_stream().current();
    Ok(HttpResponse::Ok().json(UnknownCallLogsResponse { logs }))
}

/// Pull-to-refresh: re-import the call history
pub async fn refresh_logs(
    repository: web::Data<Arc<CallerRepository>>,
) -> ActixResult<HttpResponse> {
    if let Err(e) = repository.check_call_log_access() {
        info!("Call log permission not granted: {}", e);
        return Err(to_http_error(e));
    }

    let summary = repository.import_all_unknown_call_logs().await.map_err(|e| {
        error!("Error during import: {}", e);
        to_http_error(e)
    })?;

    Ok(HttpResponse::Ok().json(summary))
}

pub async fn get_log(
    actions: web::Data<Arc<RemediationActions>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let detail = actions
        .log_detail(path.into_inner())
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(detail))
}

pub async fn delete_log(
    repository: web::Data<Arc<CallerRepository>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    let deleted = repository
        .delete_unknown_call_log(id)
        .await
        .map_err(to_http_error)?;

    if deleted {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(actix_web::error::ErrorNotFound(format!(
            "unknown call log {} not found",
            id
        )))
    }
}

pub async fn delete_all_logs(
    repository: web::Data<Arc<CallerRepository>>,
) -> ActixResult<HttpResponse> {
    let deleted = repository
        .delete_all_unknown_call_logs()
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

pub async fn export_logs(
    actions: web::Data<Arc<RemediationActions>>,
    request: web::Json<ExportRequest>,
) -> ActixResult<HttpResponse> {
    let exported = actions
        .export_logs(Path::new(&request.path))
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "exported": exported,
        "path": request.path
    })))
}

pub async fn restore_logs(
    actions: web::Data<Arc<RemediationActions>>,
    request: web::Json<RestoreRequest>,
) -> ActixResult<HttpResponse> {
    let restored = actions
        .restore_logs(Path::new(&request.path))
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(RestoreResponse { restored }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::*;
    use actix_web::{test, App};
    use shared_types::{CallRecord, CallType, ImportSummary};

    #[actix_web::test]
    async fn test_refresh_then_list_and_delete() {
        let f = fixture(
            FakeContacts::default(),
            FakeCallLog::with_records(vec![
                CallRecord::new("555-000-2222", CallType::Incoming, 200),
                CallRecord::new("555-000-1111", CallType::Incoming, 100),
            ]),
            FakeSpamList::default(),
        )
        .await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.repository.clone()))
                .route("/api/logs", web::get().to(list_logs))
                .route("/api/logs/refresh", web::post().to(refresh_logs))
                .route("/api/logs/{id}", web::delete().to(delete_log)),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/logs/refresh").to_request();
        let summary: ImportSummary = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary.imported, 2);

        let req = test::TestRequest::get().uri("/api/logs").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let logs = body["logs"].as_array().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0]["phone_number"], "5550002222");

        let id = logs[0]["id"].as_i64().unwrap();
        let req = test::TestRequest::delete()
            .uri(&format!("/api/logs/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 204);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/logs/{}", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn test_refresh_without_permission_is_forbidden() {
        let f = fixture(
            FakeContacts::default(),
            FakeCallLog {
                denied: true,
                ..Default::default()
            },
            FakeSpamList::default(),
        )
        .await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.repository.clone()))
                .route("/api/logs/refresh", web::post().to(refresh_logs)),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/logs/refresh").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);
    }
}

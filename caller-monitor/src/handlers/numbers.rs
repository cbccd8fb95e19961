use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::{
    BlockedNumbersResponse, NumberRequest, ReportedSpamNumbersResponse, SendSmsRequest,
    SpamCheckResponse,
};
use std::sync::Arc;

use super::to_http_error;
use crate::actions::RemediationActions;
use crate::repository::CallerRepository;

pub async fn block_number(
    actions: web::Data<Arc<RemediationActions>>,
    request: web::Json<NumberRequest>,
) -> ActixResult<HttpResponse> {
    let outcome = actions
        .block_number(&request.phone_number)
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "blocked": outcome })))
}

pub async fn unblock_number(
    repository: web::Data<Arc<CallerRepository>>,
    request: web::Json<NumberRequest>,
) -> ActixResult<HttpResponse> {
    let removed = repository
        .unblock_number_locally(&request.phone_number)
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "unblocked": removed })))
}

pub async fn list_blocked(
    repository: web::Data<Arc<CallerRepository>>,
) -> ActixResult<HttpResponse> {
    let numbers = repository
        .get_all_blocked_numbers()
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(BlockedNumbersResponse { numbers }))
}

pub async fn report_spam(
    actions: web::Data<Arc<RemediationActions>>,
    request: web::Json<NumberRequest>,
) -> ActixResult<HttpResponse> {
    actions
        .report_spam(&request.phone_number)
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "reported": true })))
}

pub async fn list_spam(
    repository: web::Data<Arc<CallerRepository>>,
) -> ActixResult<HttpResponse> {
    let numbers = repository
        .get_all_reported_spam_numbers()
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(ReportedSpamNumbersResponse { numbers }))
}

pub async fn check_spam(
    repository: web::Data<Arc<CallerRepository>>,
    request: web::Json<NumberRequest>,
) -> ActixResult<HttpResponse> {
    let is_spam = repository.is_number_spam(&request.phone_number).await;

    Ok(HttpResponse::Ok().json(SpamCheckResponse {
        phone_number: request.into_inner().phone_number,
        is_spam,
    }))
}

pub async fn send_sms(
    actions: web::Data<Arc<RemediationActions>>,
    request: web::Json<SendSmsRequest>,
) -> ActixResult<HttpResponse> {
    let outcome = actions
        .send_sms(&request.phone_number, request.message.as_deref())
        .await
        .map_err(to_http_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "sent_via": outcome })))
}

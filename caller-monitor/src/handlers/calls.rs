use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::PhoneSignal;
use std::sync::Arc;

use crate::monitor::CallMonitor;
use crate::receiver::{CallReceiver, CallState};

/// Phone-state signal ingestion, the equivalent of the platform broadcast
pub async fn receive_signal(
    receiver: web::Data<Arc<CallReceiver>>,
    signal: web::Json<PhoneSignal>,
) -> ActixResult<HttpResponse> {
    let recovering = receiver.handle_signal(&signal).is_some();
    let state = match receiver.state() {
        CallState::Idle => "idle",
        CallState::Ringing => "ringing",
    };

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "state": state,
        "recovering_number": recovering
    })))
}

pub async fn last_caller(monitor: web::Data<Arc<CallMonitor>>) -> ActixResult<HttpResponse> {
    match monitor.last_caller() {
        Some(info) => Ok(HttpResponse::Ok().json(info)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::ErrorHandlerResponse;
use tracing::Span;
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};

/// Root spans at DEBUG so per-request noise stays out of production
/// logs unless asked for.
pub struct QuieterRootSpanBuilder;

impl RootSpanBuilder for QuieterRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        tracing_actix_web::root_span!(level = tracing::Level::DEBUG, request)
    }

    fn on_request_end<B: MessageBody>(
        span: Span,
        outcome: &Result<ServiceResponse<B>, actix_web::Error>,
    ) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

/// Default handler for responses actix generates on its own (bad
/// JSON, unknown routes, wrong methods). Logs them and passes them
/// through unchanged.
pub fn handle_actix_web_error<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    if status.is_server_error() {
        tracing::warn!(%status, "request failed");
    } else {
        tracing::debug!(%status, "request rejected");
    }
    Ok(ErrorHandlerResponse::Response(res.map_into_left_body()))
}

//! Tauri glue for the `miko://` scheme.

use std::{io::Read, sync::Arc};

use tauri::http::{
    header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
    Response, StatusCode,
};

use crate::{
    scheme_handler::{SchemeRequestHandler, SchemeResponse},
    APP_SCHEME,
};

pub(crate) fn register_app_scheme(
    builder: tauri::Builder<tauri::Wry>,
    handler: Arc<SchemeRequestHandler>,
) -> tauri::Builder<tauri::Wry> {
    builder.register_asynchronous_uri_scheme_protocol(
        APP_SCHEME,
        move |_context, request, responder| {
            let handler = Arc::clone(&handler);
            let request_url = request.uri().to_string();
            tauri::async_runtime::spawn_blocking(move || {
                responder.respond(build_protocol_response(handler.handle(&request_url)));
            });
        },
    )
}

pub(crate) fn build_protocol_response(response: SchemeResponse) -> Response<Vec<u8>> {
    let SchemeResponse::Stream(mut streamed) = response else {
        return status_response(StatusCode::NOT_FOUND);
    };

    let mut body = Vec::with_capacity(streamed.stream.remaining());
    if let Err(error) = streamed.stream.read_to_end(&mut body) {
        crate::append_resource_log(&format!("failed to read resource stream: {error}"));
        return status_response(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, streamed.mime_type)
        .header(CONTENT_LENGTH, body.len())
        .header(CACHE_CONTROL, "no-store")
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(body)
        .unwrap_or_else(|_| status_response(StatusCode::INTERNAL_SERVER_ERROR))
}

fn status_response(status: StatusCode) -> Response<Vec<u8>> {
    let mut response = Response::new(Vec::new());
    *response.status_mut() = status;
    response
}

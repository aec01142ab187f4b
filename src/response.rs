use axum::{
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// JSON body indented with four spaces.
#[derive(Debug)]
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        let mut buf = Vec::with_capacity(256);
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));

        match self.0.serialize(&mut ser) {
            Ok(()) => {
                ([(CONTENT_TYPE, HeaderValue::from_static("application/json"))], buf)
                    .into_response()
            },
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            },
        }
    }
}

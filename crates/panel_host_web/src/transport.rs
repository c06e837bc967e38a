//! Request descriptions handed to the bridge and decoding of raw responses.

use panel_host::{ApiError, LocalFile};
use serde::{de::DeserializeOwned, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) struct CsrfHeader {
    pub name: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<String>,
    pub csrf: Option<CsrfHeader>,
}

impl HttpRequest {
    pub(crate) fn get(url: String) -> Self {
        Self {
            method: Method::Get,
            url,
            body: None,
            csrf: None,
        }
    }

    pub(crate) fn json(
        method: Method,
        url: String,
        body: &serde_json::Value,
        csrf: CsrfHeader,
    ) -> Self {
        Self {
            method,
            url,
            body: Some(body.to_string()),
            csrf: Some(csrf),
        }
    }
}

/// Multipart form: text fields first, then the file part.
#[derive(Debug, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) struct UploadForm<'a> {
    pub url: String,
    pub fields: Vec<(&'static str, String)>,
    pub file_field: &'static str,
    pub file: &'a LocalFile,
    pub csrf: CsrfHeader,
}

impl UploadForm<'_> {
    pub(crate) fn fields_json(&self) -> String {
        serde_json::Value::Array(
            self.fields
                .iter()
                .map(|(name, value)| serde_json::json!([name, value]))
                .collect(),
        )
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct HttpResponse {
    pub status: u16,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BinaryResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Returns the body of a 2xx response, or the server error it carries.
pub(crate) fn expect_success(response: HttpResponse) -> Result<String, ApiError> {
    if is_success(response.status) {
        Ok(response.body)
    } else {
        Err(ApiError::from_status_body(response.status, &response.body))
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let body = expect_success(response)?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn expect_bytes(response: BinaryResponse) -> Result<Vec<u8>, ApiError> {
    if is_success(response.status) {
        Ok(response.body)
    } else {
        let body = String::from_utf8_lossy(&response.body);
        Err(ApiError::from_status_body(response.status, &body))
    }
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
}

pub(crate) fn decode_csrf_token(response: HttpResponse) -> Result<String, ApiError> {
    let TokenBody { token } = decode_json(response)?;
    if token.trim().is_empty() {
        return Err(ApiError::Decode("empty CSRF token".to_string()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use panel_host::FileListing;
    use pretty_assertions::assert_eq;

    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn listing_body_decodes_and_null_files_read_as_empty() {
        let listing: FileListing =
            decode_json(response(200, r#"{"path":"/docs","files":null}"#)).expect("listing");
        assert_eq!(listing.path, "/docs");
        assert!(listing.files.is_empty());
    }

    #[test]
    fn error_statuses_surface_server_message() {
        let err = decode_json::<FileListing>(response(404, r#"{"error":"Path not found"}"#))
            .expect_err("404");
        assert_eq!(err, ApiError::server(404, "Path not found"));

        let err = expect_bytes(BinaryResponse {
            status: 400,
            body: br#"{"error":"No paths provided"}"#.to_vec(),
        })
        .expect_err("zip rejected");
        assert_eq!(err.message(), "No paths provided");
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let err = decode_json::<FileListing>(response(200, "<html>")).expect_err("decode");
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn csrf_token_must_be_present() {
        assert_eq!(
            decode_csrf_token(response(200, r#"{"token":"abc"}"#)).expect("token"),
            "abc"
        );
        assert!(decode_csrf_token(response(200, r#"{"token":" "}"#)).is_err());
    }

    #[test]
    fn form_fields_serialize_as_ordered_pairs() {
        let file = LocalFile::from_bytes("a.txt", b"a".to_vec());
        let form = UploadForm {
            url: "/api/files/upload".to_string(),
            fields: vec![
                ("directory", "/docs".to_string()),
                ("overwrite", "false".to_string()),
            ],
            file_field: "file",
            file: &file,
            csrf: CsrfHeader {
                name: "X-CSRF-Token".to_string(),
                token: "t".to_string(),
            },
        };
        assert_eq!(
            form.fields_json(),
            r#"[["directory","/docs"],["overwrite","false"]]"#
        );
    }
}

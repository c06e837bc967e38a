use super::*;

fn unsupported() -> String {
    "Browser file-hosting APIs are only available when compiled for wasm32".to_string()
}

pub async fn fetch_text(_request: &HttpRequest) -> Result<HttpResponse, String> {
    Err(unsupported())
}

pub async fn fetch_bytes(_request: &HttpRequest) -> Result<BinaryResponse, String> {
    Err(unsupported())
}

pub async fn upload_form(
    _form: &UploadForm<'_>,
    _progress: &dyn Fn(u8),
) -> Result<HttpResponse, String> {
    Err(unsupported())
}

pub async fn save_bytes(_file_name: &str, _mime_type: &str, _bytes: &[u8]) -> Result<(), String> {
    Err(unsupported())
}

pub async fn open_download(_url: &str) -> Result<(), String> {
    Err(unsupported())
}

pub async fn copy_text(_text: &str) -> Result<(), String> {
    Err(unsupported())
}

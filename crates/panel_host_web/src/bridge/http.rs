use crate::transport::{BinaryResponse, HttpRequest, HttpResponse, UploadForm};

pub(crate) async fn fetch_text(request: &HttpRequest) -> Result<HttpResponse, String> {
    super::interop::fetch_text(request).await
}

pub(crate) async fn fetch_bytes(request: &HttpRequest) -> Result<BinaryResponse, String> {
    super::interop::fetch_bytes(request).await
}

pub(crate) async fn upload_form(
    form: &UploadForm<'_>,
    progress: &dyn Fn(u8),
) -> Result<HttpResponse, String> {
    super::interop::upload_form(form, progress).await
}

pub(crate) async fn save_bytes(
    file_name: &str,
    mime_type: &str,
    bytes: &[u8],
) -> Result<(), String> {
    super::interop::save_bytes(file_name, mime_type, bytes).await
}

pub(crate) async fn open_download(url: &str) -> Result<(), String> {
    super::interop::open_download(url).await
}

pub(crate) async fn copy_text(text: &str) -> Result<(), String> {
    super::interop::copy_text(text).await
}

//! HTTP implementation of [`FileStoreService`] for the console's JSON API.

use std::cell::RefCell;

use panel_host::{
    ActivityLogPage, ApiError, FileListing, FileMetadata, FileStoreFuture, FileStoreService,
    LocalFile, PanelSettings, SettingsUpdate, SortDirection, SortKey,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    bridge,
    config::ApiConfig,
    transport::{
        decode_csrf_token, decode_json, expect_bytes, expect_success, CsrfHeader, HttpRequest,
        HttpResponse, Method, UploadForm,
    },
};

#[derive(Debug, Default)]
/// Browser file store talking to the console server over `fetch`/XHR.
///
/// Write calls carry the CSRF token, fetched on first use and cached until the server rejects it
/// with `403`.
pub struct WebFileStoreService {
    config: ApiConfig,
    csrf_token: RefCell<Option<String>>,
}

impl WebFileStoreService {
    /// Service for the API described by `config`.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            csrf_token: RefCell::new(None),
        }
    }

    /// Active transport configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn csrf_header(&self) -> Result<CsrfHeader, ApiError> {
        let cached = self.csrf_token.borrow().clone();
        let token = match cached {
            Some(token) => token,
            None => {
                let response = bridge::fetch_text(&HttpRequest::get(self.config.csrf_url()))
                    .await
                    .map_err(ApiError::Transport)?;
                let token = decode_csrf_token(response)?;
                *self.csrf_token.borrow_mut() = Some(token.clone());
                token
            }
        };
        Ok(CsrfHeader {
            name: self.config.csrf_header.clone(),
            token,
        })
    }

    fn note_status(&self, status: u16) {
        if status == 403 {
            self.csrf_token.borrow_mut().take();
        }
    }

    fn observe(&self, response: HttpResponse) -> HttpResponse {
        self.note_status(response.status);
        response
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        let response = bridge::fetch_text(&HttpRequest::get(url))
            .await
            .map_err(ApiError::Transport)?;
        decode_json(response)
    }

    async fn send_json(
        &self,
        method: Method,
        route: &str,
        body: serde_json::Value,
    ) -> Result<HttpResponse, ApiError> {
        let csrf = self.csrf_header().await?;
        let request = HttpRequest::json(method, self.config.endpoint(route), &body, csrf);
        let response = bridge::fetch_text(&request)
            .await
            .map_err(ApiError::Transport)?;
        Ok(self.observe(response))
    }

    async fn post(&self, route: &str, body: serde_json::Value) -> Result<(), ApiError> {
        let response = self.send_json(Method::Post, route, body).await?;
        expect_success(response).map(|_| ())
    }

    async fn send_form(
        &self,
        route: &str,
        fields: Vec<(&'static str, String)>,
        file: &LocalFile,
        progress: &dyn Fn(u8),
    ) -> Result<(), ApiError> {
        let form = UploadForm {
            url: self.config.endpoint(route),
            fields,
            file_field: "file",
            file,
            csrf: self.csrf_header().await?,
        };
        let response = bridge::upload_form(&form, progress)
            .await
            .map_err(ApiError::Transport)?;
        expect_success(self.observe(response)).map(|_| ())
    }
}

impl FileStoreService for WebFileStoreService {
    fn list<'a>(
        &'a self,
        path: &'a str,
        sort: SortKey,
        direction: SortDirection,
    ) -> FileStoreFuture<'a, Result<FileListing, ApiError>> {
        Box::pin(async move {
            self.get_json(self.config.list_url(path, sort, direction))
                .await
        })
    }

    fn upload<'a>(
        &'a self,
        file: &'a LocalFile,
        directory: &'a str,
        overwrite: bool,
        progress: &'a dyn Fn(u8),
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let fields = vec![
                ("directory", directory.to_string()),
                ("overwrite", overwrite.to_string()),
            ];
            self.send_form("/files/upload", fields, file, progress)
                .await
        })
    }

    fn rename<'a>(
        &'a self,
        path: &'a str,
        new_name: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.post("/files/rename", json!({ "path": path, "new_name": new_name }))
                .await
        })
    }

    fn move_entry<'a>(
        &'a self,
        path: &'a str,
        destination: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.post(
                "/files/move",
                json!({ "path": path, "destination": destination }),
            )
            .await
        })
    }

    fn replace<'a>(
        &'a self,
        path: &'a str,
        file: &'a LocalFile,
        progress: &'a dyn Fn(u8),
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.send_form("/files/replace", vec![("path", path.to_string())], file, progress)
                .await
        })
    }

    fn delete<'a>(
        &'a self,
        path: &'a str,
        confirm_filename: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.post(
                "/files/delete",
                json!({ "path": path, "confirm_filename": confirm_filename }),
            )
            .await
        })
    }

    fn mkdir<'a>(
        &'a self,
        parent: &'a str,
        name: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            self.post("/files/mkdir", json!({ "path": parent, "name": name }))
                .await
        })
    }

    fn metadata<'a>(&'a self, path: &'a str) -> FileStoreFuture<'a, Result<FileMetadata, ApiError>> {
        Box::pin(async move { self.get_json(self.config.metadata_url(path)).await })
    }

    fn zip<'a>(&'a self, paths: &'a [String]) -> FileStoreFuture<'a, Result<Vec<u8>, ApiError>> {
        Box::pin(async move {
            let csrf = self.csrf_header().await?;
            let request = HttpRequest::json(
                Method::Post,
                self.config.endpoint("/files/zip"),
                &json!({ "paths": paths }),
                csrf,
            );
            let response = bridge::fetch_bytes(&request)
                .await
                .map_err(ApiError::Transport)?;
            self.note_status(response.status);
            expect_bytes(response)
        })
    }

    fn logs<'a>(
        &'a self,
        limit: u32,
        offset: u32,
    ) -> FileStoreFuture<'a, Result<ActivityLogPage, ApiError>> {
        Box::pin(async move { self.get_json(self.config.logs_url(limit, offset)).await })
    }

    fn settings<'a>(&'a self) -> FileStoreFuture<'a, Result<PanelSettings, ApiError>> {
        Box::pin(async move { self.get_json(self.config.endpoint("/settings")).await })
    }

    fn update_settings<'a>(
        &'a self,
        update: &'a SettingsUpdate,
    ) -> FileStoreFuture<'a, Result<PanelSettings, ApiError>> {
        Box::pin(async move {
            let body =
                serde_json::to_value(update).map_err(|e| ApiError::Decode(e.to_string()))?;
            let response = self.send_json(Method::Put, "/settings", body).await?;
            decode_json(response)
        })
    }

    fn download_url(&self, path: &str) -> String {
        self.config.download_url(path)
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn download_url_follows_configured_base() {
        let service = WebFileStoreService::new(ApiConfig::with_base("/panel/api"));
        let service_obj: &dyn FileStoreService = &service;
        assert_eq!(
            service_obj.download_url("/a b.txt"),
            "/panel/api/files/download?path=%2Fa%20b.txt"
        );
    }

    #[test]
    fn forbidden_response_forgets_cached_token() {
        let service = WebFileStoreService::default();
        *service.csrf_token.borrow_mut() = Some("stale".to_string());
        let ok = service.observe(HttpResponse {
            status: 200,
            body: String::new(),
        });
        assert_eq!(ok.status, 200);
        assert_eq!(service.csrf_token.borrow().as_deref(), Some("stale"));

        service.observe(HttpResponse {
            status: 403,
            body: r#"{"error":"invalid csrf token"}"#.to_string(),
        });
        assert!(service.csrf_token.borrow().is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn calls_report_transport_errors_off_wasm() {
        let service = WebFileStoreService::default();
        let err = block_on(service.list("/", SortKey::Name, SortDirection::Asc))
            .expect_err("no browser transport");
        assert!(matches!(err, ApiError::Transport(_)));

        // Write calls fail while acquiring the CSRF token; nothing gets cached.
        let err = block_on(service.rename("/a.txt", "b.txt")).expect_err("no token");
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(service.csrf_token.borrow().is_none());
    }
}

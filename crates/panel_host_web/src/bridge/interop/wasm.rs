use super::*;
use futures::{
    channel::mpsc,
    future::{select, Either},
    StreamExt,
};
use js_sys::{Array, Function, Promise, Reflect, Uint8Array};
use panel_host::{LocalFile, LocalFileHandle};
use serde_wasm_bindgen::from_value;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;

use crate::transport::CsrfHeader;

#[wasm_bindgen(inline_js = r#"
function fail(message) {
  throw new Error(message);
}

function requestHeaders(hasBody, headerName, token) {
  const headers = { 'Accept': 'application/json' };
  if (hasBody) headers['Content-Type'] = 'application/json';
  if (headerName && token) headers[headerName] = token;
  return headers;
}

async function send(method, url, body, headerName, token) {
  if (typeof fetch !== 'function') fail('fetch is unavailable in this browser context');
  const hasBody = typeof body === 'string';
  return await fetch(url, {
    method,
    headers: requestHeaders(hasBody, headerName, token),
    body: hasBody ? body : undefined,
    credentials: 'same-origin',
  });
}

function clickAnchor(href, fileName) {
  if (typeof document === 'undefined' || !document.body) fail('document is unavailable');
  const anchor = document.createElement('a');
  anchor.href = href;
  if (fileName) anchor.download = fileName;
  document.body.appendChild(anchor);
  anchor.click();
  anchor.remove();
}

export async function jsFetchText(method, url, body, headerName, token) {
  const response = await send(method, url, body, headerName, token);
  return { status: response.status, body: await response.text() };
}

export async function jsFetchBytes(method, url, body, headerName, token) {
  const response = await send(method, url, body, headerName, token);
  return { status: response.status, body: new Uint8Array(await response.arrayBuffer()) };
}

export function jsUploadForm(url, fieldsJson, fileField, file, fileName, headerName, token, onProgress) {
  return new Promise((resolve, reject) => {
    const form = new FormData();
    for (const [name, value] of JSON.parse(fieldsJson)) form.append(name, value);
    form.append(fileField, file, fileName);
    const xhr = new XMLHttpRequest();
    xhr.open('POST', url);
    if (headerName && token) xhr.setRequestHeader(headerName, token);
    xhr.upload.onprogress = (event) => {
      if (event.lengthComputable && event.total > 0) {
        onProgress(Math.round((event.loaded * 100) / event.total));
      }
    };
    xhr.onload = () => resolve({ status: xhr.status, body: xhr.responseText || '' });
    xhr.onerror = () => reject(new Error('Network error during upload'));
    xhr.onabort = () => reject(new Error('Upload aborted'));
    xhr.send(form);
  });
}

export function jsSaveBytes(fileName, mimeType, bytes) {
  const blob = new Blob([bytes.slice()], { type: mimeType });
  const url = URL.createObjectURL(blob);
  try {
    clickAnchor(url, fileName);
  } finally {
    URL.revokeObjectURL(url);
  }
}

export function jsOpenDownload(url) {
  clickAnchor(url, '');
}

export async function jsCopyText(text) {
  if (typeof navigator === 'undefined' || !navigator.clipboard || !navigator.clipboard.writeText) {
    fail('Clipboard API is unavailable');
  }
  await navigator.clipboard.writeText(text);
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsFetchText)]
    fn js_fetch_text(
        method: &str,
        url: &str,
        body: Option<String>,
        header_name: Option<String>,
        token: Option<String>,
    ) -> Promise;
    #[wasm_bindgen(js_name = jsFetchBytes)]
    fn js_fetch_bytes(
        method: &str,
        url: &str,
        body: Option<String>,
        header_name: Option<String>,
        token: Option<String>,
    ) -> Promise;
    #[wasm_bindgen(js_name = jsUploadForm)]
    fn js_upload_form(
        url: &str,
        fields_json: &str,
        file_field: &str,
        file: &JsValue,
        file_name: &str,
        header_name: &str,
        token: &str,
        on_progress: &Function,
    ) -> Promise;
    #[wasm_bindgen(catch, js_name = jsSaveBytes)]
    fn js_save_bytes(file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), JsValue>;
    #[wasm_bindgen(catch, js_name = jsOpenDownload)]
    fn js_open_download(url: &str) -> Result<(), JsValue>;
    #[wasm_bindgen(js_name = jsCopyText)]
    fn js_copy_text(text: &str) -> Promise;
}

async fn await_promise(promise: Promise) -> Result<JsValue, String> {
    JsFuture::from(promise).await.map_err(js_error_to_string)
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

fn split_csrf(csrf: Option<&CsrfHeader>) -> (Option<String>, Option<String>) {
    match csrf {
        Some(header) => (Some(header.name.clone()), Some(header.token.clone())),
        None => (None, None),
    }
}

fn decode_text_response(value: JsValue) -> Result<HttpResponse, String> {
    from_value(value).map_err(|e| e.to_string())
}

fn decode_binary_response(value: JsValue) -> Result<BinaryResponse, String> {
    let status = Reflect::get(&value, &JsValue::from_str("status"))
        .map_err(js_error_to_string)?
        .as_f64()
        .ok_or_else(|| "response is missing a status".to_string())?;
    let body = Reflect::get(&value, &JsValue::from_str("body")).map_err(js_error_to_string)?;
    Ok(BinaryResponse {
        status: status as u16,
        body: Uint8Array::new(&body).to_vec(),
    })
}

/// Resolves the upload source to a `Blob` (or registered `File`).
fn file_part(file: &LocalFile) -> Result<JsValue, String> {
    match &file.handle {
        LocalFileHandle::Bytes(bytes) => {
            let parts = Array::of1(&Uint8Array::from(&bytes[..]));
            web_sys::Blob::new_with_u8_array_sequence(&parts)
                .map(JsValue::from)
                .map_err(js_error_to_string)
        }
        LocalFileHandle::Host(token) => crate::file_registry::lookup(*token)
            .map(JsValue::from)
            .ok_or_else(|| format!("`{}` is no longer available for upload", file.name)),
    }
}

pub async fn fetch_text(request: &HttpRequest) -> Result<HttpResponse, String> {
    let (header_name, token) = split_csrf(request.csrf.as_ref());
    let value = await_promise(js_fetch_text(
        request.method.as_str(),
        &request.url,
        request.body.clone(),
        header_name,
        token,
    ))
    .await?;
    decode_text_response(value)
}

pub async fn fetch_bytes(request: &HttpRequest) -> Result<BinaryResponse, String> {
    let (header_name, token) = split_csrf(request.csrf.as_ref());
    let value = await_promise(js_fetch_bytes(
        request.method.as_str(),
        &request.url,
        request.body.clone(),
        header_name,
        token,
    ))
    .await?;
    decode_binary_response(value)
}

pub async fn upload_form(
    form: &UploadForm<'_>,
    progress: &dyn Fn(u8),
) -> Result<HttpResponse, String> {
    let file = file_part(form.file)?;
    // XHR progress events arrive on the JS side; forward them through a channel so `progress`
    // runs on this task without needing a `'static` callback.
    let (sender, mut receiver) = mpsc::unbounded::<u8>();
    let on_progress = Closure::<dyn FnMut(f64)>::new(move |percent: f64| {
        let _ = sender.unbounded_send(percent.clamp(0.0, 100.0) as u8);
    });
    let mut upload = Box::pin(await_promise(js_upload_form(
        &form.url,
        &form.fields_json(),
        form.file_field,
        &file,
        &form.file.name,
        &form.csrf.name,
        &form.csrf.token,
        on_progress.as_ref().unchecked_ref(),
    )));

    let result = loop {
        match select(upload, receiver.next()).await {
            Either::Left((result, _)) => break result,
            Either::Right((Some(percent), pending)) => {
                progress(percent);
                upload = pending;
            }
            Either::Right((None, pending)) => break pending.await,
        }
    };
    while let Ok(Some(percent)) = receiver.try_next() {
        progress(percent);
    }
    drop(on_progress);
    decode_text_response(result?)
}

pub async fn save_bytes(file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), String> {
    js_save_bytes(file_name, mime_type, bytes).map_err(js_error_to_string)
}

pub async fn open_download(url: &str) -> Result<(), String> {
    js_open_download(url).map_err(js_error_to_string)
}

pub async fn copy_text(text: &str) -> Result<(), String> {
    let _ = await_promise(js_copy_text(text)).await?;
    Ok(())
}

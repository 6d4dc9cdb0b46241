//! Browser transport backed by the global `fetch` API.

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Headers, Request, RequestInit, RequestMode, Response};

use super::{FormData, FormValue, HttpRequest, HttpResponse, RequestBody, Transport};
use crate::error::{RequestError, RequestResult};

/// HTTP transport for `wasm32` builds running in a browser.
///
/// Looks up `window` on every request, so it holds no state of its own.
/// `HttpRequest::timeout` is not applied; the browser's own limits govern
/// how long a fetch may run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

impl BrowserTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse> {
        let window = web_sys::window().ok_or_else(|| RequestError::transport("Window not available"))?;

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new().map_err(js_error)?;
        for (name, value) in request.headers.iter() {
            let value = value.to_str().map_err(RequestError::transport)?;
            headers.append(name.as_str(), value).map_err(js_error)?;
        }
        opts.set_headers(&headers);

        match request.body {
            Some(RequestBody::Bytes(bytes)) => opts.set_body(&Uint8Array::from(bytes.as_slice())),
            Some(RequestBody::Multipart(form)) => opts.set_body(&to_form_data(form)?),
            None => {}
        }

        let fetch_request =
            Request::new_with_str_and_init(&request.url, &opts).map_err(js_error)?;
        let result = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(js_error)?;
        let response: Response = result
            .dyn_into()
            .map_err(|_| RequestError::transport("fetch did not resolve to a Response"))?;

        let headers = collect_headers(&response.headers())?;
        let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let body = Uint8Array::new(&buffer).to_vec();

        Ok(HttpResponse {
            status: response.status(),
            status_text: response.status_text(),
            headers,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

fn js_error(value: JsValue) -> RequestError {
    RequestError::transport(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

fn collect_headers(headers: &Headers) -> RequestResult<HeaderMap> {
    let mut map = HeaderMap::new();
    let Some(entries) = js_sys::try_iter(headers).map_err(js_error)? else {
        return Ok(map);
    };

    for entry in entries {
        let pair = Array::from(&entry.map_err(js_error)?);
        let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) else {
            continue;
        };
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            map.append(name, value);
        }
    }
    Ok(map)
}

fn to_form_data(form: FormData) -> RequestResult<web_sys::FormData> {
    let data = web_sys::FormData::new().map_err(js_error)?;
    for part in form.into_parts() {
        match part.value {
            FormValue::Text(value) => data.append_with_str(&part.name, &value),
            FormValue::File {
                file_name,
                mime,
                bytes,
            } => {
                let bag = BlobPropertyBag::new();
                if let Some(mime) = &mime {
                    bag.set_type(mime);
                }
                let chunks = Array::of1(&Uint8Array::from(bytes.as_slice()));
                let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &bag)
                    .map_err(js_error)?;
                match file_name {
                    Some(file_name) => {
                        data.append_with_blob_and_filename(&part.name, &blob, &file_name)
                    }
                    None => data.append_with_blob(&part.name, &blob),
                }
            }
        }
        .map_err(js_error)?;
    }
    Ok(data)
}

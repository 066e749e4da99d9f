//! HTTP client whose futures are `Send` on every target.
//!
//! `reqwest::Response` holds JS handles on wasm32, so there the request runs
//! through `spawn_local` and only the owned [`Response`] crosses back over a
//! `flume` channel. Natively the request is awaited in place.

use std::collections::BTreeMap;

use thiserror::Error;

/// HTTP verbs the admin API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Upper-case verb, as written on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Owned response data.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Header names are lowercased.
    pub headers: BTreeMap<String, String>,
    /// Raw body bytes; empty for bodiless responses.
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the body does not match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Failures before a status code is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(String),
    /// Connection, TLS or body read failure.
    #[error("request failed: {0}")]
    Transport(String),
    /// The wasm task sending the request went away before answering.
    #[error("request cancelled")]
    Cancelled,
}

pub type HttpResult<T> = Result<T, HttpError>;

/// A request being assembled; nothing is sent until [`Self::send`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Set a header; the name is stored lowercased.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// `Authorization: Bearer <token>`.
    pub fn bearer(self, token: &str) -> Self {
        self.header("authorization", format!("Bearer {token}"))
    }

    /// Append a query parameter; percent-encoding happens at send time.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Use `value` as a JSON body and set the content type.
    ///
    /// # Errors
    /// Returns [`HttpError::Encode`] when `value` cannot be serialized.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> HttpResult<Self> {
        let bytes = serde_json::to_vec(value).map_err(|e| HttpError::Encode(e.to_string()))?;
        self.body = Some(bytes);
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    /// Verb this request will be sent with.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Send the request and read the whole body.
    ///
    /// Non-2xx statuses are not errors here; callers inspect
    /// [`Response::status`].
    ///
    /// # Errors
    /// Returns [`HttpError::Transport`] when no response arrives and
    /// [`HttpError::Cancelled`] when the wasm task is dropped.
    pub async fn send(self) -> HttpResult<Response> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.execute().await
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (tx, rx) = flume::bounded::<HttpResult<Response>>(1);
            wasm_bindgen_futures::spawn_local(async move {
                let result = self.execute().await;
                let _ = tx.send_async(result).await;
            });
            rx.recv_async().await.map_err(|_| HttpError::Cancelled)?
        }
    }

    async fn execute(self) -> HttpResult<Response> {
        let client = reqwest::Client::new();
        let mut request = client.request(self.method.to_reqwest(), &self.url);
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(body) = self.body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_owned()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Entry point for building requests, one constructor per verb.
pub struct Client;

impl Client {
    pub fn get(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(Method::Delete, url)
    }
}

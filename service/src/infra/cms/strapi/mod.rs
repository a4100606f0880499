//! [Strapi] [`Cms`] implementation.
//!
//! [Strapi]: https://strapi.io

mod impls;
pub mod payload;
pub mod query;

use std::time::Duration;

use derive_more::{Display, Error as StdError, From};
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::infra::cms;
#[cfg(doc)]
use crate::infra::Cms;

pub use self::{payload::transform_category_to_node, query::Query};

/// [`Strapi`] client configuration.
#[derive(Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the [Strapi] instance.
    ///
    /// [Strapi]: https://strapi.io
    #[default("http://127.0.0.1:1337".to_owned())]
    pub url: String,

    /// API token to authorize requests with, if any.
    pub token: Option<SecretString>,

    /// Timeout of a single request.
    #[default(Duration::from_secs(10))]
    pub timeout: Duration,

    /// Number of children levels fetched below a category.
    #[default(3)]
    pub category_depth: u8,
}

/// [Strapi] REST API client.
///
/// [Strapi]: https://strapi.io
#[derive(Clone, Debug)]
pub struct Strapi {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// Base URL of the [Strapi] instance, without a trailing slash.
    ///
    /// [Strapi]: https://strapi.io
    url: String,

    /// Number of children levels fetched below a category.
    category_depth: u8,
}

impl Strapi {
    /// Creates a new [`Strapi`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the API token is not a valid header value, or the underlying HTTP
    /// client cannot be built.
    pub fn new(conf: Config) -> Result<Self, Traced<cms::Error>> {
        let Config {
            url,
            token,
            timeout,
            category_depth,
        } = conf;

        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            let mut value = header::HeaderValue::try_from(format!(
                "Bearer {}",
                token.expose_secret(),
            ))
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
            value.set_sensitive(true);
            _ = headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_owned(),
            category_depth,
        })
    }

    /// Performs a `GET` request to the provided API `path`.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<T, Traced<Error>> {
        let req = self.request(Method::GET, path).query(query.pairs());
        decode(self.send(req).await.map_err(tracerr::wrap!())?).await
    }

    /// Performs a `POST` request to the provided API `path`, wrapping the
    /// provided `data` into the [`payload::Data`] envelope.
    pub(crate) async fn post<T, D>(
        &self,
        path: &str,
        query: &Query,
        data: D,
    ) -> Result<T, Traced<Error>>
    where
        T: DeserializeOwned,
        D: Serialize,
    {
        let req = self
            .request(Method::POST, path)
            .query(query.pairs())
            .json(&payload::Data { data });
        decode(self.send(req).await.map_err(tracerr::wrap!())?).await
    }

    /// Performs a `PUT` request to the provided API `path`, wrapping the
    /// provided `data` into the [`payload::Data`] envelope.
    pub(crate) async fn put<T, D>(
        &self,
        path: &str,
        query: &Query,
        data: D,
    ) -> Result<T, Traced<Error>>
    where
        T: DeserializeOwned,
        D: Serialize,
    {
        let req = self
            .request(Method::PUT, path)
            .query(query.pairs())
            .json(&payload::Data { data });
        decode(self.send(req).await.map_err(tracerr::wrap!())?).await
    }

    /// Performs a `DELETE` request to the provided API `path`.
    pub(crate) async fn delete(
        &self,
        path: &str,
    ) -> Result<(), Traced<Error>> {
        self.send(self.request(Method::DELETE, path))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }

    /// Creates a new request to the provided API `path`.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url =
            format!("{}/api/{}", self.url, path.trim_start_matches('/'));
        log::debug!("Strapi request: {method} {url}");
        self.client.request(method, url)
    }

    /// Sends the provided request, failing on a non-success response.
    async fn send(
        &self,
        req: RequestBuilder,
    ) -> Result<Response, Traced<Error>> {
        let resp = req
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))?;
            log::warn!("Strapi responded with `{status}`: {body}");
            return Err(tracerr::new!(Error::Transport { status, body }));
        }
        Ok(resp)
    }
}

/// Decodes the JSON body of the provided [`Response`].
async fn decode<T: DeserializeOwned>(
    resp: Response,
) -> Result<T, Traced<Error>> {
    let body = resp
        .bytes()
        .await
        .map_err(tracerr::from_and_wrap!(=> Error))?;
    serde_json::from_slice(&body).map_err(tracerr::from_and_wrap!(=> Error))
}

/// [`Strapi`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request could not be performed.
    #[display("Request to Strapi failed: {_0}")]
    Request(reqwest::Error),

    /// Strapi responded with a non-success status.
    #[display("Strapi responded with `{status}`: {body}")]
    #[from(ignore)]
    Transport {
        /// Status of the response.
        status: StatusCode,

        /// Text of the response body.
        body: String,
    },

    /// Response body could not be decoded.
    #[display("Failed to decode Strapi response: {_0}")]
    Decode(serde_json::Error),

    /// Response body was decoded, but holds an invalid entity.
    #[display("Malformed Strapi entity: {_0}")]
    #[from(ignore)]
    Malformed(#[error(not(source))] String),

    /// API token cannot be sent in a header.
    #[display("Invalid Strapi API token: {_0}")]
    InvalidToken(header::InvalidHeaderValue),
}

impl Error {
    /// Checks whether Strapi responded with `404 Not Found`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Transport { status, .. } if *status == StatusCode::NOT_FOUND,
        )
    }
}

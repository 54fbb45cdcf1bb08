//! Shared call patterns for resource modules.
//!
//! Every resource operation is one of a handful of shapes:
//!
//! - fetch one JSON document ([`get`])
//! - send a JSON body and decode the JSON reply ([`send`])
//! - send an optional body and ignore the reply ([`send_empty`])
//! - walk a paginated list and decode every result ([`list`])
//!
//! Resource modules call these instead of the executor directly so that
//! version mismatches are always carried into the returned
//! [`ResourceResponse`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::{ApiError, Client, HttpMethod, HttpRequest, HttpResponse};
use crate::rest::ResourceResponse;

/// Decodes `response` into `T`, keeping its version mismatch.
pub(crate) fn decode<T: DeserializeOwned>(
    response: &HttpResponse,
) -> Result<ResourceResponse<T>, ApiError> {
    let data = response.json()?;
    Ok(ResourceResponse::from_http_response(data, response))
}

/// `GET path`, decoded into `T`.
pub(crate) async fn get<T: DeserializeOwned>(
    client: &Client,
    path: &str,
) -> Result<ResourceResponse<T>, ApiError> {
    let response = client.request(HttpMethod::Get, path, None).await?;
    decode(&response)
}

/// Sends `body` as JSON and decodes the reply into `T`.
pub(crate) async fn send<B, T>(
    client: &Client,
    method: HttpMethod,
    path: &str,
    body: &B,
) -> Result<ResourceResponse<T>, ApiError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = send_raw(client, method, path, Some(body)).await?;
    decode(&response)
}

/// Sends `body`, if any, and discards the reply.
pub(crate) async fn send_empty<B>(
    client: &Client,
    method: HttpMethod,
    path: &str,
    body: Option<&B>,
) -> Result<ResourceResponse<()>, ApiError>
where
    B: Serialize + ?Sized,
{
    let response = send_raw(client, method, path, body).await?;
    Ok(ResourceResponse::from_http_response((), &response))
}

/// Sends `body`, if any, and returns the undecoded reply.
pub(crate) async fn send_raw<B>(
    client: &Client,
    method: HttpMethod,
    path: &str,
    body: Option<&B>,
) -> Result<HttpResponse, ApiError>
where
    B: Serialize + ?Sized,
{
    let mut builder = HttpRequest::builder(method, path);
    if let Some(body) = body {
        builder = builder.json(body)?;
    }
    client.execute(builder.build()).await
}

/// Walks a paginated list and decodes every result into `T`.
pub(crate) async fn list<T: DeserializeOwned>(
    client: &Client,
    path: &str,
    limit: i64,
) -> Result<ResourceResponse<Vec<T>>, ApiError> {
    let page = client.fetch_limited(path, limit).await?;
    let items = page.decode()?;
    Ok(ResourceResponse::from_page(items, &page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ErrorKind, VersionMismatch};
    use crate::config::ApiVersion;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Token {
        token: String,
    }

    #[test]
    fn test_decode_keeps_version_mismatch() {
        let mismatch = VersionMismatch {
            expected: ApiVersion::current(),
            advertised: Some("2.2".to_string()),
            compatible: false,
        };
        let response = HttpResponse::new(200, HashMap::new(), br#"{"token":"abc"}"#.to_vec())
            .with_version_mismatch(Some(mismatch));

        let decoded: ResourceResponse<Token> = decode(&response).unwrap();
        assert_eq!(decoded.token, "abc");
        assert!(decoded.version_mismatch().is_some());
    }

    #[test]
    fn test_decode_wrong_shape_is_decode_error() {
        let response = HttpResponse::new(200, HashMap::new(), br#"{"other":1}"#.to_vec());

        let error = decode::<Token>(&response).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Decode);
    }
}

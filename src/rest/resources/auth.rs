//! Account management: registration, login, passwords, tokens and
//! cancellation.
//!
//! [`register`] and [`login`] work with an anonymous client. Every other
//! operation needs a token.
//!
//! # Example
//!
//! ```rust,ignore
//! use controller_sdk::rest::resources::auth;
//! use controller_sdk::{Client, Token};
//!
//! let anonymous = Client::new(config.clone())?;
//! let token = auth::login(&anonymous, "test", "opensesame").await?.into_inner();
//! let client = Client::new(config.with_token(Token::new(token)))?;
//! ```

use serde::{Deserialize, Serialize};

use crate::clients::{ApiError, Client, HttpMethod};
use crate::rest::resource::{self, send_empty};
use crate::rest::ResourceResponse;

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PasswdRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    password: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct RegenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    all: bool,
}

#[derive(Serialize)]
struct CancelRequest<'a> {
    username: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Creates a user account.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if the username is taken or a field is
/// invalid.
pub async fn register(
    client: &Client,
    username: &str,
    password: &str,
    email: &str,
) -> Result<ResourceResponse<()>, ApiError> {
    let body = RegisterRequest {
        username,
        password,
        email,
    };
    send_empty(client, HttpMethod::Post, "/v2/auth/register/", Some(&body)).await
}

/// Exchanges credentials for an API token.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] or [`ApiError::BadRequest`] for bad
/// credentials.
pub async fn login(
    client: &Client,
    username: &str,
    password: &str,
) -> Result<ResourceResponse<String>, ApiError> {
    let body = LoginRequest { username, password };
    let response: ResourceResponse<TokenResponse> =
        resource::send(client, HttpMethod::Post, "/v2/auth/login/", &body).await?;
    Ok(response.map(|reply| reply.token))
}

/// Changes a password.
///
/// Administrators may pass `username` to change another user's password.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn passwd(
    client: &Client,
    username: Option<&str>,
    password: &str,
    new_password: &str,
) -> Result<ResourceResponse<()>, ApiError> {
    let body = PasswdRequest {
        username: username.filter(|name| !name.is_empty()),
        password,
        new_password,
    };
    send_empty(client, HttpMethod::Post, "/v2/auth/passwd/", Some(&body)).await
}

/// Issues a new token, invalidating the old one.
///
/// With `all` every user's token is regenerated and an empty string is
/// returned. Otherwise the new token of `username` (or of the current user)
/// is returned.
///
/// # Errors
///
/// Returns the classified [`ApiError`] for any non-2xx response.
pub async fn regenerate(
    client: &Client,
    username: Option<&str>,
    all: bool,
) -> Result<ResourceResponse<String>, ApiError> {
    let username = username.filter(|name| !name.is_empty());
    let body = if all {
        Some(RegenerateRequest {
            username: None,
            all: true,
        })
    } else {
        username.map(|username| RegenerateRequest {
            username: Some(username),
            all: false,
        })
    };

    let response = resource::send_raw(client, HttpMethod::Post, "/v2/auth/tokens/", body.as_ref()).await?;
    if all || response.is_empty() {
        return Ok(ResourceResponse::from_http_response(String::new(), &response));
    }

    let reply: ResourceResponse<TokenResponse> = resource::decode(&response)?;
    Ok(reply.map(|reply| reply.token))
}

/// Deletes an account.
///
/// Without `username` the current user's account is deleted.
///
/// # Errors
///
/// Returns [`ApiError::CancellationFailed`] if the account still owns apps.
pub async fn cancel(client: &Client, username: Option<&str>) -> Result<ResourceResponse<()>, ApiError> {
    let body = username
        .filter(|name| !name.is_empty())
        .map(|username| CancelRequest { username });
    send_empty(client, HttpMethod::Delete, "/v2/auth/cancel/", body.as_ref()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_body_order() {
        let body = RegisterRequest {
            username: "test",
            password: "opensesame",
            email: "test@example.com",
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"username":"test","password":"opensesame","email":"test@example.com"}"#
        );
    }

    #[test]
    fn test_passwd_body() {
        let body = PasswdRequest {
            username: Some("test"),
            password: "old",
            new_password: "new",
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"username":"test","password":"old","new_password":"new"}"#
        );
    }

    #[test]
    fn test_regenerate_bodies() {
        let all = RegenerateRequest {
            username: None,
            all: true,
        };
        assert_eq!(serde_json::to_string(&all).unwrap(), r#"{"all":true}"#);

        let user = RegenerateRequest {
            username: Some("test"),
            all: false,
        };
        assert_eq!(serde_json::to_string(&user).unwrap(), r#"{"username":"test"}"#);
    }
}

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::app::AppState;
use crate::auth::AuthError;
use crate::error::ApiError;

/// HTTP Basic authentication middleware. On success the `Principal` is inserted
/// into the request extensions; on failure the request ends with a 401 challenge.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let (username, password) = match extract_basic_credentials(request.headers()) {
        Ok(credentials) => credentials,
        Err(e) => return challenge(&state.realm, e),
    };

    match state.authenticator.authenticate(&username, &password).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => challenge(&state.realm, e),
    }
}

/// 401 carrying a `WWW-Authenticate: Basic` challenge
fn challenge(realm: &str, err: AuthError) -> Response {
    let api_error = ApiError::from(err);
    let needs_challenge = api_error.status_code() == axum::http::StatusCode::UNAUTHORIZED;
    let mut response = api_error.into_response();

    if needs_challenge {
        if let Ok(value) = HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm)) {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }
    }
    response
}

/// Decode `Authorization: Basic base64(username:password)`
fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AuthError::MalformedHeader("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Invalid Authorization header format".to_string()))?;

    let (scheme, encoded) = auth_str
        .split_once(' ')
        .ok_or_else(|| AuthError::MalformedHeader("Authorization header must use Basic scheme".to_string()))?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MalformedHeader(
            "Authorization header must use Basic scheme".to_string(),
        ));
    }

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedHeader("Invalid Basic credentials encoding".to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::MalformedHeader("Basic credentials must be UTF-8".to_string()))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::MalformedHeader("Basic credentials must be username:password".to_string()))?;

    Ok((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn decodes_basic_credentials() {
        let encoded = BASE64.encode("sarah1:abc123");
        let (user, pass) = extract_basic_credentials(&headers_with(&format!("Basic {}", encoded))).unwrap();
        assert_eq!(user, "sarah1");
        assert_eq!(pass, "abc123");
    }

    #[test]
    fn password_may_contain_colons() {
        let encoded = BASE64.encode("kumar2:a:b:c");
        let (user, pass) = extract_basic_credentials(&headers_with(&format!("basic {}", encoded))).unwrap();
        assert_eq!(user, "kumar2");
        assert_eq!(pass, "a:b:c");
    }

    #[test]
    fn rejects_missing_and_malformed_headers() {
        assert!(extract_basic_credentials(&HeaderMap::new()).is_err());
        assert!(extract_basic_credentials(&headers_with("Bearer abc.def.ghi")).is_err());
        assert!(extract_basic_credentials(&headers_with("Basic !!!not-base64")).is_err());

        let no_colon = BASE64.encode("sarah1");
        assert!(extract_basic_credentials(&headers_with(&format!("Basic {}", no_colon))).is_err());
    }

    #[test]
    fn challenge_sets_www_authenticate() {
        let response = challenge("cashcards", AuthError::InvalidCredentials);
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"cashcards\""
        );
    }
}

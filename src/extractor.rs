use axum::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};

/// Identity of the caller, forwarded verbatim to the PDF generator.
pub struct Caller {
    pub authorization: String,
    pub organization_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authorization = header_value(&parts.headers, axum::http::header::AUTHORIZATION.as_str())
            .ok_or((StatusCode::UNAUTHORIZED, String::from("Missing authorization")))?;
        let organization_id = header_value(&parts.headers, "organizationid")
            .ok_or((StatusCode::BAD_REQUEST, String::from("Missing organizationid header")))?;
        Ok(Caller {
            authorization,
            organization_id,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

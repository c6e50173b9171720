use crate::AuthError;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::NoAuthHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header() {
        assert_eq!(extract_bearer(None), Err(AuthError::NoAuthHeader));
    }

    #[test]
    fn wrong_scheme_or_empty_token() {
        assert_eq!(extract_bearer(Some("Basic abc")), Err(AuthError::MalformedHeader));
        assert_eq!(extract_bearer(Some("Bearer ")), Err(AuthError::MalformedHeader));
        assert_eq!(extract_bearer(Some("Bearer    ")), Err(AuthError::MalformedHeader));
        assert_eq!(extract_bearer(Some("bearer abc")), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn extracts_and_trims_the_token() {
        assert_eq!(extract_bearer(Some("Bearer abc.def.ghi ")), Ok("abc.def.ghi"));
    }
}

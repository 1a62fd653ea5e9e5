//! API constants for the admin platform backend

/// Path of the credential-refresh operation, relative to the base URL
pub const REFRESH_TOKEN_PATH: &str = "/auth/refresh-token";

/// Path of the sign-in operation, relative to the base URL
pub const SIGNIN_PATH: &str = "/auth/signin";

/// Client-side sign-in entry point users are directed to after session teardown
pub const SIGNIN_ROUTE: &str = "/signin";

/// Standard headers for admin platform requests
pub mod headers {
    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Build the credential-refresh endpoint URL
pub fn refresh_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url, REFRESH_TOKEN_PATH)
}

/// Build the sign-in endpoint URL
pub fn signin_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url, SIGNIN_PATH)
}

/// Build the sign-in entry point URL
pub fn signin_page(base_url: &str) -> String {
    format!("{}{}", base_url, SIGNIN_ROUTE)
}

/// True when a request path targets the credential-refresh operation
pub fn is_refresh_request(path: &str) -> bool {
    path.contains("auth/refresh-token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_path_detection() {
        assert!(is_refresh_request("/auth/refresh-token"));
        assert!(is_refresh_request("auth/refresh-token"));
        assert!(!is_refresh_request("/companies"));
        assert!(!is_refresh_request("/auth/signin"));
    }

    #[test]
    fn test_endpoint_builders() {
        assert_eq!(
            refresh_endpoint("https://api.example.com"),
            "https://api.example.com/auth/refresh-token"
        );
        assert_eq!(
            signin_page("https://api.example.com"),
            "https://api.example.com/signin"
        );
    }
}

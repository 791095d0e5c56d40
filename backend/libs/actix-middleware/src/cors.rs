use actix_cors::Cors;

/// CORS policy from the `cors_allowed` config list.
///
/// `*` allows any origin; blank entries are skipped. Credentials are
/// allowed so the session cookie travels with cross-origin calls.
pub fn build_cors(allowed: &[String]) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed {
        let origin = origin.trim();
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

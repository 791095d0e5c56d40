/// Public REST endpoints: signup, signin and the authenticated health check
use crate::error::{Result, UserError};
use crate::services::UserService;
use actix_middleware::{AuthenticatedProfile, AUTH_COOKIE};
use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie},
    web, HttpResponse,
};
use crypto_core::{TokenSigner, TOKEN_TTL_HOURS};
use portal_common::{Profile, UserData};

/// Build the session cookie for a freshly authenticated profile
fn session_cookie(signer: &TokenSigner, profile: &Profile) -> Result<Cookie<'static>> {
    let token = signer
        .sign(profile)
        .map_err(|e| UserError::Internal(format!("token signing failed: {}", e)))?;

    Ok(Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::hours(TOKEN_TTL_HOURS))
        .finish())
}

/// Register and log in
pub async fn sign_up(
    service: web::Data<UserService>,
    signer: web::Data<TokenSigner>,
    body: web::Json<UserData>,
) -> Result<HttpResponse> {
    let profile = service.sign_up(body.into_inner()).await?;
    let cookie = session_cookie(&signer, &profile)?;

    Ok(HttpResponse::Created().cookie(cookie).json(profile))
}

pub async fn sign_in(
    service: web::Data<UserService>,
    signer: web::Data<TokenSigner>,
    body: web::Json<UserData>,
) -> Result<HttpResponse> {
    let profile = service.sign_in(&body.login, &body.password).await?;
    let cookie = session_cookie(&signer, &profile)?;

    tracing::debug!(user_id = %profile.id, "User signed in");
    Ok(HttpResponse::Ok().cookie(cookie).json(profile))
}

/// Answers 200 only for a valid session
pub async fn health_check(_profile: AuthenticatedProfile) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

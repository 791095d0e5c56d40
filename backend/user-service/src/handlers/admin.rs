/// Admin REST endpoints, served on their own listener behind `SubnetGate`
use crate::error::Result;
use crate::services::UserService;
use actix_web::{web, HttpResponse};
use portal_common::{Profile, UserData};
use uuid::Uuid;

pub async fn create_user(
    service: web::Data<UserService>,
    body: web::Json<UserData>,
) -> Result<HttpResponse> {
    let id = service.create_user(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

pub async fn edit_user(
    service: web::Data<UserService>,
    body: web::Json<Profile>,
) -> Result<HttpResponse> {
    service.edit_user(body.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Body is a JSON array of user ids
pub async fn delete_users(
    service: web::Data<UserService>,
    body: web::Json<Vec<Uuid>>,
) -> Result<HttpResponse> {
    let deleted = service.delete_users(&body).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}

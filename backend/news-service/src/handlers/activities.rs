/// Likes and comments on a news item
use crate::error::Result;
use crate::models::{CommentEdit, CommentInput};
use crate::services::NewsService;
use actix_middleware::AuthenticatedProfile;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

pub async fn get_likes(
    service: web::Data<NewsService>,
    news_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let likes = service.get_likes(news_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(likes))
}

pub async fn like(
    service: web::Data<NewsService>,
    profile: AuthenticatedProfile,
    news_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.create_like(news_id.into_inner(), profile.0.id).await?;
    Ok(HttpResponse::Ok().finish())
}

pub async fn dislike(
    service: web::Data<NewsService>,
    profile: AuthenticatedProfile,
    news_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_like(news_id.into_inner(), profile.0.id).await?;
    Ok(HttpResponse::Ok().finish())
}

pub async fn get_comments(
    service: web::Data<NewsService>,
    news_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = service.get_comments(news_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn create_comment(
    service: web::Data<NewsService>,
    profile: AuthenticatedProfile,
    news_id: web::Path<Uuid>,
    body: web::Json<CommentInput>,
) -> Result<HttpResponse> {
    let id = service
        .create_comment(news_id.into_inner(), profile.0.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}

pub async fn edit_comment(
    service: web::Data<NewsService>,
    profile: AuthenticatedProfile,
    news_id: web::Path<Uuid>,
    body: web::Json<CommentEdit>,
) -> Result<HttpResponse> {
    service
        .edit_comment(news_id.into_inner(), profile.0.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().finish())
}

pub async fn delete_comment(
    service: web::Data<NewsService>,
    profile: AuthenticatedProfile,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (news_id, comment_id) = path.into_inner();
    service
        .delete_comment(news_id, comment_id, profile.0.id)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

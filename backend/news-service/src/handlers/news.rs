/// News endpoints: list, read, writer CRUD and file download
use super::multipart::read_news_form;
use crate::error::Result;
use crate::models::Page;
use crate::services::NewsService;
use actix_middleware::AuthenticatedProfile;
use actix_multipart::Multipart;
use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};
use uuid::Uuid;

pub async fn get_news_list(
    service: web::Data<NewsService>,
    query: web::Query<Page>,
) -> Result<HttpResponse> {
    let news = service.get_news_list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(news))
}

pub async fn get_news(
    service: web::Data<NewsService>,
    news_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let news = service.get_news(news_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(news))
}

pub async fn create_news(
    service: web::Data<NewsService>,
    profile: AuthenticatedProfile,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_news_form(payload).await?;
    let news_id = service
        .create_news(form.attributes, form.content, form.preview, profile.0.id)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "news_id": news_id })))
}

pub async fn edit_news(
    service: web::Data<NewsService>,
    profile: AuthenticatedProfile,
    news_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_news_form(payload).await?;
    service
        .edit_news(
            news_id.into_inner(),
            form.attributes,
            form.content,
            form.preview,
            profile.0.id,
        )
        .await?;

    Ok(HttpResponse::Ok().finish())
}

pub async fn delete_news(
    service: web::Data<NewsService>,
    news_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_news(news_id.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Raw bytes of a news file, served with the stored MIME type
pub async fn download_file(
    service: web::Data<NewsService>,
    file_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let (file, data) = service.download_file(file_id.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type(file.mime_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(file.file_name)],
        })
        .body(data))
}

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{debug, info};

use crate::datatypes::page::{offset, PageUrls, PER_PAGE};
use crate::datatypes::{ListQuery, Paginated, Post, PostPayload};
use crate::error::ApiError;
use crate::store::PostStore;

/// `GET /posts`
pub async fn index(req: HttpRequest, store: web::Data<PostStore>) -> Result<HttpResponse, ApiError> {
    let query = ListQuery::from_query_str(req.query_string());
    let search = query.search.as_deref();

    let total = store.count(search).await?;
    let posts = store
        .page(search, PER_PAGE, offset(query.page, PER_PAGE))
        .await?;
    debug!(?search, page = query.page, total, returned = posts.len(), "Listed posts");

    let urls = PageUrls::new(collection_url(&req), search);
    let page = Paginated::new(posts, total, query.page, PER_PAGE, &urls);
    Ok(HttpResponse::Ok().json(page))
}

/// `POST /posts`
pub async fn create(store: web::Data<PostStore>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let fields = decode(&body)?.validate().map_err(ApiError::Validation)?;
    let post = store.insert(&fields).await?;
    info!(id = post.id, "Post created");
    Ok(HttpResponse::Created().json(post))
}

/// `GET /posts/{post}`
pub async fn show(store: web::Data<PostStore>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let post = resolve(&store, &path).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// `PUT|PATCH /posts/{post}`
pub async fn update(
    store: web::Data<PostStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let post = resolve(&store, &path).await?;
    let fields = decode(&body)?.validate().map_err(ApiError::Validation)?;
    let updated = store
        .update(post.id, &fields)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(id = updated.id, "Post updated");
    Ok(HttpResponse::Ok().json(updated))
}

/// `DELETE /posts/{post}`
pub async fn destroy(store: web::Data<PostStore>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let post = resolve(&store, &path).await?;
    if !store.delete(post.id).await? {
        return Err(ApiError::NotFound);
    }
    info!(id = post.id, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Route-to-row lookup shared by the single-post handlers. Anything that is not
/// the id of an existing row is a 404.
async fn resolve(store: &PostStore, raw: &str) -> Result<Post, ApiError> {
    let id: i64 = raw.parse().map_err(|_| ApiError::NotFound)?;
    store.find(id).await?.ok_or(ApiError::NotFound)
}

/// An empty body reads as an empty object so the field checks report what is missing.
fn decode(body: &[u8]) -> Result<PostPayload, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PostPayload::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedPayload(e.to_string()))
}

fn collection_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), req.path())
}

//! Page handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tera::Context;

use super::form::PostForm;
use super::AppState;
use crate::api::BlogApi;
use crate::content::Post;
use crate::helpers::{post_url, url_for};
use crate::templates::{PostCard, PostView, TemplateRenderer};

/// Handlers answer with a page either way; the error side short-circuits
type PageResult = Result<Response, Response>;

impl AppState {
    fn context(&self) -> Context {
        TemplateRenderer::page_context(&self.config, &self.i18n)
    }

    fn page(&self, status: StatusCode, template: &str, context: &Context) -> Response {
        match self.templates.render(template, context) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render {}: {:#}", template, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }

    fn not_found(&self) -> Response {
        self.page(StatusCode::NOT_FOUND, "not_found.html", &self.context())
    }

    fn post_page(&self, status: StatusCode, post: &Post, error: Option<String>) -> Response {
        let mut context = self.context();
        context.insert("post", &PostView::new(post, &self.config, &self.markdown));
        if let Some(error) = error {
            context.insert("error", &error);
        }
        self.page(status, "post.html", &context)
    }

    fn form_page(
        &self,
        status: StatusCode,
        form: &PostForm,
        edit_url: Option<&str>,
        error: Option<String>,
    ) -> Response {
        let mut context = self.context();
        let (heading, action) = match edit_url {
            Some(url) => (self.i18n.get("form_edit_title"), format!("{}/edit", url)),
            None => (
                self.i18n.get("form_new_title"),
                url_for(&self.config, "/write"),
            ),
        };
        context.insert("heading", &heading);
        context.insert("action", &action);
        context.insert("form", form);
        if let Some(error) = error {
            context.insert("error", &error);
        }
        self.page(status, "write.html", &context)
    }

    fn see_post(&self, post: &Post) -> Response {
        Redirect::to(&post_url(&self.config, post.id.as_str())).into_response()
    }
}

/// Run a blocking API call off the async runtime
async fn call_api<T, F>(state: &AppState, f: F) -> Result<T, Response>
where
    F: FnOnce(&BlogApi) -> T + Send + 'static,
    T: Send + 'static,
{
    let api = state.api.clone();
    tokio::task::spawn_blocking(move || f(&api))
        .await
        .map_err(|e| {
            tracing::error!("API task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        })
}

async fn find_post(state: &AppState, id: String) -> Result<Post, Response> {
    match call_api(state, move |api| api.get_post(&id)).await? {
        Some(post) => Ok(post),
        None => Err(state.not_found()),
    }
}

/// `GET /`
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let result = match call_api(&state, |api| api.fetch_posts()).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    let mut context = state.context();
    let cards: Vec<PostCard> = match result {
        Ok(posts) => posts
            .iter()
            .filter(|post| post.is_public())
            .map(|post| PostCard::new(post, &state.config))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch post list: {}", e);
            context.insert("error", &state.i18n.get("list_error"));
            Vec::new()
        }
    };
    context.insert("posts", &cards);
    state.page(StatusCode::OK, "index.html", &context)
}

/// `GET /blog/:id`
pub async fn show_post(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let post = find_post(&state, id).await?;
    Ok(state.post_page(StatusCode::OK, &post, None))
}

/// `GET /blog/:id/delete`
pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> PageResult {
    let post = find_post(&state, id).await?;
    let mut context = state.context();
    context.insert("post", &PostCard::new(&post, &state.config));
    Ok(state.page(StatusCode::OK, "delete.html", &context))
}

/// `POST /blog/:id/delete`
pub async fn delete_post(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let target = id.clone();
    if call_api(&state, move |api| api.delete_post(&target)).await? {
        return Ok(Redirect::to(&url_for(&state.config, "/")).into_response());
    }

    let post = find_post(&state, id).await?;
    Ok(state.post_page(
        StatusCode::BAD_GATEWAY,
        &post,
        Some(state.i18n.get("delete_failed")),
    ))
}

/// `GET /write`
pub async fn new_post(State(state): State<Arc<AppState>>) -> Response {
    state.form_page(StatusCode::OK, &PostForm::default(), None, None)
}

/// `POST /write`
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PostForm>,
) -> PageResult {
    if !form.is_complete() {
        let error = state.i18n.get("required_fields");
        return Ok(state.form_page(StatusCode::UNPROCESSABLE_ENTITY, &form, None, Some(error)));
    }

    let new_post = form.to_new_post();
    match call_api(&state, move |api| api.create_post(&new_post)).await? {
        Ok(post) => Ok(state.see_post(&post)),
        Err(_) => {
            let error = state.i18n.get("save_failed");
            Ok(state.form_page(StatusCode::BAD_GATEWAY, &form, None, Some(error)))
        }
    }
}

/// `GET /blog/:id/edit`
pub async fn edit_post(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> PageResult {
    let post = find_post(&state, id).await?;
    let url = post_url(&state.config, post.id.as_str());
    Ok(state.form_page(StatusCode::OK, &PostForm::from_post(&post), Some(&url), None))
}

/// `POST /blog/:id/edit`
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<PostForm>,
) -> PageResult {
    let url = post_url(&state.config, &id);
    if !form.is_complete() {
        let error = state.i18n.get("required_fields");
        return Ok(state.form_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            &form,
            Some(&url),
            Some(error),
        ));
    }

    let update = form.to_update();
    match call_api(&state, move |api| api.update_post(&id, &update)).await? {
        Ok(post) => Ok(state.see_post(&post)),
        Err(_) => {
            let error = state.i18n.get("save_failed");
            Ok(state.form_page(StatusCode::BAD_GATEWAY, &form, Some(&url), Some(error)))
        }
    }
}

/// Anything else
pub async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    state.not_found()
}

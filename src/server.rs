use std::path::Path;
use std::sync::Arc;
use std::{fs, io};

use anyhow::{Context, Result};
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use ramhorns::Template;
use spdlog::{error, info, warn};

use crate::config::Config;
use crate::post::Post;
use crate::post_render::render_markdown;
use crate::post_store::PostStore;
use crate::query_string::QueryString;
use crate::view::list_renderer::ListRenderer;
use crate::view::post_renderer::PostRenderer;
use crate::view::tags_renderer::TagsRenderer;

struct AppState {
    config: Config,
    store: PostStore,
}

#[derive(ramhorns::Content)]
struct IndexPage<'a> {
    site_title: &'a str,
    site_description: &'a str,
    post_count: i64,
    tag_count: i64,
}

/// The shape the search endpoint returns: listing metadata only, no body.
#[derive(serde::Serialize)]
struct SearchResult {
    slug: String,
    title: String,
    description: String,
    tags: Vec<String>,
    date: String,
}

impl From<Post> for SearchResult {
    fn from(post: Post) -> Self {
        SearchResult {
            slug: post.slug,
            title: post.title,
            description: post.description,
            tags: post.tags,
            date: post.date,
        }
    }
}

fn read_template(tpl_dir: &Path, file_name: &str) -> io::Result<String> {
    let full_path = tpl_dir.join(file_name);
    fs::read_to_string(full_path)
}

fn render_index_page(state: &AppState) -> Result<String> {
    let tpl_src = read_template(&state.config.paths.template_dir, "index.tpl")
        .context("Error loading index template")?;
    let template = Template::new(tpl_src).context("Error parsing index template")?;

    let posts = state.store.all_posts()?;
    let tags = state.store.all_tags()?;

    Ok(template.render(&IndexPage {
        site_title: state.config.site.title.as_str(),
        site_description: state.config.site.description.as_str(),
        post_count: posts.len() as i64,
        tag_count: tags.len() as i64,
    }))
}

fn render_list_page(state: &AppState, heading: &str, posts: &[Post]) -> Result<String> {
    let tags: Vec<String> = state
        .store
        .all_tags()?
        .into_iter()
        .map(|(tag, _count)| tag)
        .collect();

    let tpl_src = read_template(&state.config.paths.template_dir, "list.tpl")
        .context("Error loading list template")?;
    let renderer = ListRenderer::new(&tpl_src)?;

    Ok(renderer.render(heading, posts, &tags))
}

fn render_post_page(state: &AppState, post: &Post) -> Result<String> {
    let rendered_content = render_markdown(&post.content)
        .with_context(|| format!("Error rendering post '{}'", post.slug))?;

    let tpl_src = read_template(&state.config.paths.template_dir, "post.tpl")
        .context("Error loading post template")?;
    let renderer = PostRenderer::new(&tpl_src)?;

    Ok(renderer.render(post, &rendered_content))
}

fn render_tags_page(state: &AppState) -> Result<String> {
    let tag_counts = state.store.all_tags()?;

    let tpl_src = read_template(&state.config.paths.template_dir, "tags.tpl")
        .context("Error loading tags template")?;
    let renderer = TagsRenderer::new(&tpl_src)?;

    Ok(renderer.render(&tag_counts))
}

fn html_ok(body: String) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[web::get("/")]
async fn index(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match render_index_page(&state) {
        Ok(body) => html_ok(body),
        Err(e) => {
            web::HttpResponse::InternalServerError().body(format!("Error rendering index: {}", e))
        }
    }
}

#[web::get("/blog")]
async fn blog(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let posts = match state.store.all_posts() {
        Ok(posts) => posts,
        Err(e) => {
            return web::HttpResponse::InternalServerError()
                .body(format!("Error listing posts: {}", e))
        }
    };

    match render_list_page(&state, "All posts", &posts) {
        Ok(body) => html_ok(body),
        Err(e) => {
            web::HttpResponse::InternalServerError().body(format!("Error listing posts: {}", e))
        }
    }
}

// Begin: Redirect region --------
#[web::get("/blog/{slug}")]
async fn view_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", path.into_inner() + "/")
        .content_type("text/html; charset=utf-8")
        .finish()
}

#[web::get("/tags/{tag}")]
async fn tag_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", path.into_inner() + "/")
        .content_type("text/html; charset=utf-8")
        .finish()
}
// End: Redirect region --------

#[web::get("/blog/{slug}/")]
async fn view(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    let slug = path.into_inner();

    let Some(post) = state.store.post_by_slug(&slug) else {
        return web::HttpResponse::NotFound().body(format!("Post not found: {}", slug));
    };

    match render_post_page(&state, &post) {
        Ok(body) => html_ok(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error loading post {}: {}", slug, e)),
    }
}

#[web::get("/tags")]
async fn tags_index(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match render_tags_page(&state) {
        Ok(body) => html_ok(body),
        Err(e) => {
            web::HttpResponse::InternalServerError().body(format!("Error listing tags: {}", e))
        }
    }
}

#[web::get("/tags/{tag}/")]
async fn tag_list(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    let tag = path.into_inner();

    let posts = match state.store.posts_by_tag(&tag) {
        Ok(posts) => posts,
        Err(e) => {
            return web::HttpResponse::InternalServerError()
                .body(format!("Error listing posts: {}", e))
        }
    };

    let heading = format!("Posts tagged with #{}", tag);
    match render_list_page(&state, &heading, &posts) {
        Ok(body) => html_ok(body),
        Err(e) => {
            web::HttpResponse::InternalServerError().body(format!("Error listing posts: {}", e))
        }
    }
}

#[web::get("/api/search")]
async fn api_search(
    req: HttpRequest,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    let query = req
        .uri()
        .query()
        .map(QueryString::from)
        .and_then(|qs| qs.get_query().map(String::from));

    // Missing or blank query is an empty result, not an error
    let Some(query) = query else {
        return web::HttpResponse::Ok()
            .content_type("application/json")
            .body("[]");
    };

    let posts = match state.store.search(&query) {
        Ok(posts) => posts,
        Err(e) => {
            error!("Error searching posts: {}", e);
            return web::HttpResponse::InternalServerError()
                .content_type("application/json")
                .body(r#"{"error":"Failed to search posts"}"#);
        }
    };

    let results: Vec<SearchResult> = posts.into_iter().map(SearchResult::from).collect();
    match serde_json::to_string(&results) {
        Ok(body) => web::HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(e) => {
            error!("Error serializing search results: {}", e);
            web::HttpResponse::InternalServerError()
                .content_type("application/json")
                .body(r#"{"error":"Failed to search posts"}"#)
        }
    }
}

#[web::get("/public/{file_name}")]
async fn public_files(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.config.paths.public_dir.join(path.into_inner());

    Ok(NamedFile::open(file_path)?)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let store = PostStore::new(config.paths.posts_dir.clone());

    match store.all_posts() {
        Ok(posts) => info!(
            "Serving {} posts from {}",
            posts.len(),
            store.posts_dir().display()
        ),
        Err(e) => warn!("Error reading posts at startup: {}", e),
    }

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState { config, store });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(blog)
            .service(view)
            .service(view_wo_slash)
            .service(tags_index)
            .service(tag_list)
            .service(tag_wo_slash)
            .service(api_search)
            .service(public_files)
    })
    .bind((bind_addr, bind_port))?
    .run()
    .await
}

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};

use iron::{status, Handler, IronResult, Request, Response};
use router::Router;

use crate::error::{ApiError, ApiResult, Message};
use crate::model::{Post, PostDraft, PostField, SortDirection};
use crate::store::PostStore;

/// Match a `Result` into its inner value, or answer the request
/// with the error's status code and JSON body.
macro_rules! try_handler {
    ( $e:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => return Ok(ApiError::from(e).response()),
        }
    };
}

/// Lock the shared store. A poisoned lock answers `500 Internal Server Error`.
macro_rules! lock {
    ( $e:expr ) => {
        try_handler!($e
            .lock()
            .map_err(|_| ApiError::Internal("post store lock poisoned".to_string())))
    };
}

pub type QueryParams = HashMap<String, String>;

/// Decoded query string. The first occurrence of a repeated key wins.
pub fn query_params(req: &Request) -> QueryParams {
    let mut params = QueryParams::new();
    for (key, value) in req.url.as_ref().query_pairs() {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

fn non_empty<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// All posts, sorted when both `sort` and `direction` are given.
pub fn list_posts(store: &PostStore, params: &QueryParams) -> ApiResult<Vec<Post>> {
    match (non_empty(params, "sort"), non_empty(params, "direction")) {
        (Some(sort), Some(direction)) => {
            let field: PostField = sort.parse().map_err(|_| ApiError::InvalidSort)?;
            let direction: SortDirection = direction.parse().map_err(|_| ApiError::InvalidSort)?;
            Ok(store.sort_by(field, direction))
        }
        _ => Ok(store.list().to_vec()),
    }
}

/// Search by `title`, or by `content` when no title is given.
pub fn search_posts(store: &PostStore, params: &QueryParams) -> ApiResult<Vec<Post>> {
    if let Some(title) = non_empty(params, "title") {
        return Ok(store.search_by_field(title, PostField::Title));
    }
    if let Some(content) = non_empty(params, "content") {
        return Ok(store.search_by_field(content, PostField::Content));
    }
    Err(ApiError::NoSearchTerm)
}

pub fn parse_draft(body: &str) -> ApiResult<PostDraft> {
    serde_json::from_str(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// Ids in the path are plain decimal digits.
pub fn parse_post_id(raw: &str) -> ApiResult<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::UnknownPostId(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| ApiError::UnknownPostId(raw.to_string()))
}

pub fn create_post(store: &mut PostStore, body: &str) -> ApiResult<Post> {
    let draft = parse_draft(body)?;
    store.insert(&draft.title, &draft.content)
}

/// An unknown id is reported before the body is looked at.
pub fn update_post(store: &mut PostStore, id: u64, body: &str) -> ApiResult<Post> {
    if store.find_by_id(id).is_none() {
        return Err(ApiError::PostNotFound(id));
    }
    let draft = parse_draft(body)?;
    store
        .update(id, &draft.title, &draft.content)
        .cloned()
        .ok_or(ApiError::PostNotFound(id))
}

/// Confirmation message for a removed post.
pub fn delete_post(store: &mut PostStore, id: u64) -> ApiResult<String> {
    if store.remove(id) {
        Ok(format!("Post with id {} has been deleted successfully.", id))
    } else {
        Err(ApiError::PostNotFound(id))
    }
}

/// Value bound to `key` by the route pattern.
fn path_param<'a>(req: &'a Request, key: &str) -> ApiResult<&'a str> {
    req.extensions
        .get::<Router>()
        .and_then(|params| params.find(key))
        .ok_or_else(|| ApiError::Internal(format!("route has no `{}` parameter", key)))
}

fn read_body(req: &mut Request) -> ApiResult<String> {
    let mut payload = String::new();
    req.body
        .read_to_string(&mut payload)
        .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    Ok(payload)
}

pub struct Handlers {
    pub list: ListPostsHandler,
    pub create: CreatePostHandler,
    pub update: UpdatePostHandler,
    pub delete: DeletePostHandler,
    pub search: SearchPostsHandler,
}

impl Handlers {
    pub fn new(store: PostStore) -> Handlers {
        let store = Arc::new(Mutex::new(store));
        Handlers {
            list: ListPostsHandler::new(store.clone()),
            create: CreatePostHandler::new(store.clone()),
            update: UpdatePostHandler::new(store.clone()),
            delete: DeletePostHandler::new(store.clone()),
            search: SearchPostsHandler::new(store),
        }
    }
}

pub struct ListPostsHandler {
    store: Arc<Mutex<PostStore>>,
}

impl ListPostsHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> ListPostsHandler {
        ListPostsHandler { store }
    }
}

impl Handler for ListPostsHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let params = query_params(req);
        let store = lock!(self.store);
        let posts = try_handler!(list_posts(&store, &params));
        let payload = try_handler!(serde_json::to_string(&posts));
        Ok(Response::with((status::Ok, payload)))
    }
}

pub struct CreatePostHandler {
    store: Arc<Mutex<PostStore>>,
}

impl CreatePostHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> CreatePostHandler {
        CreatePostHandler { store }
    }
}

impl Handler for CreatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let body = try_handler!(read_body(req));
        let mut store = lock!(self.store);
        let post = try_handler!(create_post(&mut store, &body));
        let payload = try_handler!(serde_json::to_string(&post));
        Ok(Response::with((status::Created, payload)))
    }
}

pub struct UpdatePostHandler {
    store: Arc<Mutex<PostStore>>,
}

impl UpdatePostHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> UpdatePostHandler {
        UpdatePostHandler { store }
    }
}

impl Handler for UpdatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = try_handler!(path_param(req, "id").and_then(parse_post_id));
        let body = try_handler!(read_body(req));
        let mut store = lock!(self.store);
        let post = try_handler!(update_post(&mut store, id, &body));
        let payload = try_handler!(serde_json::to_string(&post));
        Ok(Response::with((status::Ok, payload)))
    }
}

pub struct DeletePostHandler {
    store: Arc<Mutex<PostStore>>,
}

impl DeletePostHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> DeletePostHandler {
        DeletePostHandler { store }
    }
}

impl Handler for DeletePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = try_handler!(path_param(req, "id").and_then(parse_post_id));
        let mut store = lock!(self.store);
        let message = try_handler!(delete_post(&mut store, id));
        let payload = try_handler!(serde_json::to_string(&Message { message: &message }));
        Ok(Response::with((status::Ok, payload)))
    }
}

pub struct SearchPostsHandler {
    store: Arc<Mutex<PostStore>>,
}

impl SearchPostsHandler {
    fn new(store: Arc<Mutex<PostStore>>) -> SearchPostsHandler {
        SearchPostsHandler { store }
    }
}

impl Handler for SearchPostsHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let params = query_params(req);
        let store = lock!(self.store);
        let posts = try_handler!(search_posts(&store, &params));
        let payload = try_handler!(serde_json::to_string(&posts));
        Ok(Response::with((status::Ok, payload)))
    }
}

/// Answers CORS preflight requests; the CORS middleware adds the headers.
pub struct PreflightHandler;

impl Handler for PreflightHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        Ok(Response::with(status::Ok))
    }
}

//! Request pipeline stages wrapped around the router.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use iron::headers::{AccessControlAllowMethods, AccessControlAllowOrigin, ContentType};
use iron::method::Method;
use iron::{AfterMiddleware, BeforeMiddleware, IronError, IronResult, Request, Response};
use log::warn;
use router::NoRoute;

use crate::error::{ApiError, ApiResult, Window};

/// Marks every response with a body and no chosen content type as JSON.
/// Router misses get a `{message}` body first.
pub struct JsonAfterMiddleware;

impl JsonAfterMiddleware {
    fn apply(res: &mut Response) {
        if res.body.is_some() && !res.headers.has::<ContentType>() {
            res.headers.set(ContentType::json());
        }
    }
}

impl AfterMiddleware for JsonAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        JsonAfterMiddleware::apply(&mut res);
        Ok(res)
    }

    fn catch(&self, _: &mut Request, mut err: IronError) -> IronResult<Response> {
        if err.error.is::<NoRoute>() {
            err.response = ApiError::RouteNotFound.response();
        }
        JsonAfterMiddleware::apply(&mut err.response);
        Err(err)
    }
}

/// Allow-all CORS headers, on success and error responses alike.
pub struct CorsAfterMiddleware;

impl CorsAfterMiddleware {
    fn apply(res: &mut Response) {
        res.headers.set(AccessControlAllowOrigin::Any);
        res.headers.set(AccessControlAllowMethods(vec![
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Options,
        ]));
        res.headers
            .set_raw("Access-Control-Allow-Headers", vec![b"Content-Type".to_vec()]);
    }
}

impl AfterMiddleware for CorsAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        CorsAfterMiddleware::apply(&mut res);
        Ok(res)
    }

    fn catch(&self, _: &mut Request, mut err: IronError) -> IronResult<Response> {
        CorsAfterMiddleware::apply(&mut err.response);
        Err(err)
    }
}

/// Fixed-window request limit per client address.
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    /// client -> (requests in window, window start)
    hits: Mutex<HashMap<IpAddr, (usize, DateTime<Utc>)>>,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> RateLimiter {
        RateLimiter {
            limit,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request from `client` at `now`.
    pub fn check(&self, client: IpAddr, now: DateTime<Utc>) -> ApiResult<()> {
        let mut hits = self
            .hits
            .lock()
            .map_err(|_| ApiError::Internal("rate limiter lock poisoned".to_string()))?;

        // Drop windows that ended so idle clients do not pile up.
        let window = self.window;
        hits.retain(|_, (_, start)| now - *start < window);

        let entry = hits.entry(client).or_insert((0, now));
        if entry.0 >= self.limit {
            return Err(ApiError::RateLimited {
                limit: self.limit,
                window: Window(self.window.num_seconds()),
            });
        }
        entry.0 += 1;
        Ok(())
    }
}

impl BeforeMiddleware for RateLimiter {
    fn before(&self, req: &mut Request) -> IronResult<()> {
        let client = req.remote_addr.ip();
        self.check(client, Utc::now()).map_err(|err| {
            warn!("{} from {}", err, client);
            IronError::from(err)
        })
    }
}

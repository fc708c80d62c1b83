/*!
 * 速率限制中间件
 *
 * 固定窗口计数：窗口从某个键的第一次请求开始，长度由预设决定，
 * 窗口内的后续请求不会延长窗口。
 *
 * ```rust,ignore
 * web::scope("/api/v1/invites")
 *     .wrap(RateLimit::join())  // 10次/分钟
 *     .route("/{invite_code}/join", web::post().to(join_activity))
 * ```
 *
 * 已认证请求按用户 ID 计数，否则按客户端 IP。超限返回 429 并带 `Retry-After`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::Expiry;
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

static RATE_LIMIT_CACHE: Lazy<Cache<String, Window>> = Lazy::new(build_window_cache);

/// 一个键当前窗口的计数
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    length: Duration,
    count: u32,
}

impl Window {
    fn remaining(&self, now: Instant) -> Duration {
        self.length.saturating_sub(now.saturating_duration_since(self.started))
    }

    fn is_open_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) < self.length
    }
}

/// 条目在所属窗口结束时过期
struct WindowExpiry;

impl Expiry<String, Window> for WindowExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Window,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(value.remaining(created_at))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Window,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.remaining(updated_at))
    }
}

fn build_window_cache() -> Cache<String, Window> {
    Cache::builder()
        .max_capacity(100_000)
        .expire_after(WindowExpiry)
        .build()
}

/// 计入一次请求
///
/// 未超限时返回窗口内剩余次数，超限时返回距离窗口结束的秒数。
async fn record_hit(
    cache: &Cache<String, Window>,
    key: String,
    max_requests: u32,
    window: Duration,
) -> Result<u32, u64> {
    let now = Instant::now();

    let current = cache
        .entry(key)
        .and_upsert_with(|existing| {
            let next = match existing.map(|entry| entry.into_value()) {
                Some(w) if w.is_open_at(now) => Window {
                    count: w.count.saturating_add(1),
                    ..w
                },
                _ => Window {
                    started: now,
                    length: window,
                    count: 1,
                },
            };
            std::future::ready(next)
        })
        .await
        .into_value();

    if current.count > max_requests {
        Err(current.remaining(Instant::now()).as_secs().max(1))
    } else {
        Ok(max_requests - current.count)
    }
}

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    // 区分不同端点的计数
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64, key_prefix: &'static str) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix,
        }
    }

    /// 邀请码加入：10次/分钟，防止枚举邀请码
    pub fn join() -> Self {
        Self::new(10, 60, "join")
    }

    /// 分组/定稿：30次/分钟
    pub fn allocation() -> Self {
        Self::new(30, 60, "allocation")
    }
}

/// 客户端 IP：连接信息优先，其次是反向代理设置的转发头
///
/// 直接暴露在不可信网络时转发头可被伪造。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);

    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());
    let real_ip = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok());

    let valid = [connection_ip.as_deref(), forwarded, real_ip]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|ip| is_valid_ip(ip))
        .map(str::to_string);

    valid
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

fn limit_key(req: &ServiceRequest, prefix: &str) -> String {
    let user_id = req.extensions().get::<User>().map(|user| user.id);
    match user_id {
        Some(id) => format!("{prefix}:user:{id}"),
        None => format!("{prefix}:ip:{}", extract_client_ip(req)),
    }
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please retry later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = limit_key(&req, limit.key_prefix);
            let window = Duration::from_secs(limit.window_secs);

            match record_hit(&RATE_LIMIT_CACHE, key.clone(), limit.max_requests, window).await {
                Ok(remaining) => {
                    let mut res = srv.call(req).await?.map_into_left_body();
                    res.headers_mut().insert(
                        HeaderName::from_static("x-ratelimit-remaining"),
                        HeaderValue::from(remaining),
                    );
                    Ok(res)
                }
                Err(retry_after) => {
                    warn!(
                        "Rate limit exceeded for {} ({} per {}s)",
                        key, limit.max_requests, limit.window_secs
                    );
                    Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let join = RateLimit::join();
        assert_eq!(join.max_requests, 10);
        assert_eq!(join.window_secs, 60);
        assert_eq!(join.key_prefix, "join");

        let allocation = RateLimit::allocation();
        assert_eq!(allocation.max_requests, 30);
        assert_eq!(allocation.key_prefix, "allocation");
    }

    #[test]
    fn test_ip_validation() {
        assert!(is_valid_ip("127.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
        assert!(!is_valid_ip("1.2.3.4; drop"));
    }

    #[tokio::test]
    async fn test_limit_within_window() {
        let cache = build_window_cache();
        let window = Duration::from_secs(60);

        for expected in [2, 1, 0] {
            assert_eq!(
                record_hit(&cache, "join:user:1".into(), 3, window).await,
                Ok(expected)
            );
        }
        let retry_after = record_hit(&cache, "join:user:1".into(), 3, window)
            .await
            .unwrap_err();
        assert!((1..=60).contains(&retry_after));

        // 其他键不受影响
        assert_eq!(
            record_hit(&cache, "join:user:2".into(), 3, window).await,
            Ok(2)
        );
    }

    #[tokio::test]
    async fn test_steady_caller_is_released_when_window_ends() {
        let cache = build_window_cache();
        let window = Duration::from_millis(300);
        let key = || "allocation:ip:10.0.0.1".to_string();

        assert!(record_hit(&cache, key(), 2, window).await.is_ok());
        assert!(record_hit(&cache, key(), 2, window).await.is_ok());
        assert!(record_hit(&cache, key(), 2, window).await.is_err());

        // 窗口内继续请求不会延长窗口
        std::thread::sleep(Duration::from_millis(150));
        assert!(record_hit(&cache, key(), 2, window).await.is_err());

        std::thread::sleep(Duration::from_millis(250));
        assert_eq!(record_hit(&cache, key(), 2, window).await, Ok(1));
    }
}

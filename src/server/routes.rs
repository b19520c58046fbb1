//! Request routing.
//!
//! | Route                      | Purpose                                   |
//! |----------------------------|-------------------------------------------|
//! | `POST /hooks/document`     | One lifecycle event from the CMS          |
//! | `POST /hooks/document/bulk`| A batch of events, flushed once           |
//! | `POST /links/resolve`      | Resolve a link descriptor for a locale    |
//! | `POST /refresh`            | Re-touch the refresh allow-list           |
//! | `GET /sitemap.xml`         | Cached site index                         |
//! | `GET /listings/<category>` | Cached listing, `?locale=` optional       |

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tiny_http::Method;

use super::response::Reply;
use crate::core::{DocumentCategory, Locale};
use crate::document::StoreError;
use crate::engine::{Engine, EngineError};
use crate::link::{Href, LinkDescriptor};
use crate::path::{PathOwner, ValidationError, validate};
use crate::ratelimit::RateLimiter;
use crate::refresh::RefreshError;
use crate::revalidate::{DispatchReport, HookPayload, RevalidationEvent};
use crate::utils::plural_s;
use crate::{debug, log};

/// The parts of a request the routes look at.
#[derive(Debug)]
pub struct Incoming<'a> {
    pub method: Method,
    /// Path plus query, as sent by the client.
    pub url: &'a str,
    pub authorization: Option<&'a str>,
    pub client: Option<IpAddr>,
    pub body: &'a [u8],
}

const LISTINGS: &str = "/listings/";

pub fn route(req: &Incoming<'_>, engine: &Engine, limiter: &dyn RateLimiter) -> Reply {
    let path = req.url.split_once('?').map_or(req.url, |(path, _)| path);
    match (&req.method, path) {
        (Method::Post, "/hooks/document") => document_hook(req.body, engine),
        (Method::Post, "/hooks/document/bulk") => bulk_hook(req.body, engine),
        (Method::Post, "/links/resolve") => resolve_link(req.body, engine),
        (Method::Post, "/refresh") => refresh(req, engine, limiter),
        (Method::Get | Method::Head, "/sitemap.xml") => sitemap(engine),
        (Method::Get | Method::Head, path) if path.starts_with(LISTINGS) => {
            listing(&path[LISTINGS.len()..], req.url, engine)
        }
        (_, path) if path.starts_with(LISTINGS) => Reply::method_not_allowed(),
        (
            _,
            "/hooks/document" | "/hooks/document/bulk" | "/links/resolve" | "/refresh"
            | "/sitemap.xml",
        ) => Reply::method_not_allowed(),
        _ => Reply::not_found(),
    }
}

fn document_hook(body: &[u8], engine: &Engine) -> Reply {
    let payload = match serde_json::from_slice(body) {
        Ok(value) => parse_payload(value),
        Err(e) => return Reply::error(400, &format!("invalid hook payload: {e}")),
    };
    let payload = match payload {
        Ok(payload) => payload,
        Err(reply) => return reply,
    };
    match engine.on_event(RevalidationEvent::from(payload)) {
        Ok(dispatched) => Reply::json(200, &dispatched),
        Err(e) => store_error(&e),
    }
}

/// Decode one payload, reporting malformed paths as rule violations rather
/// than as generic JSON errors.
fn parse_payload(value: Value) -> Result<HookPayload, Reply> {
    if let Some(e) = path_violation(&value) {
        return Err(Reply::rule_violation(&e.to_string(), e.rule()));
    }
    serde_json::from_value(value)
        .map_err(|e| Reply::error(400, &format!("invalid hook payload: {e}")))
}

fn path_violation(value: &Value) -> Option<ValidationError> {
    ["doc", "previous"]
        .into_iter()
        .filter_map(|key| value.get(key)?.get("canonicalPath")?.as_str())
        .find_map(|path| validate(path, PathOwner::Home).err())
}

#[derive(Serialize)]
struct BulkResponse {
    events: usize,
    report: DispatchReport,
}

fn bulk_hook(body: &[u8], engine: &Engine) -> Reply {
    let values: Vec<Value> = match serde_json::from_slice(body) {
        Ok(values) => values,
        Err(e) => return Reply::error(400, &format!("invalid hook batch: {e}")),
    };
    let payloads = match values.into_iter().map(parse_payload).collect::<Result<Vec<_>, _>>() {
        Ok(payloads) => payloads,
        Err(reply) => return reply,
    };

    let session = engine.begin_bulk();
    let events = payloads.len();
    for payload in payloads {
        if let Err(e) = engine.on_bulk_event(&session, payload.into()) {
            // Events recorded so far are persisted and still get flushed.
            let report = session.finish();
            debug!("serve"; "bulk aborted after {} invalidated", report.invalidated);
            return store_error(&e);
        }
    }
    let report = session.finish();
    if !report.is_clean() {
        let n = report.failed.len();
        log!("serve"; "bulk flush: {} invalidation{} failed", n, plural_s(n));
    }
    Reply::json(200, &BulkResponse { events, report })
}

#[derive(Deserialize)]
struct ResolveRequest {
    link: LinkDescriptor,
    /// Render locale, the default locale when absent.
    locale: Option<Locale>,
}

#[derive(Serialize)]
struct ResolveResponse<'a> {
    href: &'a Href,
    omitted: bool,
}

fn resolve_link(body: &[u8], engine: &Engine) -> Reply {
    let request: ResolveRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => return Reply::error(400, &format!("invalid resolve request: {e}")),
    };
    let locale = request
        .locale
        .unwrap_or_else(|| engine.site().locales.default_locale().clone());
    if let Err(reply) = check_locale(&locale, engine) {
        return reply;
    }

    match engine.resolve_href(&request.link, &locale) {
        Ok(href) => Reply::json(
            200,
            &ResolveResponse {
                omitted: href.is_omitted(),
                href: &href,
            },
        ),
        Err(EngineError::Store(e)) => store_error(&e),
        Err(EngineError::Cache(e)) => {
            log!("serve"; "resolve: {}", e);
            Reply::error(500, "failed to load singletons")
        }
    }
}

fn check_locale(locale: &Locale, engine: &Engine) -> Result<(), Reply> {
    if engine.site().locales.contains(locale) {
        return Ok(());
    }
    Err(Reply::rule_violation(
        &format!("locale `{locale}` is not supported"),
        "unsupported-locale",
    ))
}

fn listing(category: &str, url: &str, engine: &Engine) -> Reply {
    let Ok(category) = category.parse::<DocumentCategory>() else {
        return Reply::not_found();
    };
    let locale = match query_param(url, "locale").map(|code| Locale::parse(&code)) {
        Some(Ok(locale)) => locale,
        Some(Err(e)) => return Reply::rule_violation(&e.to_string(), "unsupported-locale"),
        None => engine.site().locales.default_locale().clone(),
    };
    if let Err(reply) = check_locale(&locale, engine) {
        return reply;
    }

    match engine.listing(category, &locale) {
        Ok(Some(docs)) => Reply::json(200, &docs),
        Ok(None) => Reply::error(404, &format!("`{category}` has no listing page")),
        Err(EngineError::Store(e)) => store_error(&e),
        Err(EngineError::Cache(e)) => {
            log!("serve"; "listing: {}", e);
            Reply::error(500, "failed to load listing")
        }
    }
}

fn store_error(e: &StoreError) -> Reply {
    match e {
        StoreError::Validation(v) => Reply::rule_violation(&e.to_string(), v.rule()),
        StoreError::HomeNotAtRoot(_) => Reply::rule_violation(&e.to_string(), "home-not-at-root"),
        StoreError::UnsupportedLocale(_) => {
            Reply::rule_violation(&e.to_string(), "unsupported-locale")
        }
        StoreError::LocalizedMismatch { .. } => {
            Reply::rule_violation(&e.to_string(), "localized-mismatch")
        }
        StoreError::PathConflict { .. }
        | StoreError::LocaleShadowing { .. }
        | StoreError::DuplicateSingleton { .. } => Reply::error(409, &e.to_string()),
        StoreError::Unavailable(_) => {
            log!("serve"; "{}", e);
            Reply::error(503, &e.to_string())
        }
    }
}

fn refresh(req: &Incoming<'_>, engine: &Engine, limiter: &dyn RateLimiter) -> Reply {
    let key = req
        .client
        .map_or_else(|| "unknown".to_string(), |ip| ip.to_string());
    if !limiter.check(&key) {
        debug!("refresh"; "rate limited {}", key);
        return Reply::error(429, "too many refresh requests");
    }

    let secret = presented_secret(req.authorization, req.url);
    match engine.refresh(secret.as_deref()) {
        Ok(report) => {
            log!("refresh"; "re-touched {} paths", report.count);
            Reply::json(200, &report)
        }
        Err(e @ RefreshError::Unauthorized) => Reply::error(401, &e.to_string()),
        Err(e @ RefreshError::Disabled) => Reply::error(403, &e.to_string()),
    }
}

/// Secret from `Authorization: Bearer <secret>`, else from `?secret=`.
fn presented_secret(authorization: Option<&str>, url: &str) -> Option<String> {
    if let Some(token) = authorization.and_then(|h| h.trim().strip_prefix("Bearer ")) {
        return Some(token.trim().to_string());
    }
    query_param(url, "secret")
}

/// Decoded value of one query parameter.
fn query_param(url: &str, key: &str) -> Option<String> {
    let parsed = url::Url::parse("http://localhost").ok()?.join(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn sitemap(engine: &Engine) -> Reply {
    match engine.sitemap() {
        Ok(xml) => Reply::xml(xml),
        Err(e) => {
            log!("serve"; "sitemap: {}", e);
            Reply::error(500, "failed to render sitemap")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::cache::{RecordingInvalidator, TagRegistry};
    use crate::core::CanonicalPath;
    use crate::document::testing::site;
    use crate::ratelimit::TtlRateLimiter;
    use crate::refresh::RefreshTrigger;

    fn engine() -> (Engine, Arc<RecordingInvalidator>) {
        let recorder = Arc::new(RecordingInvalidator::default());
        let engine = Engine::new(
            site(),
            TagRegistry::in_memory(),
            recorder.clone(),
            RefreshTrigger::new([CanonicalPath::parse("/blog").unwrap()], Some("s3cret")),
            "https://example.com",
        );
        (engine, recorder)
    }

    fn limiter() -> TtlRateLimiter {
        TtlRateLimiter::new(Duration::from_secs(60), 2)
    }

    fn post<'a>(url: &'a str, body: &'a [u8], authorization: Option<&'a str>) -> Incoming<'a> {
        Incoming {
            method: Method::Post,
            url,
            authorization,
            client: Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            body,
        }
    }

    const PUBLISH: &str = r#"{
        "op": "change",
        "doc": {
            "id": "p1", "locale": "en", "category": "post",
            "slug": "launch", "canonicalPath": "/blog/launch",
            "status": "published"
        }
    }"#;

    #[test]
    fn test_document_hook_publish() {
        let (engine, recorder) = engine();
        let reply = route(&post("/hooks/document", PUBLISH.as_bytes(), None), &engine, &limiter());
        assert_eq!(reply.status, 200);
        assert_eq!(reply.json_body()["document"]["id"], "p1");
        assert_eq!(recorder.paths(), vec!["/blog/launch", "/nl/blog/launch"]);
    }

    #[test]
    fn test_document_hook_rejects_invalid_path() {
        let (engine, recorder) = engine();
        let body = PUBLISH.replace("/blog/launch", "/blog//launch");
        let reply = route(&post("/hooks/document", body.as_bytes(), None), &engine, &limiter());
        assert_eq!(reply.status, 422);
        assert_eq!(reply.json_body()["rule"], "double-slash");
        assert!(recorder.paths().is_empty());
    }

    #[test]
    fn test_document_hook_reserved_root() {
        let (engine, _) = engine();
        let body = PUBLISH
            .replace("\"post\"", "\"page\"")
            .replace("/blog/launch", "/");
        let reply = route(&post("/hooks/document", body.as_bytes(), None), &engine, &limiter());
        assert_eq!(reply.status, 422);
        assert_eq!(reply.json_body()["rule"], "reserved-root");
    }

    #[test]
    fn test_document_hook_bad_json() {
        let (engine, _) = engine();
        let reply = route(&post("/hooks/document", b"{", None), &engine, &limiter());
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn test_bulk_hook_flushes_once() {
        let (engine, recorder) = engine();
        let one = PUBLISH.replace("\"op\"", "\"suppress\": true, \"op\"");
        let two = one.replace("p1", "p2").replace("launch", "second");
        let body = format!("[{one},{two}]");
        let request = post("/hooks/document/bulk", body.as_bytes(), None);
        let reply = route(&request, &engine, &limiter());

        assert_eq!(reply.status, 200);
        assert_eq!(reply.json_body()["events"], 2);
        let paths = recorder.paths();
        assert!(paths.contains(&"/blog/launch".to_string()));
        assert!(paths.contains(&"/nl/blog/second".to_string()));
    }

    #[test]
    fn test_resolve_link_route() {
        let (engine, _) = engine();
        let body = br#"{"link": {"type": "singleton", "kind": "contact"}, "locale": "nl"}"#;
        let reply = route(&post("/links/resolve", body, None), &engine, &limiter());
        assert_eq!(reply.status, 200);
        assert_eq!(reply.json_body()["href"], "/nl");
        assert_eq!(reply.json_body()["omitted"], false);

        let body = br#"{"link": {"type": "document", "category": "post", "target": "p9"}}"#;
        let reply = route(&post("/links/resolve", body, None), &engine, &limiter());
        assert_eq!(reply.json_body()["href"], "");
        assert_eq!(reply.json_body()["omitted"], true);

        let body = br#"{"link": {"type": "custom", "href": "/x"}, "locale": "de"}"#;
        let reply = route(&post("/links/resolve", body, None), &engine, &limiter());
        assert_eq!(reply.status, 422);
        assert_eq!(reply.json_body()["rule"], "unsupported-locale");
    }

    #[test]
    fn test_refresh_auth() {
        let (engine, _) = engine();
        let limiter = TtlRateLimiter::new(Duration::from_secs(60), 10);

        let reply = route(&post("/refresh", b"", None), &engine, &limiter);
        assert_eq!(reply.status, 401);

        let reply = route(&post("/refresh", b"", Some("Bearer wrong")), &engine, &limiter);
        assert_eq!(reply.status, 401);

        let reply = route(&post("/refresh", b"", Some("Bearer s3cret")), &engine, &limiter);
        assert_eq!(reply.status, 200);
        let body = reply.json_body();
        assert_eq!(body["count"], 4);
        assert_eq!(body["paths"][0], "/");

        let reply = route(&post("/refresh?secret=s3cret", b"", None), &engine, &limiter);
        assert_eq!(reply.status, 200);
    }

    #[test]
    fn test_refresh_rate_limited() {
        let (engine, _) = engine();
        let limiter = limiter();
        for _ in 0..2 {
            let reply = route(&post("/refresh", b"", Some("Bearer s3cret")), &engine, &limiter);
            assert_eq!(reply.status, 200);
        }
        let reply = route(&post("/refresh", b"", Some("Bearer s3cret")), &engine, &limiter);
        assert_eq!(reply.status, 429);
    }

    #[test]
    fn test_sitemap_route() {
        let (engine, _) = engine();
        route(&post("/hooks/document", PUBLISH.as_bytes(), None), &engine, &limiter());
        let reply = route(
            &Incoming {
                method: Method::Get,
                ..post("/sitemap.xml", b"", None)
            },
            &engine,
            &limiter(),
        );
        assert_eq!(reply.status, 200);
        let xml = String::from_utf8(reply.body).unwrap();
        assert!(xml.contains("<loc>https://example.com/blog/launch</loc>"));
    }

    #[test]
    fn test_listing_route() {
        let (engine, _) = engine();
        let get = |url: &str| {
            let req = Incoming {
                method: Method::Get,
                ..post(url, b"", None)
            };
            route(&req, &engine, &limiter())
        };

        let reply = route(&post("/hooks/document", PUBLISH.as_bytes(), None), &engine, &limiter());
        assert_eq!(reply.status, 200);

        let reply = get("/listings/post");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.json_body()[0]["canonicalPath"], "/blog/launch");

        let reply = get("/listings/post?locale=nl");
        assert_eq!(reply.json_body().as_array().unwrap().len(), 0);

        assert_eq!(get("/listings/page").status, 404);
        assert_eq!(get("/listings/article").status, 404);
        assert_eq!(get("/listings/post?locale=de").status, 422);
        assert_eq!(route(&post("/listings/post", b"", None), &engine, &limiter()).status, 405);
    }

    #[test]
    fn test_unknown_route_and_method() {
        let (engine, _) = engine();
        assert_eq!(route(&post("/nope", b"", None), &engine, &limiter()).status, 404);
        let get = Incoming {
            method: Method::Get,
            ..post("/refresh", b"", None)
        };
        assert_eq!(route(&get, &engine, &limiter()).status, 405);
    }

    #[test]
    fn test_presented_secret() {
        assert_eq!(presented_secret(Some("Bearer abc"), "/refresh").as_deref(), Some("abc"));
        assert_eq!(presented_secret(None, "/refresh?secret=a%20b").as_deref(), Some("a b"));
        assert_eq!(presented_secret(Some("Basic xyz"), "/refresh"), None);
    }
}

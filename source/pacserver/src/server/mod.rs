//! Query façade (C7): a Pingora service that answers PAC requests directly
//! out of the `request_filter` stage, never reaching `upstream_peer`.
//!
//! Grounded in `crate::core` for resolution and in the teacher's
//! `proxy/filters/builtin/simple_response.rs` for the direct-response
//! pattern: build a `ResponseHeader`, write body bytes, return `Ok(true)`.

pub mod request;
pub mod response;

use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use pingora::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};

use crate::core::prefix::Ipv4Prefix;
use crate::core::tree;
use crate::core::Cache;
use crate::logging::log_access;
use crate::server::request::{parse_ip_len_route, parse_ip_route, parse_root_route, ParsedQuery};
use crate::server::response::render;

pub struct QueryService {
    cache: Arc<Cache>,
}

impl QueryService {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }
}

fn has_debug_param(query: Option<&str>) -> bool {
    let Some(query) = query else { return false };
    query.split('&').any(|pair| pair == "debug" || pair.starts_with("debug="))
}

fn route_query(path: &str, peer: Ipv4Addr) -> ParsedQuery {
    let segments: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [] => parse_root_route(peer),
        [ip] => parse_ip_route(ip, peer),
        [ip, len] => parse_ip_len_route(ip, len, peer),
        _ => parse_root_route(peer),
    }
}

#[async_trait]
impl ProxyHttp for QueryService {
    type CTX = ();

    fn new_ctx(&self) -> Self::CTX {}

    async fn request_filter(&self, session: &mut Session, _ctx: &mut Self::CTX) -> Result<bool> {
        let uri = session.req_header().uri.clone();
        let peer = session
            .client_addr()
            .and_then(|addr| addr.as_inet())
            .map(|inet| match inet.ip() {
                std::net::IpAddr::V4(v4) => v4,
                std::net::IpAddr::V6(_) => Ipv4Addr::UNSPECIFIED,
            })
            .unwrap_or(Ipv4Addr::UNSPECIFIED);

        let query = route_query(uri.path(), peer);
        let debug = has_debug_param(uri.query());

        let (status, body, content_type) = match Ipv4Prefix::from_strings(&query.ip, &query.prefix_len.to_string()) {
            Err(e) => (http::StatusCode::BAD_REQUEST, e.to_string(), "text/plain"),
            Ok(parsed) => {
                let tree = self.cache.tree();
                let hit = tree::resolve(&tree, parsed.network_addr());
                let rendered = render(&query, &parsed, hit, debug);
                (http::StatusCode::OK, rendered.body, rendered.content_type)
            }
        };

        log_access(&peer.to_string(), uri.path(), status.as_u16());

        let mut response = ResponseHeader::build(status, Some(2))?;
        response.insert_header("Content-Type", content_type)?;
        response.insert_header("Content-Length", body.len().to_string())?;

        session.downstream_session.write_response_header(Box::new(response)).await?;
        session
            .downstream_session
            .write_response_body(Bytes::from(body), true)
            .await?;
        session.downstream_session.set_keepalive(None);

        Ok(true)
    }
}

//! Shared helpers for owt-server router tests

#![allow(dead_code)]

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{Request, Response, header};
use owt_auth::origin::StaticResolver;
use owt_auth::{DelimitedList, OriginGate, OriginPolicy, SigningKey, TokenIssuer, TokenValidator};
use owt_server::{AppState, ConnectInfoExtractor, build_router};
use serde_json::Value;

pub const KEY_MATERIAL: &str = "-----BEGIN OWT KEY-----\n\
b3d0LXJvdXRlci10ZXN0LWtleS1tYXRlcmlhbA==\n\
-----END OWT KEY-----\n";

pub const PEER: &str = "10.20.30.40:55000";
pub const PEER_HOST: &str = "web01.corp.example.com";

/// Engine state with issuers `svcA|svcB`, audience `appB`, 60 minute TTL
pub fn state() -> AppState {
    let key = Arc::new(SigningKey::from_material(KEY_MATERIAL).expect("key material"));
    let issuer = TokenIssuer::new(Arc::clone(&key)).with_ttl(Duration::from_secs(60 * 60));
    let validator = TokenValidator::new(
        key,
        DelimitedList::parse("svcA|svcB"),
        DelimitedList::parse("appB"),
    );
    AppState::new(issuer, validator)
}

/// Router whose gate resolves [`PEER`] to [`PEER_HOST`]
pub fn router(allow: &str, block: &str) -> Router {
    let peer: SocketAddr = PEER.parse().expect("peer address");
    let resolver = StaticResolver::new().with_entry(peer.ip(), PEER_HOST);
    let gate = OriginGate::new(
        OriginPolicy::new(DelimitedList::parse(allow), DelimitedList::parse(block))
            .with_app_id("owt-service"),
    )
    .with_resolver(Arc::new(resolver));

    build_router(state(), gate, ConnectInfoExtractor::default())
}

/// Request from [`PEER`] as the listener would deliver it
pub fn request(method: &str, uri: &str, agent: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::USER_AGENT, agent)
}

pub fn with_peer(mut req: Request<Body>) -> Request<Body> {
    let peer: SocketAddr = PEER.parse().expect("peer address");
    req.extensions_mut().insert(ConnectInfo(peer));
    req
}

pub fn peer_ip() -> IpAddr {
    PEER.parse::<SocketAddr>().expect("peer address").ip()
}

pub async fn body_bytes(res: Response<Body>) -> Vec<u8> {
    to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub async fn body_json(res: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(res).await).expect("JSON body")
}

//! Request context extraction: who is calling and with which session.

use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use homechart_app::access::RequestContext;
use homechart_domain::id::SessionToken;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "homechart_session";

/// Header carrying the session token for non-browser clients.
pub const SESSION_HEADER: &str = "x-session-token";

/// Peer address and session of the current request.
///
/// The peer address comes from [`ConnectInfo`]; when the server was not
/// started with connect info the caller is treated as `0.0.0.0`, which is
/// never trusted by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub remote_addr: IpAddr,
    pub session: Option<SessionToken>,
}

impl Caller {
    /// Combine with the raw `homeId` query parameter into a [`RequestContext`].
    #[must_use]
    pub fn into_context(self, home_id_param: Option<String>) -> RequestContext {
        RequestContext {
            remote_addr: self.remote_addr,
            home_id_param,
            session: self.session,
        }
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| {
                addr.ip()
            });

        Ok(Self {
            remote_addr,
            session: session_token(&parts.headers),
        })
    }
}

/// Session token from the [`SESSION_HEADER`] header, falling back to the
/// [`SESSION_COOKIE`] cookie when the header is absent or malformed.
/// Malformed tokens count as absent.
fn session_token(headers: &HeaderMap) -> Option<SessionToken> {
    header_token(headers).or_else(|| cookie_token(headers))
}

fn header_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get(SESSION_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn cookie_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, token)| token.parse().ok())
}

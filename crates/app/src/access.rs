//! Caller access: decides which home a request may read.
//!
//! Callers from a trusted address name the home themselves through the
//! `homeId` query parameter. Everyone else must present a session whose
//! server-side attributes bind it to a home.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use chrono::Duration;
use homechart_domain::error::{HomeChartError, UnauthorizedError, ValidationError};
use homechart_domain::id::{HomeId, SessionToken};

use crate::ports::SessionStore;

/// Everything the access check needs to know about one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Address of the peer that sent the request.
    pub remote_addr: IpAddr,
    /// Raw `homeId` query parameter, if any.
    pub home_id_param: Option<String>,
    /// Session presented by the caller, if any.
    pub session: Option<SessionToken>,
}

/// Allow-list of addresses that may name a home directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    trusted: Vec<IpAddr>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new([IpAddr::V4(Ipv4Addr::LOCALHOST), IpAddr::V6(Ipv6Addr::LOCALHOST)])
    }
}

impl AccessPolicy {
    /// Build a policy trusting exactly `trusted`.
    pub fn new(trusted: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            trusted: trusted.into_iter().map(|ip| ip.to_canonical()).collect(),
        }
    }

    /// Whether `addr` is on the allow-list. IPv4-mapped IPv6 addresses match
    /// their IPv4 form.
    #[must_use]
    pub fn is_trusted(&self, addr: IpAddr) -> bool {
        self.trusted.contains(&addr.to_canonical())
    }

    #[must_use]
    pub fn trusted(&self) -> &[IpAddr] {
        &self.trusted
    }
}

/// Resolves requests to homes using an [`AccessPolicy`] and a [`SessionStore`].
pub struct AccessService<S> {
    policy: AccessPolicy,
    sessions: S,
}

impl<S: SessionStore> AccessService<S> {
    pub fn new(policy: AccessPolicy, sessions: S) -> Self {
        Self { policy, sessions }
    }

    /// Find the home the request in `ctx` is allowed to read.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingHomeId`] / [`ValidationError::InvalidHomeId`]
    ///   when a trusted caller omits or garbles `homeId`.
    /// - [`UnauthorizedError`] when an untrusted caller has no live session.
    /// - A storage error from the session store.
    pub async fn resolve_home(&self, ctx: &RequestContext) -> Result<HomeId, HomeChartError> {
        if self.policy.is_trusted(ctx.remote_addr) {
            let raw = ctx
                .home_id_param
                .as_deref()
                .ok_or(ValidationError::MissingHomeId)?;
            let home_id: HomeId = raw.parse()?;
            tracing::debug!(%home_id, remote_addr = %ctx.remote_addr, "trusted caller selected home");
            return Ok(home_id);
        }

        let token = ctx.session.ok_or(UnauthorizedError::MissingSession)?;
        match self.sessions.home_for_session(token).await? {
            Some(home_id) => Ok(home_id),
            None => {
                tracing::debug!(remote_addr = %ctx.remote_addr, "rejected unknown session");
                Err(UnauthorizedError::UnknownSession.into())
            }
        }
    }

    /// Open a session bound to `home_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the session store.
    pub async fn open_session(
        &self,
        home_id: HomeId,
        ttl: Duration,
    ) -> Result<SessionToken, HomeChartError> {
        self.sessions.open_session(home_id, ttl).await
    }
}

use super::api::{CHINA_HOST, GLOBAL_HOST};
use crate::translate::{RegionVariant, SessionParams, TranslateError};
use futures::future::BoxFuture;
use futures::FutureExt;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const LOG_TARGET: &str = "translate::bing::session";
const FRONT_PAGE_PATH: &str = "/translator";
const DEFAULT_TTL: Duration = Duration::from_secs(600);

static IG_RE: OnceLock<Regex> = OnceLock::new();
static IID_RE: OnceLock<Regex> = OnceLock::new();
static HELPER_RE: OnceLock<Regex> = OnceLock::new();

fn ig_regex() -> &'static Regex {
    IG_RE.get_or_init(|| Regex::new(r#"IG:"([A-Za-z0-9]+)""#).expect("valid regex"))
}

fn iid_regex() -> &'static Regex {
    IID_RE.get_or_init(|| Regex::new(r#"data-iid="([^"]+)""#).expect("valid regex"))
}

fn helper_regex() -> &'static Regex {
    HELPER_RE.get_or_init(|| {
        Regex::new(r#"params_AbusePreventionHelper\s*=\s*\[(\d+),\s*"([^"]+)""#)
            .expect("valid regex")
    })
}

/// Supplies the signing values token-authenticated requests need.
/// Implementations may cache; callers must treat a stale token as an
/// ordinary backend failure on the request it signs.
pub trait SessionProvider: Send + Sync {
    fn session_params(
        &self,
        region: RegionVariant,
    ) -> BoxFuture<'_, Result<SessionParams, TranslateError>>;
}

/// How long fetched session params may be reused. The backend documents
/// no lifetime, so the policy is pluggable rather than hard-coded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
    /// Probe the front end on every call.
    None,
    /// Reuse params younger than the given age.
    Ttl(Duration),
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy::Ttl(DEFAULT_TTL)
    }
}

impl CachePolicy {
    fn allows_reuse(&self, fetched_at: Instant) -> bool {
        match self {
            CachePolicy::None => false,
            CachePolicy::Ttl(ttl) => fetched_at.elapsed() < *ttl,
        }
    }
}

struct CachedParams {
    fetched_at: Instant,
    params: SessionParams,
}

/// Scrapes token, key, and the two correlation identifiers out of the
/// backend's translator front page.
pub struct HttpSessionProvider {
    client: Client,
    policy: CachePolicy,
    global_base: String,
    china_base: String,
    cached: [Mutex<Option<CachedParams>>; 2],
}

impl HttpSessionProvider {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            client: Client::new(),
            policy,
            global_base: GLOBAL_HOST.to_owned(),
            china_base: CHINA_HOST.to_owned(),
            cached: [Mutex::new(None), Mutex::new(None)],
        }
    }

    pub fn with_base_urls(mut self, global: String, china: String) -> Self {
        self.global_base = global;
        self.china_base = china;
        self
    }

    fn slot(&self, region: RegionVariant) -> &Mutex<Option<CachedParams>> {
        match region {
            RegionVariant::Global => &self.cached[0],
            RegionVariant::China => &self.cached[1],
        }
    }

    async fn fetch(&self, region: RegionVariant) -> Result<SessionParams, TranslateError> {
        let base = match region {
            RegionVariant::Global => &self.global_base,
            RegionVariant::China => &self.china_base,
        };
        let url = format!("{base}{FRONT_PAGE_PATH}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TranslateError::AuthFailed(format!("front page fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TranslateError::AuthFailed(format!(
                "front page returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::AuthFailed(format!("front page body unreadable: {e}")))?;

        parse_session_params(&body)
            .ok_or_else(|| TranslateError::AuthFailed("session markers not found".to_owned()))
    }
}

pub(crate) fn parse_session_params(body: &str) -> Option<SessionParams> {
    let ig = ig_regex().captures(body)?.get(1)?.as_str().to_owned();
    let iid = iid_regex().captures(body)?.get(1)?.as_str().to_owned();
    let helper = helper_regex().captures(body)?;
    let key = helper.get(1)?.as_str().parse().ok()?;
    let token = helper.get(2)?.as_str().to_owned();
    Some(SessionParams {
        token,
        key,
        ig,
        iid,
    })
}

impl SessionProvider for HttpSessionProvider {
    fn session_params(
        &self,
        region: RegionVariant,
    ) -> BoxFuture<'_, Result<SessionParams, TranslateError>> {
        async move {
            // Lock held across the fetch so concurrent calls do not probe
            // the front page in parallel for the same region.
            let mut slot = self.slot(region).lock().await;
            if let Some(cached) = slot.as_ref() {
                if self.policy.allows_reuse(cached.fetched_at) {
                    return Ok(cached.params.clone());
                }
            }

            let params = self.fetch(region).await?;
            tracing::debug!(target: LOG_TARGET, ?region, "fetched fresh session params");
            if !matches!(self.policy, CachePolicy::None) {
                *slot = Some(CachedParams {
                    fetched_at: Instant::now(),
                    params: params.clone(),
                });
            }
            Ok(params)
        }
        .boxed()
    }
}

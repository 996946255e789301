//! Multi-backend translation aggregation.
//!
//! The [`TranslateHub`] is the single entry point: it maps a stable source
//! identifier (`bing.com`, `google.cn`, ...) to a backend client, stamps
//! the region variant the identifier implies onto the request, and returns
//! a uniform [`TranslateResult`] or [`TranslateError`]. Backend clients
//! own their language-code vocabulary; the hub never rewrites codes.

pub mod bing;
mod hub;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

pub use bing::{BingTranslator, CachePolicy, HttpSessionProvider, SessionProvider};
pub use hub::{
    TranslateHub, TranslateHubBuilder, BING_CN, BING_COM, GOOGLE_CN, GOOGLE_COM, MOJIDICT_COM,
};

/// Network entry point variant for backends that serve a separate
/// mainland-China host.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegionVariant {
    #[default]
    Global,
    China,
}

/// A single translation request. `from`/`to` left as `None` mean
/// "auto-detect" and "use the preferred language" respectively. `text` is
/// expected to be trimmed and non-empty by the caller.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslateRequest {
    pub text: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub preferred_language: Option<String>,
    pub second_preferred_language: Option<String>,
    pub region: RegionVariant,
    /// Caller locale hint, forwarded to backends unmodified.
    pub user_lang: Option<String>,
}

/// Normalized translation outcome. `dict` and `example` are independently
/// optional single-word extras; their absence is not an error.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslateResult {
    pub text: String,
    pub from: String,
    pub to: String,
    /// Non-empty, primary translation first.
    pub translations: Vec<String>,
    pub dict: Option<Vec<String>>,
    pub example: Option<Vec<String>>,
}

/// Short-lived request-signing values scraped from a token-authenticated
/// backend's web front end. Valid for roughly one request/response round
/// trip; staleness surfaces as an ordinary backend failure on use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionParams {
    pub token: String,
    pub key: u64,
    /// Correlation group identifier (`IG`).
    pub ig: String,
    /// Correlation instance identifier (`IID`).
    pub iid: String,
}

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("unknown translate source: {0}")]
    SourceNotFound(String),

    #[error("language not supported: {0}")]
    LanguageNotSupported(String),

    #[error("session params acquisition failed: {0}")]
    AuthFailed(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Parse(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// A translation backend. `audio` has a refusing default body because not
/// every backend can speak; the hub consults its capability table before
/// calling it.
pub trait Translator: Send + Sync {
    fn translate(
        &self,
        request: TranslateRequest,
    ) -> BoxFuture<'_, Result<TranslateResult, TranslateError>>;

    fn audio(&self, request: TranslateRequest) -> BoxFuture<'_, Result<String, TranslateError>> {
        let _ = request;
        async { Err(TranslateError::Backend("audio not supported".to_owned())) }.boxed()
    }
}

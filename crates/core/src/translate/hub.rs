use crate::translate::bing::BingTranslator;
use crate::translate::{
    RegionVariant, TranslateError, TranslateRequest, TranslateResult, Translator,
};
use std::collections::HashMap;
use std::sync::Arc;

pub const GOOGLE_COM: &str = "google.com";
pub const GOOGLE_CN: &str = "google.cn";
pub const BING_COM: &str = "bing.com";
pub const BING_CN: &str = "bing.cn";
pub const MOJIDICT_COM: &str = "mojidict.com";

const LOG_TARGET: &str = "translate::hub";

struct SourceEntry {
    client: Arc<dyn Translator>,
    region: RegionVariant,
    audio_capable: bool,
}

/// Registry of translation sources keyed by their stable identifier.
///
/// [`TranslateHub::with_defaults`] wires the built-in token backend under
/// `bing.com`/`bing.cn`. Other providers (the google pair, mojidict) ship
/// as separate client libraries and are registered by the embedder via
/// [`TranslateHubBuilder::source`].
pub struct TranslateHub {
    sources: HashMap<String, SourceEntry>,
    user_lang: Option<String>,
}

impl TranslateHub {
    pub fn builder() -> TranslateHubBuilder {
        TranslateHubBuilder::default()
    }

    pub fn with_defaults() -> Self {
        Self::builder().default_sources().build()
    }

    /// Translate via the named source. Unknown identifiers fail with
    /// [`TranslateError::SourceNotFound`] before any network access.
    pub async fn translate(
        &self,
        source: &str,
        request: TranslateRequest,
    ) -> Result<TranslateResult, TranslateError> {
        let entry = self
            .sources
            .get(source)
            .ok_or_else(|| TranslateError::SourceNotFound(source.to_owned()))?;
        entry.client.translate(self.adapt(entry, request)).await
    }

    /// Fetch a pronunciation audio URI. Sources without audio support are
    /// silently replaced by `default_source`. Failures are logged and
    /// yield `None` rather than an error; unlike `translate`, the audio
    /// path never surfaces a structured failure.
    pub async fn audio(
        &self,
        source: &str,
        request: TranslateRequest,
        default_source: &str,
    ) -> Option<String> {
        let audio_capable = |id: &str| {
            self.sources
                .get(id)
                .map(|entry| entry.audio_capable)
                .unwrap_or(false)
        };
        let id = if audio_capable(source) {
            source
        } else {
            default_source
        };

        let entry = match self.sources.get(id) {
            Some(entry) => entry,
            None => {
                tracing::error!(target: LOG_TARGET, source = id, "audio source not registered");
                return None;
            }
        };

        match entry.client.audio(self.adapt(entry, request)).await {
            Ok(uri) => Some(uri),
            Err(err) => {
                tracing::error!(target: LOG_TARGET, source = id, "audio request failed: {err}");
                None
            }
        }
    }

    pub fn has_source(&self, source: &str) -> bool {
        self.sources.contains_key(source)
    }

    fn adapt(&self, entry: &SourceEntry, mut request: TranslateRequest) -> TranslateRequest {
        request.region = entry.region;
        if request.user_lang.is_none() {
            request.user_lang = self.user_lang.clone();
        }
        request
    }
}

#[derive(Default)]
pub struct TranslateHubBuilder {
    sources: HashMap<String, SourceEntry>,
    user_lang: Option<String>,
}

impl TranslateHubBuilder {
    pub fn source(
        mut self,
        id: &str,
        client: Arc<dyn Translator>,
        region: RegionVariant,
        audio_capable: bool,
    ) -> Self {
        self.sources.insert(
            id.to_owned(),
            SourceEntry {
                client,
                region,
                audio_capable,
            },
        );
        self
    }

    /// Register the built-in token backend under `bing.com`/`bing.cn`.
    pub fn default_sources(self) -> Self {
        let bing = Arc::new(BingTranslator::new());
        self.source(BING_COM, bing.clone(), RegionVariant::Global, true)
            .source(BING_CN, bing, RegionVariant::China, true)
    }

    pub fn user_lang(mut self, lang: Option<String>) -> Self {
        self.user_lang = lang;
        self
    }

    pub fn build(self) -> TranslateHub {
        TranslateHub {
            sources: self.sources,
            user_lang: self.user_lang,
        }
    }
}

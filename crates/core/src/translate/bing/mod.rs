//! Token-authenticated translation backend.
//!
//! Every call walks the same sequence: resolve working languages, fetch
//! session params, run the primary request, optionally renegotiate once
//! when auto-detection collides with the computed target, then attach
//! single-word dictionary/example extras without ever risking the primary
//! result.

mod api;
mod enrich;
mod lang;
mod session;

pub use api::{BingApi, DictEntry, ExampleEntry, HttpBingApi, LookupQuery, TranslationPayload};
pub use session::{CachePolicy, HttpSessionProvider, SessionProvider};

use crate::translate::{TranslateError, TranslateRequest, TranslateResult, Translator};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::BoxFuture;
use futures::FutureExt;
use lang::AUTO_DETECT;
use std::sync::Arc;

const DEFAULT_PREFERRED: &str = "en";
/// Dictionary/example endpoints only return data for single words paired
/// with this language.
const RICH_LOOKUP_LANG: &str = "en";

pub struct BingTranslator<A: BingApi = HttpBingApi> {
    api: A,
    sessions: Arc<dyn SessionProvider>,
}

impl BingTranslator<HttpBingApi> {
    pub fn new() -> Self {
        Self {
            api: HttpBingApi::new(),
            sessions: Arc::new(HttpSessionProvider::new(CachePolicy::default())),
        }
    }
}

impl Default for BingTranslator<HttpBingApi> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: BingApi> BingTranslator<A> {
    pub fn with_parts(api: A, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { api, sessions }
    }

    async fn run_translate(
        &self,
        request: TranslateRequest,
    ) -> Result<TranslateResult, TranslateError> {
        let preferred = request
            .preferred_language
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFERRED.to_owned());
        let second = request
            .second_preferred_language
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFERRED.to_owned());

        // The renegotiation rule depends on whether the caller pinned the
        // languages, so the original values are kept apart from the
        // working pair below.
        let origin_from = request.from.clone().filter(|s| !s.is_empty());
        let origin_to = request.to.clone().filter(|s| !s.is_empty());

        let from = origin_from.clone().unwrap_or_else(|| AUTO_DETECT.to_owned());
        let to = origin_to.clone().unwrap_or_else(|| {
            if from == preferred {
                second.clone()
            } else {
                preferred.clone()
            }
        });

        let from_code = if from == AUTO_DETECT {
            AUTO_DETECT.to_owned()
        } else {
            lang::to_backend_code(&from)?.to_owned()
        };
        let to_code = lang::to_backend_code(&to)?.to_owned();

        let session = self.sessions.session_params(request.region).await?;

        let mut query = LookupQuery {
            region: request.region,
            session,
            text: request.text.clone(),
            from: from_code,
            to: to_code,
        };
        let mut payload = self.api.translate_text(query.clone()).await?;

        // Without an explicit target the working `to` is the preferred
        // language; when the text already is in it, translating into
        // itself is useless, so fall back to the second preference. At
        // most once per call.
        if origin_from.is_none()
            && origin_to.is_none()
            && payload.detected_language == query.to
            && preferred != second
        {
            query.from = payload.detected_language.clone();
            query.to = lang::to_backend_code(&second)?.to_owned();
            payload = self.api.translate_text(query.clone()).await?;
        }

        let detected = payload.detected_language;
        let translation = payload.text;
        let from_canonical = lang::to_canonical_code(&detected);
        let to_canonical = lang::to_canonical_code(&query.to);

        let mut dict = None;
        let mut example = None;
        if is_lookup_eligible(&request.text, &from_canonical, &to_canonical) {
            let lookup = LookupQuery {
                from: detected,
                ..query
            };
            let extras = enrich::fetch_enrichment(&self.api, lookup, translation.clone()).await;
            dict = extras.dict;
            example = extras.example;
        }

        Ok(TranslateResult {
            text: request.text,
            from: from_canonical,
            to: to_canonical,
            translations: vec![translation],
            dict,
            example,
        })
    }

    async fn run_audio(&self, request: TranslateRequest) -> Result<String, TranslateError> {
        let from = request
            .from
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                TranslateError::Backend("audio requires a concrete source language".to_owned())
            })?;
        let code = lang::to_backend_code(&from)?;

        let session = self.sessions.session_params(request.region).await?;
        let ssml = build_ssml(code, &request.text);
        let bytes = self.api.synthesize(request.region, session, ssml).await?;

        Ok(format!("data:audio/mpeg;base64,{}", BASE64.encode(bytes)))
    }
}

impl<A: BingApi> Translator for BingTranslator<A> {
    fn translate(
        &self,
        request: TranslateRequest,
    ) -> BoxFuture<'_, Result<TranslateResult, TranslateError>> {
        self.run_translate(request).boxed()
    }

    fn audio(&self, request: TranslateRequest) -> BoxFuture<'_, Result<String, TranslateError>> {
        self.run_audio(request).boxed()
    }
}

fn is_lookup_eligible(text: &str, from: &str, to: &str) -> bool {
    !text.contains(char::is_whitespace) && (from == RICH_LOOKUP_LANG || to == RICH_LOOKUP_LANG)
}

fn voice_for(backend_code: &str) -> (&'static str, &'static str) {
    match backend_code {
        "de" => ("de-DE", "de-DE-KatjaNeural"),
        "es" => ("es-ES", "es-ES-ElviraNeural"),
        "fr" => ("fr-FR", "fr-FR-DeniseNeural"),
        "ja" => ("ja-JP", "ja-JP-NanamiNeural"),
        "ko" => ("ko-KR", "ko-KR-SunHiNeural"),
        "pt" => ("pt-PT", "pt-PT-RaquelNeural"),
        "ru" => ("ru-RU", "ru-RU-SvetlanaNeural"),
        "zh-Hans" => ("zh-CN", "zh-CN-XiaoxiaoNeural"),
        "zh-Hant" => ("zh-TW", "zh-TW-HsiaoChenNeural"),
        _ => ("en-US", "en-US-JennyNeural"),
    }
}

fn build_ssml(backend_code: &str, text: &str) -> String {
    let (locale, voice) = voice_for(backend_code);
    format!(
        "<speak version='1.0' xml:lang='{locale}'>\
         <voice xml:lang='{locale}' xml:gender='Female' name='{voice}'>{}</voice>\
         </speak>",
        xml_escape(text)
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

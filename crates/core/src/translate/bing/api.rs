use crate::translate::{RegionVariant, SessionParams, TranslateError};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub(crate) const GLOBAL_HOST: &str = "https://www.bing.com";
pub(crate) const CHINA_HOST: &str = "https://cn.bing.com";

const TRANSLATE_PATH: &str = "/ttranslatev3";
const DICTIONARY_PATH: &str = "/tlookupv3";
const EXAMPLE_PATH: &str = "/texamplev3";
const TTS_PATH: &str = "/tfettts";

/// Inputs shared by every endpoint of one call: region, the session
/// params fetched once for the call, and the working language pair in
/// backend spelling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupQuery {
    pub region: RegionVariant,
    pub session: SessionParams,
    pub text: String,
    pub from: String,
    pub to: String,
}

/// Detected language and top translation of one translate round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationPayload {
    pub detected_language: String,
    pub text: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DictEntry {
    #[serde(rename = "posTag")]
    pub pos_tag: String,
    #[serde(rename = "normalizedTarget")]
    pub normalized_target: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ExampleEntry {
    #[serde(rename = "sourcePrefix")]
    pub source_prefix: String,
    #[serde(rename = "sourceTerm")]
    pub source_term: String,
    #[serde(rename = "sourceSuffix")]
    pub source_suffix: String,
}

#[derive(Deserialize)]
struct RawTranslateItem {
    #[serde(rename = "detectedLanguage")]
    detected_language: RawDetectedLanguage,
    translations: Vec<RawTranslation>,
}

#[derive(Deserialize)]
struct RawDetectedLanguage {
    language: String,
}

#[derive(Deserialize)]
struct RawTranslation {
    text: String,
}

#[derive(Deserialize)]
struct RawLookupItem {
    #[serde(default)]
    translations: Vec<DictEntry>,
}

#[derive(Deserialize)]
struct RawExampleItem {
    #[serde(default)]
    examples: Vec<ExampleEntry>,
}

/// One method per backend endpoint. The translate flow is written against
/// this seam so its renegotiation and enrichment logic is testable with
/// scripted responses.
pub trait BingApi: Send + Sync {
    fn translate_text(
        &self,
        query: LookupQuery,
    ) -> BoxFuture<'_, Result<TranslationPayload, TranslateError>>;

    fn dictionary(&self, query: LookupQuery)
        -> BoxFuture<'_, Result<Vec<DictEntry>, TranslateError>>;

    fn examples(
        &self,
        query: LookupQuery,
        translation: String,
    ) -> BoxFuture<'_, Result<Vec<ExampleEntry>, TranslateError>>;

    fn synthesize(
        &self,
        region: RegionVariant,
        session: SessionParams,
        ssml: String,
    ) -> BoxFuture<'_, Result<Vec<u8>, TranslateError>>;
}

#[derive(Clone)]
pub struct HttpBingApi {
    client: Client,
    global_base: String,
    china_base: String,
}

impl HttpBingApi {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            global_base: GLOBAL_HOST.to_owned(),
            china_base: CHINA_HOST.to_owned(),
        }
    }

    pub fn with_base_urls(mut self, global: String, china: String) -> Self {
        self.global_base = global;
        self.china_base = china;
        self
    }

    fn base(&self, region: RegionVariant) -> &str {
        match region {
            RegionVariant::Global => &self.global_base,
            RegionVariant::China => &self.china_base,
        }
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        url: String,
        session: &SessionParams,
        fields: &[(&str, &str)],
    ) -> Result<T, TranslateError> {
        let response = self
            .client
            .post(&url)
            .query(&[
                ("isVertical", "1"),
                ("IG", session.ig.as_str()),
                ("IID", session.iid.as_str()),
            ])
            .form(fields)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Backend(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(format!("invalid response body: {e}")))
    }
}

impl Default for HttpBingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl BingApi for HttpBingApi {
    fn translate_text(
        &self,
        query: LookupQuery,
    ) -> BoxFuture<'_, Result<TranslationPayload, TranslateError>> {
        let this = self.clone();
        async move {
            let url = format!("{}{}", this.base(query.region), TRANSLATE_PATH);
            let key = query.session.key.to_string();
            // The translate endpoint names the source field `fromLang`;
            // the lookup endpoints use plain `from`.
            let items: Vec<RawTranslateItem> = this
                .post_form(
                    url,
                    &query.session,
                    &[
                        ("fromLang", query.from.as_str()),
                        ("text", query.text.as_str()),
                        ("to", query.to.as_str()),
                        ("token", query.session.token.as_str()),
                        ("key", key.as_str()),
                    ],
                )
                .await?;

            let first = items
                .into_iter()
                .next()
                .ok_or_else(|| TranslateError::Parse("empty translate response".to_owned()))?;
            let translation = first
                .translations
                .into_iter()
                .next()
                .ok_or_else(|| TranslateError::Parse("no translations in response".to_owned()))?;

            Ok(TranslationPayload {
                detected_language: first.detected_language.language,
                text: translation.text,
            })
        }
        .boxed()
    }

    fn dictionary(
        &self,
        query: LookupQuery,
    ) -> BoxFuture<'_, Result<Vec<DictEntry>, TranslateError>> {
        let this = self.clone();
        async move {
            let url = format!("{}{}", this.base(query.region), DICTIONARY_PATH);
            let key = query.session.key.to_string();
            let items: Vec<RawLookupItem> = this
                .post_form(
                    url,
                    &query.session,
                    &[
                        ("from", query.from.as_str()),
                        ("text", query.text.as_str()),
                        ("to", query.to.as_str()),
                        ("token", query.session.token.as_str()),
                        ("key", key.as_str()),
                    ],
                )
                .await?;

            Ok(items
                .into_iter()
                .next()
                .map(|item| item.translations)
                .unwrap_or_default())
        }
        .boxed()
    }

    fn examples(
        &self,
        query: LookupQuery,
        translation: String,
    ) -> BoxFuture<'_, Result<Vec<ExampleEntry>, TranslateError>> {
        let this = self.clone();
        async move {
            let url = format!("{}{}", this.base(query.region), EXAMPLE_PATH);
            let key = query.session.key.to_string();
            let items: Vec<RawExampleItem> = this
                .post_form(
                    url,
                    &query.session,
                    &[
                        ("from", query.from.as_str()),
                        ("text", query.text.as_str()),
                        ("to", query.to.as_str()),
                        ("token", query.session.token.as_str()),
                        ("key", key.as_str()),
                        ("translation", translation.as_str()),
                    ],
                )
                .await?;

            Ok(items
                .into_iter()
                .next()
                .map(|item| item.examples)
                .unwrap_or_default())
        }
        .boxed()
    }

    fn synthesize(
        &self,
        region: RegionVariant,
        session: SessionParams,
        ssml: String,
    ) -> BoxFuture<'_, Result<Vec<u8>, TranslateError>> {
        let this = self.clone();
        async move {
            let url = format!("{}{}", this.base(region), TTS_PATH);
            let key = session.key.to_string();
            let response = this
                .client
                .post(&url)
                .query(&[
                    ("isVertical", "1"),
                    ("IG", session.ig.as_str()),
                    ("IID", session.iid.as_str()),
                ])
                .form(&[
                    ("ssml", ssml.as_str()),
                    ("token", session.token.as_str()),
                    ("key", key.as_str()),
                ])
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(TranslateError::Backend(format!("HTTP {status}: {body}")));
            }

            Ok(response.bytes().await?.to_vec())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_response_shape_parses() {
        let body = r#"[{
            "detectedLanguage": {"language": "en", "score": 1.0},
            "translations": [{"text": "bonjour", "to": "fr"}]
        }]"#;
        let items: Vec<RawTranslateItem> = serde_json::from_str(body).unwrap();
        assert_eq!(items[0].detected_language.language, "en");
        assert_eq!(items[0].translations[0].text, "bonjour");
    }

    #[test]
    fn lookup_response_shape_parses() {
        let body = r#"[{
            "normalizedSource": "run",
            "translations": [
                {"posTag": "VERB", "normalizedTarget": "courir", "displayTarget": "courir"}
            ]
        }]"#;
        let items: Vec<RawLookupItem> = serde_json::from_str(body).unwrap();
        assert_eq!(items[0].translations[0].pos_tag, "VERB");
        assert_eq!(items[0].translations[0].normalized_target, "courir");
    }

    #[test]
    fn example_response_shape_parses_and_tolerates_missing_examples() {
        let body = r#"[{
            "examples": [
                {"sourcePrefix": "I like to ", "sourceTerm": "run", "sourceSuffix": "."}
            ]
        }]"#;
        let items: Vec<RawExampleItem> = serde_json::from_str(body).unwrap();
        assert_eq!(items[0].examples[0].source_term, "run");

        let items: Vec<RawExampleItem> = serde_json::from_str(r#"[{}]"#).unwrap();
        assert!(items[0].examples.is_empty());
    }
}

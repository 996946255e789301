use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFERRED_LANGUAGE: &str = "en";
pub const DEFAULT_SOURCE: &str = "bing.com";
pub const ENV_PREFERRED_LANGUAGE: &str = "LINGOHUB_PREFERRED_LANG";
pub const ENV_SECOND_PREFERRED_LANGUAGE: &str = "LINGOHUB_SECOND_PREFERRED_LANG";
pub const ENV_SOURCE: &str = "LINGOHUB_SOURCE";

/// Fallback target languages used when a request carries no explicit `to`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    pub preferred_language: String,
    pub second_preferred_language: String,
}

impl Preferences {
    pub fn new<S: Into<String>>(preferred: S, second: S) -> Result<Self, ConfigError> {
        let preferred = preferred.into();
        let second = second.into();
        if preferred.trim().is_empty() || second.trim().is_empty() {
            return Err(ConfigError::EmptyLanguage);
        }
        Ok(Self {
            preferred_language: preferred,
            second_preferred_language: second,
        })
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            preferred_language: DEFAULT_PREFERRED_LANGUAGE.to_owned(),
            second_preferred_language: DEFAULT_PREFERRED_LANGUAGE.to_owned(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("preference language must not be empty")]
    EmptyLanguage,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_optional_string(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Option<String> {
    match cli_value {
        Some(v) => Some(v),
        None => env.var(env_key),
    }
}

/// Best-effort locale hint from the `LANG` environment variable,
/// e.g. `en_US.UTF-8` becomes `en-US`. Backends receive it as telemetry
/// only, so `None` is always acceptable.
pub fn system_user_lang(env: &impl Env) -> Option<String> {
    let raw = env.var("LANG")?;
    let locale = raw.split('.').next().unwrap_or(&raw);
    if locale.is_empty() || locale == "C" || locale == "POSIX" {
        return None;
    }
    Some(locale.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_reject_empty_language() {
        assert_eq!(Preferences::new("en", " "), Err(ConfigError::EmptyLanguage));
        assert_eq!(Preferences::new("", "ja"), Err(ConfigError::EmptyLanguage));
    }

    #[test]
    fn preferences_default_to_english() {
        let prefs = Preferences::default();
        assert_eq!(prefs.preferred_language, "en");
        assert_eq!(prefs.second_preferred_language, "en");
    }

    #[test]
    fn resolve_string_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_SOURCE, "bing.cn");
        let v = resolve_string_with_default(
            Some("google.com".to_owned()),
            ENV_SOURCE,
            &env,
            DEFAULT_SOURCE,
        );
        assert_eq!(v, "google.com");
    }

    #[test]
    fn resolve_string_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_SOURCE, "bing.cn");
        let v = resolve_string_with_default(None, ENV_SOURCE, &env, DEFAULT_SOURCE);
        assert_eq!(v, "bing.cn");
    }

    #[test]
    fn resolve_string_default_used_when_both_missing() {
        let env = MapEnv::default();
        let v = resolve_string_with_default(None, ENV_SOURCE, &env, DEFAULT_SOURCE);
        assert_eq!(v, "bing.com");
    }

    #[test]
    fn resolve_optional_string_prefers_cli() {
        let env = MapEnv::default().with_var(ENV_PREFERRED_LANGUAGE, "de");
        let v = resolve_optional_string(Some("fr".to_owned()), ENV_PREFERRED_LANGUAGE, &env);
        assert_eq!(v.as_deref(), Some("fr"));
    }

    #[test]
    fn system_user_lang_normalizes_posix_locale() {
        let env = MapEnv::default().with_var("LANG", "en_US.UTF-8");
        assert_eq!(system_user_lang(&env).as_deref(), Some("en-US"));
    }

    #[test]
    fn system_user_lang_ignores_c_locale() {
        let env = MapEnv::default().with_var("LANG", "C");
        assert_eq!(system_user_lang(&env), None);
    }
}

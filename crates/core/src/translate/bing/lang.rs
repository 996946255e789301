use crate::translate::TranslateError;

/// Sentinel the backend understands as "detect the source language".
pub const AUTO_DETECT: &str = "auto-detect";

/// Canonical codes the backend accepts. Most map to themselves on the
/// wire; the Chinese variants are respelled (see [`to_backend_code`]).
const SUPPORTED: &[&str] = &[
    "af", "ar", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "es", "et", "fa",
    "fi", "fr", "ga", "he", "hi", "hr", "ht", "hu", "id", "is", "it", "ja", "ko", "lt", "lv",
    "ms", "mt", "nb", "nl", "pl", "ps", "pt", "ro", "ru", "sk", "sl", "sr", "sv", "sw", "ta",
    "te", "th", "tr", "uk", "ur", "vi", "zh-CN", "zh-TW",
];

/// Map a canonical code to this backend's spelling. Codes outside the
/// supported set are rejected here, before any network call.
pub fn to_backend_code(code: &str) -> Result<&'static str, TranslateError> {
    match code {
        "zh-CN" => Ok("zh-Hans"),
        "zh-TW" => Ok("zh-Hant"),
        _ => SUPPORTED
            .iter()
            .find(|candidate| **candidate == code)
            .copied()
            .ok_or_else(|| TranslateError::LanguageNotSupported(code.to_owned())),
    }
}

/// Map a backend-reported code back to the canonical form.
pub fn to_canonical_code(code: &str) -> String {
    match code {
        "zh-Hans" => "zh-CN".to_owned(),
        "zh-Hant" => "zh-TW".to_owned(),
        _ => code.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_table_round_trips() {
        for canonical in SUPPORTED {
            let backend = to_backend_code(canonical).unwrap();
            assert_eq!(to_canonical_code(backend), *canonical);
        }
    }

    #[test]
    fn chinese_variants_are_respelled() {
        assert_eq!(to_backend_code("zh-CN").unwrap(), "zh-Hans");
        assert_eq!(to_backend_code("zh-TW").unwrap(), "zh-Hant");
        assert_eq!(to_canonical_code("zh-Hans"), "zh-CN");
        assert_eq!(to_canonical_code("zh-Hant"), "zh-TW");
    }

    #[test]
    fn everything_else_maps_to_itself() {
        assert_eq!(to_backend_code("en").unwrap(), "en");
        assert_eq!(to_canonical_code("ja"), "ja");
    }

    #[test]
    fn unknown_codes_are_rejected_not_passed_through() {
        let err = to_backend_code("tlh").unwrap_err();
        assert!(matches!(err, TranslateError::LanguageNotSupported(code) if code == "tlh"));
    }
}

//! Voice catalog.

/// Chinese neural voices supported by the speech service.
pub const CHINESE_VOICES: &[&str] = &[
    "zh-CN-XiaoxiaoNeural",
    "zh-CN-XiaoyiNeural",
    "zh-CN-YunjianNeural",
    "zh-CN-YunxiNeural",
    "zh-CN-YunxiaNeural",
    "zh-CN-YunyangNeural",
];

/// Whether `voice` appears in the catalog.
///
/// The catalog is a convenience, not an allow-list: the service may accept
/// voices we do not enumerate, so callers should warn rather than reject.
pub fn is_known_voice(voice: &str) -> bool {
    CHINESE_VOICES.contains(&voice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup() {
        assert!(is_known_voice("zh-CN-YunxiNeural"));
        assert!(!is_known_voice("en-US-GuyNeural"));
    }
}

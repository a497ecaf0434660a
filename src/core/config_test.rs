#[cfg(test)]
mod tests {

    use crate::core::PlayerConfig;
    use std::time::Duration;

    #[test]
    fn test_player_config_default() {
        let config = PlayerConfig::default();
        assert!(config.media_base_url.is_none());
        assert_eq!(config.swipe_threshold, 50.0);
        assert_eq!(config.autoplay_retry_delay_ms, 100);
        assert_eq!(config.retry_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_player_config_serialization() {
        let mut config = PlayerConfig::default();
        config.media_base_url = Some("https://cdn.example.com".to_string());
        config.swipe_threshold = 75.0;
        config.autoplay_retry_delay_ms = 250;

        let serialized = serde_json::to_string(&config).expect("Failed to serialize config");
        let deserialized: PlayerConfig =
            serde_json::from_str(&serialized).expect("Failed to deserialize config");

        assert_eq!(config.media_base_url, deserialized.media_base_url);
        assert_eq!(config.swipe_threshold, deserialized.swipe_threshold);
        assert_eq!(
            config.autoplay_retry_delay_ms,
            deserialized.autoplay_retry_delay_ms
        );
    }

    #[test]
    fn test_config_backward_compatibility() {
        // Config files written before the tuning knobs existed still load.
        let old_config_json = r#"{
            "media_base_url": null
        }"#;

        let config: PlayerConfig =
            serde_json::from_str(old_config_json).expect("Failed to parse old config");

        assert!(config.media_base_url.is_none());
        assert_eq!(config.swipe_threshold, 50.0);
        assert_eq!(config.autoplay_retry_delay_ms, 100);
    }
}

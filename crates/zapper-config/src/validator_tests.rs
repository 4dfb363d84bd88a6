    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_zero_throttle() {
        let mut config = Config::default();
        config.targeting.throttle_ms = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "targeting.throttle_ms"));
    }

    #[test]
    fn test_validate_slow_throttle_warning() {
        let mut config = Config::default();
        config.targeting.throttle_ms = 500;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "targeting.throttle_ms"));
    }

    #[test]
    fn test_validate_negative_gap() {
        let mut config = Config::default();
        config.targeting.tooltip_gap_px = -1.0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_validate_zero_depth() {
        let mut config = Config::default();
        config.selector.max_depth = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "selector.max_depth"));
    }

    #[test]
    fn test_validate_deep_walk_warning() {
        let mut config = Config::default();
        config.selector.max_depth = 100;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_validate_empty_storage_path() {
        let mut config = Config::default();
        config.storage.path = PathBuf::new();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "storage.path"));
    }

    #[test]
    fn test_validate_memory_backend_ignores_path() {
        let mut config = Config::default();
        config.storage.backend = crate::StorageBackend::Memory;
        config.storage.path = PathBuf::new();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "storage.backend"));
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut config = Config::default();
        config.selector.max_depth = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        let err = result.into_result().unwrap_err();
        assert!(err.to_string().contains("selector.max_depth"));
    }

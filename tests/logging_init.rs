use m4vh::logging::{LoggingConfig, init};

// tracing 全局订阅器只能初始化一次, 所有断言放在同一个测试中

#[test]
fn test_logging_init_once() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let log_dir = dir.path().join("logs");
    let config = LoggingConfig {
        level: "debug".to_string(),
        console_level: "error".to_string(),
        directory: Some(log_dir.to_string_lossy().to_string()),
        file_prefix: "m4vh-test".to_string(),
    };

    assert!(init(&config).is_ok(), "日志系统初始化应该成功");
    assert!(log_dir.exists(), "日志目录应该被创建");

    // log 门面的记录经 tracing-log 转发, 不应 panic
    log::info!("测试信息日志");
    tracing::debug!("测试调试日志");

    assert!(init(&LoggingConfig::default()).is_err(), "重复初始化应返回错误");
}

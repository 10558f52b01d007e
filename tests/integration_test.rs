use document_analysis::utils::logging;
use document_analysis::{
    AnalysisManager, AnalysisOutcome, CancellationToken, Config, HttpAnalysisBackend,
};
use std::sync::Arc;

#[tokio::test]
#[ignore] // 默认忽略，需要可用的分析后端：cargo test -- --ignored
async fn test_analyze_document_against_backend() {
    // 初始化日志
    logging::init(true);

    // 加载配置
    let config = Config::load().expect("加载配置失败");

    let backend = HttpAnalysisBackend::new(&config).expect("创建 HTTP 客户端失败");
    let manager = AnalysisManager::new(Arc::new(backend), &config);

    // 注意：请根据实际情况设置文件路径
    let path = std::env::var("TEST_DOCUMENT").unwrap_or_else(|_| "test_document.jpg".to_string());
    let payload = std::fs::read(&path).expect("读取测试文档失败");

    let outcome = manager.analyze(payload, CancellationToken::new()).await;

    match outcome {
        AnalysisOutcome::Completed(report) => {
            println!("文档 {} 提取到 {} 项", report.document.id, report.result.len());
            assert_eq!(manager.result(), Some(report.result));
        }
        other => panic!("分析应该成功: {:?}", other),
    }
}

#[tokio::test]
#[ignore]
async fn test_unreachable_backend_reports_failure() {
    logging::init(false);

    let config = Config {
        backend_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
        ..Config::default()
    };
    let backend = HttpAnalysisBackend::new(&config).expect("创建 HTTP 客户端失败");
    let manager = AnalysisManager::new(Arc::new(backend), &config);

    let outcome = manager
        .analyze(vec![0xFF, 0xD8, 0xFF, 0xE0], CancellationToken::new())
        .await;

    assert!(outcome.is_failed(), "后端不可达时应报告失败");
    assert!(manager.error().is_some());
}

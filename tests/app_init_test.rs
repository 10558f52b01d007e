use document_analysis::{shared_manager, App, Config};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("document_analysis_init_{}_{}", std::process::id(), name))
}

fn config_with_log(name: &str) -> Config {
    Config {
        output_log_file: temp_path(name).display().to_string(),
        ..Config::default()
    }
}

#[test]
fn test_initialize_registers_shared_manager_only_once() {
    assert!(shared_manager().is_none());

    // 第一次初始化登记共享管理器
    let first_config = config_with_log("first.txt");
    let first = App::initialize(first_config.clone()).expect("初始化应成功");
    let shared = shared_manager().expect("共享管理器应已登记");
    assert!(first.manager().ptr_eq(shared));

    let header = std::fs::read_to_string(&first_config.output_log_file).unwrap();
    assert!(header.contains("文档分析日志"));

    // 再次初始化不会丢弃新的配置，而是使用自己的管理器
    let second_config = Config {
        backend_base_url: "http://127.0.0.1:9".to_string(),
        ..config_with_log("second.txt")
    };
    let second = App::initialize(second_config.clone()).expect("再次初始化应成功");
    assert!(!second.manager().ptr_eq(shared));
    assert!(shared_manager().unwrap().ptr_eq(first.manager()));

    let header = std::fs::read_to_string(&second_config.output_log_file).unwrap();
    assert!(header.contains("文档分析日志"));

    let _ = std::fs::remove_file(&first_config.output_log_file);
    let _ = std::fs::remove_file(&second_config.output_log_file);
}

//! 进程级共享管理器
//!
//! 优先把 `AnalysisManager` 作为显式的服务对象传递；
//! 确实需要全局访问的代码使用这里的访问器。

use std::sync::OnceLock;

use crate::manager::AnalysisManager;

static SHARED_MANAGER: OnceLock<AnalysisManager> = OnceLock::new();

/// 获取共享管理器，首次调用时用 `init` 创建
///
/// 并发的首次调用只会创建一个实例，`init` 至多执行一次
pub fn init_shared<F>(init: F) -> &'static AnalysisManager
where
    F: FnOnce() -> AnalysisManager,
{
    SHARED_MANAGER.get_or_init(init)
}

/// 获取共享管理器，尚未初始化时返回 `None`
pub fn shared_manager() -> Option<&'static AnalysisManager> {
    SHARED_MANAGER.get()
}

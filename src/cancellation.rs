//! 取消令牌
//!
//! 被动的取消信号：只记录"是否已取消"，不知道自己取消的是什么，
//! 由接收它的操作在合适的时机主动检查。

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 取消令牌
///
/// 克隆出来的令牌共享同一个标志位，任一持有者调用 `cancel()`
/// 后所有持有者都会观察到已取消。标志位只会从 false 变为 true。
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// 创建新的（未取消的）令牌
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记为已取消，重复调用无副作用
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// 是否已取消
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// 两个令牌是否为同一个令牌的克隆
    pub fn ptr_eq(&self, other: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

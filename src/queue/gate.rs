//! 处理中标记
//!
//! 分析和提交共用同一个标记：同一时间只允许一个操作运行，后来者直接被拒绝。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct ProcessingGate {
    busy: Arc<AtomicBool>,
}

impl ProcessingGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 占用标记；已被占用时返回 `AppError::Busy`
    pub fn try_begin(&self) -> AppResult<ProcessingGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::Busy)?;
        Ok(ProcessingGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_processing(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// drop 时释放标记
#[derive(Debug)]
pub struct ProcessingGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

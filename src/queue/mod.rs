//! 队列状态层
//!
//! - `store` - 有序条目集合
//! - `selection` - 选择集
//! - `index_queue` - 两者的组合，保证删除时同步清理选择集
//! - `gate` - 分析 / 提交共用的处理中标记

pub mod gate;
pub mod index_queue;
pub mod selection;
pub mod store;

pub use gate::{ProcessingGate, ProcessingGuard};
pub use index_queue::{IndexQueue, SharedQueue};
pub use selection::SelectionManager;
pub use store::{QueueStore, StatusCounts};

//! Visit analytics
//!
//! - `classifier`: 服务端从 User-Agent 识别 device / browser / os
//! - `aggregate`: 对时间窗口内的访问事件做单遍分组统计

pub mod aggregate;
pub mod classifier;

pub use aggregate::{aggregate, PerformanceStats, VisitStats};
pub use classifier::{detect_browser, detect_device, detect_os, Browser, Device, Os};

//! Ports - 抽象化レイヤー
//!
//! エンジンが外部に依存する部分（教務システムへのアクセス、時刻）を trait で切り出す。

pub mod acquisition;
pub mod clock;

pub use self::acquisition::{AcquisitionClient, Connector};
pub use self::clock::{Clock, FixedClock, SystemClock};

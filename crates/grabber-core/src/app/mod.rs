//! App - アプリケーション層
//!
//! ports と domain を組み合わせてエンジンを実装します。
//!
//! # 主要コンポーネント
//! - **GrabberBuilder**: エンジンの構築とワイヤリング
//! - **Grabber**: ライフサイクル API（start / cancel / status / queue）
//! - **WorkerLoop**: 待機 → 取得 → 判定 → 待機 のループ
//! - **Status**: 実行の終了理由

pub mod builder;
pub mod grabber;
pub mod status;
mod worker_loop;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, GrabberBuilder};
pub use self::grabber::{DEFAULT_HISTORY_CAPACITY, Grabber};
pub use self::status::{RunExit, StatusView};

//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **ScriptedClient**: 台本どおりの結果を返す AcquisitionClient
//! - **StaticConnector**: どのアカウントにも同じ client を渡す Connector
//!
//! 本物の HTTP クライアントはこのクレートの外に置く。

pub mod scripted;

pub use self::scripted::{AttemptCall, ScriptStep, ScriptedClient, StaticConnector};

//! grabber-core
//!
//! Scheduling/retry engine for grabbing course enrollment slots.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, target, policy, outcome, decision, state, attempt）
//! - **ports**: 抽象化レイヤー（AcquisitionClient, Connector, Clock）
//! - **queue**: FIFO のターゲットキュー
//! - **app**: エンジン（Grabber, GrabberBuilder, worker loop）
//! - **impls**: 開発用・テスト用の実装（ScriptedClient）
//! - **config**: JSON タスクファイル
//! - error: 設定読み込みのエラー型

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod queue;

pub use app::{Grabber, GrabberBuilder, RunExit};
pub use config::{GrabberTask, PolicyConfig};
pub use domain::{Account, AttemptError, GrabberStatus, Policy, Target, TargetId};
pub use error::GrabberError;

//! # Tech3C Bridge
//!
//! Cross-platform bridge exposing the Tech3C authentication SDK to the game engine.
//!
//! ## Features
//!
//! - **Session Gateway**: Initialization gate, in-memory configuration and session, five callback slots
//! - **Platform Adapters**: JNI (Android), C ABI via `libloading` (iOS / static builds), headless fallback
//! - **Owner-Thread Dispatch**: Foreign callbacks are marshalled onto the engine thread through a crossbeam queue
//! - **Configuration**: TOML/JSON config files with environment overrides
//!
//! ## Architecture Design
//!
//! 网关本身不区分平台，所有外部交互都经过两个注入的能力：
//! - **PlatformAdapter**: 出站调用外部 SDK，并注册入站回调
//! - **OwnerThread**: 把应用回调投递到拥有线程执行
//!
//! ### Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tech3c_bridge::core::MainThreadQueue;
//! use tech3c_bridge::gateway::SessionGateway;
//! use tech3c_bridge::platform::HeadlessAdapter;
//!
//! let queue = Arc::new(MainThreadQueue::new());
//! let gateway = SessionGateway::new(Arc::new(HeadlessAdapter::new()), queue.clone());
//! gateway.set_error_callback(|error| println!("{}", error));
//!
//! // 未初始化：配置照常保存，错误 1001 在排空队列时送达
//! gateway.set_debug_mode(true);
//! assert!(gateway.config().debug_mode);
//! assert_eq!(queue.process_pending(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors, scheduler, logging
//! - [`config`]: Bridge and SDK configuration
//! - [`domain`]: Session and error event values
//! - [`platform`]: Foreign call adapters and inbound routing
//! - [`gateway`]: The session gateway
//! - [`scene`]: Demo login scene

/// Core infrastructure: errors, owner-thread scheduler, logging
pub mod core;
/// Configuration system
pub mod config;
/// Session and error event value objects
pub mod domain;
/// Platform adapters for the foreign SDK
pub mod platform;
/// Session gateway
pub mod gateway;
/// Demo login scene
pub mod scene;

pub use config::{AuthConfig, BridgeConfig, Language, OrientationMode, UiMode};
pub use domain::{ErrorCode, ErrorEvent, LoginType, Session};
pub use gateway::SessionGateway;

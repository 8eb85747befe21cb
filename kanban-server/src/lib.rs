//! Kanban Server - 制造看板追踪系统
//!
//! # 架构概述
//!
//! 追踪生产工作在三个站点之间的流转 (装配仓库、制造站、装配线)，
//! 通过看板卡机制协调：
//!
//! - **状态机核心** (`flow`): 看板卡/订单/车间排程的状态机与台账
//! - **数据库** (`db`): SQLite 连接池与各表仓储
//! - **认证** (`auth`): JWT 验证中间件
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! kanban-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证
//! ├── api/           # HTTP 路由和处理器
//! ├── flow/          # 订单/看板状态机
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod flow;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use flow::{FlowError, FlowResult};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

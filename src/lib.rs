// ==========================================
// 零件定位系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 按分组层级可见性查找有库存的车间，按距离排序
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 层级闭包/距离/排序/定位
pub mod engine;

// 外部服务 - 电话规范化与地理编码
pub mod services;

// 配置层 - 进程配置与业务配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与 HTTP
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{Coordinates, Group, GroupNode, Part, Workshop, WorkshopStock};

// 引擎
pub use engine::{GroupHierarchyIndex, LocatorError, LocatorResult, StockCandidate, StockLocator};

// API
pub use api::{ApiError, LocatorApi, LocatorQuery, LocatorResponse, WorkshopApi};

// 应用
pub use app::{build_router, AppState};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "零件定位系统";

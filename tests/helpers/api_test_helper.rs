// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#![allow(dead_code)]

#[path = "../test_helpers.rs"]
mod test_helpers;

pub use test_helpers::DemoNetwork;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;
use tempfile::NamedTempFile;

use parts_locator::api::{ApiError, LocatorApi, WorkshopApi};
use parts_locator::db::open_sqlite_connection;
use parts_locator::domain::Coordinates;
use parts_locator::engine::{LocatorRepositories, StockLocator};
use parts_locator::repository::{
    GroupRepository, PartRepository, StockRepository, WorkshopRepository,
};
use parts_locator::services::{Geocoder, GeocodingError, DEFAULT_COUNTRY_CODE};

// ==========================================
// 固定结果的地理编码实现
// ==========================================

/// 固定结果的地理编码器（记录调用次数）
pub struct StaticGeocoder {
    result: Option<Coordinates>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    pub fn returning(result: Option<Coordinates>) -> Self {
        Self {
            result,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: None,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>, GeocodingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GeocodingError::Status(503));
        }
        Ok(self.result)
    }
}

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含所有API实例和必要的依赖
pub struct ApiTestEnv {
    pub db_path: String,
    pub locator_api: Arc<LocatorApi>,
    pub workshop_api: Arc<WorkshopApi>,

    // Repository层（用于断言）
    pub workshop_repo: Arc<WorkshopRepository>,
    pub group_repo: Arc<GroupRepository>,
    pub part_repo: Arc<PartRepository>,
    pub stock_repo: Arc<StockRepository>,

    // 各仓储共享的连接
    pub shared_conn: Arc<Mutex<Connection>>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境（地理编码不返回结果）
    pub fn new() -> Result<Self, String> {
        Self::with_geocoder(Arc::new(StaticGeocoder::returning(None)))
    }

    /// 使用指定的地理编码实现创建测试环境
    pub fn with_geocoder(geocoder: Arc<dyn Geocoder>) -> Result<Self, String> {
        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let workshop_repo = Arc::new(WorkshopRepository::from_connection(conn.clone()));
        let group_repo = Arc::new(GroupRepository::from_connection(conn.clone()));
        let part_repo = Arc::new(PartRepository::from_connection(conn.clone()));
        let stock_repo = Arc::new(StockRepository::from_connection(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let locator = StockLocator::new(LocatorRepositories::from_sqlite(
            group_repo.clone(),
            workshop_repo.clone(),
            part_repo.clone(),
            stock_repo.clone(),
        ));
        let locator_api = Arc::new(LocatorApi::new(locator, DEFAULT_COUNTRY_CODE));
        let workshop_api = Arc::new(WorkshopApi::new(
            workshop_repo.clone(),
            geocoder,
            DEFAULT_COUNTRY_CODE,
        ));

        Ok(Self {
            db_path,
            locator_api,
            workshop_api,
            workshop_repo,
            group_repo,
            part_repo,
            stock_repo,
            shared_conn: conn,
            _temp_file: temp_file,
        })
    }

    /// 打开独立连接用于准备数据
    pub fn conn(&self) -> Connection {
        test_helpers::open_test_conn(&self.db_path)
    }

    /// 写入演示网络
    pub fn seed_demo(&self) -> DemoNetwork {
        test_helpers::seed_demo_network(&self.conn())
    }
}

/// 断言是 InvalidInput 错误并返回消息
pub fn expect_invalid_input<T: std::fmt::Debug>(result: Result<T, ApiError>) -> String {
    match result {
        Err(ApiError::InvalidInput(msg)) => msg,
        other => panic!("期望 InvalidInput，实际: {:?}", other),
    }
}

/// 断言是 NotFound 错误并返回消息
pub fn expect_not_found<T: std::fmt::Debug>(result: Result<T, ApiError>) -> String {
    match result {
        Err(ApiError::NotFound(msg)) => msg,
        other => panic!("期望 NotFound，实际: {:?}", other),
    }
}

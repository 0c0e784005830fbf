// ==========================================
// 零件定位系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{LocatorApi, WorkshopApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::engine::{LocatorRepositories, StockLocator};
use crate::repository::{GroupRepository, PartRepository, StockRepository, WorkshopRepository};
use crate::services::geocoding::{Geocoder, NominatimGeocoder};

/// 应用状态
///
/// 包含所有API实例和共享资源；HTTP 层以 `Arc<AppState>` 共享。
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 零件定位API
    pub locator_api: Arc<LocatorApi>,

    /// 车间API
    pub workshop_api: Arc<WorkshopApi>,
}

impl AppState {
    /// 创建新的AppState实例（使用 Nominatim 地理编码）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并确保表结构存在
    /// 2. 从 config_kv 读取业务配置
    /// 3. 初始化所有Repository与API
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_geocoder(db_path, None)
    }

    /// 创建AppState，可注入地理编码实现（None 时按配置创建 Nominatim 客户端）
    pub fn with_geocoder(
        db_path: String,
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化表结构: {}", e))?;
        match read_schema_version(&conn) {
            Ok(Some(v)) if v == CURRENT_SCHEMA_VERSION => {}
            Ok(v) => tracing::warn!(
                "schema_version 不一致: 期望 {}，实际 {:?}",
                CURRENT_SCHEMA_VERSION,
                v
            ),
            Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| format!("无法创建ConfigManager: {}", e))?;
        let settings = config_manager
            .locator_settings()
            .map_err(|e| format!("无法读取配置: {}", e))?;

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let group_repo = Arc::new(GroupRepository::from_connection(conn.clone()));
        let workshop_repo = Arc::new(WorkshopRepository::from_connection(conn.clone()));
        let part_repo = Arc::new(PartRepository::from_connection(conn.clone()));
        let stock_repo = Arc::new(StockRepository::from_connection(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let geocoder: Arc<dyn Geocoder> = match geocoder {
            Some(g) => g,
            None => Arc::new(
                NominatimGeocoder::new(&settings.geocoding)
                    .map_err(|e| format!("无法创建地理编码客户端: {}", e))?,
            ),
        };

        let locator = StockLocator::new(LocatorRepositories::from_sqlite(
            group_repo,
            workshop_repo.clone(),
            part_repo,
            stock_repo,
        ));
        let locator_api = Arc::new(LocatorApi::new(
            locator,
            settings.default_country_code.clone(),
        ));
        let workshop_api = Arc::new(WorkshopApi::new(
            workshop_repo,
            geocoder,
            settings.default_country_code,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            locator_api,
            workshop_api,
        })
    }
}

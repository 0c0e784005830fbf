// ==========================================
// 车间联系信息补全集成测试
// ==========================================
// 测试范围:
// 1. NominatimGeocoder 请求参数与响应解析（httpmock 模拟服务）
// 2. WorkshopApi::enrich_contact 写入规则
// ==========================================

mod helpers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use helpers::api_test_helper::*;
use httpmock::prelude::*;
use parts_locator::api::ContactUpdateRequest;
use parts_locator::config::GeocodingSettings;
use parts_locator::domain::Coordinates;
use parts_locator::services::{Geocoder, GeocodingError, NominatimGeocoder};
use serde_json::json;

fn settings_for(server: &MockServer) -> GeocodingSettings {
    GeocodingSettings {
        base_url: server.url("/search"),
        user_agent: "stockifai-backend/1.0".to_string(),
        timeout_secs: 5,
    }
}

fn request(address: Option<&str>, phone: Option<&str>) -> ContactUpdateRequest {
    ContactUpdateRequest {
        address: address.map(str::to_string),
        phone: phone.map(str::to_string),
    }
}

// ==========================================
// NominatimGeocoder
// ==========================================

#[tokio::test]
async fn test_geocoder_解析第一条结果() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Calle 50 742, La Plata")
                .query_param("format", "json")
                .query_param("limit", "1")
                .header("user-agent", "stockifai-backend/1.0");
            then.status(200).json_body(json!([
                {"lat": "-34.9215", "lon": "-57.9545", "display_name": "La Plata"}
            ]));
        })
        .await;

    let geocoder = NominatimGeocoder::new(&settings_for(&server)).expect("创建客户端失败");
    let coords = geocoder
        .geocode("  Calle 50 742, La Plata ")
        .await
        .expect("地理编码失败");

    mock.assert_async().await;
    assert_eq!(coords, Some(Coordinates::new(-34.9215, -57.9545)));
}

#[tokio::test]
async fn test_geocoder_无结果返回None() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!([]));
        })
        .await;

    let geocoder = NominatimGeocoder::new(&settings_for(&server)).expect("创建客户端失败");
    assert_eq!(geocoder.geocode("Dirección inexistente").await.expect("请求失败"), None);
}

#[tokio::test]
async fn test_geocoder_空地址不发请求() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!([]));
        })
        .await;

    let geocoder = NominatimGeocoder::new(&settings_for(&server)).expect("创建客户端失败");
    assert_eq!(geocoder.geocode("   ").await.expect("请求失败"), None);
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_geocoder_错误状态码() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        })
        .await;

    let geocoder = NominatimGeocoder::new(&settings_for(&server)).expect("创建客户端失败");
    let err = geocoder
        .geocode("Av. Rivadavia 1234")
        .await
        .expect_err("应返回错误");
    assert!(matches!(err, GeocodingError::Status(503)));
}

// ==========================================
// WorkshopApi::enrich_contact
// ==========================================

#[tokio::test]
async fn test_enrich_地址地理编码后写入坐标() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Av. Corrientes 1000, CABA");
            then.status(200)
                .json_body(json!([{"lat": -34.6037, "lon": -58.3816}]));
        })
        .await;

    let geocoder = NominatimGeocoder::new(&settings_for(&server)).expect("创建客户端失败");
    let env = ApiTestEnv::with_geocoder(Arc::new(geocoder)).expect("无法创建测试环境");
    let demo = env.seed_demo();

    let info = env
        .workshop_api
        .enrich_contact(demo.oeste, request(Some(" Av. Corrientes 1000, CABA "), None))
        .await
        .expect("补全失败");

    assert_eq!(info.address, "Av. Corrientes 1000, CABA");
    assert_eq!(info.latitude, Some(-34.6037));
    assert_eq!(info.longitude, Some(-58.3816));
    assert_eq!(info.phone, "11 4667-8899", "电话不应被修改");

    let stored = env
        .workshop_repo
        .find_by_id(demo.oeste)
        .expect("查询失败")
        .expect("车间应存在");
    assert_eq!(stored.coordinates, Some(Coordinates::new(-34.6037, -58.3816)));
}

#[tokio::test]
async fn test_enrich_地理编码失败保留原坐标() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(500);
        })
        .await;

    let geocoder = NominatimGeocoder::new(&settings_for(&server)).expect("创建客户端失败");
    let env = ApiTestEnv::with_geocoder(Arc::new(geocoder)).expect("无法创建测试环境");
    let demo = env.seed_demo();

    let info = env
        .workshop_api
        .enrich_contact(demo.central, request(Some("Nueva Dirección 1"), None))
        .await
        .expect("地理编码失败不应导致补全失败");

    assert_eq!(info.address, "Nueva Dirección 1");
    assert_eq!(info.latitude, Some(-34.6083));
    assert_eq!(info.longitude, Some(-58.4097));
}

#[tokio::test]
async fn test_enrich_只更新电话时不调用地理编码() {
    let geocoder = Arc::new(StaticGeocoder::returning(Some(Coordinates::new(0.0, 0.0))));
    let env = ApiTestEnv::with_geocoder(geocoder.clone()).expect("无法创建测试环境");
    let demo = env.seed_demo();

    let info = env
        .workshop_api
        .enrich_contact(demo.sur, request(None, Some("  0221   444-9999 ")))
        .await
        .expect("补全失败");

    assert_eq!(geocoder.calls(), 0);
    assert_eq!(info.phone, "0221 444-9999");
    assert_eq!(info.phone_e164.as_deref(), Some("542214449999"));
    assert_eq!(info.latitude, Some(-34.9215));
}

#[tokio::test]
async fn test_enrich_空地址清空但不地理编码() {
    let geocoder = Arc::new(StaticGeocoder::returning(Some(Coordinates::new(0.0, 0.0))));
    let env = ApiTestEnv::with_geocoder(geocoder.clone()).expect("无法创建测试环境");
    let demo = env.seed_demo();

    let info = env
        .workshop_api
        .enrich_contact(demo.norte, request(Some("   "), None))
        .await
        .expect("补全失败");

    assert_eq!(geocoder.calls(), 0);
    assert_eq!(info.address, "");
    assert_eq!(info.latitude, Some(-32.9575));
}

#[tokio::test]
async fn test_enrich_车间不存在() {
    let geocoder = Arc::new(StaticGeocoder::returning(None));
    let env = ApiTestEnv::with_geocoder(geocoder.clone()).expect("无法创建测试环境");
    env.seed_demo();

    let msg = expect_not_found(
        env.workshop_api
            .enrich_contact(9999, request(Some("Av. Siempre Viva 742"), None))
            .await,
    );
    assert_eq!(msg, "Taller no encontrado.");
    assert_eq!(geocoder.calls(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_enrich_等待数据库锁时不阻塞运行时() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let demo = env.seed_demo();

    // 另一线程持有共享连接锁 300ms
    let conn = env.shared_conn.clone();
    let (locked_tx, locked_rx) = std::sync::mpsc::channel();
    let holder = std::thread::spawn(move || {
        let _guard = conn.lock().expect("获取连接锁失败");
        locked_tx.send(()).expect("通知失败");
        std::thread::sleep(Duration::from_millis(300));
    });
    locked_rx.recv().expect("等待加锁失败");

    let ticker = tokio::spawn(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Instant::now()
    });

    let info = env
        .workshop_api
        .enrich_contact(demo.sur, request(None, Some("0221 444-0000")))
        .await
        .expect("补全失败");
    let enriched_at = Instant::now();
    let ticked_at = ticker.await.expect("计时任务失败");
    holder.join().expect("持锁线程异常");

    assert_eq!(info.phone, "0221 444-0000");
    // 单线程运行时上，计时任务应在补全等待锁期间完成
    assert!(ticked_at < enriched_at, "补全阻塞了运行时线程");
}

#[test]
fn test_get_workshop_返回e164电话() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let demo = env.seed_demo();

    let info = env.workshop_api.get_workshop(demo.central).expect("查询失败");
    assert_eq!(info.name, "Taller Central");
    assert_eq!(info.phone_e164.as_deref(), Some("541155551234"));

    assert_eq!(
        expect_not_found(env.workshop_api.get_workshop(9999)),
        "Taller no encontrado."
    );
}

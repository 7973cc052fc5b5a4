use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use backend::dashboards::d410_positioning_matrix::{MatrixService, MatrixState};
use backend::dashboards::d411_bf_compliance::{BfService, BfState};
use backend::routes::configure_routes;
use backend::shared::clock::Clock;
use backend::shared::config::{BfConfig, MatrixConfig};
use backend::shared::data::memory::InMemoryWarehouse;
use backend::shared::data::warehouse::{
    BfCatalogEntry, BfSaleBreakdown, BfStockRow, SaleType, SalesRow,
};
use backend::shared::page::ModulePage;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sale(fecha: NaiveDate, sku: &str, canal: &str, total: f64, costo: f64, ir: f64) -> SalesRow {
    SalesRow {
        fecha,
        sku: sku.into(),
        descripcion: format!("Producto {}", sku),
        marca: "Loomber".into(),
        categoria: "Audio".into(),
        canal: canal.into(),
        almacen: "CEDIS".into(),
        estado: "Entregado".into(),
        total,
        costo_venta: costo,
        gastos_directos: total - costo - ir,
        ingreso_real: ir,
        cantidad: 2.0,
        clasificacion: Some("Estrellas".into()),
    }
}

fn warehouse() -> InMemoryWarehouse {
    let monthly = vec![
        sale(date(2024, 8, 1), "A1", "Walmart", 800.0, 500.0, 100.0),
        sale(date(2024, 10, 1), "A1", "Walmart", 1000.0, 600.0, 200.0),
    ];
    InMemoryWarehouse::new()
        .with_monthly_rows(monthly)
        .with_sales_rows(vec![sale(date(2024, 10, 2), "A1", "Walmart", 1000.0, 600.0, 200.0)])
        .with_catalog(vec![BfCatalogEntry {
            sku: "A1".into(),
            descripcion: "Bocina".into(),
            categoria: "Audio".into(),
            relevante: true,
            nuevo: false,
            remate: false,
        }])
        .with_breakdown(vec![BfSaleBreakdown {
            fecha: date(2024, 10, 2),
            canal: "Walmart".into(),
            sku_primario: "A1".into(),
            tipo_venta: SaleType::Individual,
            cantidad_vendida: 2.0,
            total_ventas: 1000.0,
        }])
        .with_inventory(vec![
            BfStockRow {
                sku: "A1".into(),
                descripcion: "Bocina".into(),
                almacen: "ATS".into(),
                cantidad_libre: 30.0,
            },
            BfStockRow {
                sku: "A1".into(),
                descripcion: "Bocina".into(),
                almacen: "MELI".into(),
                cantidad_libre: 12.0,
            },
        ])
}

fn app() -> Router {
    app_on(warehouse())
}

fn app_on(warehouse: InMemoryWarehouse) -> Router {
    let warehouse = Arc::new(warehouse);
    let clock = Clock::Fixed(date(2024, 10, 15));
    let static_dir = "target/no-frontend-bundle";

    let matrix = MatrixState {
        service: MatrixService::new(warehouse.clone(), MatrixConfig::default(), true, clock),
        page: ModulePage::new(static_dir, "Matriz de Posicionamiento"),
    };
    let bf = BfState {
        service: BfService::new(warehouse, BfConfig::default(), clock),
        page: ModulePage::new(static_dir, "Cumplimiento BF"),
    };
    configure_routes(matrix, bf, static_dir)
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    post_to(app(), uri, body).await
}

async fn post_to(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_check() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn channel_matrix_envelope_and_zone() {
    let (status, body) = post(
        "/matriz-posicionamiento/actualizar",
        json!({"mes": 202410, "marca": "Ambos"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let canal = &body["data"]["canales"][0];
    assert_eq!(canal["canal"], "Walmart");
    assert_eq!(canal["ingreso_real_pct"], 20.0);
    assert_eq!(canal["roi_pct"], 33.33);
    assert_eq!(canal["zona"], "A Desarrollar");
    assert_eq!(body["data"]["estadisticas"]["total_canales"], 1);
    assert_eq!(body["data"]["estadisticas"]["a_desarrollar"], 1);
}

#[tokio::test]
async fn malformed_bodies_are_rejected_with_envelope() {
    for body in [
        json!({"mes": 202413}),
        json!({"mes": "octubre"}),
        json!({"marca": "Acme"}),
        json!({"mes": 202410, "desconocido": 1}),
    ] {
        let (status, reply) = post("/matriz-posicionamiento/actualizar", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(reply["success"], false);
        assert!(reply["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}

#[tokio::test]
async fn comparison_requires_month_and_skus() {
    let (status, reply) = post("/matriz-posicionamiento/comparar-3-meses", json!({"mes": 202410})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["error"], "Se requiere mes y SKUs");
}

#[tokio::test]
async fn comparison_leaves_missing_month_empty() {
    let (status, reply) = post(
        "/matriz-posicionamiento/comparar-3-meses",
        json!({"mes": 202410, "canales": ["Todos"], "skus": ["A1"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &reply["data"];
    assert_eq!(data["meses"], json!([202408, 202409, 202410]));
    assert_eq!(data["meses_labels"], json!(["Ago", "Sep", "Oct"]));
    let points = data["datasets"][0]["data"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert!(points[0].is_object());
    assert!(points[1].is_null());
    assert!(points[2].is_object());
}

#[tokio::test]
async fn todos_is_the_same_as_no_channel_filter() {
    let (_, all) = post(
        "/matriz-posicionamiento/actualizar-categorias",
        json!({"mes": 202410, "canales": ["Todos"]}),
    )
    .await;
    let (_, empty) = post(
        "/matriz-posicionamiento/actualizar-categorias",
        json!({"mes": 202410, "canales": []}),
    )
    .await;
    assert_eq!(all["data"], empty["data"]);
    assert_eq!(all["data"]["categorias"][0]["label"], "WM - Audio");
}

#[tokio::test]
async fn empty_month_gives_zero_statistics() {
    let (status, reply) = post("/matriz-posicionamiento/actualizar", json!({"mes": 202401})).await;
    assert_eq!(status, StatusCode::OK);
    let stats = &reply["data"]["estadisticas"];
    assert_eq!(stats["total_canales"], 0);
    assert_eq!(stats["ventas_totales"], 0.0);
    assert_eq!(stats["eje_y_max"], 100.0);
    assert_eq!(reply["data"]["datasets"], json!([]));
}

#[tokio::test]
async fn empty_month_is_empty_on_every_matrix_endpoint() {
    let empty = json!({"mes": 202401, "canales": [], "skus": ["A1"]});

    let (status, reply) = post("/matriz-posicionamiento/actualizar-categorias", empty.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["data"]["categorias"], json!([]));
    assert_eq!(reply["data"]["datasets"], json!([]));
    assert_eq!(reply["data"]["estadisticas"]["total_combinaciones"], 0);
    assert_eq!(reply["data"]["estadisticas"]["ventas_totales"], 0.0);
    assert_eq!(reply["data"]["estadisticas"]["eje_y_max"], 100.0);

    let (status, reply) = post("/matriz-posicionamiento/actualizar-clasificacion", empty.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["data"]["skus"], json!([]));
    assert_eq!(reply["data"]["datasets"], json!([]));
    assert_eq!(reply["data"]["estadisticas"]["total_skus"], 0);
    assert_eq!(reply["data"]["estadisticas"]["ingreso_real_total"], 0.0);
    assert_eq!(reply["data"]["estadisticas"]["eje_y_max"], 100.0);

    let (status, reply) = post("/matriz-posicionamiento/obtener-skus", json!({"mes": 202401})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["success"], true);
    assert_eq!(reply["data"], json!([]));

    let (status, reply) = post("/matriz-posicionamiento/comparar-3-meses", empty).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["data"]["datasets"], json!([]));
    assert_eq!(reply["data"]["skus"], json!([]));
    assert_eq!(reply["data"]["meses"], json!([202311, 202312, 202401]));
    assert_eq!(reply["data"]["resumen"], json!({"mejoraron": 0, "estable": 0, "empeoraron": 0}));
    assert_eq!(reply["data"]["estadisticas"]["total_skus"], 0);
    assert_eq!(reply["data"]["estadisticas"]["eje_y_max"], 100.0);
}

#[tokio::test]
async fn empty_bf_period_has_zero_summary() {
    let (status, reply) = post(
        "/cumplimiento-bf/datos",
        json!({"preset": "personalizado", "rango": "2024-01-01 a 2024-01-31"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &reply["data"];
    assert_eq!(data["skus_data"], json!([]));
    assert_eq!(data["grafico"]["fechas"], json!([]));
    assert_eq!(data["grafico"]["ventas"], json!([]));
    let resumen = &data["resumen_general"];
    assert_eq!(resumen["total_skus"], 0);
    assert_eq!(resumen["total_cantidad"], 0);
    assert_eq!(resumen["total_real"], 0.0);
    assert_eq!(resumen["roi_promedio"], 0.0);
}

#[tokio::test]
async fn unavailable_warehouse_answers_500_with_envelope() {
    let requests = [
        ("/matriz-posicionamiento/actualizar", json!({"mes": 202410})),
        ("/matriz-posicionamiento/actualizar-categorias", json!({"mes": 202410})),
        ("/matriz-posicionamiento/obtener-skus", json!({"mes": 202410})),
        ("/cumplimiento-bf/datos", json!({})),
        ("/cumplimiento-bf/inventario", json!({})),
    ];
    for (uri, body) in requests {
        let (status, reply) =
            post_to(app_on(InMemoryWarehouse::unavailable("sin conexión")), uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(reply, json!({"success": false, "error": "sin conexión"}), "{}", uri);
    }
}

#[tokio::test]
async fn bf_inventory_groups_stock_by_flag() {
    let (status, reply) = post("/cumplimiento-bf/inventario", json!({"preset": "mes_completo"})).await;
    assert_eq!(status, StatusCode::OK);
    let data = &reply["data"];
    assert_eq!(data["periodo_texto"], "Mes completo de octubre");

    let grupos = data["grupos"].as_array().unwrap();
    assert_eq!(grupos.len(), 1);
    assert_eq!(grupos[0]["nombre"], "Relevante");
    assert_eq!(grupos[0]["total_existencia"], 42);
    assert_eq!(grupos[0]["total_venta"], 2);

    let producto = &grupos[0]["productos"][0];
    assert_eq!(producto["sku"], "A1");
    assert_eq!(producto["existencia"], 42.0);
    assert_eq!(
        producto["almacenes"],
        json!([
            {"almacen": "Astillero", "cantidad": 30.0},
            {"almacen": "Meli Full", "cantidad": 12.0}
        ])
    );

    // stock stays, sales follow the channel
    let (_, reply) = post("/cumplimiento-bf/inventario", json!({"canal": "Shein"})).await;
    assert_eq!(reply["data"]["grupos"][0]["total_existencia"], 42);
    assert_eq!(reply["data"]["grupos"][0]["total_venta"], 0);
}

#[tokio::test]
async fn bf_inventory_export_is_a_csv_attachment() {
    let response = app()
        .oneshot(
            Request::post("/cumplimiento-bf/exportar-inventario")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Inventario_BF_20241015.csv\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("Relevante,A1,Bocina,Audio,42,2,Astillero: 30; Meli Full: 12"));
}

#[tokio::test]
async fn bf_compliance_for_current_month() {
    let (status, reply) = post("/cumplimiento-bf/datos", json!({"preset": "mes_completo"})).await;
    assert_eq!(status, StatusCode::OK);
    let data = &reply["data"];
    assert_eq!(data["periodo_texto"], "Mes completo de octubre");
    assert_eq!(data["skus_data"][0]["sku"], "A1");
    assert_eq!(data["skus_data"][0]["tipo_fila"], "individual");
    assert_eq!(data["resumen_general"]["total_skus"], 1);
    assert_eq!(data["grafico"]["fechas"], json!(["2024-10-02"]));

    let (status, reply) = post("/cumplimiento-bf/datos", json!({"canal": "Coppel"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["success"], false);
}

#[tokio::test]
async fn bf_export_is_a_csv_attachment() {
    let response = app()
        .oneshot(
            Request::post("/cumplimiento-bf/exportar")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Cumplimiento_BF_20241015.csv\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("SKU,Tipo,"));
    assert!(text.contains("A1,Individual,Producto A1,Audio,2,1000.00"));
}

#[tokio::test]
async fn module_page_falls_back_to_placeholder() {
    let response = app()
        .oneshot(Request::get("/cumplimiento-bf").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Cumplimiento BF"));
}

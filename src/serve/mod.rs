//! HTTP service exposing the profiling core.
//!
//! Thin request/response plumbing around the pure functions in
//! [`crate::profile`]; the handlers parse input, time the core calls,
//! and serialize the result. Requests share no mutable state, so
//! isolation falls out of the core's purity.
//!
//! Endpoints:
//! - `GET /health` - liveness probe.
//! - `POST /quality` - aggregate-only assessment from a JSON body.
//! - `POST /quality-from-csv` - full assessment of an uploaded CSV file.
//! - `POST /quality-flags-from-csv` - flag catalog only for an uploaded
//!   CSV file.

use std::{io::Cursor, net::SocketAddr, time::Instant};

use axum::{
    extract::Multipart,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    profile::{
        assess_aggregate, compute_quality_flags, missing_table, summarize, AggregateStats,
        QualityFlags,
    },
    table::Table,
};

/// Score at or above which a response reports `ok_for_model`.
const OK_THRESHOLD: f64 = 0.5;

/// Aggregate-only quality request.
#[derive(Debug, Deserialize)]
struct QualityRequest {
    n_rows: i64,
    n_cols: i64,
    max_missing_share: f64,
    numeric_cols: i64,
    categorical_cols: i64,
}

/// Aggregate-only quality response.
#[derive(Debug, Serialize)]
struct QualityResponse {
    ok_for_model: bool,
    quality_score: f64,
    message: &'static str,
    latency_ms: f64,
    flags: AggregateFlags,
    dataset_shape: (i64, i64),
}

/// The two boolean flags of the aggregate path.
#[derive(Debug, Serialize)]
struct AggregateFlags {
    too_few_rows: bool,
    too_many_missing: bool,
}

/// Full-table quality response for uploaded data.
#[derive(Debug, Serialize)]
struct CsvQualityResponse {
    ok_for_model: bool,
    quality_score: f64,
    message: &'static str,
    latency_ms: f64,
    flags: QualityFlags,
    dataset_shape: (usize, usize),
}

/// Flags-only response for uploaded data.
#[derive(Debug, Serialize)]
struct CsvFlagsResponse {
    flags: QualityFlags,
    latency_ms: f64,
    n_rows: usize,
    n_cols: usize,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
}

/// Error wrapper mapping the failure taxonomy onto HTTP statuses:
/// client-input failures are 400, everything else 500.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_input() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the service router.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/quality", post(quality))
        .route("/quality-from-csv", post(quality_from_csv))
        .route("/quality-flags-from-csv", post(quality_flags_from_csv))
}

/// Bind and serve until ctrl-c.
///
/// # Errors
///
/// Returns an I/O error if the port cannot be bound or the server fails.
pub async fn run(port: u16) -> Result<()> {
    let app = router();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Io {
            path: None,
            source: e,
        })?;
    tracing::info!("perfilar API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Io {
            path: None,
            source: e,
        })?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn quality(
    Json(req): Json<QualityRequest>,
) -> std::result::Result<Json<QualityResponse>, ApiError> {
    let start = Instant::now();

    let stats = AggregateStats {
        n_rows: req.n_rows,
        n_cols: req.n_cols,
        max_missing_share: req.max_missing_share,
        numeric_cols: req.numeric_cols,
        categorical_cols: req.categorical_cols,
    };
    let assessment = assess_aggregate(&stats)?;

    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        n_rows = req.n_rows,
        n_cols = req.n_cols,
        score = assessment.quality_score,
        "aggregate quality assessed"
    );

    Ok(Json(QualityResponse {
        ok_for_model: assessment.ok_for_model,
        quality_score: round_to(assessment.quality_score, 3),
        message: if assessment.ok_for_model {
            "ok"
        } else {
            "low quality"
        },
        latency_ms: round_to(latency_ms, 1),
        flags: AggregateFlags {
            too_few_rows: assessment.too_few_rows,
            too_many_missing: assessment.too_many_missing,
        },
        dataset_shape: (req.n_rows, req.n_cols),
    }))
}

async fn quality_from_csv(
    multipart: Multipart,
) -> std::result::Result<Json<CsvQualityResponse>, ApiError> {
    let start = Instant::now();

    let (table, flags) = assess_upload(multipart).await?;
    let ok = flags.quality_score >= OK_THRESHOLD;

    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        rows = table.row_count(),
        cols = table.column_count(),
        score = flags.quality_score,
        "csv quality assessed"
    );

    Ok(Json(CsvQualityResponse {
        ok_for_model: ok,
        quality_score: round_to(flags.quality_score, 3),
        message: if ok { "ok" } else { "low quality" },
        latency_ms: round_to(latency_ms, 1),
        flags,
        dataset_shape: (table.row_count(), table.column_count()),
    }))
}

async fn quality_flags_from_csv(
    multipart: Multipart,
) -> std::result::Result<Json<CsvFlagsResponse>, ApiError> {
    let start = Instant::now();

    let (table, flags) = assess_upload(multipart).await?;

    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        rows = table.row_count(),
        cols = table.column_count(),
        "csv flags computed"
    );

    Ok(Json(CsvFlagsResponse {
        flags,
        latency_ms: round_to(latency_ms, 1),
        n_rows: table.row_count(),
        n_cols: table.column_count(),
    }))
}

/// Read the uploaded file and run the full pipeline:
/// parse -> summarize -> missing table -> flags.
async fn assess_upload(multipart: Multipart) -> std::result::Result<(Table, QualityFlags), ApiError> {
    let data = read_upload(multipart).await?;

    let mut cursor = Cursor::new(data);
    let table = Table::from_csv_reader(&mut cursor)?;

    let summary = summarize(&table);
    let missing = missing_table(&table);
    let flags = compute_quality_flags(&summary, &missing)?;

    Ok((table, flags))
}

/// Extract the first uploaded part's bytes.
async fn read_upload(mut multipart: Multipart) -> std::result::Result<Vec<u8>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| Error::parse(format!("invalid multipart upload: {e}")))?;

    let Some(field) = field else {
        return Err(Error::parse("upload contains no file part").into());
    };

    let bytes = field
        .bytes()
        .await
        .map_err(|e| Error::parse(format!("cannot read uploaded file: {e}")))?;

    Ok(bytes.to_vec())
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_request(uri: &str, csv: &str) -> Request<Body> {
        let boundary = "perfilar-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"data.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {csv}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "perfilar");
    }

    #[tokio::test]
    async fn test_quality_aggregate() {
        let request = Request::builder()
            .method("POST")
            .uri("/quality")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"n_rows":10,"n_cols":5,"max_missing_share":0.1,"numeric_cols":3,"categorical_cols":2}"#,
            ))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!((json["quality_score"].as_f64().unwrap() - 0.54).abs() < 1e-9);
        assert_eq!(json["ok_for_model"], true);
        assert_eq!(json["message"], "ok");
        assert_eq!(json["flags"]["too_few_rows"], true);
        assert_eq!(json["flags"]["too_many_missing"], false);
        assert_eq!(json["dataset_shape"][0], 10);
        assert!(json["latency_ms"].as_f64().is_some());
    }

    #[tokio::test]
    async fn test_quality_rejects_zero_rows() {
        let request = Request::builder()
            .method("POST")
            .uri("/quality")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"n_rows":0,"n_cols":5,"max_missing_share":0.1,"numeric_cols":3,"categorical_cols":2}"#,
            ))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "invalid_request");
    }

    #[tokio::test]
    async fn test_quality_from_csv() {
        let csv = "id,constant,zeros\n1,5,0\n2,5,0\n3,5,0\n4,5,10";
        let response = router()
            .oneshot(multipart_request("/quality-from-csv", csv))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["flags"]["has_constant_columns"], true);
        assert_eq!(json["flags"]["constant_column_names"][0], "constant");
        assert_eq!(json["flags"]["has_many_zero_values"], true);
        assert_eq!(json["dataset_shape"][0], 4);
        assert_eq!(json["dataset_shape"][1], 3);
        let score = json["quality_score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&score));
    }

    #[tokio::test]
    async fn test_quality_flags_from_csv() {
        let csv = "a,b\n1,x\n2,y\n3,z";
        let response = router()
            .oneshot(multipart_request("/quality-flags-from-csv", csv))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["n_rows"], 3);
        assert_eq!(json["n_cols"], 2);
        assert_eq!(json["flags"]["too_few_rows"], true);
        assert!(json["flags"]["quality_score"].as_f64().is_some());
    }

    #[tokio::test]
    async fn test_quality_from_csv_empty_upload() {
        // A header with no data rows parses to zero rows.
        let response = router()
            .oneshot(multipart_request("/quality-from-csv", "id,name"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "empty_table");
    }

    #[tokio::test]
    async fn test_quality_from_csv_unparseable_upload() {
        let response = router()
            .oneshot(multipart_request("/quality-from-csv", "a,b\n1,2,3,4\nx"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "parse");
    }
}

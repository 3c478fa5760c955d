use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, routing::post, Json, Router};
use draw_commands::command::literal;
use draw_commands::target::{Point, Stroke, DEFAULT_FONT_SIZE};
use draw_commands::{DrawError, DrawingTarget, RasterCanvas};
use log::{error, info, warn};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub canvas: Arc<Mutex<RasterCanvas>>,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(canvas: RasterCanvas, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            canvas: Arc::new(Mutex::new(canvas)),
            export_dir: export_dir.into(),
        }
    }

    /// Takes the canvas even if a handler panicked while holding it.
    pub fn lock(&self) -> MutexGuard<'_, RasterCanvas> {
        self.canvas.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/api/draw_line", post(draw_line))
        .route("/api/draw_circle", post(draw_circle))
        .route("/api/draw_rectangle", post(draw_rectangle))
        .route("/api/draw_text", post(draw_text))
        .route("/api/set_color", post(set_color))
        .route("/api/set_line_width", post(set_line_width))
        .route("/api/clear", post(clear))
        .route("/api/export", post(export_named))
        .route("/api/execute", post(execute_command))
        .route("/api/execute_command", post(execute_command))
        .route("/export", get(export_data_url))
        .with_state(state)
}

pub struct ApiError(DrawError);

impl From<DrawError> for ApiError {
    fn from(e: DrawError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("[server] {}", self.0);
        let body = Json(json!({"success": false, "error": self.0.to_string()}));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

fn ok() -> ApiResult {
    Ok(Json(json!({"success": true})))
}

fn stroke(canvas: &RasterCanvas, color: Option<String>, width: Option<f64>) -> Stroke {
    let state = canvas.state();
    Stroke::new(
        color.unwrap_or_else(|| state.current_color.clone()),
        width.unwrap_or(state.current_line_width),
    )
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "name": "draw_runner", "version": env!("CARGO_PKG_VERSION")}))
}

#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
}

async fn draw_line(State(state): State<AppState>, Json(req): Json<LineRequest>) -> ApiResult {
    let mut canvas = state.lock();
    let s = stroke(&canvas, req.color, req.width);
    canvas.draw_line(Point::new(req.x1, req.y1), Point::new(req.x2, req.y2), &s)?;
    ok()
}

#[derive(Debug, Deserialize)]
pub struct CircleRequest {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
}

async fn draw_circle(State(state): State<AppState>, Json(req): Json<CircleRequest>) -> ApiResult {
    let mut canvas = state.lock();
    let s = stroke(&canvas, req.color, req.width);
    canvas.draw_circle(Point::new(req.x, req.y), req.radius, &s)?;
    ok()
}

/// Decoded in field order: the first `width` is the rectangle's, a second one
/// is the stroke width.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleRequest {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Option<String>,
    pub stroke_width: Option<f64>,
}

impl<'de> Deserialize<'de> for RectangleRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RectVisitor;

        impl<'de> Visitor<'de> for RectVisitor {
            type Value = RectangleRequest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a rectangle object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RectangleRequest, A::Error> {
                let (mut x, mut y, mut height) = (None, None, None);
                let mut color = None;
                let mut widths: Vec<Option<f64>> = Vec::with_capacity(2);
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "x" => x = Some(map.next_value::<f64>()?),
                        "y" => y = Some(map.next_value::<f64>()?),
                        "height" => height = Some(map.next_value::<f64>()?),
                        "width" => widths.push(map.next_value::<Option<f64>>()?),
                        "color" => color = map.next_value::<Option<String>>()?,
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(RectangleRequest {
                    x: x.ok_or_else(|| <A::Error as de::Error>::missing_field("x"))?,
                    y: y.ok_or_else(|| <A::Error as de::Error>::missing_field("y"))?,
                    width: widths
                        .first()
                        .copied()
                        .flatten()
                        .ok_or_else(|| <A::Error as de::Error>::missing_field("width"))?,
                    height: height.ok_or_else(|| <A::Error as de::Error>::missing_field("height"))?,
                    color,
                    stroke_width: widths.get(1).copied().flatten(),
                })
            }
        }

        deserializer.deserialize_map(RectVisitor)
    }
}

async fn draw_rectangle(
    State(state): State<AppState>,
    Json(req): Json<RectangleRequest>,
) -> ApiResult {
    let mut canvas = state.lock();
    let s = stroke(&canvas, req.color, req.stroke_width);
    canvas.draw_rectangle(Point::new(req.x, req.y), req.width, req.height, &s)?;
    ok()
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
}

async fn draw_text(State(state): State<AppState>, Json(req): Json<TextRequest>) -> ApiResult {
    let mut canvas = state.lock();
    let color = req
        .color
        .unwrap_or_else(|| canvas.state().current_color.clone());
    let size = req.font_size.unwrap_or(DEFAULT_FONT_SIZE);
    canvas.draw_text(Point::new(req.x, req.y), &req.text, &color, size)?;
    ok()
}

#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    pub color: String,
}

async fn set_color(State(state): State<AppState>, Json(req): Json<ColorRequest>) -> ApiResult {
    state.lock().set_color(&req.color)?;
    ok()
}

#[derive(Debug, Deserialize)]
pub struct WidthRequest {
    pub width: f64,
}

async fn set_line_width(State(state): State<AppState>, Json(req): Json<WidthRequest>) -> ApiResult {
    state.lock().set_line_width(req.width)?;
    ok()
}

async fn clear(State(state): State<AppState>) -> ApiResult {
    state.lock().clear()?;
    ok()
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub filename: Option<String>,
}

/// Keeps only the file-name component so exports stay inside `dir`.
fn export_path(dir: &Path, filename: &str) -> Result<PathBuf, DrawError> {
    Path::new(filename.trim())
        .file_name()
        .map(|name| dir.join(name))
        .ok_or_else(|| DrawError::ParseError(format!("bad export filename {filename:?}")))
}

async fn export_named(State(state): State<AppState>, Json(req): Json<ExportRequest>) -> ApiResult {
    let filename = req
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string);
    // Encoding and file writes run off the async workers.
    let body = tokio::task::spawn_blocking(move || -> Result<Value, DrawError> {
        let canvas = state.lock();
        match filename {
            Some(name) => {
                let path = export_path(&state.export_dir, &name)?;
                canvas.save(&path)?;
                Ok(json!({"success": true, "filename": path.display().to_string()}))
            }
            None => Ok(json!({"success": true, "data_url": canvas.data_url()?})),
        }
    })
    .await
    .map_err(|e| DrawError::Render(format!("export task failed: {e}")))??;
    Ok(Json(body))
}

async fn export_data_url(State(state): State<AppState>) -> ApiResult {
    let data_url = state.lock().data_url()?;
    Ok(Json(json!({"data_url": data_url})))
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

async fn execute_command(State(state): State<AppState>, Json(req): Json<CommandRequest>) -> ApiResult {
    if literal::is_ping(&req.command) {
        return Ok(Json(json!({"success": true, "message": "pong"})));
    }
    state.lock().execute_raw(&req.command)?;
    ok()
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("[server] listening on {addr}");
    axum::serve(listener, app(state)).await
}

/// Serves `router` on an ephemeral local port from its own thread and runtime,
/// so blocking clients can call it.
pub fn spawn_in_background(router: Router) -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    std_listener.set_nonblocking(true)?;
    let addr = std_listener.local_addr()?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    std::thread::spawn(move || {
        rt.block_on(async move {
            let listener = match TcpListener::from_std(std_listener) {
                Ok(l) => l,
                Err(e) => {
                    error!("[server] listener: {e}");
                    return;
                }
            };
            if let Err(e) = axum::serve(listener, router).await {
                error!("[server] {e}");
            }
        });
    });
    Ok(addr)
}

pub fn spawn_test_server(canvas: RasterCanvas) -> std::io::Result<(SocketAddr, AppState)> {
    let state = AppState::new(canvas, std::env::temp_dir());
    let addr = spawn_in_background(app(state.clone()))?;
    Ok((addr, state))
}

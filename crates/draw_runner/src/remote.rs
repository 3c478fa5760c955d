use std::time::Duration;

use draw_commands::command::literal;
use draw_commands::target::{DrawingState, DrawingTarget, ExportOutcome, Point, Stroke};
use draw_commands::DrawError;
use log::debug;
use reqwest::blocking::{Client, Response};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;

pub const DEFAULT_DRAW_URL: &str = "http://localhost:8000";

/// Drawing target that forwards every primitive to a drawing service over HTTP.
pub struct RemoteCanvas {
    base_url: String,
    client: Client,
    state: DrawingState,
}

#[derive(Debug, Serialize)]
struct LineBody<'a> {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    color: &'a str,
    width: f64,
}

#[derive(Debug, Serialize)]
struct CircleBody<'a> {
    x: f64,
    y: f64,
    radius: f64,
    color: &'a str,
    width: f64,
}

/// `{x, y, width, height, color, width}`: the first `width` is the rectangle's,
/// the second the stroke's. Receivers must read the fields in order.
#[derive(Debug)]
pub struct RectangleBody<'a> {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: &'a str,
    pub stroke_width: f64,
}

impl Serialize for RectangleBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RectangleBody", 6)?;
        s.serialize_field("x", &self.x)?;
        s.serialize_field("y", &self.y)?;
        s.serialize_field("width", &self.width)?;
        s.serialize_field("height", &self.height)?;
        s.serialize_field("color", self.color)?;
        s.serialize_field("width", &self.stroke_width)?;
        s.end()
    }
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    x: f64,
    y: f64,
    text: &'a str,
    color: &'a str,
    font_size: f64,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    #[serde(default)]
    data_url: Option<String>,
}

impl RemoteCanvas {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DrawError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DrawError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            state: DrawingState::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `ping()` through the generic execute endpoint.
    pub fn ping(&self) -> Result<(), DrawError> {
        self.post_to("execute", &json!({"command": "ping()"})).map(|_| ())
    }

    fn post<B: Serialize + ?Sized>(&self, operation: &str, body: &B) -> Result<(), DrawError> {
        self.post_to(operation, body).map(|_| ())
    }

    fn post_to<B: Serialize + ?Sized>(&self, route: &str, body: &B) -> Result<Response, DrawError> {
        let url = format!("{}/api/{route}", self.base_url);
        debug!("[remote] POST {url}");
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| DrawError::Transport(e.to_string()))?;
        check(resp)
    }
}

fn check(resp: Response) -> Result<Response, DrawError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().unwrap_or_default();
    Err(DrawError::ServiceError(format!("{status} {text}")))
}

impl DrawingTarget for RemoteCanvas {
    fn state(&self) -> &DrawingState {
        &self.state
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), DrawError> {
        self.post(
            "draw_line",
            &LineBody {
                x1: from.x,
                y1: from.y,
                x2: to.x,
                y2: to.y,
                color: &stroke.color,
                width: stroke.width,
            },
        )
    }

    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) -> Result<(), DrawError> {
        self.post(
            "draw_circle",
            &CircleBody {
                x: center.x,
                y: center.y,
                radius,
                color: &stroke.color,
                width: stroke.width,
            },
        )
    }

    fn draw_rectangle(
        &mut self,
        origin: Point,
        width: f64,
        height: f64,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        self.post(
            "draw_rectangle",
            &RectangleBody {
                x: origin.x,
                y: origin.y,
                width,
                height,
                color: &stroke.color,
                stroke_width: stroke.width,
            },
        )
    }

    fn draw_text(
        &mut self,
        at: Point,
        text: &str,
        color: &str,
        font_size: f64,
    ) -> Result<(), DrawError> {
        self.post(
            "draw_text",
            &TextBody {
                x: at.x,
                y: at.y,
                text,
                color,
                font_size,
            },
        )
    }

    fn export(&mut self, filename: Option<&str>) -> Result<ExportOutcome, DrawError> {
        if let Some(name) = filename.map(str::trim).filter(|n| !n.is_empty()) {
            self.post("export", &json!({"filename": name}))?;
            return Ok(ExportOutcome::Sent(name.to_string()));
        }
        let url = format!("{}/export", self.base_url);
        debug!("[remote] GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DrawError::Transport(e.to_string()))?;
        let parsed: ExportResponse = check(resp)?
            .json()
            .map_err(|e| DrawError::ServiceError(format!("bad export response: {e}")))?;
        parsed
            .data_url
            .filter(|d| !d.is_empty())
            .map(ExportOutcome::Encoded)
            .ok_or_else(|| DrawError::ServiceError("export response has no data_url".into()))
    }

    fn clear(&mut self) -> Result<(), DrawError> {
        self.post("clear", &json!({}))
    }

    fn set_color(&mut self, color: &str) -> Result<(), DrawError> {
        self.state.current_color = color.to_string();
        self.post("set_color", &json!({"color": color}))
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), DrawError> {
        self.state.current_line_width = width;
        self.post("set_line_width", &json!({"width": width}))
    }

    fn execute_raw(&mut self, command: &str) -> Result<(), DrawError> {
        if literal::is_ping(command) {
            return self.ping();
        }
        self.post("execute_command", &json!({"command": command}))
    }
}

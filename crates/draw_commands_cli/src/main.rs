use std::io::{Read, Write};

use draw_commands::{
    execute_all, CanvasConfig, CommandTable, ExtractOrder, RasterCanvas, RunSummary,
};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct DrawRequest {
    text: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    background: Option<String>,
    /// "operation" (default) or "position".
    #[serde(default)]
    order: Option<String>,
}

#[derive(Debug, Serialize)]
struct DrawResponse {
    ok: bool,
    #[serde(flatten)]
    summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DrawResponse {
    fn failed(error: String) -> Self {
        Self {
            ok: false,
            summary: RunSummary::default(),
            image: None,
            error: Some(error),
        }
    }
}

fn order_from(name: Option<&str>) -> Result<ExtractOrder, String> {
    match name.map(str::trim) {
        None | Some("") | Some("operation") => Ok(ExtractOrder::ByOperation),
        Some("position") => Ok(ExtractOrder::ByPosition),
        Some(other) => Err(format!("unknown order {other:?}")),
    }
}

fn run(req: DrawRequest) -> DrawResponse {
    let defaults = CanvasConfig::default();
    let cfg = CanvasConfig {
        width: req.width.unwrap_or(defaults.width),
        height: req.height.unwrap_or(defaults.height),
        background: req.background.unwrap_or(defaults.background),
    };
    let order = match order_from(req.order.as_deref()) {
        Ok(o) => o,
        Err(e) => return DrawResponse::failed(e),
    };
    let mut canvas = match RasterCanvas::new(cfg) {
        Ok(c) => c,
        Err(e) => return DrawResponse::failed(e.to_string()),
    };

    let cmds = CommandTable::default().with_order(order).extract(&req.text);
    debug!("[cli] extracted {} commands", cmds.len());
    let summary = execute_all(&cmds, &mut canvas);
    match canvas.to_base64_png() {
        Ok(image) => DrawResponse {
            ok: true,
            summary,
            image: Some(image),
            error: None,
        },
        Err(e) => DrawResponse {
            ok: false,
            summary,
            image: None,
            error: Some(e.to_string()),
        },
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut input = String::new();
    let resp = match std::io::stdin().read_to_string(&mut input) {
        Err(e) => DrawResponse::failed(format!("failed to read stdin: {e}")),
        Ok(_) => match serde_json::from_str::<DrawRequest>(&input) {
            Ok(req) => run(req),
            Err(e) => DrawResponse::failed(format!("invalid json: {e}")),
        },
    };

    let mut w = std::io::stdout();
    match serde_json::to_string(&resp) {
        Ok(s) => {
            let _ = writeln!(w, "{s}");
        }
        Err(e) => {
            let _ = writeln!(w, "{}", serde_json::json!({"ok": false, "error": e.to_string()}));
        }
    }
}

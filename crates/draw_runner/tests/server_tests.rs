use draw_commands::canvas::Color;
use draw_commands::{CanvasConfig, DrawingTarget, RasterCanvas};
use draw_runner::server::{spawn_test_server, AppState, RectangleRequest};
use pretty_assertions::assert_eq;
use reqwest::blocking::Client;
use serde_json::{json, Value};

const RED: Color = Color::rgb(255, 0, 0);
const WHITE: Color = Color::rgb(255, 255, 255);

fn start() -> (String, AppState) {
    let canvas = RasterCanvas::new(CanvasConfig::default()).unwrap();
    let (addr, state) = spawn_test_server(canvas).unwrap();
    (format!("http://{addr}"), state)
}

fn post(url: &str, body: &Value) -> (u16, Value) {
    let resp = Client::new().post(url).json(body).send().unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().unwrap())
}

#[test]
fn health_endpoint_ok() {
    let (base, _state) = start();
    let body: Value = reqwest::blocking::get(format!("{base}/v1/health"))
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], "draw_runner");
}

#[test]
fn rectangle_body_is_read_in_field_order() {
    let req: RectangleRequest = serde_json::from_str(
        r##"{"x":1,"y":2,"width":30,"height":40,"color":"#ff0000","width":3}"##,
    )
    .unwrap();
    assert_eq!(
        req,
        RectangleRequest {
            x: 1.0,
            y: 2.0,
            width: 30.0,
            height: 40.0,
            color: Some("#ff0000".into()),
            stroke_width: Some(3.0),
        }
    );

    let single: RectangleRequest =
        serde_json::from_str(r#"{"x":1,"y":2,"width":30,"height":40}"#).unwrap();
    assert_eq!(single.width, 30.0);
    assert_eq!(single.stroke_width, None);
    assert!(serde_json::from_str::<RectangleRequest>(r#"{"x":1,"y":2,"height":4}"#).is_err());
}

#[test]
fn rectangle_with_duplicate_width_draws() {
    let (base, state) = start();
    let resp = Client::new()
        .post(format!("{base}/api/draw_rectangle"))
        .header("content-type", "application/json")
        .body(r##"{"x":100,"y":100,"width":200,"height":100,"color":"#ff0000","width":6}"##)
        .send()
        .unwrap();
    assert!(resp.status().is_success());
    let canvas = state.lock();
    assert_eq!(canvas.pixel(105, 150), Some(RED));
    assert_eq!(canvas.pixel(106, 150), Some(WHITE));
    assert_eq!(canvas.pixel(300, 200), Some(RED));
}

#[test]
fn null_style_falls_back_to_canvas_state() {
    let (base, state) = start();
    let (status, _) = post(&format!("{base}/api/set_color"), &json!({"color": "red"}));
    assert_eq!(status, 200);
    let (status, body) = post(
        &format!("{base}/api/draw_line"),
        &json!({"x1": 0, "y1": 20, "x2": 799, "y2": 20, "color": null, "width": null}),
    );
    assert_eq!((status, body), (200, json!({"success": true})));
    let canvas = state.lock();
    assert_eq!(canvas.state().current_color, "red");
    assert_eq!(canvas.pixel(400, 22), Some(RED));
}

#[test]
fn text_defaults_font_size() {
    let (base, _state) = start();
    let (status, _) = post(
        &format!("{base}/api/draw_text"),
        &json!({"x": 10, "y": 10, "text": "Hello"}),
    );
    assert_eq!(status, 200);
}

#[test]
fn execute_literal_and_ping() {
    let (base, state) = start();
    let (_, pong) = post(&format!("{base}/api/execute"), &json!({"command": "ping()"}));
    assert_eq!(pong, json!({"success": true, "message": "pong"}));

    let (status, _) = post(
        &format!("{base}/api/execute_command"),
        &json!({"command": "draw(circle,400,300,50)", "color": "#000000", "width": 5}),
    );
    assert_eq!(status, 200);
    assert_ne!(state.lock().pixel(450, 300), Some(WHITE));
}

#[test]
fn bad_requests_are_400() {
    let (base, _state) = start();
    let (status, body) = post(&format!("{base}/api/execute"), &json!({"command": "explode()"}));
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "unsupported operation: explode");

    let (status, body) = post(&format!("{base}/api/set_line_width"), &json!({"width": -2}));
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}

#[test]
fn export_routes() {
    let (base, state) = start();
    let body: Value = reqwest::blocking::get(format!("{base}/export"))
        .unwrap()
        .json()
        .unwrap();
    assert!(body["data_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    let (_, inline) = post(&format!("{base}/api/export"), &json!({}));
    assert_eq!(inline["success"], true);
    assert!(inline["data_url"].as_str().is_some());

    let name = format!("server_export_{}.png", std::process::id());
    let (status, saved) = post(
        &format!("{base}/api/export"),
        &json!({"filename": format!("../../{name}")}),
    );
    assert_eq!(status, 200);
    let path = state.export_dir.join(&name);
    assert_eq!(saved["filename"], path.display().to_string());
    assert!(path.exists());
    std::fs::remove_file(path).unwrap();
}

#[test]
fn huge_text_anchor_keeps_the_service_up() {
    let (base, state) = start();
    let (status, _) = post(
        &format!("{base}/api/draw_text"),
        &json!({"x": 1e22, "y": 10, "text": "hi"}),
    );
    assert_eq!(status, 200);
    let (status, _) = post(
        &format!("{base}/api/draw_text"),
        &json!({"x": 10, "y": -1e22, "text": "hi"}),
    );
    assert_eq!(status, 200);

    let (status, body) = post(&format!("{base}/api/clear"), &json!({}));
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(state.lock().pixel(10, 10), Some(WHITE));
}

#[test]
fn requests_after_a_panicked_handler_still_work() {
    let (base, state) = start();
    let canvas = state.canvas.clone();
    let crashed = std::thread::spawn(move || {
        let _guard = canvas.lock().unwrap();
        panic!("handler blew up mid-draw");
    })
    .join();
    assert!(crashed.is_err());
    assert!(state.canvas.is_poisoned());

    let (status, body) = post(&format!("{base}/api/clear"), &json!({}));
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let (status, _) = post(
        &format!("{base}/api/draw_circle"),
        &json!({"x": 400, "y": 300, "radius": 50, "color": "#ff0000", "width": 2}),
    );
    assert_eq!(status, 200);
    assert_eq!(state.lock().pixel(450, 300), Some(RED));
}

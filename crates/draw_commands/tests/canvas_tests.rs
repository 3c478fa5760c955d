use base64::Engine;
use pretty_assertions::assert_eq;

use draw_commands::canvas::{scale_for, Color};
use draw_commands::command::{CommandTable, ExtractedCommand, Operation};
use draw_commands::target::{DrawingState, ExportOutcome};
use draw_commands::{execute, execute_all, CanvasConfig, DrawError, DrawingTarget, RasterCanvas};

const WHITE: Color = Color::rgb(255, 255, 255);
const RED: Color = Color::rgb(255, 0, 0);
const BLUE: Color = Color::rgb(0, 0, 255);
const BLACK: Color = Color::rgb(0, 0, 0);

fn canvas() -> RasterCanvas {
    RasterCanvas::new(CanvasConfig::default()).unwrap()
}

fn run(canvas: &mut RasterCanvas, text: &str) -> usize {
    let cmds = CommandTable::default().extract(text);
    execute_all(&cmds, canvas).successful_commands
}

#[test]
fn defaults() {
    let c = canvas();
    assert_eq!(c.dimensions(), (800, 600));
    assert_eq!(c.pixel(0, 0), Some(WHITE));
    assert_eq!(c.pixel(800, 0), None);
    assert_eq!(c.state(), &DrawingState::default());
}

#[test]
fn bad_configs_are_rejected() {
    let zero = CanvasConfig {
        width: 0,
        ..CanvasConfig::default()
    };
    assert!(RasterCanvas::new(zero).is_err());
    let bg = CanvasConfig {
        background: "not-a-color".into(),
        ..CanvasConfig::default()
    };
    assert!(RasterCanvas::new(bg).is_err());
}

#[test]
fn oversized_canvas_is_a_parse_error() {
    let huge = CanvasConfig {
        width: u32::MAX,
        height: u32::MAX,
        ..CanvasConfig::default()
    };
    let err = RasterCanvas::new(huge).err().unwrap();
    assert!(matches!(err, DrawError::ParseError(_)), "{err:?}");

    let wide = CanvasConfig {
        width: 100_000,
        height: 100_000,
        ..CanvasConfig::default()
    };
    assert!(matches!(RasterCanvas::new(wide), Err(DrawError::ParseError(_))));
}

#[test]
fn huge_anchors_draw_nothing_and_do_not_panic() {
    let mut c = canvas();
    let text = [
        r#"api.draw_text(10000000000000000000000,10,"hi")"#,
        r#"api.draw_text(10,10000000000000000000000,"hi")"#,
        r#"api.draw_text(10000000000000000000000,10000000000000000000000,"hi\nthere")"#,
    ]
    .join("\n");
    let cmds = CommandTable::default()
        .with_order(draw_commands::ExtractOrder::ByPosition)
        .extract(&text);
    assert_eq!(cmds.len(), 3);
    assert_eq!(execute_all(&cmds, &mut c).successful_commands, 3);
    assert_eq!(c.pixel(10, 10), Some(WHITE));

    assert_eq!(
        run(
            &mut c,
            "api.draw_rectangle(10000000000000000000000,10000000000000000000000,5,5)"
        ),
        1
    );
    assert_eq!(run(&mut c, "api.draw_line(0,300,10000000000000000000000,300)"), 1);
    assert_eq!(c.pixel(400, 300), Some(BLACK));
    assert_eq!(c.pixel(400, 100), Some(WHITE));
}

#[test]
fn circle_outline_only() {
    let mut c = canvas();
    assert_eq!(run(&mut c, r##"api.draw_circle(400,300,50,"#ff0000",2)"##), 1);
    assert_eq!(c.pixel(450, 300), Some(RED));
    assert_eq!(c.pixel(350, 300), Some(RED));
    assert_eq!(c.pixel(400, 250), Some(RED));
    assert_eq!(c.pixel(400, 300), Some(WHITE));
    assert_eq!(c.pixel(455, 300), Some(WHITE));
}

#[test]
fn line_uses_state_when_style_omitted() {
    let mut c = canvas();
    assert_eq!(run(&mut c, "api.draw_line(10,10,100,10)"), 1);
    assert_eq!(c.pixel(50, 10), Some(BLACK));
    // Default width 5 reaches two pixels either side.
    assert_eq!(c.pixel(50, 12), Some(BLACK));
    assert_eq!(c.pixel(50, 14), Some(WHITE));
}

#[test]
fn rectangle_outline() {
    let mut c = canvas();
    assert_eq!(run(&mut c, "api.draw_rectangle(100,100,200,100,blue,3)"), 1);
    assert_eq!(c.pixel(100, 100), Some(BLUE));
    assert_eq!(c.pixel(300, 200), Some(BLUE));
    assert_eq!(c.pixel(102, 150), Some(BLUE));
    assert_eq!(c.pixel(103, 150), Some(WHITE));
    assert_eq!(c.pixel(200, 150), Some(WHITE));
}

#[test]
fn shapes_off_canvas_are_clipped() {
    let mut c = canvas();
    assert_eq!(run(&mut c, "api.draw_circle(-500,-500,10)\napi.draw_line(-10,5,5000,5)"), 2);
    assert_eq!(c.pixel(799, 5), Some(BLACK));
}

#[test]
fn text_marks_pixels_and_tolerates_missing_glyphs() {
    let mut c = canvas();
    assert_eq!(run(&mut c, r##"api.draw_text(10,10,"Hi",#ff0000,16)"##), 1);
    let scale = scale_for(16.0) as u32;
    let red = (10..10 + 16 * scale)
        .flat_map(|x| (10..10 + 8 * scale).map(move |y| (x, y)))
        .filter(|&(x, y)| c.pixel(x, y) == Some(RED))
        .count();
    assert!(red > 0);

    let mut c = canvas();
    assert_eq!(run(&mut c, "api.draw_text(10,10,\"\u{4f60}\u{597d}\")"), 1);
}

#[test]
fn set_color_then_draw() {
    let mut c = canvas();
    assert_eq!(run(&mut c, "api.set_color(red)"), 1);
    assert_eq!(c.state().current_color, "red");
    assert_eq!(run(&mut c, "api.draw_line(0,300,799,300)"), 1);
    assert_eq!(c.pixel(400, 300), Some(RED));
}

#[test]
fn invalid_style_fails_cleanly() {
    let mut c = canvas();
    assert_eq!(run(&mut c, "api.set_color(sparkly)"), 0);
    assert_eq!(c.state().current_color, "#000000");
    assert_eq!(run(&mut c, "api.draw_circle(10,10,-3)"), 0);
    assert!(c.set_line_width(-1.0).is_err());
    assert!(matches!(
        c.set_line_width(f64::NAN),
        Err(DrawError::ParseError(_))
    ));
}

#[test]
fn clear_resets_pixels_but_keeps_state() {
    let mut c = canvas();
    run(&mut c, "api.set_color(#00ff00)\napi.set_line_width(9)\napi.draw_line(0,0,799,599)");
    assert_ne!(c.pixel(400, 300), Some(WHITE));
    assert_eq!(run(&mut c, "api.clear()"), 1);
    assert_eq!(c.pixel(400, 300), Some(WHITE));
    assert_eq!(c.state().current_color, "#00ff00");
    assert_eq!(c.state().current_line_width, 9.0);
}

#[test]
fn clear_uses_configured_background() {
    let mut c = RasterCanvas::new(CanvasConfig {
        width: 10,
        height: 10,
        background: "#000000".into(),
    })
    .unwrap();
    c.draw_line(
        draw_commands::target::Point::new(0.0, 0.0),
        draw_commands::target::Point::new(9.0, 9.0),
        &draw_commands::target::Stroke::new("white", 1.0),
    )
    .unwrap();
    c.clear().unwrap();
    assert_eq!(c.pixel(5, 5), Some(BLACK));
}

#[test]
fn export_without_name_is_base64_png() {
    let mut c = canvas();
    let result = execute(&ExtractedCommand::new(Operation::Export, ""), &mut c);
    let Some(ExportOutcome::Encoded(b64)) = result.export else {
        panic!("expected encoded export, got {result:?}");
    };
    let png = base64::engine::general_purpose::STANDARD.decode(b64).unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (800, 600));
    assert!(c.data_url().unwrap().starts_with("data:image/png;base64,"));
}

#[test]
fn export_with_name_writes_file() {
    let dir = std::env::temp_dir().join(format!("draw_commands_export_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("out.png");
    let mut c = canvas();
    let outcome = c.export(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(outcome, ExportOutcome::Saved(path.clone()));
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (800, 600));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn raw_literal_commands_run_on_canvas() {
    let mut c = canvas();
    c.execute_raw("ping()").unwrap();
    c.execute_raw("setColor(#0000ff)").unwrap();
    c.execute_raw("draw(line,0,100,799,100)").unwrap();
    assert_eq!(c.pixel(400, 100), Some(BLUE));
    assert!(matches!(
        c.execute_raw("draw(hexagon,1,2,3)"),
        Err(DrawError::UnsupportedOperation(_))
    ));
}

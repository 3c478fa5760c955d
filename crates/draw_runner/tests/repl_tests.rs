use std::io::Cursor;

use draw_commands::canvas::Color;
use draw_commands::{CanvasConfig, RasterCanvas};
use draw_runner::config::RunnerConfig;
use draw_runner::llm_client::{LlmClient, MockLlm};
use draw_runner::repl::run_interactive;
use draw_runner::session::DrawSession;

fn session(responses: &[&str]) -> DrawSession<RasterCanvas> {
    let llm = LlmClient::Mock(MockLlm::new(responses.iter().map(|s| s.to_string()).collect()));
    let canvas = RasterCanvas::new(CanvasConfig::default()).unwrap();
    DrawSession::new(llm, canvas, RunnerConfig::default())
}

fn run(session: &mut DrawSession<RasterCanvas>, input: &str) -> String {
    let mut out = Vec::new();
    run_interactive(session, Cursor::new(input.to_string()), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn help_and_exit() {
    let mut s = session(&[]);
    let out = run(&mut s, "HELP\nExit\nclear()\n");
    assert!(out.contains("draw(line,x1,y1,x2,y2)"));
    assert!(out.trim_end().ends_with("bye"));
    assert!(!out.contains("ok clear()"));
}

#[test]
fn literal_commands_run_directly() {
    let mut s = session(&[]);
    let out = run(&mut s, "setColor(#ff0000)\ndraw(circle,400,300,50)\n\ndraw(star,1,2,3)\n");
    assert!(out.contains("ok set_color(#ff0000)"));
    assert!(out.contains("ok draw_circle(400,300,50)"));
    assert!(out.contains("fail draw(star,1,2,3): unsupported operation: draw type star"));
    assert_eq!(s.target().pixel(450, 300), Some(Color::rgb(255, 0, 0)));
}

#[test]
fn free_text_goes_to_the_model() {
    let mut s = session(&["api.draw_line(0,0,799,599)\napi.draw_circle(1,1)"]);
    let out = run(&mut s, "draw a diagonal\n");
    assert!(out.contains("asking the model"));
    assert!(out.contains("model: api.draw_line(0,0,799,599)"));
    assert!(out.contains("fail draw_circle(1,1)"));
    assert!(out.contains("1/2 commands succeeded"));
}

#[test]
fn model_errors_do_not_end_the_loop() {
    let mut s = session(&[]);
    let out = run(&mut s, "a cat\nclear()\n");
    assert!(out.contains("error: mock responses exhausted"));
    assert!(out.contains("ok clear()"));
}

#[test]
fn exports_are_summarised() {
    let mut s = session(&["Nothing to draw here."]);
    let out = run(&mut s, "export()\nsomething vague\n");
    assert!(out.contains("ok export() ("));
    assert!(out.contains("bytes encoded)"));
    assert!(out.contains("no drawing commands found"));
}

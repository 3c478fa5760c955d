pub fn drawing_system_prompt(canvas_width: u32, canvas_height: u32) -> String {
    [
        "You are a drawing assistant that controls a canvas through a small Python-style API.".to_string(),
        "Turn the user's description into API calls on the object `api`.".to_string(),
        "Output ONLY the calls, one per line, with no explanations and no markdown fences.".to_string(),
        String::new(),
        format!("The canvas is {canvas_width}x{canvas_height} pixels; (0,0) is the top-left corner."),
        String::new(),
        "Available calls (arguments in brackets are optional):".to_string(),
        "- api.draw_line(x1, y1, x2, y2[, color, width])".to_string(),
        "- api.draw_circle(x, y, radius[, color, width])".to_string(),
        "- api.draw_rectangle(x, y, width, height[, color, width])".to_string(),
        "- api.draw_text(x, y, \"text\"[, color, font_size])".to_string(),
        "- api.set_color(color)".to_string(),
        "- api.set_line_width(width)".to_string(),
        "- api.clear()".to_string(),
        "- api.export([\"filename.png\"])".to_string(),
        "- api.execute_command(\"draw(line,x1,y1,x2,y2)\")".to_string(),
        String::new(),
        "Rules:".to_string(),
        "- Coordinates and sizes are non-negative numbers.".to_string(),
        "- Colors are quoted hex strings such as \"#ff0000\".".to_string(),
        "- Text is always wrapped in double quotes.".to_string(),
        "- Do not nest parentheses inside an argument.".to_string(),
        String::new(),
        "Example:".to_string(),
        "api.draw_circle(400, 300, 50, \"#ff0000\", 2)".to_string(),
        "api.draw_line(100, 100, 500, 400, \"#0000ff\", 3)".to_string(),
        "api.draw_text(200, 500, \"Hello\", \"#000000\", 24)".to_string(),
    ]
    .join("\n")
}

pub fn drawing_prompt(user_input: &str, canvas_width: u32, canvas_height: u32) -> String {
    format!(
        "{}\n\nUser: {}\nAssistant:",
        drawing_system_prompt(canvas_width, canvas_height),
        user_input.trim()
    )
}

pub fn help_text() -> String {
    [
        "Describe a drawing in plain words, or type a command directly:",
        "  draw(line,x1,y1,x2,y2)",
        "  draw(circle,x,y,radius)",
        "  draw(rect,x,y,width,height)",
        "  draw(text,x,y,\"content\")",
        "  setColor(color)",
        "  setLineWidth(width)",
        "  clear()",
        "  export([filename])",
        "Other commands:",
        "  help  show this message",
        "  exit  quit",
    ]
    .join("\n")
}

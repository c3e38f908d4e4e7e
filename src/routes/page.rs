//! Server-rendered HTML for the drawing page.
//!
//! The page works without script: every control is a plain `<form>` that
//! posts to `/` and gets redirected back. The drawing itself is an image
//! submit button, so a click posts its coordinates as `at.x`/`at.y` and the
//! dispatcher decides between selecting and placing. All dynamic text is
//! escaped; the projected style is built from validated numbers and colors
//! but is escaped as an attribute value all the same.

use super::drawing::DrawingData;
use crate::drawing::{Shape, Tool};
use crate::form::{self, ActionKind};

const PAGE_STYLE: &str = "
body { margin: 0; font-family: sans-serif; }
.layout { display: grid; grid-template-columns: 12rem 1fr 16rem; min-height: 100vh; }
.sidebar, .edit { background: #e0f2fe; padding: 1rem; }
.sidebar ul { list-style: none; margin: 0; padding: 0; }
.sidebar li { margin-bottom: 0.75rem; }
.sidebar button { width: 100%; padding: 0.5rem; }
.sidebar button:disabled { opacity: 0.4; }
.canvas { position: relative; }
.drawing { position: relative; width: 100%; height: 100%; min-height: 600px; background-repeat: no-repeat; }
.click-target { position: absolute; top: 0; left: 0; width: 100%; height: 100%; opacity: 0; cursor: crosshair; }
.banner { background: #fee2e2; color: #991b1b; padding: 0.75rem 1rem; }
.edit label { display: flex; flex-direction: column; margin-bottom: 0.75rem; }
";

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Human-readable banner text for an error code from the query string.
/// Unknown codes render nothing.
#[must_use]
pub fn banner_message(error: Option<&str>, field: Option<&str>) -> Option<String> {
    let message = match error? {
        "NO_ACTION" => "No action was submitted.".to_owned(),
        "NO_TOOL" => "Pick a tool first.".to_owned(),
        "BAD_TOOL" => "That tool cannot place shapes. Pick a circle or a square.".to_owned(),
        "BAD_ACTION" => "That action is not supported.".to_owned(),
        "BAD_SELECTION" => "Select a shape first.".to_owned(),
        "FAILED_UPDATE" => "The shape could not be updated.".to_owned(),
        "FAILED_DELETE" => "The shape could not be removed.".to_owned(),
        "STORE_UNAVAILABLE" => "The drawing could not be saved. Try again.".to_owned(),
        "BAD_SHAPE" => match field.and_then(field_label) {
            Some(label) => format!("Invalid {label}."),
            None => "Invalid shape.".to_owned(),
        },
        _ => return None,
    };
    Some(message)
}

fn field_label(field: &str) -> Option<&'static str> {
    match field {
        "x" => Some("x position"),
        "y" => Some("y position"),
        "width" => Some("width"),
        "height" => Some("height"),
        "direction" => Some("direction"),
        "colors" => Some("colors"),
        "color-stops" => Some("color stops"),
        "colors-id" => Some("color stop"),
        _ => None,
    }
}

fn hidden(name: &str, value: &str) -> String {
    format!(r#"<input type="hidden" name="{}" value="{}">"#, escape_html(name), escape_html(value))
}

fn tool_button(current: Tool, tool: Tool, label: &str) -> String {
    let disabled = if current == tool { " disabled" } else { "" };
    format!(
        r#"<li><form method="post" action="/">{}{}<button type="submit"{disabled}>{label}</button></form></li>"#,
        hidden(form::FIELD_ACTION, ActionKind::PickTool.as_str()),
        hidden(form::FIELD_TOOL, tool.as_str()),
    )
}

fn sidebar(data: &DrawingData) -> String {
    let tool = data.session.tool;
    let mut html = String::from(r#"<aside class="sidebar"><h5>Pick your tool</h5><nav><ul>"#);
    html.push_str(&format!(
        r#"<li><form method="post" action="/">{}<button type="submit">CLEAR</button></form></li>"#,
        hidden(form::FIELD_ACTION, ActionKind::ClearSession.as_str())
    ));
    html.push_str(&tool_button(tool, Tool::Circle, "Circle"));
    html.push_str(&tool_button(tool, Tool::Square, "Square"));
    html.push_str(&tool_button(tool, Tool::Select, "Select"));
    html.push_str("</ul></nav>");
    html.push_str(&shape_list(data));
    html.push_str("</aside>");
    html
}

fn shape_list(data: &DrawingData) -> String {
    if data.shapes.is_empty() {
        return String::new();
    }
    let selected = data.selected_shape.as_ref().map(|shape| shape.id);
    let mut html = String::from("<h5>Shapes</h5><ul>");
    for shape in &data.shapes {
        let id = shape.id.to_string();
        let marker = if selected == Some(shape.id) { " (selected)" } else { "" };
        html.push_str(&format!(
            r#"<li>{} #{id}{marker}<form method="post" action="/">{}{}<button type="submit">Select</button></form><form method="post" action="/">{}{}<button type="submit">Remove</button></form></li>"#,
            shape.kind.as_str(),
            hidden(form::FIELD_ACTION, ActionKind::SelectShape.as_str()),
            hidden(form::FIELD_SELECTED, &id),
            hidden(form::FIELD_ACTION, ActionKind::RemoveShape.as_str()),
            hidden(form::FIELD_SHAPE_ID, &id),
        ));
    }
    html.push_str("</ul>");
    html
}

/// Transparent 1x1 GIF stretched over the drawing so a click posts its point.
const CLICK_TARGET_SRC: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

fn surface(data: &DrawingData) -> String {
    let mut html = String::from(r#"<section class="surface"><form class="canvas" method="post" action="/">"#);
    html.push_str(&hidden(form::FIELD_ACTION, ActionKind::AddShape.as_str()));
    html.push_str(&format!(
        r#"<div class="drawing" style="{}"></div>"#,
        escape_html(&data.style.to_style_attr())
    ));
    html.push_str(&format!(
        r#"<input type="image" class="click-target" name="at" src="{CLICK_TARGET_SRC}" alt="Select a shape or place one here">"#
    ));
    html.push_str("</form>");

    // Typed coordinates live in their own form so Enter never submits a click.
    if data.session.tool.shape_kind().is_some() {
        html.push_str(r#"<form class="place" method="post" action="/">"#);
        html.push_str(&hidden(form::FIELD_ACTION, ActionKind::AddShape.as_str()));
        html.push_str(r#"<label>x <input type="number" name="x"></label><label>y <input type="number" name="y"></label><button type="submit">Place shape</button></form>"#);
    }
    html.push_str("</section>");
    html
}

fn number_input(name: &str, label: &str, value: f64) -> String {
    format!(r#"<label for="{name}">{label}:<input type="number" step="any" id="{name}" name="{name}" value="{value}"></label>"#)
}

fn edit_form(shape: &Shape) -> String {
    let mut html = String::from(r#"<form class="edit" method="post" action="/">"#);
    html.push_str(&hidden(form::FIELD_ACTION, ActionKind::EditShape.as_str()));
    html.push_str(&hidden(form::FIELD_SELECTED, &shape.id.to_string()));
    html.push_str(&number_input(form::FIELD_X, "x", shape.x));
    html.push_str(&number_input(form::FIELD_Y, "y", shape.y));
    html.push_str(&number_input(form::FIELD_HEIGHT, "height", shape.height));
    html.push_str(&number_input(form::FIELD_WIDTH, "width", shape.width));
    html.push_str(&number_input(form::FIELD_DIRECTION, "direction", shape.direction_or_default()));

    for (index, stop) in shape.colors.iter().enumerate() {
        let color = escape_html(&stop.color);
        html.push_str("<div>");
        html.push_str(&hidden(form::FIELD_COLOR_IDS, &stop.id.to_string()));
        html.push_str(&format!(
            r#"<label for="colors[{index}]">{color}:<input type="text" id="colors[{index}]" name="{}" value="{color}"></label>"#,
            form::FIELD_COLORS
        ));
        html.push_str(&format!(
            r#"<label for="color-stops[{index}]">Stop:<input type="number" min="0" max="100" id="color-stops[{index}]" name="{}" value="{}"></label>"#,
            form::FIELD_COLOR_STOPS,
            stop.stop
        ));
        html.push_str("</div>");
    }

    html.push_str(r#"<button type="submit">Edit</button></form>"#);
    html
}

/// Render the full page for `data`, with an optional error banner.
#[must_use]
pub fn render(data: &DrawingData, banner: Option<&str>) -> String {
    let mut html = String::from("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">");
    html.push_str("<title>Single Div Painter</title><style>");
    html.push_str(PAGE_STYLE);
    html.push_str("</style></head><body>");

    if let Some(message) = banner {
        html.push_str(&format!(r#"<div class="banner" role="alert">{}</div>"#, escape_html(message)));
    }

    html.push_str(r#"<main class="layout">"#);
    html.push_str(&sidebar(data));
    html.push_str(&surface(data));
    match &data.selected_shape {
        Some(shape) => html.push_str(&edit_form(shape)),
        None => html.push_str(r#"<div class="edit"></div>"#),
    }
    html.push_str("</main></body></html>");
    html
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;

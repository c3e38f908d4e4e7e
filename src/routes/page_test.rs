use super::*;
use crate::drawing::style::BackgroundStyle;
use crate::drawing::{ColorStop, ShapeKind};
use crate::services::session::DrawingSession;

fn shape(id: i64) -> Shape {
    Shape {
        id,
        kind: ShapeKind::Square,
        x: 10.0,
        y: 0.0,
        width: 40.0,
        height: 30.0,
        direction: None,
        colors: vec![
            ColorStop { id: 7, shape_id: id, color: "red".into(), opacity: 1.0, stop: 25 },
            ColorStop { id: 8, shape_id: id, color: "blue".into(), opacity: 1.0, stop: 75 },
        ],
    }
}

fn data(tool: Tool, shapes: Vec<Shape>, selected: Option<Shape>) -> DrawingData {
    let style = crate::drawing::style::project(&shapes, None, tool, selected.as_ref().map(|s| s.id));
    DrawingData {
        session: DrawingSession { tool, selected_shape: selected.as_ref().map(|s| s.id), has_js: None },
        shapes,
        selected_shape: selected,
        style,
    }
}

#[test]
fn escape_html_replaces_markup() {
    assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    assert_eq!(escape_html("plain"), "plain");
}

#[test]
fn banner_known_codes() {
    assert_eq!(banner_message(Some("BAD_SHAPE"), Some("width")).as_deref(), Some("Invalid width."));
    assert_eq!(banner_message(Some("BAD_SHAPE"), Some("bogus")).as_deref(), Some("Invalid shape."));
    assert_eq!(banner_message(Some("FAILED_DELETE"), None).as_deref(), Some("The shape could not be removed."));
}

#[test]
fn banner_ignores_unknown_codes() {
    assert_eq!(banner_message(Some("<script>"), None), None);
    assert_eq!(banner_message(None, Some("x")), None);
}

#[test]
fn empty_drawing_has_no_style() {
    let html = render(&data(Tool::Select, Vec::new(), None), None);
    assert!(html.contains(r#"<div class="drawing" style=""></div>"#));
    assert!(!html.contains("Place shape"));
    assert!(!html.contains("EDIT_SHAPE"));
}

#[test]
fn drawing_tool_offers_placement() {
    let html = render(&data(Tool::Circle, Vec::new(), None), None);
    assert!(html.contains("Place shape"));
    assert!(html.contains(r#"name="action" value="ADD_SHAPE""#));
    // The active tool's button is disabled.
    assert!(html.contains(r#"value="CIRCLE"><button type="submit" disabled>"#));
}

#[test]
fn drawing_surface_posts_click_point() {
    for tool in [Tool::Select, Tool::Square] {
        let html = render(&data(tool, vec![shape(3)], None), None);
        let canvas_start = html.find(r#"<form class="canvas""#).unwrap();
        let canvas = &html[canvas_start..canvas_start + html[canvas_start..].find("</form>").unwrap()];
        assert!(canvas.contains(r#"name="action" value="ADD_SHAPE""#));
        assert!(canvas.contains(r#"<input type="image" class="click-target" name="at""#));
        // Typed coordinates never share the click form.
        assert!(!canvas.contains(r#"name="x""#));
    }
}

#[test]
fn shapes_render_into_style_attribute() {
    let html = render(&data(Tool::Select, vec![shape(3)], None), None);
    assert!(html.contains("background-image: linear-gradient(90deg, red 25%, blue 75%);"));
    assert!(html.contains("background-size: 40px 30px;"));
    assert!(html.contains("background-position: 10px 0px;"));
    assert!(html.contains(r#"name="shapeId" value="3""#));
}

#[test]
fn selected_shape_renders_edit_form() {
    let selected = shape(3);
    let html = render(&data(Tool::Select, vec![selected.clone()], Some(selected)), None);
    assert!(html.contains(r#"name="action" value="EDIT_SHAPE""#));
    assert!(html.contains(r#"name="selected" value="3""#));
    assert!(html.contains(r#"name="direction" value="90""#));
    assert!(html.contains(r#"name="colors-id" value="7""#));
    assert!(html.contains(r#"name="colors-id" value="8""#));
    assert!(html.contains(r#"name="color-stops" value="75""#));
    assert!(html.contains("hotpink"));
}

#[test]
fn banner_is_escaped() {
    let empty = DrawingData {
        session: DrawingSession::default(),
        shapes: Vec::new(),
        selected_shape: None,
        style: BackgroundStyle::default(),
    };
    let html = render(&empty, Some("<b>boom</b>"));
    assert!(html.contains(r#"<div class="banner" role="alert">&lt;b&gt;boom&lt;/b&gt;</div>"#));
}

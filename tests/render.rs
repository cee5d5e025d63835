use cairo::{Format, ImageSurface};
use imgmark::{
    config::KeybindingsConfig,
    draw::{Canvas, RenderContext, ShapeKind, color},
    export,
    input::{InputState, MouseButton, Tool},
    util::SnapGrid,
};
use tempfile::TempDir;

fn annotator(width: i32, height: i32) -> InputState {
    let background = ImageSurface::create(Format::ARgb32, width, height).unwrap();
    {
        let ctx = cairo::Context::new(&background).unwrap();
        ctx.set_source_rgb(0.2, 0.4, 0.6);
        ctx.paint().unwrap();
    }
    let canvas = Canvas::new(background, SnapGrid::new(0)).unwrap();
    let action_map = KeybindingsConfig::default().build_action_map().unwrap();
    InputState::new(canvas, RenderContext::default(), action_map)
}

fn drag(state: &mut InputState, from: (i32, i32), to: (i32, i32)) {
    let offset = state.toolbar_height();
    state.on_mouse_press(MouseButton::Left, from.0, from.1 + offset);
    state.on_mouse_motion(to.0, to.1 + offset);
    state.on_mouse_release(MouseButton::Left, to.0, to.1 + offset);
}

fn click(state: &mut InputState, x: i32, y: i32) {
    state.on_mouse_press(MouseButton::Left, x, y);
    state.on_mouse_release(MouseButton::Left, x, y);
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
}

#[test]
fn saved_rectangle_matches_screen_composite() {
    let temp = TempDir::new().unwrap();
    let mut state = annotator(800, 600);

    let before = temp.path().join("before.png");
    export::save_surface(state.composited_image().unwrap(), &before).unwrap();

    drag(&mut state, (100, 100), (300, 250));
    assert_eq!(state.canvas.len(), 1);

    let after = temp.path().join("after.png");
    export::save_surface(state.composited_image().unwrap(), &after).unwrap();

    let before = image::open(&before).unwrap().to_rgba8();
    let after = image::open(&after).unwrap().to_rgba8();
    assert_eq!(after.dimensions(), (800, 600));

    // Far from the shape the background is untouched
    assert_eq!(before.get_pixel(600, 500), after.get_pixel(600, 500));
    assert_eq!(before.get_pixel(5, 5), after.get_pixel(5, 5));

    // Outline in the first palette colour
    let [r, g, b, _] = color::PALETTE[0].to_rgba8();
    assert!(close(after.get_pixel(200, 101).0, [r, g, b, 255]));

    // Translucent fill tints the interior
    assert_ne!(before.get_pixel(200, 180), after.get_pixel(200, 180));
}

#[test]
fn toolbar_click_selects_second_tool_for_next_drag() {
    let mut state = annotator(800, 600);
    let arrow_icon = state.toolbar.icons()[1].rect.center();

    click(&mut state, arrow_icon.x, arrow_icon.y);
    assert!(state.canvas.is_empty());
    assert_eq!(state.active_tool(), Tool::Arrow);

    drag(&mut state, (50, 50), (250, 200));
    assert_eq!(state.canvas.shapes()[0].kind, ShapeKind::Arrow);
}

#[test]
fn bullet_labels_are_reused_after_undo() {
    let mut state = annotator(400, 300);
    state.select_tool(Tool::Bullet);

    drag(&mut state, (40, 40), (40, 40));
    drag(&mut state, (120, 40), (120, 40));
    let labels: Vec<_> = state
        .canvas
        .shapes()
        .iter()
        .filter_map(|shape| shape.bullet_label())
        .collect();
    assert_eq!(labels, vec![1, 2]);

    state.undo();
    drag(&mut state, (200, 40), (200, 40));
    assert_eq!(state.canvas.shapes()[1].bullet_label(), Some(2));
}

#[test]
fn frame_contains_toolbar_and_canvas() {
    let mut state = annotator(800, 600);
    let (width, height) = state.window_size();
    let frame = ImageSurface::create(Format::ARgb32, width, height).unwrap();

    let damage = state.render_frame(&frame).unwrap();
    assert!(!damage.is_empty());
    assert!(!state.needs_redraw);

    drag(&mut state, (10, 10), (60, 60));
    let damage = state.render_frame(&frame).unwrap();
    let toolbar = state.toolbar_height();
    assert!(damage.iter().all(|rect| rect.y >= toolbar));
}

//! Toolbar layout, hit-testing and selection state.
//!
//! The toolbar is a single row above the canvas: shape icons, palette
//! swatches, then action buttons, separated into three groups.

use cairo::ImageSurface;

use crate::draw::color::{self, Color, PALETTE};
use crate::draw::render::{Raster, RenderContext};
use crate::draw::Shape;
use crate::input::Tool;
use crate::util::Rect;

use super::icons;

/// Gap between shape icons and between buttons, and before the first icon.
pub const ICON_MARGIN: i32 = 5;
/// Extra gap between icon groups.
pub const GROUP_SEPARATION: i32 = 20;
/// Icon size when the whole row fits.
pub const LARGE_ICON_SIZE: i32 = 40;
/// Icon size for narrow images.
pub const SMALL_ICON_SIZE: i32 = 20;

/// Actions offered by toolbar buttons, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    Undo,
    Copy,
    Save,
    ToggleScale,
    Clear,
}

impl ToolbarButton {
    pub const ALL: [ToolbarButton; 5] = [
        ToolbarButton::Undo,
        ToolbarButton::Copy,
        ToolbarButton::Save,
        ToolbarButton::ToggleScale,
        ToolbarButton::Clear,
    ];
}

/// What a toolbar icon does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconTarget {
    Shape(Tool),
    Color(usize),
    Button(ToolbarButton),
}

/// A clickable icon and its window-space box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub rect: Rect,
    pub target: IconTarget,
}

/// Result of routing a click to the toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// No icon under the pointer.
    Ignored,
    ToolSelected(Tool),
    ColorSelected(Color),
    /// The button has to be executed by the caller.
    Button(ToolbarButton),
}

impl ClickOutcome {
    /// Returns true when an icon consumed the click.
    pub fn consumed(&self) -> bool {
        !matches!(self, ClickOutcome::Ignored)
    }
}

/// Toolbar state: icon layout plus the selected tool and color.
#[derive(Debug)]
pub struct Toolbar {
    width: i32,
    icon_size: i32,
    icons: Vec<Icon>,
    selected_tool: Tool,
    selected_color: usize,
    large_widgets: bool,
    dirty: bool,
    previews: Vec<Shape>,
    swatches: Vec<Option<Raster>>,
}

impl Toolbar {
    /// Number of icons in the row.
    pub fn icon_count() -> usize {
        Tool::ALL.len() + PALETTE.len() + ToolbarButton::ALL.len()
    }

    /// Rough row width for `icon_size`, used to pick the icon size.
    pub fn estimate_width(icon_size: i32) -> i32 {
        let n = Self::icon_count() as i32;
        icon_size * n + ICON_MARGIN * (n - 4) + 2 * GROUP_SEPARATION
    }

    /// Toolbar height for a window `width` pixels wide.
    ///
    /// Large icons are used only when the whole row fits.
    pub fn height_for(width: i32) -> i32 {
        if width >= Self::estimate_width(LARGE_ICON_SIZE) {
            LARGE_ICON_SIZE
        } else {
            SMALL_ICON_SIZE
        }
    }

    /// Lays out the toolbar for a window `width` pixels wide.
    pub fn new(width: i32) -> Self {
        let icon_size = Self::height_for(width);
        let icons = layout(icon_size);
        let previews = icons
            .iter()
            .filter_map(|icon| match icon.target {
                IconTarget::Shape(tool) => Some(Shape::preview(tool, color::BLACK, icon.rect)),
                _ => None,
            })
            .collect();

        Self {
            width,
            icon_size,
            icons,
            selected_tool: Tool::default(),
            selected_color: 0,
            large_widgets: false,
            dirty: true,
            previews,
            swatches: PALETTE.iter().map(|_| None).collect(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.icon_size
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.icon_size,
        }
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    /// Window-space box of the icon for `target`.
    pub fn icon_rect(&self, target: IconTarget) -> Option<Rect> {
        self.icons
            .iter()
            .find(|icon| icon.target == target)
            .map(|icon| icon.rect)
    }

    pub fn selected_tool(&self) -> Tool {
        self.selected_tool
    }

    pub fn selected_color(&self) -> Color {
        PALETTE[self.selected_color]
    }

    pub fn selected_color_index(&self) -> usize {
        self.selected_color
    }

    pub fn select_tool(&mut self, tool: Tool) {
        if self.selected_tool != tool {
            log::debug!("Tool selected: {}", tool.name());
            self.selected_tool = tool;
            self.dirty = true;
        }
    }

    /// Selects a palette entry; out-of-range indices are ignored.
    pub fn select_color(&mut self, index: usize) {
        if index < PALETTE.len() && self.selected_color != index {
            self.selected_color = index;
            self.dirty = true;
        }
    }

    /// Highlights the scale button while widgets are large.
    pub fn set_large_widgets(&mut self, large: bool) {
        if self.large_widgets != large {
            self.large_widgets = large;
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Icon under window position `(x, y)`, scanning in layout order.
    pub fn icon_at(&self, x: i32, y: i32) -> Option<&Icon> {
        self.icons.iter().find(|icon| icon.rect.contains(x, y))
    }

    /// Routes a click at window position `(x, y)`.
    ///
    /// Shape and color icons update the selection here. Buttons are only
    /// reported; executing them needs the canvas and is up to the caller.
    pub fn handle_click(&mut self, x: i32, y: i32) -> ClickOutcome {
        let Some(target) = self.icon_at(x, y).map(|icon| icon.target) else {
            return ClickOutcome::Ignored;
        };
        self.dirty = true;
        match target {
            IconTarget::Shape(tool) => {
                self.select_tool(tool);
                ClickOutcome::ToolSelected(tool)
            }
            IconTarget::Color(index) => {
                self.select_color(index);
                ClickOutcome::ColorSelected(PALETTE[index])
            }
            IconTarget::Button(button) => {
                log::debug!("Toolbar button {:?}", button);
                ClickOutcome::Button(button)
            }
        }
    }

    /// Paints the toolbar at the top of `ctx` and clears the dirty flag.
    pub fn render(&mut self, ctx: &cairo::Context, rc: &RenderContext) -> Result<(), cairo::Error> {
        ctx.save()?;
        ctx.rectangle(0.0, 0.0, self.width as f64, self.icon_size as f64);
        ctx.clip();
        color::GREY.apply(ctx);
        ctx.paint()?;

        for preview in &mut self.previews {
            let tool = preview.kind.tool();
            let fill = if tool == self.selected_tool {
                color::SELECTED
            } else {
                color::GREY
            };
            icons::paint_icon_tile(ctx, preview.rect(), fill);
            preview.draw(ctx, rc)?;
        }

        for icon in &self.icons {
            match icon.target {
                IconTarget::Shape(_) => {}
                IconTarget::Color(slot) => {
                    if slot == self.selected_color {
                        icons::paint_icon_tile(ctx, icon.rect, color::SELECTED);
                    }
                    let cached = &mut self.swatches[slot];
                    if cached.is_none() {
                        *cached = Some(icons::rasterize_swatch(icon.rect, PALETTE[slot])?);
                    }
                    if let Some(swatch) = cached {
                        swatch.paint_onto(ctx)?;
                    }
                }
                IconTarget::Button(button) => {
                    let face = if button == ToolbarButton::ToggleScale && self.large_widgets {
                        color::SELECTED
                    } else {
                        color::BUTTON_FACE
                    };
                    icons::paint_button(ctx, icon.rect, button, face);
                }
            }
        }

        ctx.restore()?;
        self.dirty = false;
        Ok(())
    }

    /// Renders the toolbar into a standalone surface.
    pub fn render_to_surface(&mut self, rc: &RenderContext) -> Result<ImageSurface, cairo::Error> {
        let surface = ImageSurface::create(cairo::Format::ARgb32, self.width.max(1), self.icon_size)?;
        {
            let ctx = cairo::Context::new(&surface)?;
            self.render(&ctx, rc)?;
        }
        surface.flush();
        Ok(surface)
    }
}

/// Computes icon boxes left to right.
///
/// Shape icons and buttons are spaced by [`ICON_MARGIN`]; swatches touch.
fn layout(size: i32) -> Vec<Icon> {
    let mut icons = Vec::with_capacity(Toolbar::icon_count());
    let mut x = ICON_MARGIN;

    for tool in Tool::ALL {
        icons.push(Icon {
            rect: Rect::square(x, 0, size),
            target: IconTarget::Shape(tool),
        });
        x += size + ICON_MARGIN;
    }

    x += GROUP_SEPARATION;
    for index in 0..PALETTE.len() {
        icons.push(Icon {
            rect: Rect::square(x, 0, size),
            target: IconTarget::Color(index),
        });
        x += size;
    }

    x += GROUP_SEPARATION;
    for button in ToolbarButton::ALL {
        icons.push(Icon {
            rect: Rect::square(x, 0, size),
            target: IconTarget::Button(button),
        });
        x += size + ICON_MARGIN;
    }

    icons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_depends_on_available_width() {
        assert_eq!(Toolbar::estimate_width(LARGE_ICON_SIZE), 785);
        assert_eq!(Toolbar::height_for(800), LARGE_ICON_SIZE);
        assert_eq!(Toolbar::height_for(785), LARGE_ICON_SIZE);
        assert_eq!(Toolbar::height_for(784), SMALL_ICON_SIZE);
        assert_eq!(Toolbar::new(320).height(), SMALL_ICON_SIZE);
    }

    #[test]
    fn layout_groups_icons_in_order() {
        let toolbar = Toolbar::new(800);
        let icons = toolbar.icons();
        assert_eq!(icons.len(), 17);
        assert_eq!(icons[0].rect, Rect::square(5, 0, 40));
        assert_eq!(icons[1].rect, Rect::square(50, 0, 40));
        assert_eq!(icons[2].rect, Rect::square(95, 0, 40));
        // separation before the palette
        assert_eq!(icons[3].rect.x, 140 + GROUP_SEPARATION);
        // swatches are contiguous
        assert_eq!(icons[4].rect.x, icons[3].rect.right());
        assert_eq!(icons[12].target, IconTarget::Button(ToolbarButton::Undo));
        assert_eq!(icons[12].rect.x, icons[11].rect.right() + GROUP_SEPARATION);
        assert_eq!(icons[16].target, IconTarget::Button(ToolbarButton::Clear));
    }

    #[test]
    fn icons_never_overlap() {
        let toolbar = Toolbar::new(800);
        for pair in toolbar.icons().windows(2) {
            assert!(pair[0].rect.right() <= pair[1].rect.x);
        }
    }

    #[test]
    fn clicking_second_shape_icon_selects_arrow() {
        let mut toolbar = Toolbar::new(800);
        let center = toolbar.icons()[1].rect.center();
        let outcome = toolbar.handle_click(center.x, center.y);
        assert_eq!(outcome, ClickOutcome::ToolSelected(Tool::Arrow));
        assert!(outcome.consumed());
        assert_eq!(toolbar.selected_tool(), Tool::Arrow);
    }

    #[test]
    fn clicking_swatch_selects_color() {
        let mut toolbar = Toolbar::new(800);
        assert_eq!(toolbar.selected_color(), PALETTE[0]);
        let rect = toolbar.icon_rect(IconTarget::Color(2)).unwrap();
        let outcome = toolbar.handle_click(rect.x, rect.y + 5);
        assert_eq!(outcome, ClickOutcome::ColorSelected(color::YELLOW));
        assert_eq!(toolbar.selected_color_index(), 2);
    }

    #[test]
    fn buttons_are_reported_not_executed() {
        let mut toolbar = Toolbar::new(800);
        let rect = toolbar.icon_rect(IconTarget::Button(ToolbarButton::Save)).unwrap();
        let outcome = toolbar.handle_click(rect.x + 1, rect.y + 1);
        assert_eq!(outcome, ClickOutcome::Button(ToolbarButton::Save));
        assert_eq!(toolbar.selected_tool(), Tool::Rectangle);
    }

    #[test]
    fn gaps_and_empty_space_are_ignored() {
        let mut toolbar = Toolbar::new(800);
        // margin before the first icon
        assert_eq!(toolbar.handle_click(2, 10), ClickOutcome::Ignored);
        // gap between the first two shape icons
        assert_eq!(toolbar.handle_click(47, 10), ClickOutcome::Ignored);
        // right of the last button
        assert_eq!(toolbar.handle_click(799, 10), ClickOutcome::Ignored);
        assert!(!ClickOutcome::Ignored.consumed());
    }

    #[test]
    fn selection_changes_mark_toolbar_dirty() {
        let rc = RenderContext::default();
        let mut toolbar = Toolbar::new(800);
        toolbar.render_to_surface(&rc).unwrap();
        assert!(!toolbar.is_dirty());

        toolbar.select_tool(Tool::Rectangle);
        assert!(!toolbar.is_dirty());
        toolbar.select_tool(Tool::Bullet);
        assert!(toolbar.is_dirty());

        toolbar.render_to_surface(&rc).unwrap();
        toolbar.set_large_widgets(true);
        assert!(toolbar.is_dirty());
    }

    #[test]
    fn render_to_surface_matches_toolbar_size() {
        let rc = RenderContext::default();
        let mut toolbar = Toolbar::new(640);
        let surface = toolbar.render_to_surface(&rc).unwrap();
        assert_eq!((surface.width(), surface.height()), (640, SMALL_ICON_SIZE));
    }
}

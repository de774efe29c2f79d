//! Cursor-based page layout.
//!
//! [`PageLayout`] tracks a position, the current font and the current
//! colours, and turns cell-level calls into primitive drawing calls on a
//! [`Surface`]. Coordinates are millimetres measured from the top-left
//! corner of the page. There is no page-break logic: content past the
//! bottom edge is drawn off the page.

use super::metrics::{pt_to_mm, text_width_mm, wrap_text_by_width_mm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8(255, 255, 255);

    pub fn to_unit(self) -> (f32, f32, f32) {
        (self.0 as f32 / 255.0, self.1 as f32 / 255.0, self.2 as f32 / 255.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Where the cursor goes after a cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Same row, immediately after the cell.
    Right,
    /// Left margin, one cell height down.
    NextLine,
}

/// Primitive drawing operations a layout is rendered onto.
pub trait Surface {
    fn set_font(&mut self, style: FontStyle, size_pt: f32);
    fn set_text_color(&mut self, color: Rgb8);
    fn set_fill_color(&mut self, color: Rgb8);
    /// `(x, y)` is the top-left corner.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    /// `y` is the text baseline.
    fn text(&mut self, x: f32, y: f32, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub cell_padding: f32,
}

impl PageGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin: 10.0,
            cell_padding: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// Page created, nothing drawn yet.
    Open,
    Drawing,
}

pub struct PageLayout<S: Surface> {
    surface: S,
    page: PageGeometry,
    x: f32,
    y: f32,
    font: FontStyle,
    font_size: f32,
    state: LayoutState,
}

impl<S: Surface> PageLayout<S> {
    pub fn open(mut surface: S, page: PageGeometry) -> Self {
        let font = FontStyle::Regular;
        let font_size = 12.0;
        surface.set_font(font, font_size);
        Self {
            surface,
            page,
            x: page.margin,
            y: page.margin,
            font,
            font_size,
            state: LayoutState::Open,
        }
    }

    /// Ends the page and hands the surface back.
    pub fn close(self) -> S {
        self.surface
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page(&self) -> &PageGeometry {
        &self.page
    }

    pub fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.font = style;
        self.font_size = size_pt;
        self.surface.set_font(style, size_pt);
    }

    pub fn set_text_color(&mut self, color: Rgb8) {
        self.surface.set_text_color(color);
    }

    pub fn set_fill_color(&mut self, color: Rgb8) {
        self.surface.set_fill_color(color);
    }

    /// Left margin, `h` further down.
    pub fn gap(&mut self, h: f32) {
        self.x = self.page.margin;
        self.y += h;
    }

    /// Left margin at an absolute vertical position.
    pub fn set_y(&mut self, y: f32) {
        self.x = self.page.margin;
        self.y = y;
    }

    /// A zero width stretches the cell to the right margin.
    pub fn cell(&mut self, w: f32, h: f32, text: &str, align: Align, fill: bool, advance: Advance) {
        let w = self.resolve_width(w);
        self.draw_cell(w, h, text, align, fill);
        match advance {
            Advance::Right => self.x += w,
            Advance::NextLine => {
                self.x = self.page.margin;
                self.y += h;
            }
        }
    }

    /// Wrapped, left-aligned text block; `h` is the height of one line.
    /// Leaves the cursor at the left margin below the last line.
    pub fn multi_cell(&mut self, w: f32, h: f32, text: &str) -> usize {
        let w = self.resolve_width(w);
        let max_text_w = (w - 2.0 * self.page.cell_padding).max(0.0);
        let lines = wrap_text_by_width_mm(self.font, self.font_size, text, max_text_w);

        for line in &lines {
            self.draw_cell(w, h, line, Align::Left, false);
            self.y += h;
        }
        self.x = self.page.margin;
        lines.len()
    }

    pub fn text_width(&self, text: &str) -> f32 {
        text_width_mm(self.font, self.font_size, text)
    }

    fn resolve_width(&self, w: f32) -> f32 {
        if w > 0.0 {
            w
        } else {
            self.page.width - self.page.margin - self.x
        }
    }

    fn draw_cell(&mut self, w: f32, h: f32, text: &str, align: Align, fill: bool) {
        self.state = LayoutState::Drawing;
        if fill {
            self.surface.fill_rect(self.x, self.y, w, h);
        }
        if text.is_empty() {
            return;
        }

        let pad = self.page.cell_padding;
        let dx = match align {
            Align::Left => pad,
            Align::Center => (w - self.text_width(text)) / 2.0,
            Align::Right => w - pad - self.text_width(text),
        };
        let baseline = self.y + 0.5 * h + 0.3 * pt_to_mm(self.font_size);
        self.surface.text(self.x + dx, baseline, text);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb8,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        style: FontStyle,
        size: f32,
        color: Rgb8,
    },
}

/// Surface that keeps every primitive with the state it was drawn in.
/// Used to inspect a layout without producing a file.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    font: FontStyle,
    size: f32,
    text_color: Rgb8,
    fill_color: Rgb8,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            font: FontStyle::Regular,
            size: 12.0,
            text_color: Rgb8::BLACK,
            fill_color: Rgb8::WHITE,
        }
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rect { .. } => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.font = style;
        self.size = size_pt;
    }

    fn set_text_color(&mut self, color: Rgb8) {
        self.text_color = color;
    }

    fn set_fill_color(&mut self, color: Rgb8) {
        self.fill_color = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            w,
            h,
            color: self.fill_color,
        });
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            style: self.font,
            size: self.size,
            color: self.text_color,
        });
    }
}

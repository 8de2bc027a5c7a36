//! Tree compositing.
//!
//! Paints every laid-out element into a fresh [`FrameBuffer`], pre-order,
//! siblings in child order, so later draws cover earlier ones. Per element:
//!
//! 1. fill the rect with the background
//! 2. draw the border
//! 3. write content lines inside the border, aligned per line
//! 4. recurse into children, clipped to the content box
//!
//! Unset colors inherit from the parent; the root falls back to the
//! terminal defaults.

use tracing::warn;

use super::buffer::{Brush, FrameBuffer};
use crate::element::{Element, ElementId, Tree};
use crate::layout::Layout;
use crate::markup::{Align, Line};
use crate::types::{Attr, Rect, Rgba};

/// Render the subtree under `root` using a resolved layout.
pub fn compose(tree: &Tree, root: ElementId, layout: &Layout) -> FrameBuffer {
    let viewport = layout.viewport();
    let mut buffer = FrameBuffer::new(viewport.cols, viewport.rows);
    let clip = buffer.bounds();
    let inherited = Brush::new(Rgba::TERMINAL_DEFAULT, Rgba::TERMINAL_DEFAULT, Attr::NONE);
    draw_element(&mut buffer, tree, root, layout, &clip, inherited);
    buffer
}

fn draw_element(
    buffer: &mut FrameBuffer,
    tree: &Tree,
    id: ElementId,
    layout: &Layout,
    parent_clip: &Rect,
    inherited: Brush,
) {
    let (Some(element), Some(rect)) = (tree.get(id), layout.rect(id)) else {
        return;
    };
    let Some(clip) = rect.intersect(parent_clip) else {
        return;
    };

    let brush = Brush::new(
        element.fg().unwrap_or(inherited.fg),
        element.bg().unwrap_or(inherited.bg),
        element.style.attrs,
    );

    buffer.fill(rect, brush, &clip);

    let border = Brush::new(
        element.style.border_fg.unwrap_or(brush.fg),
        element.style.border_bg.unwrap_or(brush.bg),
        Attr::NONE,
    );
    buffer.draw_border(rect, element.border, border, &clip);

    let content = rect.inset(element.border.thickness());
    let Some(content_clip) = content.intersect(&clip) else {
        return;
    };
    draw_content(buffer, id, element, content, &content_clip, brush);

    // Children inherit colors but not attributes
    let inherited = Brush::new(brush.fg, brush.bg, Attr::NONE);
    for &child in tree.children(id) {
        draw_element(buffer, tree, child, layout, &content_clip, inherited);
    }
}

fn draw_content(
    buffer: &mut FrameBuffer,
    id: ElementId,
    element: &Element,
    content: Rect,
    clip: &Rect,
    brush: Brush,
) {
    let (markup, err) = element.markup();
    if let Some(err) = err {
        warn!(element = %id, error = %err, "malformed content tags, drawing stripped text");
    }

    for (i, line) in markup.lines.iter().enumerate().take(content.height as usize) {
        let row = content.row + i as i32;
        let col = content.col + align_offset(line, content.width) as i32;
        draw_line(buffer, row, col, line, clip, brush);
    }
}

fn align_offset(line: &Line, width: u16) -> u16 {
    let free = width.saturating_sub(line.width());
    match line.align {
        Align::Left => 0,
        Align::Center => free / 2,
        Align::Right => free,
    }
}

fn draw_line(buffer: &mut FrameBuffer, row: i32, col: i32, line: &Line, clip: &Rect, brush: Brush) {
    let mut x = col;
    for run in &line.runs {
        let run_brush = Brush::new(
            run.style.fg.unwrap_or(brush.fg),
            run.style.bg.unwrap_or(brush.bg),
            brush.attrs | run.style.attrs,
        );
        x += buffer.draw_text(row, x, &run.text, run_brush, clip) as i32;
    }
}

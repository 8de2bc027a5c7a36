//! Layout Module
//!
//! Resolves declarative position/size specs into absolute cell rectangles.
//!
//! # Rules
//!
//! Each element is placed inside its parent's content box (inside the
//! border); the root fills the viewport. Per axis:
//!
//! - size: cells > percent of parent (floored, plus offset) > `shrink`
//!   (fit content) > unset (what is left after the leading offset and
//!   `right`/`bottom`)
//! - offset: cells > percent of parent > `center` > `right`/`bottom`
//!   anchoring > 0
//!
//! Size is resolved before offset so `center` can use it. A visible element
//! that ends up zero cells wide or tall fails the whole pass; hidden elements
//! are skipped along with their subtrees. Nothing is clipped here, rects may
//! overflow their parent or the viewport.
//!
//! # Example
//!
//! ```
//! use mentalitty::layout::{resolve_offset, resolve_size, Position, Size};
//!
//! let width = resolve_size(Size::percent(50.0), 80, 0);
//! assert_eq!(width, 40);
//! assert_eq!(resolve_offset(Position::Center, 80, width), 20);
//! ```

pub mod spec;
pub mod text_measure;

pub use spec::{Position, Size, SpecValue};
pub use text_measure::{char_width, string_width};

use std::collections::HashMap;

use tracing::trace;

use crate::element::{Element, ElementId, Tree};
use crate::error::LayoutError;
use crate::types::Rect;

// =============================================================================
// TYPES
// =============================================================================

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub const fn rect(&self) -> Rect {
        Rect::new(0, 0, self.cols, self.rows)
    }
}

impl From<(u16, u16)> for Viewport {
    fn from((cols, rows): (u16, u16)) -> Self {
        Self { cols, rows }
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    rects: HashMap<ElementId, Rect>,
    viewport: Viewport,
}

impl Layout {
    /// Resolved rect of a visible element.
    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of elements placed.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

// =============================================================================
// AXIS ARITHMETIC
// =============================================================================

/// Offsets are clamped to this magnitude so rect edges stay inside `i32`.
const OFFSET_LIMIT: i64 = (i32::MAX / 4) as i64;

fn clamp_offset(value: i64) -> i32 {
    value.clamp(-OFFSET_LIMIT, OFFSET_LIMIT) as i32
}

/// `floor(parent * percent / 100) + offset`.
fn percent_of(parent: u16, percent: f32, offset: i32) -> i32 {
    // Float to int casts saturate
    let base = (parent as f64 * percent as f64 / 100.0).floor() as i64;
    clamp_offset(base.saturating_add(offset as i64))
}

fn clamp_cells(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

/// Resolve a size spec against the parent's content extent.
///
/// `fit` is the content-driven size used for [`Size::Shrink`].
pub fn resolve_size(spec: Size, parent: u16, fit: u16) -> u16 {
    match spec {
        Size::Cells(n) => n,
        Size::Percent { percent, offset } => clamp_cells(percent_of(parent, percent, offset)),
        Size::Shrink => fit,
    }
}

/// Resolve a position spec against the parent's content extent.
///
/// `own` is the element's resolved size on the same axis.
pub fn resolve_offset(spec: Position, parent: u16, own: u16) -> i32 {
    match spec {
        Position::Cells(n) => clamp_offset(n as i64),
        Position::Percent { percent, offset } => percent_of(parent, percent, offset),
        Position::Center => {
            if own >= parent {
                0
            } else {
                ((parent - own) / 2) as i32
            }
        }
    }
}

/// One axis of an element's geometry.
#[derive(Debug, Clone, Copy)]
struct Axis {
    lead: Option<Position>,
    trail: Option<u16>,
    size: Option<Size>,
}

impl Axis {
    fn horizontal(element: &Element) -> Self {
        Self {
            lead: element.left,
            trail: element.right,
            size: element.width,
        }
    }

    fn vertical(element: &Element) -> Self {
        Self {
            lead: element.top,
            trail: element.bottom,
            size: element.height,
        }
    }

    /// (offset within parent, size). `fit` is only called for shrink sizes.
    fn resolve(&self, parent: u16, fit: impl FnOnce() -> u16) -> (i32, u16) {
        let size = match self.size {
            Some(Size::Shrink) => fit(),
            Some(spec) => resolve_size(spec, parent, 0),
            None => {
                let lead = match self.lead {
                    None | Some(Position::Center) => 0,
                    Some(spec) => clamp_cells(resolve_offset(spec, parent, 0)),
                };
                parent
                    .saturating_sub(lead)
                    .saturating_sub(self.trail.unwrap_or(0))
            }
        };

        let offset = match (self.lead, self.trail) {
            (Some(spec), _) => resolve_offset(spec, parent, size),
            (None, Some(trail)) => parent as i32 - size as i32 - trail as i32,
            (None, None) => 0,
        };

        (offset, size)
    }

    /// Extent this axis occupies in a shrinking parent, if it is fixed.
    ///
    /// Percent and centered geometry depends on the parent and is ignored.
    fn fixed_extent(&self, fit: impl FnOnce() -> u16) -> Option<u16> {
        let size = match self.size {
            Some(Size::Cells(n)) => n,
            Some(Size::Shrink) => fit(),
            _ => return None,
        };
        let lead = match self.lead {
            None => 0,
            Some(Position::Cells(n)) => n,
            Some(_) => return None,
        };
        Some(clamp_cells(lead.saturating_add(size as i32)))
    }
}

// =============================================================================
// SHRINK MEASUREMENT
// =============================================================================

/// Content-driven (width, height): widest line / line count, grown to hold
/// children with fixed geometry, plus the border.
fn measure(tree: &Tree, id: ElementId) -> (u16, u16) {
    let Some(element) = tree.get(id) else {
        return (0, 0);
    };
    let (mut width, mut height) = element.markup().0.size();

    for &child in tree.children(id) {
        let Some(el) = tree.get(child) else { continue };
        if el.hidden {
            continue;
        }
        if let Some(w) = Axis::horizontal(el).fixed_extent(|| measure(tree, child).0) {
            width = width.max(w);
        }
        if let Some(h) = Axis::vertical(el).fixed_extent(|| measure(tree, child).1) {
            height = height.max(h);
        }
    }

    let border = element.border.thickness() * 2;
    (width.saturating_add(border), height.saturating_add(border))
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Lay out the subtree under `root` for the given viewport.
pub fn resolve(tree: &Tree, root: ElementId, viewport: Viewport) -> Result<Layout, LayoutError> {
    let root_el = tree.get(root).ok_or(LayoutError::Detached(root))?;

    let mut layout = Layout {
        rects: HashMap::new(),
        viewport,
    };
    if root_el.hidden {
        return Ok(layout);
    }

    let rect = viewport.rect();
    if rect.is_empty() {
        return Err(LayoutError::Degenerate {
            id: root,
            width: rect.width,
            height: rect.height,
        });
    }
    layout.rects.insert(root, rect);
    place_children(tree, root, rect.inset(root_el.border.thickness()), &mut layout)?;

    trace!(elements = layout.len(), cols = viewport.cols, rows = viewport.rows, "layout resolved");
    Ok(layout)
}

fn place_children(
    tree: &Tree,
    parent: ElementId,
    content: Rect,
    layout: &mut Layout,
) -> Result<(), LayoutError> {
    for &id in tree.children(parent) {
        let Some(element) = tree.get(id) else { continue };
        if element.hidden {
            continue;
        }

        let (col, width) = Axis::horizontal(element).resolve(content.width, || measure(tree, id).0);
        let (row, height) = Axis::vertical(element).resolve(content.height, || measure(tree, id).1);

        if width == 0 || height == 0 {
            return Err(LayoutError::Degenerate { id, width, height });
        }

        let rect = Rect::new(
            clamp_offset(content.row as i64 + row as i64),
            clamp_offset(content.col as i64 + col as i64),
            width,
            height,
        );
        layout.rects.insert(id, rect);
        place_children(tree, id, rect.inset(element.border.thickness()), layout)?;
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementOptions;
    use crate::types::BorderKind;

    fn tree_with_root() -> (Tree, ElementId) {
        let mut tree = Tree::new();
        let root = tree.insert(Element::default());
        (tree, root)
    }

    fn add(tree: &mut Tree, parent: ElementId, options: ElementOptions) -> ElementId {
        let id = tree.insert(Element::new(options));
        tree.attach(parent, id).unwrap();
        id
    }

    fn centered_half() -> ElementOptions {
        ElementOptions {
            top: Some(Position::Center),
            left: Some(Position::Center),
            width: Some(Size::percent(50.0)),
            height: Some(Size::percent(50.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_centered_half_box() {
        let (mut tree, root) = tree_with_root();
        let id = add(&mut tree, root, centered_half());

        let layout = resolve(&tree, root, Viewport::new(80, 24)).unwrap();
        assert_eq!(layout.rect(root), Some(Rect::new(0, 0, 80, 24)));
        assert_eq!(layout.rect(id), Some(Rect::new(6, 20, 40, 12)));

        let layout = resolve(&tree, root, Viewport::new(100, 30)).unwrap();
        assert_eq!(layout.rect(id), Some(Rect::new(7, 25, 50, 15)));
    }

    #[test]
    fn test_percent_floors() {
        for (n, expected) in [(0, 0), (1, 0), (2, 1), (3, 1), (100, 50), (101, 50)] {
            assert_eq!(resolve_size(Size::percent(50.0), n, 0), expected);
        }
        assert_eq!(
            resolve_size(Size::Percent { percent: 50.0, offset: -2 }, 80, 0),
            38
        );
        assert_eq!(
            resolve_size(Size::Percent { percent: 10.0, offset: -20 }, 80, 0),
            0
        );
    }

    #[test]
    fn test_center_never_negative() {
        assert_eq!(resolve_offset(Position::Center, 10, 4), 3);
        assert_eq!(resolve_offset(Position::Center, 10, 10), 0);
        assert_eq!(resolve_offset(Position::Center, 10, 30), 0);
    }

    #[test]
    fn test_children_inside_border() {
        let (mut tree, root) = tree_with_root();
        let outer = add(
            &mut tree,
            root,
            ElementOptions {
                top: Some(Position::Cells(2)),
                left: Some(Position::Cells(4)),
                width: Some(Size::Cells(20)),
                height: Some(Size::Cells(10)),
                border: crate::element::BorderOptions {
                    kind: BorderKind::Line,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let inner = add(&mut tree, outer, ElementOptions::default());

        let layout = resolve(&tree, root, Viewport::new(80, 24)).unwrap();
        assert_eq!(layout.rect(outer), Some(Rect::new(2, 4, 20, 10)));
        assert_eq!(layout.rect(inner), Some(Rect::new(3, 5, 18, 8)));
    }

    #[test]
    fn test_right_bottom_anchoring() {
        let (mut tree, root) = tree_with_root();
        let anchored = add(
            &mut tree,
            root,
            ElementOptions {
                right: Some(1),
                bottom: Some(0),
                width: Some(Size::Cells(10)),
                height: Some(Size::Cells(3)),
                ..Default::default()
            },
        );
        let stretched = add(
            &mut tree,
            root,
            ElementOptions {
                left: Some(Position::Cells(5)),
                right: Some(5),
                height: Some(Size::Cells(1)),
                ..Default::default()
            },
        );

        let layout = resolve(&tree, root, Viewport::new(80, 24)).unwrap();
        assert_eq!(layout.rect(anchored), Some(Rect::new(21, 69, 10, 3)));
        assert_eq!(layout.rect(stretched), Some(Rect::new(0, 5, 70, 1)));
    }

    #[test]
    fn test_shrink_fits_content_and_border() {
        let (mut tree, root) = tree_with_root();
        let id = add(
            &mut tree,
            root,
            ElementOptions {
                width: Some(Size::Shrink),
                height: Some(Size::Shrink),
                content: "Hello {bold}world{/bold}!\nsecond".into(),
                tags: true,
                border: crate::element::BorderOptions {
                    kind: BorderKind::Line,
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let layout = resolve(&tree, root, Viewport::new(80, 24)).unwrap();
        assert_eq!(layout.rect(id), Some(Rect::new(0, 0, 14, 4)));
    }

    #[test]
    fn test_shrink_ignores_percent_children() {
        let (mut tree, root) = tree_with_root();
        let parent = add(
            &mut tree,
            root,
            ElementOptions {
                width: Some(Size::Shrink),
                height: Some(Size::Shrink),
                content: "ab".into(),
                ..Default::default()
            },
        );
        add(
            &mut tree,
            parent,
            ElementOptions {
                width: Some(Size::percent(100.0)),
                height: Some(Size::Cells(1)),
                ..Default::default()
            },
        );
        add(
            &mut tree,
            parent,
            ElementOptions {
                top: Some(Position::Cells(3)),
                left: Some(Position::Cells(1)),
                width: Some(Size::Cells(5)),
                height: Some(Size::Cells(1)),
                ..Default::default()
            },
        );

        let layout = resolve(&tree, root, Viewport::new(80, 24)).unwrap();
        assert_eq!(layout.rect(parent), Some(Rect::new(0, 0, 6, 4)));
    }

    #[test]
    fn test_degenerate_rect_fails() {
        let (mut tree, root) = tree_with_root();
        let id = add(&mut tree, root, centered_half());

        let err = resolve(&tree, root, Viewport::new(1, 24)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Degenerate {
                id,
                width: 0,
                height: 12
            }
        );
    }

    #[test]
    fn test_hidden_subtree_skipped() {
        let (mut tree, root) = tree_with_root();
        let id = add(
            &mut tree,
            root,
            ElementOptions {
                width: Some(Size::Cells(0)),
                hidden: true,
                ..Default::default()
            },
        );
        let child = add(&mut tree, id, ElementOptions::default());

        let layout = resolve(&tree, root, Viewport::new(80, 24)).unwrap();
        assert_eq!(layout.rect(id), None);
        assert_eq!(layout.rect(child), None);
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_negative_offsets_are_kept() {
        let (mut tree, root) = tree_with_root();
        let id = add(
            &mut tree,
            root,
            ElementOptions {
                top: Some(Position::Cells(-2)),
                left: Some(Position::Percent {
                    percent: 0.0,
                    offset: -3,
                }),
                width: Some(Size::Cells(5)),
                height: Some(Size::Cells(5)),
                ..Default::default()
            },
        );

        let layout = resolve(&tree, root, Viewport::new(80, 24)).unwrap();
        assert_eq!(layout.rect(id), Some(Rect::new(-2, -3, 5, 5)));
    }

    #[test]
    fn test_huge_specs_saturate() {
        let (mut tree, root) = tree_with_root();
        let wide = add(
            &mut tree,
            root,
            ElementOptions {
                left: Some("1e30%+1".parse().unwrap()),
                top: Some(Position::Cells(i32::MAX)),
                width: Some("1e30%+1".parse().unwrap()),
                height: Some(Size::Cells(1)),
                ..Default::default()
            },
        );
        let child = add(
            &mut tree,
            wide,
            ElementOptions {
                left: Some(Position::Cells(i32::MAX)),
                width: Some(Size::Cells(u16::MAX)),
                ..Default::default()
            },
        );
        let fixed = add(
            &mut tree,
            root,
            ElementOptions {
                left: Some(Position::Cells(i32::MAX)),
                width: Some(Size::Shrink),
                height: Some(Size::Shrink),
                content: "x".into(),
                ..Default::default()
            },
        );
        add(
            &mut tree,
            fixed,
            ElementOptions {
                left: Some(Position::Cells(i32::MAX)),
                width: Some(Size::Cells(u16::MAX)),
                height: Some(Size::Cells(1)),
                ..Default::default()
            },
        );

        let layout = resolve(&tree, root, Viewport::new(80, 24)).unwrap();
        let limit = OFFSET_LIMIT as i32;
        assert_eq!(layout.rect(wide), Some(Rect::new(limit, limit, u16::MAX, 1)));
        assert_eq!(layout.rect(child).map(|r| r.col), Some(limit));
        assert_eq!(layout.rect(fixed).map(|r| r.width), Some(u16::MAX));
        assert_eq!(resolve_offset(Position::percent(f32::MAX), 80, 0), limit);
    }

    #[test]
    fn test_unknown_root() {
        let (mut tree, root) = tree_with_root();
        tree.remove(root);
        assert_eq!(
            resolve(&tree, root, Viewport::new(80, 24)),
            Err(LayoutError::Detached(root))
        );
    }
}

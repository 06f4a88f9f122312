//! Input model: tools, mouse buttons, and the gesture state machine.
//!
//! `Tool` captures the user's intent at the time of a pointer event.
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! A drawing gesture owns its provisional shape outright, so nothing reaches
//! the page store until the gesture commits.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH, NEW_TEXT_CONTENT};
use crate::doc::{PageId, Shape, ShapeId, ShapeKind};
use crate::geom::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pick and move shapes (default).
    #[default]
    Select,
    /// Freehand stroke.
    Pencil,
    Line,
    Circle,
    Rectangle,
    Arrow,
    /// Place a text label.
    Text,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Select,
        Tool::Pencil,
        Tool::Line,
        Tool::Circle,
        Tool::Rectangle,
        Tool::Arrow,
        Tool::Text,
    ];

    /// Parse the toolbar name of a tool, e.g. `"rectangle"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Pencil => "pencil",
            Self::Line => "line",
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Arrow => "arrow",
            Self::Text => "text",
        }
    }

    /// Whether this tool creates shapes rather than selecting them.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        self != Self::Select
    }

    /// The shape this tool starts when pressed at `at` on `page_id`, with the
    /// editor's default style. `None` for the select tool.
    #[must_use]
    pub fn provisional_shape(self, page_id: PageId, at: Point) -> Option<Shape> {
        let kind = match self {
            Self::Select => return None,
            Self::Pencil => ShapeKind::Pencil { points: vec![at] },
            Self::Line => ShapeKind::Line { end_x: Some(at.x), end_y: Some(at.y) },
            Self::Arrow => ShapeKind::Arrow { end_x: Some(at.x), end_y: Some(at.y) },
            Self::Circle => ShapeKind::Circle,
            Self::Rectangle => ShapeKind::Rectangle,
            Self::Text => ShapeKind::Text {
                content: Some(NEW_TEXT_CONTENT.to_owned()),
                font_size: Some(DEFAULT_FONT_SIZE),
                font_family: Some(DEFAULT_FONT_FAMILY.to_owned()),
            },
        };
        let boxed = kind.is_boxed();
        Some(Shape {
            width: boxed.then_some(0.0),
            height: boxed.then_some(0.0),
            rotation: Some(0.0),
            color: Some(DEFAULT_COLOR.to_owned()),
            stroke_width: Some(DEFAULT_STROKE_WIDTH),
            ..Shape::new(page_id, kind, at)
        })
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    Middle,
    Secondary,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub tool: Tool,
    pub selected_id: Option<ShapeId>,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving an existing shape.
    DraggingShape {
        id: ShapeId,
        /// Pointer position minus the shape's anchor at pointer-down.
        offset: Point,
    },
    /// Drawing a new shape that is not yet on any page.
    Drawing {
        shape: Shape,
        /// Where the drag started; boxed shapes span from here to the pointer.
        anchor: Point,
    },
}

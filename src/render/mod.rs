//! Stateless drawing of the session onto a [`Surface`].
//!
//! Every function re-derives its layout from the data it is given, so
//! calling it twice with the same input produces the same drawing.

mod commands;
mod confusion;
mod error_curve;
mod network;
mod painter;

pub use commands::{CommandList, DrawCommand};
pub use confusion::{cell_fill, cell_text_color, draw_confusion_matrix};
pub use error_curve::{ChartScale, draw_error_curve};
pub use network::{NODE_RADIUS, draw_network, neuron_positions};
pub use painter::PainterSurface;

use egui::{Align2, Color32, Pos2, Rect, Vec2};

/// What a draw call did. `Placeholder` means there was nothing to draw and
/// the caller should show its placeholder text instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    Drawn,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color32),
    Linear {
        start: Pos2,
        end: Pos2,
        stops: Vec<(f32, Color32)>,
    },
    Radial {
        center: Pos2,
        radius: f32,
        inner: Color32,
        outer: Color32,
    },
}

impl Paint {
    /// Color at position `t` along the gradient, `t` in `0..=1`.
    pub fn sample(&self, t: f32) -> Color32 {
        match self {
            Paint::Solid(c) => *c,
            Paint::Radial { inner, outer, .. } => lerp_color(*inner, *outer, t),
            Paint::Linear { stops, .. } => {
                let t = t.clamp(0.0, 1.0);
                let Some(&(_, first)) = stops.first() else {
                    return Color32::TRANSPARENT;
                };
                let mut prev = (0.0, first);
                for &(at, color) in stops {
                    if t <= at {
                        let span = at - prev.0;
                        if span <= f32::EPSILON {
                            return color;
                        }
                        return lerp_color(prev.1, color, (t - prev.0) / span);
                    }
                    prev = (at, color);
                }
                prev.1
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub width: f32,
    pub paint: Paint,
    /// Dash and gap lengths; solid when `None`.
    pub dash: Option<[f32; 2]>,
}

impl Pen {
    pub fn solid(width: f32, color: Color32) -> Self {
        Self {
            width,
            paint: Paint::Solid(color),
            dash: None,
        }
    }

    pub fn dashed(mut self, dash: f32, gap: f32) -> Self {
        self.dash = Some([dash, gap]);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub size: f32,
    pub color: Color32,
    pub anchor: Align2,
    /// Clockwise rotation in radians.
    pub angle: f32,
}

impl Label {
    pub fn centered(text: impl Into<String>, size: f32, color: Color32) -> Self {
        Self {
            text: text.into(),
            size,
            color,
            anchor: Align2::CENTER_CENTER,
            angle: 0.0,
        }
    }

    pub fn rotated(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }
}

/// Minimal immediate-mode 2D drawing API. Coordinates are relative to the
/// surface's top-left corner.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn line(&mut self, from: Pos2, to: Pos2, pen: &Pen);
    fn polyline(&mut self, points: &[Pos2], pen: &Pen);
    fn circle(&mut self, center: Pos2, radius: f32, fill: &Paint, outline: Option<&Pen>);
    fn rect(&mut self, rect: Rect, fill: &Paint, outline: Option<&Pen>);
    fn text(&mut self, pos: Pos2, label: &Label);
}

pub(crate) const TEXT_PRIMARY: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x1a);
pub(crate) const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x6b, 0x72, 0x80);

/// Mixes in premultiplied space.
pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
    Color32::from_rgba_premultiplied(
        mix(a.r(), b.r()),
        mix(a.g(), b.g()),
        mix(a.b(), b.b()),
        mix(a.a(), b.a()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_paint_interpolates_between_stops() {
        let paint = Paint::Linear {
            start: Pos2::ZERO,
            end: Pos2::new(10.0, 0.0),
            stops: vec![
                (0.0, Color32::from_rgb(0, 0, 0)),
                (0.5, Color32::from_rgb(100, 100, 100)),
                (1.0, Color32::from_rgb(200, 200, 200)),
            ],
        };
        assert_eq!(paint.sample(0.0), Color32::from_rgb(0, 0, 0));
        assert_eq!(paint.sample(0.25), Color32::from_rgb(50, 50, 50));
        assert_eq!(paint.sample(0.75), Color32::from_rgb(150, 150, 150));
        assert_eq!(paint.sample(2.0), Color32::from_rgb(200, 200, 200));
    }
}

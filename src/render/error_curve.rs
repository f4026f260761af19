use std::f32::consts::FRAC_PI_2;

use egui::{Color32, Pos2, Vec2};

use super::{Label, Paint, Pen, Rendered, Surface, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::model::ErrorSample;

const MARGIN_TOP: f32 = 20.0;
const MARGIN_RIGHT: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 40.0;
const MARGIN_LEFT: f32 = 60.0;
const GRID_BANDS: usize = 5;
const MARKER_RADIUS: f32 = 5.0;

const BLUE: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
const LIGHT_BLUE: Color32 = Color32::from_rgb(0x60, 0xa5, 0xfa);
const PURPLE: Color32 = Color32::from_rgb(0x8b, 0x5c, 0xf6);
const GREEN: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);
const LIGHT_GREEN: Color32 = Color32::from_rgb(0x34, 0xd3, 0x99);

/// Extents of one sample sequence, always computed from scratch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScale {
    pub min_error: f64,
    pub max_error: f64,
    pub max_epoch: u32,
}

impl ChartScale {
    pub fn from_samples(samples: &[ErrorSample]) -> Option<Self> {
        let first = samples.first()?;
        let init = Self {
            min_error: first.error,
            max_error: first.error,
            max_epoch: first.epoch,
        };
        Some(samples.iter().fold(init, |acc, s| Self {
            min_error: acc.min_error.min(s.error),
            max_error: acc.max_error.max(s.error),
            max_epoch: acc.max_epoch.max(s.epoch),
        }))
    }

    /// Maps a sample into the plot area; lower error sits lower.
    pub fn project(&self, sample: &ErrorSample, size: Vec2) -> Pos2 {
        let width = size.x - MARGIN_LEFT - MARGIN_RIGHT;
        let height = size.y - MARGIN_TOP - MARGIN_BOTTOM;
        let x = MARGIN_LEFT + (f64::from(sample.epoch) / f64::from(self.max_epoch.max(1))) as f32 * width;
        let span = self.max_error - self.min_error;
        let frac = if span > f64::EPSILON {
            ((sample.error - self.min_error) / span) as f32
        } else {
            0.5
        };
        Pos2::new(x, MARGIN_TOP + height - frac * height)
    }
}

pub fn draw_error_curve(surface: &mut dyn Surface, samples: &[ErrorSample]) -> Rendered {
    let Some(scale) = ChartScale::from_samples(samples) else {
        return Rendered::Placeholder;
    };
    let size = surface.size();
    let left = MARGIN_LEFT;
    let right = size.x - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = size.y - MARGIN_BOTTOM;
    let height = bottom - top;

    let axis = Pen::solid(1.0, TEXT_SECONDARY);
    surface.line(Pos2::new(left, bottom), Pos2::new(right, bottom), &axis);
    surface.line(Pos2::new(left, top), Pos2::new(left, bottom), &axis);

    for band in 0..=GRID_BANDS {
        let y = top + height / GRID_BANDS as f32 * band as f32;
        let pen = if band == GRID_BANDS {
            Pen::solid(1.5, Color32::from_rgba_unmultiplied(59, 130, 246, 77))
        } else {
            Pen::solid(1.0, Color32::from_rgba_unmultiplied(107, 114, 128, 38)).dashed(5.0, 5.0)
        };
        surface.line(Pos2::new(left, y), Pos2::new(right, y), &pen);
    }

    let points: Vec<Pos2> = samples.iter().map(|s| scale.project(s, size)).collect();
    let curve = Pen {
        width: 3.0,
        paint: Paint::Linear {
            start: Pos2::new(left, top),
            end: Pos2::new(left, bottom),
            stops: vec![(0.0, BLUE), (0.5, PURPLE), (1.0, GREEN)],
        },
        dash: None,
    };
    surface.polyline(&points, &curve);

    let ring = Pen::solid(1.5, Color32::WHITE);
    let last = points.len() - 1;
    for (i, &p) in points.iter().enumerate() {
        let (inner, outer) = if i == last {
            (LIGHT_GREEN, GREEN)
        } else {
            (LIGHT_BLUE, BLUE)
        };
        let fill = Paint::Radial {
            center: p,
            radius: MARKER_RADIUS,
            inner,
            outer,
        };
        surface.circle(p, MARKER_RADIUS, &fill, Some(&ring));
    }

    surface.text(
        Pos2::new(size.x / 2.0, size.y - 10.0),
        &Label::centered("Epoch", 12.0, TEXT_PRIMARY),
    );
    surface.text(
        Pos2::new(15.0, size.y / 2.0),
        &Label::centered("Error", 12.0, TEXT_PRIMARY).rotated(-FRAC_PI_2),
    );
    Rendered::Drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CommandList;

    fn samples(values: &[(u32, f64)]) -> Vec<ErrorSample> {
        values
            .iter()
            .map(|&(epoch, error)| ErrorSample { epoch, error })
            .collect()
    }

    fn curve(surface: &CommandList) -> Vec<Pos2> {
        surface.polylines().next().map(<[Pos2]>::to_vec).unwrap_or_default()
    }

    #[test]
    fn empty_is_placeholder() {
        let mut surface = CommandList::new(600.0, 300.0);
        assert_eq!(draw_error_curve(&mut surface, &[]), Rendered::Placeholder);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn lowest_error_is_drawn_lowest() {
        let mut surface = CommandList::new(600.0, 300.0);
        draw_error_curve(&mut surface, &samples(&[(1, 0.9), (2, 0.5), (3, 0.1)]));
        let pts = curve(&surface);
        assert_eq!(pts.len(), 3);
        // screen y grows downwards
        assert_eq!(pts[0].y, MARGIN_TOP);
        assert_eq!(pts[2].y, 300.0 - MARGIN_BOTTOM);
        assert!(pts[1].y > pts[0].y && pts[1].y < pts[2].y);
        assert_eq!(pts[2].x, 600.0 - MARGIN_RIGHT);
    }

    #[test]
    fn scale_is_not_reused_across_runs() {
        let mut first = CommandList::new(600.0, 300.0);
        draw_error_curve(&mut first, &samples(&[(1, 1.05), (2, 0.02)]));

        let mut second = CommandList::new(600.0, 300.0);
        draw_error_curve(&mut second, &samples(&[(1, 0.6), (2, 0.4)]));
        let pts = curve(&second);
        assert_eq!(pts[0].y, MARGIN_TOP);
        assert_eq!(pts[1].y, 300.0 - MARGIN_BOTTOM);
        assert_eq!(pts[1].x, 600.0 - MARGIN_RIGHT);
    }

    #[test]
    fn flat_series_sits_mid_height() {
        let mut surface = CommandList::new(600.0, 300.0);
        draw_error_curve(&mut surface, &samples(&[(1, 0.3), (2, 0.3)]));
        let mid = MARGIN_TOP + (300.0 - MARGIN_TOP - MARGIN_BOTTOM) / 2.0;
        assert!(curve(&surface).iter().all(|p| p.y == mid));
    }

    #[test]
    fn grid_markers_and_captions() {
        let mut surface = CommandList::new(600.0, 300.0);
        draw_error_curve(&mut surface, &samples(&[(1, 0.9), (2, 0.5), (3, 0.1)]));
        // two axes plus six grid lines
        assert_eq!(surface.lines().count(), 8);
        let dashed = surface.lines().filter(|(_, _, pen)| pen.dash.is_some()).count();
        assert_eq!(dashed, GRID_BANDS);

        let outers: Vec<Color32> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                crate::render::DrawCommand::Circle {
                    fill: Paint::Radial { outer, .. },
                    ..
                } => Some(*outer),
                _ => None,
            })
            .collect();
        assert_eq!(outers, vec![BLUE, BLUE, GREEN]);

        let captions: Vec<&str> = surface.texts().map(|(_, l)| l.text.as_str()).collect();
        assert_eq!(captions, vec!["Epoch", "Error"]);
    }
}

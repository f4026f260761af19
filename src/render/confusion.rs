use std::f32::consts::FRAC_PI_2;

use egui::{Color32, Pos2, Rect, Vec2};

use super::{Label, Paint, Pen, Rendered, Surface, TEXT_PRIMARY};
use crate::model::ConfusionMatrix;

/// Blue at zero, fading towards white at the matrix maximum.
pub fn cell_fill(value: u32, max: u32) -> Color32 {
    let intensity = if max == 0 {
        0.0
    } else {
        f64::from(value) / f64::from(max)
    };
    let r = (59.0 + (255.0 - 59.0) * intensity).floor() as u8;
    let g = (130.0 + (255.0 - 130.0) * intensity).floor() as u8;
    Color32::from_rgb(r, g, 246)
}

/// Light text once the count is above half of the maximum.
pub fn cell_text_color(value: u32, max: u32) -> Color32 {
    if f64::from(value) > f64::from(max) / 2.0 {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}

pub fn draw_confusion_matrix(surface: &mut dyn Surface, matrix: Option<&ConfusionMatrix>) -> Rendered {
    let Some(matrix) = matrix else {
        return Rendered::Placeholder;
    };
    let size = surface.size();
    let n = matrix.size();
    let cell = Vec2::new(size.x / n as f32, size.y / n as f32);
    let max = matrix.max_count();
    let border = Pen::solid(1.0, Color32::WHITE);

    for (i, row) in matrix.rows().iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let min = Pos2::new(j as f32 * cell.x, i as f32 * cell.y);
            let rect = Rect::from_min_size(min, cell);
            surface.rect(rect, &Paint::Solid(cell_fill(value, max)), Some(&border));
            surface.text(
                rect.center(),
                &Label::centered(value.to_string(), 14.0, cell_text_color(value, max)),
            );
        }
    }

    for i in 0..n {
        let class = format!("C{i}");
        surface.text(
            Pos2::new(i as f32 * cell.x + cell.x / 2.0, size.y - 10.0),
            &Label::centered(class.clone(), 12.0, TEXT_PRIMARY),
        );
        surface.text(
            Pos2::new(10.0, i as f32 * cell.y + cell.y / 2.0),
            &Label::centered(class, 12.0, TEXT_PRIMARY).rotated(-FRAC_PI_2),
        );
    }
    Rendered::Drawn
}

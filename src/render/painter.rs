use egui::{FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use super::{Label, Paint, Pen, Surface};

/// Gradient strokes are approximated with this many solid pieces.
const GRADIENT_STEPS: usize = 8;

/// Draws onto an egui painter, offset into `rect`.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, p: Pos2) -> Pos2 {
        self.rect.min + p.to_vec2()
    }

    fn stroke(&self, pen: &Pen, t: f32) -> Stroke {
        Stroke::new(pen.width, pen.paint.sample(t))
    }

    fn segment(&self, from: Pos2, to: Pos2, pen: &Pen) {
        match (&pen.paint, pen.dash) {
            (_, Some([dash, gap])) => {
                let shapes = Shape::dashed_line(&[from, to], self.stroke(pen, 0.0), dash, gap);
                self.painter.extend(shapes);
            }
            (Paint::Solid(color), None) => {
                self.painter.line_segment([from, to], Stroke::new(pen.width, *color));
            }
            (_, None) => {
                for step in 0..GRADIENT_STEPS {
                    let a = step as f32 / GRADIENT_STEPS as f32;
                    let b = (step + 1) as f32 / GRADIENT_STEPS as f32;
                    self.painter.line_segment(
                        [from.lerp(to, a), from.lerp(to, b)],
                        self.stroke(pen, (a + b) / 2.0),
                    );
                }
            }
        }
    }

    /// Position of `p` along a linear gradient's axis, in `0..=1`.
    fn gradient_t(paint: &Paint, p: Pos2) -> f32 {
        match paint {
            Paint::Linear { start, end, .. } => {
                let axis = *end - *start;
                let len_sq = axis.length_sq();
                if len_sq <= f32::EPSILON {
                    return 0.0;
                }
                ((p - *start).dot(axis) / len_sq).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn line(&mut self, from: Pos2, to: Pos2, pen: &Pen) {
        self.segment(self.to_screen(from), self.to_screen(to), pen);
    }

    fn polyline(&mut self, points: &[Pos2], pen: &Pen) {
        if let Paint::Solid(color) = pen.paint {
            if pen.dash.is_none() {
                let pts = points.iter().map(|p| self.to_screen(*p)).collect();
                self.painter.add(Shape::line(pts, Stroke::new(pen.width, color)));
                return;
            }
        }
        for pair in points.windows(2) {
            let t = Self::gradient_t(&pen.paint, pair[0].lerp(pair[1], 0.5));
            let piece = Pen {
                width: pen.width,
                paint: Paint::Solid(pen.paint.sample(t)),
                dash: pen.dash,
            };
            self.segment(self.to_screen(pair[0]), self.to_screen(pair[1]), &piece);
        }
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: &Paint, outline: Option<&Pen>) {
        let c = self.to_screen(center);
        match fill {
            Paint::Radial {
                center: focus,
                inner,
                outer,
                ..
            } => {
                // Outer body plus a smaller highlight towards the focus.
                self.painter.circle_filled(c, radius, *outer);
                let shift = (self.to_screen(*focus) - c) * 0.5;
                self.painter
                    .circle_filled(c + shift, radius * 0.55, fill.sample(0.35));
                if *inner != *outer {
                    self.painter.circle_filled(c + shift, radius * 0.3, *inner);
                }
            }
            other => {
                self.painter.circle_filled(c, radius, other.sample(0.5));
            }
        }
        if let Some(pen) = outline {
            self.painter
                .circle_stroke(c, radius, Stroke::new(pen.width, pen.paint.sample(0.0)));
        }
    }

    fn rect(&mut self, rect: Rect, fill: &Paint, outline: Option<&Pen>) {
        let r = rect.translate(self.rect.min.to_vec2());
        self.painter.rect_filled(r, 0.0, fill.sample(0.5));
        if let Some(pen) = outline {
            let stroke = Stroke::new(pen.width, pen.paint.sample(0.0));
            let (lt, rt) = (r.left_top(), r.right_top());
            let (lb, rb) = (r.left_bottom(), r.right_bottom());
            self.painter.line_segment([lt, rt], stroke);
            self.painter.line_segment([rt, rb], stroke);
            self.painter.line_segment([rb, lb], stroke);
            self.painter.line_segment([lb, lt], stroke);
        }
    }

    fn text(&mut self, pos: Pos2, label: &Label) {
        let p = self.to_screen(pos);
        let font = FontId::proportional(label.size);
        if label.angle == 0.0 {
            self.painter
                .text(p, label.anchor, &label.text, font, label.color);
            return;
        }
        let galley = self
            .painter
            .layout_no_wrap(label.text.clone(), font, label.color);
        let size = galley.size();
        // Rotation pivots on the galley's top-left corner; shift it so the
        // rotated text stays centred on `p`.
        let (sin, cos) = label.angle.sin_cos();
        let half = Vec2::new(size.x / 2.0, size.y / 2.0);
        let rotated_half = Vec2::new(half.x * cos - half.y * sin, half.x * sin + half.y * cos);
        let origin = p - rotated_half;
        self.painter.add(
            egui::epaint::TextShape::new(origin, galley, label.color).with_angle(label.angle),
        );
    }
}

use egui::{Pos2, Rect, Vec2};

use super::{Label, Paint, Pen, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line { from: Pos2, to: Pos2, pen: Pen },
    Polyline { points: Vec<Pos2>, pen: Pen },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Paint,
        outline: Option<Pen>,
    },
    Rect {
        rect: Rect,
        fill: Paint,
        outline: Option<Pen>,
    },
    Text { pos: Pos2, label: Label },
}

/// Surface that records what was drawn instead of producing pixels.
#[derive(Debug, Clone)]
pub struct CommandList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn circles(&self) -> impl Iterator<Item = (Pos2, f32)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Pos2, Pos2, &Pen)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, pen } => Some((*from, *to, pen)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (Pos2, &Label)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { pos, label } => Some((*pos, label)),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[Pos2]> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = (Rect, &Paint)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Rect { rect, fill, .. } => Some((*rect, fill)),
            _ => None,
        })
    }
}

impl Surface for CommandList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn line(&mut self, from: Pos2, to: Pos2, pen: &Pen) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            pen: pen.clone(),
        });
    }

    fn polyline(&mut self, points: &[Pos2], pen: &Pen) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            pen: pen.clone(),
        });
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: &Paint, outline: Option<&Pen>) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            fill: fill.clone(),
            outline: outline.cloned(),
        });
    }

    fn rect(&mut self, rect: Rect, fill: &Paint, outline: Option<&Pen>) {
        self.commands.push(DrawCommand::Rect {
            rect,
            fill: fill.clone(),
            outline: outline.cloned(),
        });
    }

    fn text(&mut self, pos: Pos2, label: &Label) {
        self.commands.push(DrawCommand::Text {
            pos,
            label: label.clone(),
        });
    }
}

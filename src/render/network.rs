use egui::{Color32, Pos2, Vec2};

use super::{Label, Paint, Pen, Rendered, Surface, TEXT_PRIMARY};
use crate::model::NetworkTopology;

pub const NODE_RADIUS: f32 = 20.0;
const CAPTION_OFFSET: f32 = 20.0;

const INPUT: (Color32, Color32) = (Color32::from_rgb(0x60, 0xa5, 0xfa), Color32::from_rgb(0x3b, 0x82, 0xf6));
const HIDDEN: (Color32, Color32) = (Color32::from_rgb(0xa7, 0x8b, 0xfa), Color32::from_rgb(0x8b, 0x5c, 0xf6));
const OUTPUT: (Color32, Color32) = (Color32::from_rgb(0x34, 0xd3, 0x99), Color32::from_rgb(0x10, 0xb9, 0x81));

/// Neuron centers per layer: columns evenly spread across the width, and
/// each column's neurons evenly spread down the height.
pub fn neuron_positions(topology: &NetworkTopology, size: Vec2) -> Vec<Vec<Pos2>> {
    let layers = topology.layers();
    let layer_spacing = size.x / (layers.len() as f32 + 1.0);
    layers
        .iter()
        .enumerate()
        .map(|(layer_idx, layer)| {
            let x = layer_spacing * (layer_idx as f32 + 1.0);
            let node_spacing = size.y / (layer.neurons as f32 + 1.0);
            (0..layer.neurons)
                .map(|node_idx| Pos2::new(x, node_spacing * (node_idx as f32 + 1.0)))
                .collect()
        })
        .collect()
}

pub fn draw_network(surface: &mut dyn Surface, topology: Option<&NetworkTopology>) -> Rendered {
    let Some(topology) = topology else {
        return Rendered::Placeholder;
    };
    let positions = neuron_positions(topology, surface.size());

    // Full bipartite connections between neighbouring layers, rim to rim.
    for pair in positions.windows(2) {
        for &from in &pair[0] {
            for &to in &pair[1] {
                let start = from + Vec2::new(NODE_RADIUS, 0.0);
                let end = to - Vec2::new(NODE_RADIUS, 0.0);
                let pen = Pen {
                    width: 1.5,
                    paint: Paint::Linear {
                        start,
                        end,
                        stops: vec![
                            (0.0, Color32::from_rgba_unmultiplied(59, 130, 246, 77)),
                            (0.5, Color32::from_rgba_unmultiplied(139, 92, 246, 102)),
                            (1.0, Color32::from_rgba_unmultiplied(16, 185, 129, 77)),
                        ],
                    },
                    dash: None,
                };
                surface.line(start, end, &pen);
            }
        }
    }

    let rim = Pen::solid(2.5, Color32::from_rgba_unmultiplied(255, 255, 255, 204));
    let height = surface.size().y;
    for (layer_idx, column) in positions.iter().enumerate() {
        let layer = &topology.layers()[layer_idx];
        let (light, dark) = if layer.is_input {
            INPUT
        } else if topology.is_output(layer_idx) {
            OUTPUT
        } else {
            HIDDEN
        };
        for (node_idx, &center) in column.iter().enumerate() {
            let fill = Paint::Radial {
                center: center - Vec2::splat(NODE_RADIUS / 3.0),
                radius: NODE_RADIUS,
                inner: light,
                outer: dark,
            };
            surface.circle(center, NODE_RADIUS, &fill, Some(&rim));
            surface.text(
                center,
                &Label::centered((node_idx + 1).to_string(), 12.0, Color32::WHITE),
            );
        }

        let caption = if layer.is_input {
            "Input".to_string()
        } else {
            format!("Layer {layer_idx}")
        };
        let x = column.first().map(|p| p.x).unwrap_or_default();
        surface.text(
            Pos2::new(x, height - CAPTION_OFFSET),
            &Label::centered(caption, 14.0, TEXT_PRIMARY),
        );
    }
    Rendered::Drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Activation;
    use crate::render::CommandList;
    use crate::render::DrawCommand;

    fn topology(counts: &[usize]) -> NetworkTopology {
        counts
            .iter()
            .fold(NetworkTopology::builder(), |b, &n| b.layer(n, Activation::Sigmoid))
            .build()
            .unwrap()
    }

    #[test]
    fn no_topology_is_placeholder() {
        let mut surface = CommandList::new(400.0, 300.0);
        assert_eq!(draw_network(&mut surface, None), Rendered::Placeholder);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn one_circle_per_neuron_and_one_column_per_layer() {
        let topo = topology(&[4, 16, 8, 4, 1]);
        let mut surface = CommandList::new(800.0, 600.0);
        assert_eq!(draw_network(&mut surface, Some(&topo)), Rendered::Drawn);

        assert_eq!(surface.circles().count(), 33);
        let mut columns: Vec<f32> = surface.circles().map(|(c, _)| c.x).collect();
        columns.dedup();
        assert_eq!(columns.len(), 5);
        let edges = 4 * 16 + 16 * 8 + 8 * 4 + 4;
        assert_eq!(surface.lines().count(), edges);
    }

    #[test]
    fn layout_spacing() {
        let topo = topology(&[2, 3]);
        let positions = neuron_positions(&topo, Vec2::new(300.0, 400.0));
        assert_eq!(positions[0], vec![Pos2::new(100.0, 400.0 / 3.0), Pos2::new(100.0, 800.0 / 3.0)]);
        assert_eq!(positions[1][1], Pos2::new(200.0, 200.0));
    }

    #[test]
    fn labels_and_roles() {
        let topo = topology(&[2, 3, 1]);
        let mut surface = CommandList::new(400.0, 300.0);
        draw_network(&mut surface, Some(&topo));

        let texts: Vec<&str> = surface.texts().map(|(_, l)| l.text.as_str()).collect();
        assert!(texts.contains(&"Input"));
        assert!(texts.contains(&"Layer 1"));
        assert!(texts.contains(&"Layer 2"));
        assert_eq!(texts.iter().filter(|t| **t == "3").count(), 1);

        let fills: Vec<Color32> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle {
                    fill: Paint::Radial { outer, .. },
                    ..
                } => Some(*outer),
                _ => None,
            })
            .collect();
        assert_eq!(fills[0], INPUT.1);
        assert_eq!(fills[2], HIDDEN.1);
        assert_eq!(fills[5], OUTPUT.1);
    }

    #[test]
    fn redraw_is_identical() {
        let topo = topology(&[3, 2]);
        let mut a = CommandList::new(320.0, 240.0);
        let mut b = CommandList::new(320.0, 240.0);
        draw_network(&mut a, Some(&topo));
        draw_network(&mut b, Some(&topo));
        assert_eq!(a.commands(), b.commands());
    }
}

//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in arena coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Push the two triangles of an axis-aligned quad
pub fn push_rect(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let (min, max) = (rect.min, rect.max());
    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(min.x, max.y, color));

    out.push(Vertex::new(min.x, max.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
}

/// Generate vertices for a filled rectangle
pub fn rect(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_rect(&mut vertices, rect, color);
    vertices
}

/// Rectangle outline of the given thickness (drawn inside the rectangle)
pub fn rect_outline(rect: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (min, size) = (rect.min, rect.size);
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    push_rect(&mut vertices, &Rect::new(min.x, min.y, size.x, t), color);
    push_rect(&mut vertices, &Rect::new(min.x, min.y + size.y - t, size.x, t), color);
    push_rect(&mut vertices, &Rect::new(min.x, min.y + t, t, size.y - 2.0 * t), color);
    push_rect(
        &mut vertices,
        &Rect::new(min.x + size.x - t, min.y + t, t, size.y - 2.0 * t),
        color,
    );
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let point = |r: f32, theta: f32| center + Vec2::new(r * theta.cos(), r * theta.sin());

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = point(inner_radius, theta1);
        let outer1 = point(outer_radius, theta1);
        let inner2 = point(inner_radius, theta2);
        let outer2 = point(outer_radius, theta2);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Horizontal gauge: background plus a fill proportional to `fraction`.
/// With `from_right` the fill drains toward the right edge (mirrored HUD).
pub fn bar(
    area: &Rect,
    fraction: f32,
    back: [f32; 4],
    fill: [f32; 4],
    from_right: bool,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(12);
    push_rect(&mut vertices, area, back);

    let width = area.size.x * fraction.clamp(0.0, 1.0);
    if width > 0.0 {
        let x = if from_right {
            area.max().x - width
        } else {
            area.min.x
        };
        push_rect(&mut vertices, &Rect::new(x, area.min.y, width, area.size.y), fill);
    }
    vertices
}

// Segment bits: top, top-right, bottom-right, bottom, bottom-left, top-left, middle
const SEGMENTS: [u8; 10] = [
    0b0111111, 0b0000110, 0b1011011, 0b1001111, 0b1100110, 0b1101101, 0b1111101, 0b0000111,
    0b1111111, 0b1101111,
];

/// A seven-segment digit whose top-left corner is at `origin`
pub fn digit(origin: Vec2, height: f32, value: u8, color: [f32; 4]) -> Vec<Vertex> {
    let Some(&mask) = SEGMENTS.get(value as usize) else {
        return Vec::new();
    };
    let w = height * 0.55;
    let t = (height * 0.12).max(1.0);
    let half = height / 2.0;
    let (x, y) = (origin.x, origin.y);

    let segments = [
        Rect::new(x, y, w, t),
        Rect::new(x + w - t, y, t, half),
        Rect::new(x + w - t, y + half, t, half),
        Rect::new(x, y + height - t, w, t),
        Rect::new(x, y + half, t, half),
        Rect::new(x, y, t, half),
        Rect::new(x, y + half - t / 2.0, w, t),
    ];

    let mut vertices = Vec::with_capacity(42);
    for (i, segment) in segments.iter().enumerate() {
        if mask & (1 << i) != 0 {
            push_rect(&mut vertices, segment, color);
        }
    }
    vertices
}

/// Width of a rendered number, for centring
pub fn number_width(value: u32, height: f32) -> f32 {
    let digits = value.checked_ilog10().unwrap_or(0) + 1;
    let w = height * 0.55;
    digits as f32 * w + (digits - 1) as f32 * height * 0.2
}

/// A decimal number centred horizontally on `center_x`, top edge at `top`
pub fn number(center_x: f32, top: f32, height: f32, value: u32, color: [f32; 4]) -> Vec<Vertex> {
    let text = value.to_string();
    let w = height * 0.55;
    let gap = height * 0.2;
    let mut x = center_x - number_width(value, height) / 2.0;
    let mut vertices = Vec::new();
    for byte in text.bytes() {
        vertices.extend(digit(Vec2::new(x, top), height, byte - b'0', color));
        x += w + gap;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_two_triangles() {
        let v = rect(&Rect::new(0.0, 0.0, 10.0, 5.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert!(v.iter().all(|v| v.position[0] >= 0.0 && v.position[0] <= 10.0));
    }

    #[test]
    fn test_bar_fill() {
        let area = Rect::new(0.0, 0.0, 100.0, 10.0);
        let empty = bar(&area, 0.0, [0.0; 4], [1.0; 4], false);
        assert_eq!(empty.len(), 6);

        let half = bar(&area, 0.5, [0.0; 4], [1.0; 4], true);
        assert_eq!(half.len(), 12);
        // Mirrored fill hugs the right edge
        let fill_min_x = half[6..].iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        assert_eq!(fill_min_x, 50.0);

        // Overfull is clamped
        let full = bar(&area, 3.0, [0.0; 4], [1.0; 4], false);
        let fill_max_x = full[6..].iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!(fill_max_x, 100.0);
    }

    #[test]
    fn test_digit_segments() {
        // 8 lights every segment, 1 lights two
        assert_eq!(digit(Vec2::ZERO, 20.0, 8, [1.0; 4]).len(), 7 * 6);
        assert_eq!(digit(Vec2::ZERO, 20.0, 1, [1.0; 4]).len(), 2 * 6);
        assert!(digit(Vec2::ZERO, 20.0, 12, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_number_centred() {
        let v = number(100.0, 0.0, 20.0, 99, [1.0; 4]);
        let min_x = v.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = v.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!(((min_x + max_x) / 2.0 - 100.0).abs() < 1e-3);
        assert_eq!(number_width(0, 20.0), 11.0);
    }
}

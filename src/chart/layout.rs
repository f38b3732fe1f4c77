//! Geometry for the charts egui_plot has no primitive for: squarified
//! treemap tiles, sunburst arcs and ternary projection.

use std::collections::HashMap;
use std::f64::consts::TAU;

use super::spec::HierarchyNode;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Shrink on every side, never below zero size.
    pub fn inset(&self, by: f64) -> Rect {
        let dx = by.min(self.w / 2.0);
        let dy = by.min(self.h / 2.0);
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w - 2.0 * dx,
            h: self.h - 2.0 * dy,
        }
    }
}

/// Annular sector, angles in radians counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub inner: f64,
    pub outer: f64,
    pub start: f64,
    pub end: f64,
}

// ---------------------------------------------------------------------------
// Squarified treemap
// ---------------------------------------------------------------------------

/// Tiles `bounds` with one rectangle per value, areas proportional to the
/// values, aspect ratios kept close to 1 (Bruls et al.). Output is in input
/// order; non-positive values get an empty rectangle.
pub fn squarify(values: &[f64], bounds: Rect) -> Vec<Rect> {
    let mut out = vec![Rect::default(); values.len()];
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 || bounds.area() <= 0.0 {
        return out;
    }
    let scale = bounds.area() / total;
    let mut order: Vec<usize> = (0..values.len()).filter(|&i| values[i] > 0.0).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    let areas: Vec<(usize, f64)> = order.into_iter().map(|i| (i, values[i] * scale)).collect();

    let mut rect = bounds;
    let mut row: Vec<(usize, f64)> = Vec::new();
    let mut next = 0;
    while next < areas.len() {
        let side = rect.w.min(rect.h);
        let mut candidate = row.clone();
        candidate.push(areas[next]);
        if row.is_empty() || worst(&candidate, side) <= worst(&row, side) {
            row = candidate;
            next += 1;
        } else {
            rect = place_row(&row, rect, &mut out);
            row.clear();
        }
    }
    if !row.is_empty() {
        place_row(&row, rect, &mut out);
    }
    out
}

/// Worst aspect ratio of a row laid along a side of length `side`.
fn worst(row: &[(usize, f64)], side: f64) -> f64 {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();
    let side2 = side * side;
    row.iter()
        .map(|(_, a)| (side2 * a / (sum * sum)).max(sum * sum / (side2 * a)))
        .fold(0.0, f64::max)
}

/// Lay `row` along the shorter side of `rect`; returns the remaining space.
fn place_row(row: &[(usize, f64)], rect: Rect, out: &mut [Rect]) -> Rect {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();
    if rect.w >= rect.h {
        let width = sum / rect.h;
        let mut y = rect.y;
        for &(i, a) in row {
            let h = a / width;
            out[i] = Rect { x: rect.x, y, w: width, h };
            y += h;
        }
        Rect {
            x: rect.x + width,
            w: (rect.w - width).max(0.0),
            ..rect
        }
    } else {
        let height = sum / rect.w;
        let mut x = rect.x;
        for &(i, a) in row {
            let w = a / height;
            out[i] = Rect { x, y: rect.y, w, h: height };
            x += w;
        }
        Rect {
            y: rect.y + height,
            h: (rect.h - height).max(0.0),
            ..rect
        }
    }
}

fn children(nodes: &[HierarchyNode]) -> (Vec<usize>, HashMap<&str, Vec<usize>>) {
    let mut roots = Vec::new();
    let mut kids: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, n) in nodes.iter().enumerate() {
        match &n.parent {
            Some(p) => kids.entry(p.as_str()).or_default().push(i),
            None => roots.push(i),
        }
    }
    (roots, kids)
}

/// One tile per node (index-aligned). Children are nested inside their
/// parent, shrunk by `padding` and leaving `header` space on top for the
/// parent's label.
pub fn treemap_tiles(nodes: &[HierarchyNode], bounds: Rect, padding: f64, header: f64) -> Vec<Rect> {
    let mut tiles = vec![Rect::default(); nodes.len()];
    let (roots, kids) = children(nodes);

    let mut stack: Vec<(Vec<usize>, Rect)> = vec![(roots, bounds)];
    while let Some((group, area)) = stack.pop() {
        let values: Vec<f64> = group.iter().map(|&i| nodes[i].value).collect();
        for (&i, rect) in group.iter().zip(squarify(&values, area)) {
            tiles[i] = rect;
            if let Some(sub) = kids.get(nodes[i].id.as_str()) {
                let mut inner = rect.inset(padding);
                let top = header.min(inner.h / 2.0);
                inner.y += top;
                inner.h -= top;
                stack.push((sub.clone(), inner));
            }
        }
    }
    tiles
}

/// One ring sector per node (index-aligned) on a unit disc. Rings have equal
/// width; children split their parent's angle by value.
pub fn sunburst_sectors(nodes: &[HierarchyNode]) -> Vec<Option<Sector>> {
    let mut sectors = vec![None; nodes.len()];
    let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
    let ring = 1.0 / (max_depth + 1) as f64;
    let (roots, kids) = children(nodes);

    let mut stack: Vec<(Vec<usize>, f64, f64)> = vec![(roots, 0.0, TAU)];
    while let Some((group, start, end)) = stack.pop() {
        let total: f64 = group.iter().map(|&i| nodes[i].value.max(0.0)).sum();
        if total <= 0.0 {
            continue;
        }
        let mut angle = start;
        for &i in &group {
            let sweep = (end - start) * nodes[i].value.max(0.0) / total;
            let depth = nodes[i].depth as f64;
            sectors[i] = Some(Sector {
                inner: depth * ring,
                outer: (depth + 1.0) * ring,
                start: angle,
                end: angle + sweep,
            });
            if let Some(sub) = kids.get(nodes[i].id.as_str()) {
                stack.push((sub.clone(), angle, angle + sweep));
            }
            angle += sweep;
        }
    }
    sectors
}

// ---------------------------------------------------------------------------
// Ternary
// ---------------------------------------------------------------------------

/// Cartesian position of a ternary point inside the triangle with corners
/// a = (0.5, √3/2), b = (0, 0), c = (1, 0). Components are normalised by
/// their sum; `None` when the sum is zero or not finite.
pub fn ternary_xy(a: f64, b: f64, c: f64) -> Option<[f64; 2]> {
    let sum = a + b + c;
    if sum == 0.0 || !sum.is_finite() {
        return None;
    }
    let (a, c) = (a / sum, c / sum);
    Some([c + a / 2.0, a * 3f64.sqrt() / 2.0])
}

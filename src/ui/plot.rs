use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart as PlotBarChart, BoxElem, BoxPlot, BoxSpread, GridMark,
    Legend, Line, Plot, PlotPoint, Points, Polygon, Text,
};

use crate::chart::layout::{self, Rect};
use crate::chart::spec::{
    BarChart, Buckets, ChartSpec, Choropleth, ColorAxis, DensityHeatmap, GeoScatter, HeatmapFacet,
    Hierarchy, HierarchyNode, HierarchyStyle, Scatter3d, TernaryScatter, ViolinChart,
};
use crate::color::{self, ContinuousScale};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Draw `spec` into a `height`-tall area. `frame` selects the animation frame
/// of animated charts and is ignored by the rest.
pub fn chart(ui: &mut Ui, id: &str, spec: &ChartSpec, frame: usize, height: f32) {
    match spec {
        ChartSpec::Bar(c) => bar_chart(ui, id, c, frame, height),
        ChartSpec::Heatmap(c) => heatmap(ui, id, c, height),
        ChartSpec::Hierarchy(c) => hierarchy(ui, c, height),
        ChartSpec::Ternary(c) => ternary(ui, id, c, frame, height),
        ChartSpec::Geo(c) => geo(ui, id, c, height),
        ChartSpec::Choropleth(c) => choropleth(ui, id, c, frame, height),
        ChartSpec::Violin(c) => violin(ui, id, c, height),
        ChartSpec::Scatter3d(c) => scatter3d(ui, id, c, height),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `#rrggbb` to egui colour, grey when unparsable.
pub fn hex_to_color32(hex: &str) -> Color32 {
    let c = color::parse_hex(hex)
        .or_else(|| color::parse_hex(color::FALLBACK))
        .unwrap_or_default();
    Color32::from_rgb(c.red, c.green, c.blue)
}

fn translucent(c: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), alpha)
}

/// Black or white, whichever reads better on `fill`.
fn text_on(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn pick<T>(frames: &[T], index: usize) -> Option<&T> {
    frames.get(index.min(frames.len().saturating_sub(1)))
}

/// Axis labels for integer positions `0..labels.len()`.
fn category_formatter(labels: &[String]) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + '_ {
    move |mark, _range| {
        let v = mark.value;
        if v < -0.5 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

fn bucket_labels(buckets: &Buckets) -> Vec<String> {
    (0..buckets.len()).map(|i| buckets.label(i)).collect()
}

/// Label of the mark nearest to `at`.
fn nearest<'a>(marks: &'a [([f64; 2], String)], at: &PlotPoint) -> Option<&'a str> {
    marks
        .iter()
        .map(|(p, label)| ((p[0] - at.x).powi(2) + (p[1] - at.y).powi(2), label))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, label)| label.as_str())
}

fn empty_note(ui: &mut Ui, height: f32, msg: &str) {
    ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.weak(msg);
        });
    });
}

/// Horizontal gradient legend for a continuous scale.
fn color_bar(ui: &mut Ui, scale: ContinuousScale, min: f64, max: f64, title: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.small(title);
        ui.small(format!("{min:.2}"));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(160.0, 10.0), Sense::hover());
        let steps = 32;
        let w = rect.width() / steps as f32;
        for i in 0..steps {
            let t = (i as f64 + 0.5) / steps as f64;
            let cell = egui::Rect::from_min_size(
                Pos2::new(rect.left() + i as f32 * w, rect.top()),
                egui::vec2(w + 0.5, rect.height()),
            );
            ui.painter().rect_filled(cell, 0.0, hex_to_color32(&scale.sample(t)));
        }
        ui.small(format!("{max:.2}"));
    });
}

fn axis_bar(ui: &mut Ui, axis: &ColorAxis) {
    color_bar(ui, axis.scale, axis.min, axis.max, &axis.title);
}

// ---------------------------------------------------------------------------
// Bar / histogram
// ---------------------------------------------------------------------------

/// Centre and width of each x slot.
fn slots(buckets: &Buckets) -> Vec<(f64, f64)> {
    match buckets {
        Buckets::Categories(c) => (0..c.len()).map(|i| (i as f64, 1.0)).collect(),
        Buckets::Bins(b) => b.iter().map(|bin| (bin.center(), bin.end - bin.start)).collect(),
    }
}

fn bar_chart(ui: &mut Ui, id: &str, chart: &BarChart, frame: usize, height: f32) {
    let Some(current) = pick(&chart.frames, frame) else {
        return empty_note(ui, height, "No data");
    };
    let slots = slots(&chart.x);
    let n = current.series.len().max(1) as f64;
    let labels = bucket_labels(&chart.x);

    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label(chart.x_title.as_str())
        .y_axis_label(chart.y_title.as_str())
        .allow_scroll(false);
    if let Buckets::Categories(_) = chart.x {
        plot = plot
            .x_axis_formatter(category_formatter(&labels))
            .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]));
    }

    plot.show(ui, |plot_ui| {
        for (s, series) in current.series.iter().enumerate() {
            let color = hex_to_color32(&series.color);
            let bars: Vec<Bar> = series
                .values
                .iter()
                .zip(&slots)
                .enumerate()
                .filter_map(|(i, (v, &(center, width)))| {
                    let v = (*v)?;
                    let w = width * 0.8 / n;
                    let x = center - width * 0.4 + w * (s as f64 + 0.5);
                    Some(Bar::new(x, v).width(w).fill(color).name(&labels[i]))
                })
                .collect();
            plot_ui.bar_chart(PlotBarChart::new(bars).name(&series.name).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Density heatmap
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, id: &str, chart: &DensityHeatmap, height: f32) {
    let mut rows: Vec<Option<&str>> = Vec::new();
    let mut cols: Vec<Option<&str>> = Vec::new();
    for f in &chart.facets {
        if !rows.contains(&f.row.as_deref()) {
            rows.push(f.row.as_deref());
        }
        if !cols.contains(&f.col.as_deref()) {
            cols.push(f.col.as_deref());
        }
    }
    if rows.is_empty() {
        return empty_note(ui, height, "No data");
    }

    color_bar(ui, chart.scale, 0.0, chart.max_count as f64, "count");
    let facet_height = (height / rows.len() as f32).max(120.0);
    for (r, row) in rows.iter().enumerate() {
        if let Some(key) = row {
            ui.small(*key);
        }
        ui.columns(cols.len(), |uis| {
            for (c, col) in cols.iter().enumerate() {
                let facet = chart
                    .facets
                    .iter()
                    .find(|f| f.row.as_deref() == *row && f.col.as_deref() == *col);
                if let Some(facet) = facet {
                    if let Some(key) = col {
                        uis[c].small(*key);
                    }
                    heatmap_facet(&mut uis[c], &format!("{id}_{r}_{c}"), chart, facet, facet_height);
                }
            }
        });
    }
}

fn heatmap_facet(ui: &mut Ui, id: &str, chart: &DensityHeatmap, facet: &HeatmapFacet, height: f32) {
    let x_labels = bucket_labels(&chart.x);
    let y_labels = bucket_labels(&chart.y);
    let max = chart.max_count.max(1) as f64;

    Plot::new(id)
        .height(height)
        .x_axis_label(chart.x_title.as_str())
        .y_axis_label(chart.y_title.as_str())
        .x_axis_formatter(category_formatter(&x_labels))
        .y_axis_formatter(category_formatter(&y_labels))
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .show_grid(false)
        .allow_scroll(false)
        .label_formatter(|_, p| {
            let (x, y) = (p.x.round(), p.y.round());
            if x < 0.0 || y < 0.0 {
                return String::new();
            }
            let (xi, yi) = (x as usize, y as usize);
            match facet.counts.get(yi).and_then(|row| row.get(xi)) {
                Some(n) => format!("{}\n{}\ncount: {n}", chart.x.label(xi), chart.y.label(yi)),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            for (yi, row) in facet.counts.iter().enumerate() {
                for (xi, &count) in row.iter().enumerate() {
                    if count == 0 {
                        continue;
                    }
                    let (x, y) = (xi as f64, yi as f64);
                    let fill = hex_to_color32(&chart.scale.sample(count as f64 / max));
                    let cell = vec![[x - 0.5, y - 0.5], [x + 0.5, y - 0.5], [x + 0.5, y + 0.5], [x - 0.5, y + 0.5]];
                    plot_ui.polygon(Polygon::new(cell).fill_color(fill).stroke(Stroke::NONE));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Treemap / sunburst
// ---------------------------------------------------------------------------

fn node_tooltip(node: &HierarchyNode) -> String {
    let mut lines = vec![node.id.clone(), format!("value: {:.2}", node.value)];
    if let Some(c) = node.color_value {
        lines.push(format!("color: {c:.3}"));
    }
    lines.extend(node.hover.iter().map(|(k, v)| format!("{k}: {v}")));
    lines.join("\n")
}

fn hierarchy(ui: &mut Ui, chart: &Hierarchy, height: f32) {
    if let Some(axis) = &chart.color_axis {
        axis_bar(ui, axis);
    }
    if chart.nodes.is_empty() {
        return empty_note(ui, height, "No data");
    }
    let (response, painter) = ui.allocate_painter(egui::vec2(ui.available_width(), height), Sense::hover());
    let area = response.rect;
    let pointer = response.hover_pos();

    let hovered = match chart.style {
        HierarchyStyle::Treemap => {
            let bounds = Rect {
                x: area.left() as f64,
                y: area.top() as f64,
                w: area.width() as f64,
                h: area.height() as f64,
            };
            let tiles = layout::treemap_tiles(&chart.nodes, bounds, 2.0, 16.0);
            for (node, tile) in chart.nodes.iter().zip(&tiles) {
                if tile.area() <= 0.0 {
                    continue;
                }
                let rect = egui::Rect::from_min_size(
                    Pos2::new(tile.x as f32, tile.y as f32),
                    egui::vec2(tile.w as f32, tile.h as f32),
                );
                let fill = hex_to_color32(&node.fill);
                painter.rect_filled(rect, 0.0, fill);
                painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::WHITE), egui::StrokeKind::Inside);
                if rect.width() > 40.0 && rect.height() > 14.0 {
                    painter.text(
                        rect.left_top() + egui::vec2(3.0, 2.0),
                        Align2::LEFT_TOP,
                        &node.label,
                        FontId::proportional(11.0),
                        text_on(fill),
                    );
                }
            }
            pointer.and_then(|p| {
                tiles.iter().rposition(|t| {
                    let (x, y) = (p.x as f64, p.y as f64);
                    t.area() > 0.0 && x >= t.x && x < t.x + t.w && y >= t.y && y < t.y + t.h
                })
            })
        }
        HierarchyStyle::Sunburst => {
            let center = area.center();
            let radius = (area.width().min(area.height()) / 2.0 - 4.0).max(1.0) as f64;
            let sectors = layout::sunburst_sectors(&chart.nodes);
            let at = |r: f64, a: f64| Pos2::new(center.x + (r * radius * a.cos()) as f32, center.y - (r * radius * a.sin()) as f32);

            for (node, sector) in chart.nodes.iter().zip(&sectors) {
                let Some(s) = sector else { continue };
                let fill = hex_to_color32(&node.fill);
                let sweep = s.end - s.start;
                let steps = ((sweep / 0.05).ceil() as usize).max(2);
                for k in 0..steps {
                    let a0 = s.start + sweep * k as f64 / steps as f64;
                    let a1 = s.start + sweep * (k + 1) as f64 / steps as f64;
                    let quad = vec![at(s.inner, a0), at(s.outer, a0), at(s.outer, a1), at(s.inner, a1)];
                    painter.add(egui::Shape::convex_polygon(quad, fill, Stroke::NONE));
                }
                let edge = Stroke::new(1.0, Color32::WHITE);
                painter.line_segment([at(s.inner, s.start), at(s.outer, s.start)], edge);
                painter.line_segment([at(s.inner, s.end), at(s.outer, s.end)], edge);

                let mid = (s.start + s.end) / 2.0;
                if sweep * s.outer * radius > 36.0 {
                    painter.text(
                        at((s.inner + s.outer) / 2.0, mid),
                        Align2::CENTER_CENTER,
                        &node.label,
                        FontId::proportional(10.0),
                        text_on(fill),
                    );
                }
            }
            pointer.and_then(|p| {
                let (dx, dy) = ((p.x - center.x) as f64, (center.y - p.y) as f64);
                let r = dx.hypot(dy) / radius;
                let a = dy.atan2(dx).rem_euclid(TAU);
                sectors.iter().position(|s| {
                    s.is_some_and(|s| r >= s.inner && r < s.outer && a >= s.start && a < s.end)
                })
            })
        }
    };

    if let Some(i) = hovered {
        response.on_hover_text_at_pointer(node_tooltip(&chart.nodes[i]));
    }
}

// ---------------------------------------------------------------------------
// Ternary scatter
// ---------------------------------------------------------------------------

fn ternary(ui: &mut Ui, id: &str, chart: &TernaryScatter, frame: usize, height: f32) {
    let Some(current) = pick(&chart.frames, frame) else {
        return empty_note(ui, height, "No data");
    };
    let top = 3f64.sqrt() / 2.0;

    let mut marks: Vec<([f64; 2], String)> = Vec::new();
    for series in &current.series {
        for p in &series.points {
            if let Some(xy) = layout::ternary_xy(p.a, p.b, p.c) {
                let label = p.label.clone().unwrap_or_else(|| series.name.clone());
                let text = format!(
                    "{label}\n{}: {:.3}\n{}: {:.3}\n{}: {:.3}",
                    chart.axes[0], p.a, chart.axes[1], p.b, chart.axes[2], p.c
                );
                marks.push((xy, text));
            }
        }
    }

    Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .include_x(-0.1)
        .include_x(1.1)
        .include_y(-0.1)
        .include_y(top + 0.1)
        .label_formatter(|_, p| nearest(&marks, p).unwrap_or_default().to_string())
        .show(ui, |plot_ui| {
            let outline = vec![[0.5, top], [0.0, 0.0], [1.0, 0.0], [0.5, top]];
            plot_ui.line(Line::new(outline).color(Color32::GRAY).width(1.0));
            plot_ui.text(Text::new(PlotPoint::new(0.5, top + 0.05), chart.axes[0].as_str()));
            plot_ui.text(Text::new(PlotPoint::new(-0.02, -0.05), chart.axes[1].as_str()));
            plot_ui.text(Text::new(PlotPoint::new(1.02, -0.05), chart.axes[2].as_str()));

            for series in &current.series {
                let color = hex_to_color32(&series.color);
                for p in &series.points {
                    let Some(xy) = layout::ternary_xy(p.a, p.b, p.c) else { continue };
                    plot_ui.points(
                        Points::new(vec![xy])
                            .name(&series.name)
                            .color(color)
                            .radius((p.size / 2.0).max(1.0) as f32)
                            .filled(true),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Geographic scatter
// ---------------------------------------------------------------------------

fn geo(ui: &mut Ui, id: &str, chart: &GeoScatter, height: f32) {
    let max_size = chart
        .traces
        .iter()
        .flat_map(|t| &t.markers)
        .map(|m| m.size)
        .fold(0.0f64, f64::max);
    let marks: Vec<([f64; 2], String)> = chart
        .traces
        .iter()
        .flat_map(|t| t.markers.iter().map(move |m| (t, m)))
        .map(|(t, m)| {
            let mut lines = vec![t.name.clone()];
            lines.extend(m.text.iter().cloned());
            ([m.position.lon, m.position.lat], lines.join("\n"))
        })
        .collect();

    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label("longitude")
        .y_axis_label("latitude")
        .allow_scroll(false)
        .label_formatter(|_, p| nearest(&marks, p).unwrap_or_default().to_string());

    let view = chart.center.map(|c| {
        let half = 120.0 / chart.projection_scale.max(1.0);
        (c, half)
    });
    if let Some((c, half)) = view {
        plot = plot
            .data_aspect((1.0 / c.lat.to_radians().cos()) as f32)
            .include_x(c.lon - half)
            .include_x(c.lon + half)
            .include_y(c.lat - half / 2.0)
            .include_y(c.lat + half / 2.0);
    }

    plot.show(ui, |plot_ui| {
        if let Some((c, half)) = view {
            let land = vec![
                [c.lon - half, c.lat - half / 2.0],
                [c.lon + half, c.lat - half / 2.0],
                [c.lon + half, c.lat + half / 2.0],
                [c.lon - half, c.lat + half / 2.0],
            ];
            let fill = translucent(hex_to_color32(&chart.land_color), 60);
            plot_ui.polygon(Polygon::new(land).fill_color(fill).stroke(Stroke::NONE));
        }
        for trace in &chart.traces {
            let color = hex_to_color32(&trace.color);
            for m in &trace.markers {
                let scaled = if max_size > 0.0 { (m.size.max(0.0) / max_size).sqrt() } else { 0.0 };
                plot_ui.points(
                    Points::new(vec![[m.position.lon, m.position.lat]])
                        .name(&trace.name)
                        .color(translucent(color, 200))
                        .radius((3.0 + 12.0 * scaled) as f32)
                        .filled(true),
                );
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Choropleth (rendered as a coloured table)
// ---------------------------------------------------------------------------

fn choropleth(ui: &mut Ui, id: &str, chart: &Choropleth, frame: usize, height: f32) {
    let Some(current) = pick(&chart.frames, frame) else {
        return empty_note(ui, height, "No data");
    };
    axis_bar(ui, &chart.color_axis);

    let hover_titles: Vec<&str> = current
        .regions
        .first()
        .map(|r| r.hover.iter().map(|(k, _)| k.as_str()).collect())
        .unwrap_or_default();

    ui.push_id(id, |ui: &mut Ui| {
        let mut table = TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(height)
            .column(Column::exact(28.0))
            .column(Column::auto())
            .column(Column::auto().at_least(120.0))
            .column(Column::auto());
        for _ in &hover_titles {
            table = table.column(Column::auto());
        }

        table
            .header(20.0, |mut header| {
                header.col(|_| {});
                header.col(|ui| {
                    ui.strong("code");
                });
                header.col(|ui| {
                    ui.strong("name");
                });
                header.col(|ui| {
                    ui.strong(&chart.color_axis.title);
                });
                for title in &hover_titles {
                    header.col(|ui| {
                        ui.strong(*title);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, current.regions.len(), |mut row| {
                    let region = &current.regions[row.index()];
                    row.col(|ui| {
                        let (rect, _) = ui.allocate_exact_size(Vec2::new(22.0, 12.0), Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, hex_to_color32(&region.fill));
                    });
                    row.col(|ui| {
                        ui.monospace(&region.location);
                    });
                    row.col(|ui| {
                        ui.label(&region.name);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.3}", region.value));
                    });
                    for (_, value) in &region.hover {
                        row.col(|ui| {
                            ui.label(value);
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Violin
// ---------------------------------------------------------------------------

fn violin(ui: &mut Ui, id: &str, chart: &ViolinChart, height: f32) {
    let n = chart.series.len().max(1) as f64;
    let slot = 0.8 / n;

    Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label(chart.x_title.as_str())
        .y_axis_label(chart.y_title.as_str())
        .x_axis_formatter(category_formatter(&chart.categories))
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (s, series) in chart.series.iter().enumerate() {
                let color = hex_to_color32(&series.color);
                let mut boxes = Vec::new();
                for group in &series.groups {
                    let Some(ci) = chart.categories.iter().position(|c| *c == group.category) else {
                        continue;
                    };
                    let x = ci as f64 - 0.4 + slot * (s as f64 + 0.5);
                    let half = slot * 0.45;

                    if !group.density.is_empty() {
                        let outline: Vec<[f64; 2]> = group
                            .density
                            .iter()
                            .map(|&(v, d)| [x + d * half, v])
                            .chain(group.density.iter().rev().map(|&(v, d)| [x - d * half, v]))
                            .collect();
                        plot_ui.polygon(
                            Polygon::new(outline)
                                .name(&series.name)
                                .fill_color(translucent(color, 70))
                                .stroke(Stroke::new(1.0, color)),
                        );
                    }
                    if chart.mean_line {
                        let m = group.stats.mean;
                        plot_ui.line(
                            Line::new(vec![[x - half, m], [x + half, m]])
                                .name(&series.name)
                                .color(color)
                                .style(egui_plot::LineStyle::dashed_dense()),
                        );
                    }
                    if chart.box_visible {
                        let st = &group.stats;
                        boxes.push(
                            BoxElem::new(x, BoxSpread::new(st.lower_fence, st.q1, st.median, st.q3, st.upper_fence))
                                .name(format!("{} / {}", series.name, group.category))
                                .box_width(half * 0.4)
                                .whisker_width(0.0)
                                .fill(translucent(color, 160))
                                .stroke(Stroke::new(1.0, color)),
                        );
                    }
                }
                if !boxes.is_empty() {
                    plot_ui.box_plot(BoxPlot::new(boxes).name(&series.name).color(color));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// 3-D scatter (x/y with z as marker size)
// ---------------------------------------------------------------------------

fn scatter3d(ui: &mut Ui, id: &str, chart: &Scatter3d, height: f32) {
    let (lo, hi) = chart
        .series
        .iter()
        .flat_map(|s| &s.points)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.z), hi.max(p.z)));
    let span = hi - lo;
    let radius = |z: f64| if span > 0.0 { 2.0 + 8.0 * (z - lo) / span } else { 5.0 };

    let marks: Vec<([f64; 2], String)> = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(move |p| (s, p)))
        .map(|(s, p)| {
            let label = p.label.clone().unwrap_or_else(|| s.name.clone());
            let text = format!(
                "{label}\n{}: {:.3}\n{}: {:.3}\n{}: {:.3}",
                chart.axes[0], p.x, chart.axes[1], p.y, chart.axes[2], p.z
            );
            ([p.x, p.y], text)
        })
        .collect();

    ui.small(format!("marker size: {}", chart.axes[2]));
    Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label(chart.axes[0].as_str())
        .y_axis_label(chart.axes[1].as_str())
        .allow_scroll(false)
        .label_formatter(|_, p| nearest(&marks, p).unwrap_or_default().to_string())
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let color = hex_to_color32(&series.color);
                for p in &series.points {
                    plot_ui.points(
                        Points::new(vec![[p.x, p.y]])
                            .name(&series.name)
                            .color(translucent(color, 200))
                            .radius(radius(p.z) as f32)
                            .filled(true),
                    );
                }
            }
        });
}

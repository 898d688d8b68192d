//! Flat-shaded SVG preview of a triangle mesh.

use procmesh_tessellation::TriangleMesh;

/// Isometric view: turn about Z, tilt about X, keep screen coordinates.
fn project(x: f64, y: f64, z: f64) -> (f64, f64) {
    let angle_x: f64 = 0.6;
    let angle_z: f64 = 0.8;
    let rx = x * angle_z.cos() - y * angle_z.sin();
    let ry = x * angle_z.sin() + y * angle_z.cos();
    let pz = ry * angle_x.sin() + z * angle_x.cos();
    (rx, -pz)
}

struct TriInfo {
    corners: [usize; 3],
    depth: f64,
    brightness: f64,
    is_backface: bool,
}

pub fn mesh_to_svg(mesh: &TriangleMesh, width: f64, height: f64, title: &str) -> String {
    if mesh.indices.is_empty() {
        return format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\
             <text x=\"10\" y=\"20\" font-family=\"monospace\" font-size=\"14\" fill=\"#ccc\">{title}</text>\
             </svg>"
        );
    }

    let num_verts = mesh.vertex_count();
    let projected: Vec<(f64, f64)> = (0..num_verts)
        .map(|i| {
            let p = mesh.position(i as u32);
            project(p.x, p.y, p.z)
        })
        .collect();
    let (min_x, max_x, min_y, max_y) = projected.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(lx, hx, ly, hy), &(px, py)| (lx.min(px), hx.max(px), ly.min(py), hy.max(py)),
    );

    let padding = 40.0;
    let avail_w = width - 2.0 * padding;
    let avail_h = height - 2.0 * padding - 25.0;
    let data_w = (max_x - min_x).max(0.001);
    let data_h = (max_y - min_y).max(0.001);
    let scale = (avail_w / data_w).min(avail_h / data_h);
    let offset_x = padding + (avail_w - data_w * scale) / 2.0;
    let offset_y = padding + 25.0 + (avail_h - data_h * scale) / 2.0;

    let tx = |px: f64| -> f64 { (px - min_x) * scale + offset_x };
    let ty = |py: f64| -> f64 { (py - min_y) * scale + offset_y };

    let light = (0.3_f64, -0.5_f64, 0.8_f64);
    let light_len = (light.0 * light.0 + light.1 * light.1 + light.2 * light.2).sqrt();

    let mut tris: Vec<TriInfo> = mesh
        .triangles()
        .map(|tri| {
            let [p0, p1, p2] = tri.map(|i| mesh.position(i));
            let depth = (p0.z + p1.z + p2.z) / 3.0;
            let n = (p1 - p0).cross(&(p2 - p0));
            let nlen = n.length().max(1e-12);
            let dot = (n.x * light.0 + n.y * light.1 + n.z * light.2) / (nlen * light_len);
            let brightness = 0.3 + 0.7 * dot.abs().min(1.0);

            // Negative projected area means the inside surface faces the
            // viewer; those triangles are tinted red.
            let corners = tri.map(|i| i as usize);
            let [(px0, py0), (px1, py1), (px2, py2)] = corners.map(|i| projected[i]);
            let signed_area = (px1 - px0) * (py2 - py0) - (px2 - px0) * (py1 - py0);
            TriInfo {
                corners,
                depth,
                brightness,
                is_backface: signed_area < 0.0,
            }
        })
        .collect();

    tris.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let num_tris = tris.len();
    // Thinner, darker outlines on dense meshes.
    let stroke_width = if num_tris > 200 { 0.2 } else { 0.5 };
    let stroke_color = if num_tris > 200 { "#222240" } else { "#2a2a4a" };

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" style=\"background:#1a1a2e\">\n\
         <text x=\"{}\" y=\"20\" font-family=\"monospace\" font-size=\"13\" fill=\"#8892b0\" text-anchor=\"middle\">{title}</text>\n",
        width / 2.0
    );

    for tri in &tris {
        let [(x0, y0), (x1, y1), (x2, y2)] = tri
            .corners
            .map(|i| (tx(projected[i].0), ty(projected[i].1)));

        let b = tri.brightness;
        let (r, g, bl) = if tri.is_backface {
            ((220.0 * b) as u8, (80.0 * b) as u8, (60.0 * b) as u8)
        } else {
            ((100.0 * b) as u8, (160.0 * b) as u8, (220.0 * b) as u8)
        };

        svg.push_str(&format!(
            "  <polygon points=\"{x0:.1},{y0:.1} {x1:.1},{y1:.1} {x2:.1},{y2:.1}\" \
             fill=\"rgb({r},{g},{bl})\" stroke=\"{stroke_color}\" stroke-width=\"{stroke_width}\"/>\n"
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"10\" fill=\"#5a6080\" \
         text-anchor=\"middle\">{} triangles, {} vertices</text>\n",
        width / 2.0,
        height - 8.0,
        num_tris,
        num_verts
    ));

    svg.push_str("</svg>\n");
    svg
}

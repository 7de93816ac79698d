use crate::region::Region;

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// SVG document with one unfilled `<polygon>` per region, stroked in the
/// region's display color and titled with its name.
pub fn format_svg(regions: &[Region], width: f64, height: f64) -> String {
    let mut s = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    );
    for r in regions {
        let pts: Vec<String> = r.points().iter().map(|p| format!("{},{}", p.x, p.y)).collect();
        s.push_str(&format!(
            "  <polygon points=\"{}\" style=\"fill:none;stroke:{};stroke-width:1\"><title>{}</title></polygon>\n",
            pts.join(" "),
            r.color(),
            escape(r.name())
        ));
    }
    s.push_str("</svg>\n");
    s
}

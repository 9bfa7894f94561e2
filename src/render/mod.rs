//! Drawing collaborators: groove profiles for the former and on-axis field
//! comparisons. Grooves are path geometry written by hand; the field charts
//! go through `plotters`.

pub mod field;
pub mod grooves;

pub use self::field::{FieldComparison, FieldPlotter, ReferenceCoil};
pub use self::grooves::{GrooveDrawing, GrooveRenderer, GrooveStyle};

use std::fmt::Write as _;

/// An SVG document under construction.
///
/// With `y_up` set, elements are placed in a group flipped about the x axis so
/// callers can work in ordinary cartesian coordinates.
pub struct SvgCanvas {
    view_box: [f64; 4],
    render_width: f64,
    y_up: bool,
    elements: Vec<String>,
}

impl SvgCanvas {
    /// Canvas of `width` x `height` user units with the origin in the centre.
    pub fn centered(width: f64, height: f64, render_width: f64) -> Self {
        Self {
            view_box: [-width / 2.0, -height / 2.0, width, height],
            render_width,
            y_up: true,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: String) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn finish(self) -> String {
        let [x, y, w, h] = self.view_box;
        let render_height = self.render_width * h / w;
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            num(self.render_width),
            num(render_height),
            num(x),
            num(y),
            num(w),
            num(h)
        );
        if self.y_up {
            out.push_str("<g transform=\"scale(1,-1)\">\n");
        }
        for element in &self.elements {
            out.push_str(element);
            out.push('\n');
        }
        if self.y_up {
            out.push_str("</g>\n");
        }
        out.push_str("</svg>\n");
        out
    }
}

/// Relative path commands with a tracked cursor, so arcs can be given by
/// centre and angles.
pub struct PathBuilder {
    d: String,
    cursor: (f64, f64),
}

impl PathBuilder {
    pub fn move_to(x: f64, y: f64) -> Self {
        Self {
            d: format!("M {} {}", num(x), num(y)),
            cursor: (x, y),
        }
    }

    pub fn horizontal(&mut self, dx: f64) -> &mut Self {
        self.cursor.0 += dx;
        let _ = write!(self.d, " h {}", num(dx));
        self
    }

    pub fn vertical(&mut self, dy: f64) -> &mut Self {
        self.cursor.1 += dy;
        let _ = write!(self.d, " v {}", num(dy));
        self
    }

    pub fn line_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.cursor.0 += dx;
        self.cursor.1 += dy;
        let _ = write!(self.d, " l {} {}", num(dx), num(dy));
        self
    }

    /// Circular arc around `(cx, cy)` from `start_deg` to `end_deg`. The
    /// cursor is expected to sit on the circle at `start_deg` already.
    /// Angles are counter-clockwise from +x in y-up coordinates.
    pub fn arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        clockwise: bool,
    ) -> &mut Self {
        let span = if clockwise {
            (start_deg - end_deg).rem_euclid(360.0)
        } else {
            (end_deg - start_deg).rem_euclid(360.0)
        };
        let large_arc = u8::from(span > 180.0);
        let sweep = u8::from(!clockwise);
        let end = end_deg.to_radians();
        let x = cx + radius * end.cos();
        let y = cy + radius * end.sin();
        self.cursor = (x, y);
        let _ = write!(
            self.d,
            " A {} {} 0 {} {} {} {}",
            num(radius),
            num(radius),
            large_arc,
            sweep,
            num(x),
            num(y)
        );
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.d.push_str(" Z");
        self
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn data(&self) -> &str {
        &self.d
    }

    pub fn to_element(&self, stroke_width: f64) -> String {
        format!(
            r#"<path d="{}" fill="none" stroke="black" stroke-width="{}"/>"#,
            self.d,
            num(stroke_width)
        )
    }
}

/// Compact decimal formatting for SVG attributes.
pub(crate) fn num(value: f64) -> String {
    let s = format!("{:.6}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

//! Planar geometry for floor plans: points, polygons and transforms.
//!
//! Obstacles arrive from the drawing as axis-aligned rectangles, optionally
//! carrying an SVG `matrix(a,b,c,d,e,f)` and/or `scale(sx,sy)` transform.
//! The transforms are applied to the four corners, so a rotated or skewed
//! rectangle becomes a general quadrilateral.

/// A point in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A 2-D affine transform in SVG `matrix(a, b, c, d, e, f)` form:
///
/// ```text
/// x' = a*x + c*y + e
/// y' = b*x + d*y + f
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    /// x scale / rotation component.
    pub a: f64,
    /// y shear / rotation component.
    pub b: f64,
    /// x shear / rotation component.
    pub c: f64,
    /// y scale / rotation component.
    pub d: f64,
    /// x translation.
    pub e: f64,
    /// y translation.
    pub f: f64,
}

impl Affine {
    /// The identity transform.
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Build from the six SVG matrix coefficients in document order.
    pub const fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// An axis scale, equivalent to SVG `scale(sx, sy)`.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::matrix(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// A pure translation.
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::matrix(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Apply the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// The transform that applies `self` first, then `next`.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A closed simple polygon. The closing edge from the last vertex back to
/// the first is implicit.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

/// Tolerance for treating a point as lying on a polygon edge.
const EDGE_EPS: f64 = 1e-9;

impl Polygon {
    /// Create a polygon from its vertices in order.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// The polygon's vertices.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for an empty
    /// polygon.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.vertices.first()?;
        let mut lo = first;
        let mut hi = first;
        for v in &self.vertices[1..] {
            lo.x = lo.x.min(v.x);
            lo.y = lo.y.min(v.y);
            hi.x = hi.x.max(v.x);
            hi.y = hi.y.max(v.y);
        }
        Some((lo, hi))
    }

    /// Apply `t` to every vertex.
    pub fn transformed(&self, t: &Affine) -> Polygon {
        Polygon {
            vertices: self.vertices.iter().map(|&v| t.apply(v)).collect(),
        }
    }

    /// Strict interior test: points on the boundary are *not* contained.
    ///
    /// Degenerate polygons (fewer than three vertices) contain nothing.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if on_segment(p, a, b) {
                return false;
            }
            // Even-odd crossing of a ray cast towards +x.
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let scale = (b.x - a.x).abs().max((b.y - a.y).abs()).max(1.0);
    if cross.abs() > EDGE_EPS * scale {
        return false;
    }
    p.x >= a.x.min(b.x) - EDGE_EPS
        && p.x <= a.x.max(b.x) + EDGE_EPS
        && p.y >= a.y.min(b.y) - EDGE_EPS
        && p.y <= a.y.max(b.y) + EDGE_EPS
}

/// An impassable region of the floor plan.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Identifier carried over from the drawing (`"no_id"` if absent).
    pub id: String,
    /// Outline in world coordinates.
    pub polygon: Polygon,
}

impl Obstacle {
    /// An obstacle with an explicit outline.
    pub fn new(id: impl Into<String>, polygon: Polygon) -> Self {
        Self {
            id: id.into(),
            polygon,
        }
    }

    /// An axis-aligned rectangle with top-left corner `(x, y)`.
    ///
    /// Corners are stored top-left, top-right, bottom-right, bottom-left.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        let polygon = Polygon::new(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ]);
        Self::new("no_id", polygon)
    }

    /// A rectangle carrying the drawing's transforms. `matrix` is applied
    /// before `scale`, matching the order the drawing attributes are read.
    pub fn from_transformed_rect(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        matrix: Option<Affine>,
        scale: Option<(f64, f64)>,
    ) -> Self {
        let mut obstacle = Self::from_rect(x, y, width, height);
        if let Some(m) = matrix {
            obstacle.polygon = obstacle.polygon.transformed(&m);
        }
        if let Some((sx, sy)) = scale {
            obstacle.polygon = obstacle.polygon.transformed(&Affine::scale(sx, sy));
        }
        obstacle
    }

    /// Replace the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Strict interior test against the outline.
    pub fn contains(&self, p: Point) -> bool {
        self.polygon.contains(p)
    }
}

/// A named point of interest: an entrance, an exit or an attraction.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorPoint {
    /// Unique identifier, e.g. `"entrance_1"`.
    pub id: String,
    /// World x coordinate.
    pub x: f64,
    /// World y coordinate.
    pub y: f64,
    /// Radius as drawn; `0.0` for bare points.
    pub radius: f64,
}

impl AnchorPoint {
    /// An anchor with zero radius.
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            radius: 0.0,
        }
    }

    /// Set the drawn radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// The anchor's location.
    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

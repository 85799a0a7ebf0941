//! Definition of the triangle primitive.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::Primitive;
use arrayvec::ArrayVec;

/// A triangle.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Triangle {
    /// The triangle first point.
    pub a: Point<Real>,
    /// The triangle second point.
    pub b: Point<Real>,
    /// The triangle third point.
    pub c: Point<Real>,
}

impl From<[Point<Real>; 3]> for Triangle {
    fn from(arr: [Point<Real>; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Triangle {
        Triangle { a, b, c }
    }

    /// The three vertices of this triangle.
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 3] {
        [self.a, self.b, self.c]
    }

    /// A vector normal of this triangle.
    ///
    /// The vector points such that it is collinear to `AB × AC` (where `×` denotes the cross
    /// product).
    #[inline]
    pub fn scaled_normal(&self) -> Vector<Real> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        ab.cross(&ac)
    }

    /// The area of this triangle.
    #[inline]
    pub fn area(&self) -> Real {
        self.scaled_normal().norm() * 0.5
    }

    /// The geometric center of this triangle.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        Point::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// The axis-aligned bounding box of this triangle.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices())
    }

    /// Clips this triangle by the plane orthogonal to `axis` at `position`.
    ///
    /// Returns the vertices of the polygons lying on the negative and on the positive side of
    /// the plane. Vertices on the plane belong to both sides.
    pub fn clip_by_plane(
        &self,
        axis: usize,
        position: Real,
    ) -> (ArrayVec<Point<Real>, 4>, ArrayVec<Point<Real>, 4>) {
        let mut below = ArrayVec::new();
        let mut above = ArrayVec::new();
        let vertices = self.vertices();

        for i in 0..3 {
            let p = vertices[i];
            let q = vertices[(i + 1) % 3];

            if p[axis] <= position {
                below.push(p);
            }
            if p[axis] >= position {
                above.push(p);
            }

            if (p[axis] < position && q[axis] > position)
                || (p[axis] > position && q[axis] < position)
            {
                let t = (position - p[axis]) / (q[axis] - p[axis]);
                let mut inter = p + (q - p) * t;
                // Snap onto the plane to absorb rounding errors.
                inter[axis] = position;
                below.push(inter);
                above.push(inter);
            }
        }

        (below, above)
    }
}

impl Primitive for Triangle {
    #[inline]
    fn aabb(&self) -> Aabb {
        self.local_aabb()
    }

    #[inline]
    fn centroid(&self) -> Point<Real> {
        self.center()
    }

    fn split_aabb(&self, current: &Aabb, axis: usize, position: Real) -> (Aabb, Aabb) {
        let (below, above) = self.clip_by_plane(axis, position);
        let clip = |pts: ArrayVec<Point<Real>, 4>| {
            Aabb::from_points(pts)
                .intersection(current)
                .unwrap_or_else(Aabb::new_invalid)
        };

        (clip(below), clip(above))
    }
}

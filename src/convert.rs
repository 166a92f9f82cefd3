//! Adapters between [`geo`] geometries and the [`Tessellator`].
use std::mem::size_of;

use geo::{Coordinate, LineString, MultiPolygon, Polygon};

use crate::error::Result;
use crate::tess::{ElementType, Tessellator};
use crate::{Real, TESS_UNDEF};

impl Tessellator {
    /// Add `ring` as a contour. A closing coordinate equal to the first
    /// one is dropped.
    pub fn add_line_string(&mut self, ring: &LineString<Real>) -> Result<()> {
        let mut coords = &ring.0[..];
        if coords.len() > 1 && coords.first() == coords.last() {
            coords = &coords[..coords.len() - 1];
        }
        let flat: Vec<Real> = coords.iter().flat_map(|c| [c.x, c.y]).collect();
        self.add_contour(2, &flat, 2 * size_of::<Real>(), coords.len())
    }

    /// Add the exterior and every interior ring of `poly`.
    ///
    /// Holes only come out as holes under a rule that excludes their
    /// winding number: [`WindingRule::Odd`](crate::WindingRule::Odd)
    /// works for any orientation, the others need the holes wound
    /// opposite to the exterior.
    pub fn add_polygon(&mut self, poly: &Polygon<Real>) -> Result<()> {
        self.add_line_string(poly.exterior())?;
        for hole in poly.interiors() {
            self.add_line_string(hole)?;
        }
        Ok(())
    }

    pub fn add_multi_polygon(&mut self, polys: &MultiPolygon<Real>) -> Result<()> {
        polys.iter().try_for_each(|poly| self.add_polygon(poly))
    }

    fn coordinate(&self, index: u32) -> Coordinate<Real> {
        let i = index as usize * self.vertex_size();
        let v = self.vertices();
        Coordinate { x: v[i], y: v[i + 1] }
    }

    /// The output polygons of a polygon-type result, one per element.
    /// Empty for boundary contours.
    pub fn polygons(&self) -> Vec<Polygon<Real>> {
        let stride = match self.element_type() {
            ElementType::Polygons => self.poly_size(),
            ElementType::ConnectedPolygons => 2 * self.poly_size(),
            ElementType::BoundaryContours => return vec![],
        };
        self.elements()
            .chunks(stride)
            .map(|poly| {
                let ring: Vec<_> = poly[..self.poly_size()]
                    .iter()
                    .take_while(|&&i| i != TESS_UNDEF)
                    .map(|&i| self.coordinate(i))
                    .collect();
                Polygon::new(LineString(ring), vec![])
            })
            .collect()
    }

    /// The loops of a boundary-contour result. Empty for polygon
    /// results.
    pub fn contours(&self) -> Vec<LineString<Real>> {
        if self.element_type() != ElementType::BoundaryContours {
            return vec![];
        }
        self.elements()
            .chunks(2)
            .map(|pair| {
                let (base, count) = (pair[0], pair[1]);
                let mut ring: LineString<Real> =
                    (base..base + count).map(|i| self.coordinate(i)).collect();
                ring.close();
                ring
            })
            .collect()
    }
}

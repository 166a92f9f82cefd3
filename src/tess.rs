//! The public tessellator.
use std::convert::TryFrom;
use std::mem::size_of;

use log::debug;

use crate::alloc::{Allocator, AllocatorConfig, HeapAllocator};
use crate::error::{Result, TessError};
use crate::mesh::{sym, Mesh};
use crate::monotone::tessellate_interior;
use crate::output::{output_contours, output_polymesh, Output};
use crate::project::project_polygon;
use crate::sweep::compute_interior;
use crate::{Real, MAX_COORD, MAX_DIMENSIONS};

/// Rule deciding which winding numbers count as interior.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindingRule {
    Odd = 0,
    NonZero = 1,
    Positive = 2,
    Negative = 3,
    AbsGeqTwo = 4,
}

impl WindingRule {
    /// Whether a region with winding number `n` is interior.
    #[inline]
    pub fn is_inside(self, n: i32) -> bool {
        match self {
            WindingRule::Odd => n & 1 != 0,
            WindingRule::NonZero => n != 0,
            WindingRule::Positive => n > 0,
            WindingRule::Negative => n < 0,
            WindingRule::AbsGeqTwo => n >= 2 || n <= -2,
        }
    }
}

impl TryFrom<i32> for WindingRule {
    type Error = TessError;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            0 => WindingRule::Odd,
            1 => WindingRule::NonZero,
            2 => WindingRule::Positive,
            3 => WindingRule::Negative,
            4 => WindingRule::AbsGeqTwo,
            _ => return Err(TessError::InvalidArgument(format!("winding rule {code}"))),
        })
    }
}

impl From<WindingRule> for i32 {
    fn from(rule: WindingRule) -> i32 {
        rule as i32
    }
}

/// Layout of the element buffer.
///
/// - `Polygons`: `poly_size` vertex indices per polygon, padded with
///   [`TESS_UNDEF`](crate::TESS_UNDEF).
/// - `ConnectedPolygons`: as above, followed by `poly_size` neighbour
///   polygon indices; slot `i` is the polygon across the edge from
///   vertex `i` to vertex `i + 1`, or `TESS_UNDEF` on the boundary.
/// - `BoundaryContours`: a `(base, count)` pair per contour, indexing
///   into the vertex buffer.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Polygons = 0,
    ConnectedPolygons = 1,
    BoundaryContours = 2,
}

impl TryFrom<i32> for ElementType {
    type Error = TessError;

    fn try_from(code: i32) -> Result<Self> {
        Ok(match code {
            0 => ElementType::Polygons,
            1 => ElementType::ConnectedPolygons,
            2 => ElementType::BoundaryContours,
            _ => return Err(TessError::InvalidArgument(format!("element type {code}"))),
        })
    }
}

impl From<ElementType> for i32 {
    fn from(ty: ElementType) -> i32 {
        ty as i32
    }
}

/// Sweep-line tessellator.
///
/// Contours are added with [`add_contour`](Self::add_contour) and
/// consumed by [`tessellate`](Self::tessellate), which leaves its
/// result in the output buffers until the next call.
///
/// ```rust
/// use geo_tess::{ElementType, Tessellator, WindingRule};
///
/// let mut tess = Tessellator::new();
/// tess.add_contour_2d(&[[0., 0.], [4., 0.], [4., 4.], [0., 4.]])
///     .unwrap();
/// tess.tessellate(WindingRule::Odd, ElementType::Polygons, 3, 2, None)
///     .unwrap();
/// assert_eq!(tess.element_count(), 2);
/// assert_eq!(tess.vertex_count(), 4);
/// ```
pub struct Tessellator {
    config: AllocatorConfig,
    /// Held here while no mesh is live; the mesh owns it otherwise.
    alloc: Option<Box<dyn Allocator>>,
    mesh: Option<Mesh>,
    /// Error that left the pending contours unusable.
    poisoned: Option<TessError>,
    contours: usize,
    next_index: u32,
    no_empty_polygons: bool,

    output: Output,
    element_type: ElementType,
    poly_size: usize,
    vertex_size: usize,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator {
    pub fn new() -> Self {
        Self::with_config(AllocatorConfig::default())
    }

    pub fn with_config(config: AllocatorConfig) -> Self {
        Self::with_allocator(config, HeapAllocator::new())
    }

    /// Tessellator drawing every pool from `allocator`.
    pub fn with_allocator<A: Allocator + 'static>(config: AllocatorConfig, allocator: A) -> Self {
        Tessellator {
            config,
            alloc: Some(Box::new(allocator)),
            mesh: None,
            poisoned: None,
            contours: 0,
            next_index: 0,
            no_empty_polygons: false,
            output: Output::default(),
            element_type: ElementType::Polygons,
            poly_size: 0,
            vertex_size: 0,
        }
    }

    pub fn no_empty_polygons(&self) -> bool {
        self.no_empty_polygons
    }

    /// Skip output polygons (and contours) of zero area.
    pub fn set_no_empty_polygons(&mut self, value: bool) {
        self.no_empty_polygons = value;
    }

    /// Add a closed contour of `count` vertices.
    ///
    /// Vertex `i` starts at byte offset `i * stride_bytes` of
    /// `vertices` and has `size` values: the position (two or three
    /// coordinates) followed by extra attributes that are interpolated
    /// at intersections. Contours of fewer than three vertices are
    /// skipped, but still consume their vertex indices.
    pub fn add_contour(
        &mut self,
        size: usize,
        vertices: &[Real],
        stride_bytes: usize,
        count: usize,
    ) -> Result<()> {
        if !(2..=MAX_DIMENSIONS).contains(&size) {
            return Err(TessError::InvalidArgument(format!(
                "vertex size {size} is not in 2..={MAX_DIMENSIONS}"
            )));
        }
        if stride_bytes % size_of::<Real>() != 0 || stride_bytes / size_of::<Real>() < size {
            return Err(TessError::InvalidArgument(format!(
                "stride of {stride_bytes} bytes does not hold {size} values"
            )));
        }
        let stride = stride_bytes / size_of::<Real>();
        if count > 0 && vertices.len() < (count - 1) * stride + size {
            return Err(TessError::InvalidArgument(format!(
                "{} values cannot hold {count} vertices",
                vertices.len()
            )));
        }
        if let Some(err) = &self.poisoned {
            return Err(err.clone());
        }

        let first = self.next_index;
        let position = size.min(3);
        for (i, vertex) in vertices.chunks(stride).take(count).enumerate() {
            for &value in &vertex[..position] {
                if !value.is_finite() || value.abs() > MAX_COORD {
                    return Err(TessError::InvalidCoordinate {
                        index: first + i as u32,
                        value,
                    });
                }
            }
        }
        self.next_index += count as u32;

        if count < 3 {
            debug!("skipping contour of {count} vertices");
            return Ok(());
        }

        let ingested = self.mesh().and_then(|mesh| {
            add_loop(mesh, vertices.chunks(stride).take(count), size, first)
        });
        if let Err(err) = ingested {
            self.poisoned = Some(err.clone());
            return Err(err);
        }
        self.contours += 1;
        debug!("added contour of {count} vertices, indices from {first}");
        Ok(())
    }

    /// Add a closed contour of 2D points.
    pub fn add_contour_2d(&mut self, points: &[[Real; 2]]) -> Result<()> {
        let flat: Vec<Real> = points.iter().flatten().copied().collect();
        self.add_contour(2, &flat, 2 * size_of::<Real>(), points.len())
    }

    /// Tessellate all pending contours.
    ///
    /// Polygons have at most `poly_size` vertices (ignored for boundary
    /// contours), and output vertices carry `vertex_size` values. When
    /// `normal` is `None` or zero, it is computed from the contours.
    /// On failure the output is empty; either way the pending contours
    /// are consumed.
    pub fn tessellate(
        &mut self,
        rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
        vertex_size: usize,
        normal: Option<[Real; 3]>,
    ) -> Result<()> {
        self.output = Output::default();
        if element_type != ElementType::BoundaryContours && poly_size < 3 {
            return Err(TessError::InvalidArgument(format!(
                "polygon size {poly_size} is less than 3"
            )));
        }
        if !(2..=MAX_DIMENSIONS).contains(&vertex_size) {
            return Err(TessError::InvalidArgument(format!(
                "output vertex size {vertex_size} is not in 2..={MAX_DIMENSIONS}"
            )));
        }
        if let Some(n) = normal {
            if n.iter().any(|c| !c.is_finite()) {
                return Err(TessError::InvalidArgument(format!("normal {n:?}")));
            }
        }

        let mesh = self.mesh.take();
        let contours = std::mem::take(&mut self.contours);
        let poisoned = self.poisoned.take();
        let Some(mut mesh) = mesh else {
            return Err(poisoned.unwrap_or(TessError::DegenerateInput("no contours to tessellate")));
        };

        let result = match poisoned {
            Some(err) => Err(err),
            None => {
                debug!("tessellating {contours} contours with rule {rule:?}");
                run(
                    &mut mesh,
                    &self.config,
                    rule,
                    element_type,
                    poly_size,
                    vertex_size,
                    normal,
                    self.no_empty_polygons,
                )
            }
        };
        self.alloc = Some(mesh.release());

        self.output = result?;
        self.element_type = element_type;
        self.poly_size = poly_size;
        self.vertex_size = vertex_size;
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.output.vertex_count()
    }

    /// Output vertices, `vertex_size` values each.
    pub fn vertices(&self) -> &[Real] {
        &self.output.vertices
    }

    /// Index of the input vertex behind each output vertex, or
    /// [`TESS_UNDEF`](crate::TESS_UNDEF) for vertices created at
    /// intersections.
    pub fn vertex_indices(&self) -> &[u32] {
        &self.output.vertex_indices
    }

    pub fn element_count(&self) -> usize {
        self.output.element_count
    }

    /// Element buffer, laid out per [`ElementType`].
    pub fn elements(&self) -> &[u32] {
        &self.output.elements
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn poly_size(&self) -> usize {
        self.poly_size
    }

    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    /// The mesh collecting pending contours, created on first use.
    fn mesh(&mut self) -> Result<&mut Mesh> {
        let mesh = match self.mesh.take() {
            Some(mesh) => mesh,
            None => {
                let alloc = self
                    .alloc
                    .take()
                    .expect("allocator not found in tessellator");
                let mut mesh = Mesh::unclaimed(alloc, &self.config);
                if let Err(err) = mesh.claim_heads() {
                    self.alloc = Some(mesh.release());
                    return Err(err);
                }
                mesh
            }
        };
        Ok(self.mesh.insert(mesh))
    }
}

impl Drop for Tessellator {
    fn drop(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            self.alloc = Some(mesh.release());
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run(
    mesh: &mut Mesh,
    config: &AllocatorConfig,
    rule: WindingRule,
    element_type: ElementType,
    poly_size: usize,
    vertex_size: usize,
    normal: Option<[Real; 3]>,
    no_empty_polygons: bool,
) -> Result<Output> {
    let (bmin, bmax) = project_polygon(mesh, normal);
    compute_interior(mesh, rule, config, bmin, bmax)?;

    if element_type == ElementType::BoundaryContours {
        mesh.set_winding_number(1, true)?;
        Ok(output_contours(mesh, vertex_size, no_empty_polygons))
    } else {
        tessellate_interior(mesh)?;
        mesh.discard_exterior();
        output_polymesh(mesh, element_type, poly_size, vertex_size, no_empty_polygons)
    }
}

/// Link `vertices` into a closed loop of edges with winding +1 on the
/// loop's left.
fn add_loop<'a>(
    mesh: &mut Mesh,
    vertices: impl Iterator<Item = &'a [Real]>,
    size: usize,
    first: u32,
) -> Result<()> {
    let mut e: Option<usize> = None;
    for (i, values) in vertices.enumerate() {
        let cur = match e {
            None => {
                // A self-loop: one vertex, one edge, two faces.
                let e = mesh.make_edge()?;
                mesh.splice(e, sym(e))?;
                e
            }
            Some(prev) => {
                mesh.split_edge(prev)?;
                mesh.lnext(prev)
            }
        };
        let org = mesh.org(cur);
        let v = mesh.vert_mut(org);
        v.coords[..size].copy_from_slice(&values[..size]);
        v.idx = first + i as u32;

        mesh.edge_mut(cur).winding = 1;
        mesh.edge_mut(sym(cur)).winding = -1;
        e = Some(cur);
    }
    Ok(())
}

#[cfg(test)]
mod tests;

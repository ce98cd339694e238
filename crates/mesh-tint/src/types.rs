//! Core mesh data types.

use hashbrown::HashMap;
use nalgebra::{Matrix4, Point3};

use crate::color::Rgba;

/// A vertex in the mesh.
///
/// Coordinates are in whatever unit the source file used; nothing here
/// rescales them.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a new vertex from a position.
    #[inline]
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A triangle mesh with indexed vertices and faces.
///
/// This is the unit of geometry the converter tints and exports. The optional
/// `face_colors` attribute holds one color per face; when it is set its length
/// always equals [`Mesh::face_count`].
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is [v0, v1, v2] with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,

    /// Per-face RGBA colors, if the mesh has been tinted.
    pub face_colors: Option<Vec<Rgba>>,

    /// Placement of the geometry in its scene. Vertices stay in object
    /// space; the matrix is written as the node transform on export.
    pub transform: Option<Matrix4<f64>>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            face_colors: None,
            transform: None,
        }
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces (triangles) in the mesh.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh is empty (no vertices or faces).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Push a polygon as a triangle fan rooted at its first index.
    ///
    /// Polygons with fewer than three indices are ignored.
    pub fn push_polygon(&mut self, indices: &[u32]) {
        if indices.len() < 3 {
            return;
        }
        let root = indices[0];
        for pair in indices[1..].windows(2) {
            self.faces.push([root, pair[0], pair[1]]);
        }
    }

    /// Check that every face index points at an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.faces.iter().all(|f| f.iter().all(|&i| i < n))
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;

        let mut min = first.position;
        let mut max = first.position;

        for vertex in &self.vertices[1..] {
            let p = &vertex.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }
}

/// An ordered collection of uniquely named geometries loaded from one file.
///
/// Iteration order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    geometries: Vec<(String, Mesh)>,
    by_name: HashMap<String, usize>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a geometry and return the name it was stored under.
    ///
    /// A name that is already taken gets a `_1`, `_2`, ... suffix.
    pub fn add_geometry(&mut self, name: impl Into<String>, mesh: Mesh) -> String {
        let requested = name.into();
        let mut name = requested.clone();
        let mut suffix = 1;
        while self.by_name.contains_key(&name) {
            name = format!("{}_{}", requested, suffix);
            suffix += 1;
        }

        self.by_name.insert(name.clone(), self.geometries.len());
        self.geometries.push((name.clone(), mesh));
        name
    }

    /// Number of geometries.
    #[inline]
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Look up a geometry by name.
    pub fn get(&self, name: &str) -> Option<&Mesh> {
        self.by_name.get(name).map(|&i| &self.geometries[i].1)
    }

    /// Iterate over `(name, geometry)` pairs in scene order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mesh)> + '_ {
        self.geometries.iter().map(|(n, m)| (n.as_str(), m))
    }

    /// Iterate mutably over `(name, geometry)` pairs in scene order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Mesh)> + '_ {
        self.geometries.iter_mut().map(|(n, m)| (n.as_str(), m))
    }

    /// Consume the scene, yielding `(name, geometry)` pairs in scene order.
    pub fn into_geometries(self) -> impl Iterator<Item = (String, Mesh)> {
        self.geometries.into_iter()
    }
}

/// The result of loading a model file: one geometry or a scene of several.
#[derive(Debug, Clone)]
pub enum Model {
    Single(Mesh),
    Scene(Scene),
}

impl Model {
    /// Build a model from named geometries: a lone geometry stays single,
    /// anything else becomes a scene.
    pub fn from_geometries(mut geometries: Vec<(String, Mesh)>) -> Self {
        if geometries.len() == 1 {
            if let Some((_, mesh)) = geometries.pop() {
                return Model::Single(mesh);
            }
        }

        let mut scene = Scene::new();
        for (name, mesh) in geometries {
            scene.add_geometry(name, mesh);
        }
        Model::Scene(scene)
    }

    /// Number of geometries in the model.
    pub fn geometry_count(&self) -> usize {
        match self {
            Model::Single(_) => 1,
            Model::Scene(scene) => scene.len(),
        }
    }

    /// Total face count across all geometries.
    pub fn face_count(&self) -> usize {
        self.meshes().map(Mesh::face_count).sum()
    }

    /// Total vertex count across all geometries.
    pub fn vertex_count(&self) -> usize {
        self.meshes().map(Mesh::vertex_count).sum()
    }

    /// Iterate over all geometries.
    pub fn meshes(&self) -> Box<dyn Iterator<Item = &Mesh> + '_> {
        match self {
            Model::Single(mesh) => Box::new(std::iter::once(mesh)),
            Model::Scene(scene) => Box::new(scene.iter().map(|(_, m)| m)),
        }
    }

    /// Iterate mutably over all geometries.
    pub fn meshes_mut(&mut self) -> Box<dyn Iterator<Item = &mut Mesh> + '_> {
        match self {
            Model::Single(mesh) => Box::new(std::iter::once(mesh)),
            Model::Scene(scene) => Box::new(scene.iter_mut().map(|(_, m)| m)),
        }
    }
}

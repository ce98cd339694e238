//! Binary glTF (GLB) export.
//!
//! Each geometry becomes one glTF mesh with a single triangle primitive and
//! one node referencing it. Face colors are written as a normalized
//! `UNSIGNED_BYTE` `COLOR_0` vertex attribute: broadcast over the shared
//! vertices when the whole mesh has one color, otherwise per face on unshared
//! vertices. A mesh's placement transform becomes its node `matrix`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::{Mesh, Model};

/// `glTF` in little-endian ASCII.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const COMPONENT_UNSIGNED_BYTE: u32 = 5121;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const COMPONENT_FLOAT: u32 = 5126;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const MODE_TRIANGLES: u32 = 4;

const GENERATOR: &str = concat!("mesh-tint ", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    asset: Asset,
    scene: usize,
    scenes: Vec<SceneDef>,
    nodes: Vec<Node>,
    meshes: Vec<MeshDef>,
    accessors: Vec<Accessor>,
    buffer_views: Vec<BufferView>,
    buffers: Vec<Buffer>,
}

#[derive(Serialize)]
struct Asset {
    version: &'static str,
    generator: &'static str,
}

#[derive(Serialize)]
struct SceneDef {
    nodes: Vec<usize>,
}

#[derive(Serialize)]
struct Node {
    mesh: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Column-major 4x4 transform.
    #[serde(skip_serializing_if = "Option::is_none")]
    matrix: Option<Vec<f32>>,
}

#[derive(Serialize)]
struct MeshDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    primitives: Vec<Primitive>,
}

#[derive(Serialize)]
struct Primitive {
    attributes: BTreeMap<&'static str, usize>,
    indices: usize,
    mode: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Accessor {
    buffer_view: usize,
    component_type: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    normalized: bool,
    count: usize,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<Vec<f32>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferView {
    buffer: usize,
    byte_offset: usize,
    byte_length: usize,
    target: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Buffer {
    byte_length: usize,
}

/// Vertex streams ready for packing.
struct Streams {
    positions: Vec<f32>,
    colors: Option<Vec<u8>>,
    indices: Vec<u32>,
}

impl Streams {
    fn from_mesh(mesh: &Mesh) -> MeshResult<Self> {
        let face_colors = match &mesh.face_colors {
            Some(colors) if colors.len() != mesh.face_count() => {
                return Err(MeshError::ExportError {
                    details: format!(
                        "{} face colors for {} faces",
                        colors.len(),
                        mesh.face_count()
                    ),
                });
            }
            Some(colors) => Some(colors),
            None => None,
        };

        let uniform = face_colors.and_then(|colors| {
            let first = *colors.first()?;
            colors.iter().all(|c| *c == first).then_some(first)
        });

        match (face_colors, uniform) {
            (Some(colors), None) => {
                // Faces disagree: give every face its own three vertices.
                let mut positions = Vec::with_capacity(mesh.face_count() * 9);
                let mut per_vertex = Vec::with_capacity(mesh.face_count() * 12);
                for (face, color) in mesh.faces.iter().zip(colors) {
                    for &i in face {
                        let p = &mesh.vertices[i as usize].position;
                        positions.extend([p.x as f32, p.y as f32, p.z as f32]);
                        per_vertex.extend_from_slice(&color.0);
                    }
                }
                Ok(Streams {
                    positions,
                    colors: Some(per_vertex),
                    indices: (0..mesh.face_count() as u32 * 3).collect(),
                })
            }
            (_, uniform) => {
                let positions = mesh
                    .vertices
                    .iter()
                    .flat_map(|v| {
                        let p = &v.position;
                        [p.x as f32, p.y as f32, p.z as f32]
                    })
                    .collect();
                let colors = uniform.map(|c| c.0.repeat(mesh.vertex_count()));
                Ok(Streams {
                    positions,
                    colors,
                    indices: mesh.faces.iter().flatten().copied().collect(),
                })
            }
        }
    }

    fn position_bounds(&self) -> (Vec<f32>, Vec<f32>) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in self.positions.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        (min.to_vec(), max.to_vec())
    }
}

/// Accumulates glTF objects and the binary buffer they point into.
struct GlbBuilder {
    nodes: Vec<Node>,
    meshes: Vec<MeshDef>,
    accessors: Vec<Accessor>,
    buffer_views: Vec<BufferView>,
    bin: Vec<u8>,
}

impl GlbBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            meshes: Vec::new(),
            accessors: Vec::new(),
            buffer_views: Vec::new(),
            bin: Vec::new(),
        }
    }

    /// Append a 4-byte aligned buffer view and return its index.
    fn push_view(&mut self, bytes: &[u8], target: u32) -> usize {
        pad_to_four(&mut self.bin, 0);
        self.buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: self.bin.len(),
            byte_length: bytes.len(),
            target,
        });
        self.bin.extend_from_slice(bytes);
        self.buffer_views.len() - 1
    }

    fn push_accessor(&mut self, accessor: Accessor) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn add_mesh(&mut self, name: Option<&str>, mesh: &Mesh) -> MeshResult<()> {
        if mesh.is_empty() {
            return Err(MeshError::ExportError {
                details: format!("geometry {:?} has no faces", name.unwrap_or("<unnamed>")),
            });
        }
        if !mesh.indices_in_range() {
            return Err(MeshError::ExportError {
                details: format!(
                    "geometry {:?} has face indices past its {} vertices",
                    name.unwrap_or("<unnamed>"),
                    mesh.vertex_count()
                ),
            });
        }

        let streams = Streams::from_mesh(mesh)?;
        let vertex_count = streams.positions.len() / 3;
        let mut attributes = BTreeMap::new();

        let mut position_bytes = vec![0u8; streams.positions.len() * 4];
        LittleEndian::write_f32_into(&streams.positions, &mut position_bytes);
        let view = self.push_view(&position_bytes, TARGET_ARRAY_BUFFER);
        let (min, max) = streams.position_bounds();
        let position = self.push_accessor(Accessor {
            buffer_view: view,
            component_type: COMPONENT_FLOAT,
            normalized: false,
            count: vertex_count,
            kind: "VEC3",
            min: Some(min),
            max: Some(max),
        });
        attributes.insert("POSITION", position);

        if let Some(colors) = &streams.colors {
            let view = self.push_view(colors, TARGET_ARRAY_BUFFER);
            let color = self.push_accessor(Accessor {
                buffer_view: view,
                component_type: COMPONENT_UNSIGNED_BYTE,
                normalized: true,
                count: vertex_count,
                kind: "VEC4",
                min: None,
                max: None,
            });
            attributes.insert("COLOR_0", color);
        }

        let mut index_bytes = vec![0u8; streams.indices.len() * 4];
        LittleEndian::write_u32_into(&streams.indices, &mut index_bytes);
        let view = self.push_view(&index_bytes, TARGET_ELEMENT_ARRAY_BUFFER);
        let indices = self.push_accessor(Accessor {
            buffer_view: view,
            component_type: COMPONENT_UNSIGNED_INT,
            normalized: false,
            count: streams.indices.len(),
            kind: "SCALAR",
            min: None,
            max: None,
        });

        debug!(
            "GLB mesh {:?}: {} vertices, {} indices, colors: {}",
            name,
            vertex_count,
            streams.indices.len(),
            streams.colors.is_some()
        );

        self.meshes.push(MeshDef {
            name: name.map(String::from),
            primitives: vec![Primitive {
                attributes,
                indices,
                mode: MODE_TRIANGLES,
            }],
        });
        self.nodes.push(Node {
            mesh: self.meshes.len() - 1,
            name: name.map(String::from),
            matrix: mesh
                .transform
                .map(|m| m.iter().map(|&v| v as f32).collect()),
        });
        Ok(())
    }

    fn finish(mut self) -> MeshResult<Vec<u8>> {
        pad_to_four(&mut self.bin, 0);

        let document = Document {
            asset: Asset {
                version: "2.0",
                generator: GENERATOR,
            },
            scene: 0,
            scenes: vec![SceneDef {
                nodes: (0..self.nodes.len()).collect(),
            }],
            nodes: self.nodes,
            meshes: self.meshes,
            accessors: self.accessors,
            buffer_views: self.buffer_views,
            buffers: vec![Buffer {
                byte_length: self.bin.len(),
            }],
        };

        let mut json = serde_json::to_vec(&document).map_err(|e| MeshError::ExportError {
            details: e.to_string(),
        })?;
        pad_to_four(&mut json, b' ');

        let total = 12 + 8 + json.len() + 8 + self.bin.len();
        let total = u32::try_from(total).map_err(|_| MeshError::ExportError {
            details: format!("GLB of {} bytes exceeds the 4 GiB format limit", total),
        })?;

        let mut out = Vec::with_capacity(total as usize);
        push_u32s(&mut out, &[GLB_MAGIC, GLB_VERSION, total]);
        push_u32s(&mut out, &[json.len() as u32, CHUNK_JSON]);
        out.extend_from_slice(&json);
        push_u32s(&mut out, &[self.bin.len() as u32, CHUNK_BIN]);
        out.extend_from_slice(&self.bin);

        Ok(out)
    }
}

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

fn push_u32s(out: &mut Vec<u8>, values: &[u32]) {
    let start = out.len();
    out.resize(start + values.len() * 4, 0);
    LittleEndian::write_u32_into(values, &mut out[start..]);
}

/// Encode a single geometry as GLB bytes.
pub fn encode_mesh(mesh: &Mesh, name: Option<&str>) -> MeshResult<Vec<u8>> {
    let mut builder = GlbBuilder::new();
    builder.add_mesh(name, mesh)?;
    builder.finish()
}

/// Encode a whole model as GLB bytes, one node per geometry.
pub fn encode_model(model: &Model) -> MeshResult<Vec<u8>> {
    match model {
        Model::Single(mesh) => encode_mesh(mesh, None),
        Model::Scene(scene) => {
            let mut builder = GlbBuilder::new();
            for (name, mesh) in scene.iter() {
                builder.add_mesh(Some(name), mesh)?;
            }
            builder.finish()
        }
    }
}

/// Write a single geometry to a GLB file.
pub fn export_mesh(mesh: &Mesh, name: Option<&str>, path: &Path) -> MeshResult<()> {
    let bytes = encode_mesh(mesh, name)?;
    write_file(&bytes, path)?;
    info!("Saved {} faces to {:?}", mesh.face_count(), path);
    Ok(())
}

/// Write a whole model to a GLB file.
pub fn export_model(model: &Model, path: &Path) -> MeshResult<()> {
    let bytes = encode_model(model)?;
    write_file(&bytes, path)?;
    info!(
        "Saved {} geometries ({} faces) to {:?}",
        model.geometry_count(),
        model.face_count(),
        path
    );
    Ok(())
}

fn write_file(bytes: &[u8], path: &Path) -> MeshResult<()> {
    let file = File::create(path).map_err(|e| MeshError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .map_err(|e| MeshError::write(path, e))?;
    writer.flush().map_err(|e| MeshError::write(path, e))
}

//! Mesh file loading for STL, OBJ, 3MF, PLY, OFF and glTF formats.
//!
//! Every loader produces named geometries which are folded into a [`Model`]:
//! a lone geometry stays [`Model::Single`], several become a [`Model::Scene`]
//! in file order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hashbrown::HashMap;
use nalgebra::Matrix4;
use tracing::{debug, info, warn};

use crate::error::{MeshError, MeshResult};
use crate::{Mesh, Model, Vertex};

/// Supported input mesh formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
    ThreeMf,
    Ply,
    Off,
    /// glTF 2.0, either binary (`.glb`) or JSON (`.gltf`).
    Gltf,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "stl" => Some(MeshFormat::Stl),
                "obj" => Some(MeshFormat::Obj),
                "3mf" => Some(MeshFormat::ThreeMf),
                "ply" => Some(MeshFormat::Ply),
                "off" => Some(MeshFormat::Off),
                "glb" | "gltf" => Some(MeshFormat::Gltf),
                _ => None,
            })
    }
}

/// Load a model from file, auto-detecting format from extension.
pub fn load_model(path: &Path) -> MeshResult<Model> {
    let format = MeshFormat::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path.extension().and_then(|e| e.to_str()).map(String::from),
    })?;

    info!("Loading model from {:?} (format: {:?})", path, format);

    let geometries = match format {
        MeshFormat::Stl => vec![(file_name(path), load_stl(path)?)],
        MeshFormat::Obj => load_obj(path)?,
        MeshFormat::ThreeMf => load_3mf(path)?,
        MeshFormat::Ply => vec![(file_name(path), load_ply(path)?)],
        MeshFormat::Off => vec![(file_name(path), load_off(path)?)],
        MeshFormat::Gltf => load_gltf(path)?,
    };

    for (name, mesh) in &geometries {
        if !mesh.indices_in_range() {
            return Err(MeshError::parse(
                path,
                format!("geometry '{}' has face indices past its vertex count", name),
            ));
        }
    }

    let model = Model::from_geometries(geometries);

    if model.face_count() == 0 {
        return Err(MeshError::EmptyMesh {
            details: format!("{:?} contains no faces", path),
        });
    }

    info!(
        "Loaded {} geometries: {} vertices, {} faces",
        model.geometry_count(),
        model.vertex_count(),
        model.face_count()
    );

    for mesh in model.meshes() {
        if let Some((min, max)) = mesh.bounds() {
            let dims = max - min;
            debug!(
                "Bounding box: [{:.1}, {:.1}, {:.1}] to [{:.1}, {:.1}, {:.1}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            );

            let max_dim = dims.x.max(dims.y).max(dims.z);
            if max_dim < 0.1 {
                warn!("Geometry largest dimension is {:.6} - may need scaling", max_dim);
            }
        }
    }

    Ok(model)
}

/// Base name of a path as a lossy string.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load mesh from STL file (binary or ASCII).
fn load_stl(path: &Path) -> MeshResult<Mesh> {
    let file = File::open(path).map_err(|e| MeshError::read(path, e))?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::parse(path, e.to_string()))?;

    debug!(
        "STL contains {} vertices, {} triangles",
        stl.vertices.len(),
        stl.faces.len()
    );

    let mut mesh = Mesh::with_capacity(stl.vertices.len(), stl.faces.len());

    // stl_io::Vertex wraps [f32; 3]
    for v in &stl.vertices {
        mesh.vertices.push(Vertex::from_coords(
            v.0[0] as f64,
            v.0[1] as f64,
            v.0[2] as f64,
        ));
    }

    for face in &stl.faces {
        let indices = [
            face.vertices[0] as u32,
            face.vertices[1] as u32,
            face.vertices[2] as u32,
        ];

        // Skip triangles that collapsed onto a shared vertex
        if indices[0] != indices[1] && indices[1] != indices[2] && indices[0] != indices[2] {
            mesh.faces.push(indices);
        }
    }

    Ok(mesh)
}

/// Load OBJ file, one geometry per object.
fn load_obj(path: &Path) -> MeshResult<Vec<(String, Mesh)>> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| MeshError::parse(path, e.to_string()))?;

    let mut geometries = Vec::with_capacity(models.len());

    for model in &models {
        let obj_mesh = &model.mesh;
        let mut mesh =
            Mesh::with_capacity(obj_mesh.positions.len() / 3, obj_mesh.indices.len() / 3);

        for chunk in obj_mesh.positions.chunks_exact(3) {
            mesh.vertices.push(Vertex::from_coords(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            ));
        }

        for chunk in obj_mesh.indices.chunks_exact(3) {
            mesh.faces.push([chunk[0], chunk[1], chunk[2]]);
        }

        if mesh.faces.is_empty() {
            debug!("OBJ object '{}' has no faces, skipping", model.name);
            continue;
        }

        debug!(
            "OBJ object '{}': {} vertices, {} faces",
            model.name,
            mesh.vertex_count(),
            mesh.face_count()
        );
        geometries.push((model.name.clone(), mesh));
    }

    Ok(geometries)
}

/// Nesting limit for 3MF components; deeper chains are treated as cycles.
const MAX_COMPONENT_DEPTH: usize = 32;

/// Load mesh objects from a 3MF file.
///
/// 3MF is a ZIP archive of XML model parts. The root part (usually
/// 3D/3dmodel.model) lists the objects to print in its `<build>`; objects
/// are either indexed meshes or assemblies of `<component>` references,
/// which may point into other parts through `p:path`. Every mesh reached
/// from the build becomes one geometry, placed by the product of the build
/// and component transforms.
fn load_3mf(path: &Path) -> MeshResult<Vec<(String, Mesh)>> {
    let file = File::open(path).map_err(|e| MeshError::read(path, e))?;

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| MeshError::parse(path, format!("Invalid 3MF archive: {}", e)))?;

    let root = find_3mf_model_path(&mut archive, path)?;

    let part_names: Vec<String> = archive
        .file_names()
        .filter(|name| name.to_lowercase().ends_with(".model"))
        .map(String::from)
        .collect();

    let mut parts = HashMap::with_capacity(part_names.len());
    for name in part_names {
        let mut entry = archive.by_name(&name).map_err(|e| {
            MeshError::parse(path, format!("Cannot open model file '{}': {}", name, e))
        })?;
        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| MeshError::read(path, e))?;

        let part = parse_3mf_model(&xml, &name, path)?;
        debug!(
            "3MF part '{}': {} objects, {} build items",
            name,
            part.objects.len(),
            part.build.len()
        );
        parts.insert(name, part);
    }

    let root_part = parts
        .get(&root)
        .ok_or_else(|| MeshError::parse(path, format!("Missing root model '{}'", root)))?;

    let mut geometries = Vec::new();

    if root_part.build.is_empty() {
        // No build section: take the root part's meshes as they are
        for id in &root_part.order {
            if let Some(object) = root_part.objects.get(id).filter(|o| !o.mesh.faces.is_empty()) {
                geometries.push((object.name.clone(), object.mesh.clone()));
            }
        }
        return Ok(geometries);
    }

    for item in &root_part.build {
        resolve_3mf_object(&parts, &item.target, item.transform, 0, &mut geometries, path)?;
    }

    Ok(geometries)
}

/// Walk an object and its components, collecting every mesh it places.
fn resolve_3mf_object(
    parts: &HashMap<String, ThreeMfPart>,
    target: &ObjectRef,
    transform: Matrix4<f64>,
    depth: usize,
    geometries: &mut Vec<(String, Mesh)>,
    path: &Path,
) -> MeshResult<()> {
    if depth > MAX_COMPONENT_DEPTH {
        return Err(MeshError::parse(
            path,
            format!("components of object {} nest too deeply", target.id),
        ));
    }

    let object = parts
        .get(&target.part)
        .and_then(|part| part.objects.get(&target.id))
        .ok_or_else(|| {
            MeshError::parse(
                path,
                format!("object {} not found in '{}'", target.id, target.part),
            )
        })?;

    if !object.mesh.faces.is_empty() {
        let mut mesh = object.mesh.clone();
        mesh.transform = (transform != Matrix4::identity()).then_some(transform);
        debug!(
            "3MF object '{}': {} vertices, {} faces",
            object.name,
            mesh.vertex_count(),
            mesh.face_count()
        );
        geometries.push((object.name.clone(), mesh));
    }

    for component in &object.components {
        resolve_3mf_object(
            parts,
            &component.target,
            transform * component.transform,
            depth + 1,
            geometries,
            path,
        )?;
    }

    Ok(())
}

/// Find the model file path in a 3MF archive.
fn find_3mf_model_path(archive: &mut zip::ZipArchive<File>, path: &Path) -> MeshResult<String> {
    let candidates = ["3D/3dmodel.model", "3d/3dmodel.model", "3D/3DModel.model"];

    for candidate in candidates {
        if archive.by_name(candidate).is_ok() {
            return Ok(candidate.to_string());
        }
    }

    archive
        .file_names()
        .find(|name| name.to_lowercase().ends_with(".model"))
        .map(String::from)
        .ok_or_else(|| MeshError::parse(path, "No model file found in 3MF archive"))
}

/// One `.model` part of a 3MF archive.
#[derive(Debug, Default)]
struct ThreeMfPart {
    objects: HashMap<String, ThreeMfObject>,
    /// Object ids in document order.
    order: Vec<String>,
    build: Vec<BuildItem>,
}

#[derive(Debug)]
struct ThreeMfObject {
    name: String,
    mesh: Mesh,
    components: Vec<Component>,
}

/// An object id qualified by the archive entry that defines it.
#[derive(Debug)]
struct ObjectRef {
    part: String,
    id: String,
}

#[derive(Debug)]
struct Component {
    target: ObjectRef,
    transform: Matrix4<f64>,
}

#[derive(Debug)]
struct BuildItem {
    target: ObjectRef,
    transform: Matrix4<f64>,
}

/// Parse the XML of one 3MF model part stored at `part` in the archive.
fn parse_3mf_model(xml: &str, part: &str, path: &Path) -> MeshResult<ThreeMfPart> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut model = ThreeMfPart::default();
    let mut current: Option<(String, ThreeMfObject)> = None;
    let mut in_vertices = false;
    let mut in_triangles = false;
    let mut in_build = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"object" => {
                let mut id = String::new();
                let mut name = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).into_owned();
                    match attr.key.local_name().as_ref() {
                        b"id" => id = value,
                        b"name" => name = Some(value),
                        _ => {}
                    }
                }
                let object = ThreeMfObject {
                    name: name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| format!("object_{}", id)),
                    mesh: Mesh::new(),
                    components: Vec::new(),
                };
                current = Some((id, object));
            }
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"build" => in_build = true,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let tag = e.local_name();
                if in_build && tag.as_ref() == b"item" {
                    let (target, transform) = parse_3mf_reference(e, part, path)?;
                    model.build.push(BuildItem { target, transform });
                    continue;
                }

                let Some((_, object)) = current.as_mut() else {
                    continue;
                };
                match tag.as_ref() {
                    b"vertices" => in_vertices = true,
                    b"triangles" => in_triangles = true,
                    b"vertex" if in_vertices => {
                        let mut xyz = [0.0f64; 3];
                        for attr in e.attributes().flatten() {
                            let slot = match attr.key.local_name().as_ref() {
                                b"x" => 0,
                                b"y" => 1,
                                b"z" => 2,
                                _ => continue,
                            };
                            xyz[slot] = parse_attr(&attr.value, path)?;
                        }
                        object.mesh.vertices.push(Vertex::from_coords(xyz[0], xyz[1], xyz[2]));
                    }
                    b"triangle" if in_triangles => {
                        let mut v = [0u32; 3];
                        for attr in e.attributes().flatten() {
                            let slot = match attr.key.local_name().as_ref() {
                                b"v1" => 0,
                                b"v2" => 1,
                                b"v3" => 2,
                                _ => continue,
                            };
                            v[slot] = parse_attr(&attr.value, path)?;
                        }
                        object.mesh.faces.push(v);
                    }
                    b"component" => {
                        let (target, transform) = parse_3mf_reference(e, part, path)?;
                        object.components.push(Component { target, transform });
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"vertices" => in_vertices = false,
                b"triangles" => in_triangles = false,
                b"build" => in_build = false,
                b"object" => {
                    if let Some((id, object)) = current.take() {
                        if object.mesh.faces.is_empty() && object.components.is_empty() {
                            debug!("3MF object '{}' has no mesh, skipping", object.name);
                        }
                        model.order.push(id.clone());
                        model.objects.insert(id, object);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MeshError::parse(path, format!("XML parse error: {}", e)));
            }
            _ => {}
        }
    }

    Ok(model)
}

/// Read the `objectid`, `p:path` and `transform` attributes shared by
/// build items and components.
fn parse_3mf_reference(
    element: &quick_xml::events::BytesStart<'_>,
    part: &str,
    path: &Path,
) -> MeshResult<(ObjectRef, Matrix4<f64>)> {
    let mut id = None;
    let mut target_part = None;
    let mut transform = Matrix4::identity();

    for attr in element.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.local_name().as_ref() {
            b"objectid" => id = Some(value.trim().to_string()),
            b"path" => target_part = Some(value.trim().trim_start_matches('/').to_string()),
            b"transform" => transform = parse_3mf_transform(&value, path)?,
            _ => {}
        }
    }

    let id = id.ok_or_else(|| MeshError::parse(path, "reference without objectid"))?;
    let target = ObjectRef {
        part: target_part.unwrap_or_else(|| part.to_string()),
        id,
    };
    Ok((target, transform))
}

/// Parse a 3MF affine transform.
///
/// The twelve values `m00 m01 m02 m10 m11 m12 m20 m21 m22 m30 m31 m32` are
/// the rows of a matrix applied to row vectors, so `m30 m31 m32` is the
/// translation. The result is the equivalent column-vector matrix.
fn parse_3mf_transform(raw: &str, path: &Path) -> MeshResult<Matrix4<f64>> {
    let m = raw
        .split_whitespace()
        .map(|t| parse_token::<f64>(t, path))
        .collect::<MeshResult<Vec<f64>>>()?;

    if m.len() != 12 {
        return Err(MeshError::parse(
            path,
            format!("transform needs 12 values, found {}", m.len()),
        ));
    }

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        m[0], m[3], m[6], m[9],
        m[1], m[4], m[7], m[10],
        m[2], m[5], m[8], m[11],
        0.0,  0.0,  0.0,  1.0,
    );
    Ok(matrix)
}

fn parse_attr<T: std::str::FromStr>(raw: &[u8], path: &Path) -> MeshResult<T> {
    let text = String::from_utf8_lossy(raw);
    text.trim()
        .parse()
        .map_err(|_| MeshError::parse(path, format!("invalid numeric attribute '{}'", text)))
}

/// Load mesh from PLY file (ASCII or binary).
fn load_ply(path: &Path) -> MeshResult<Mesh> {
    use ply_rs::parser::Parser;
    use ply_rs::ply::DefaultElement;

    let file = File::open(path).map_err(|e| MeshError::read(path, e))?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| MeshError::parse(path, e.to_string()))?;

    let mut mesh = Mesh::new();

    if let Some(vertices) = ply.payload.get("vertex") {
        mesh.vertices.reserve(vertices.len());
        for (i, vertex) in vertices.iter().enumerate() {
            let coord = |key: &str| {
                vertex.get(key).and_then(ply_scalar).ok_or_else(|| {
                    MeshError::parse(path, format!("vertex {} has no numeric '{}'", i, key))
                })
            };
            mesh.vertices
                .push(Vertex::from_coords(coord("x")?, coord("y")?, coord("z")?));
        }
    }

    if let Some(faces) = ply.payload.get("face") {
        mesh.faces.reserve(faces.len());
        for (i, face) in faces.iter().enumerate() {
            let indices = face
                .get("vertex_indices")
                .or_else(|| face.get("vertex_index"))
                .and_then(ply_index_list)
                .ok_or_else(|| {
                    MeshError::parse(path, format!("face {} has no vertex index list", i))
                })?;
            mesh.push_polygon(&indices);
        }
    }

    debug!(
        "PLY loaded: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );

    Ok(mesh)
}

fn ply_scalar(property: &ply_rs::ply::Property) -> Option<f64> {
    use ply_rs::ply::Property;

    match *property {
        Property::Char(v) => Some(v as f64),
        Property::UChar(v) => Some(v as f64),
        Property::Short(v) => Some(v as f64),
        Property::UShort(v) => Some(v as f64),
        Property::Int(v) => Some(v as f64),
        Property::UInt(v) => Some(v as f64),
        Property::Float(v) => Some(v as f64),
        Property::Double(v) => Some(v),
        _ => None,
    }
}

fn ply_index_list(property: &ply_rs::ply::Property) -> Option<Vec<u32>> {
    use ply_rs::ply::Property;

    fn convert<T: Copy + TryInto<u32>>(values: &[T]) -> Option<Vec<u32>> {
        values.iter().map(|&v| v.try_into().ok()).collect()
    }

    match property {
        Property::ListChar(v) => convert(v),
        Property::ListUChar(v) => convert(v),
        Property::ListShort(v) => convert(v),
        Property::ListUShort(v) => convert(v),
        Property::ListInt(v) => convert(v),
        Property::ListUInt(v) => Some(v.clone()),
        _ => None,
    }
}

/// Load mesh from OFF file.
///
/// Layout: an `OFF` header (optionally prefixed, e.g. `COFF`, and optionally
/// followed by the counts on the same line), a `vertices faces edges` line,
/// then vertex lines and `n i0 i1 .. in` face lines. Trailing color values
/// on either kind of line are ignored.
fn load_off(path: &Path) -> MeshResult<Mesh> {
    let text = std::fs::read_to_string(path).map_err(|e| MeshError::read(path, e))?;
    parse_off(&text, path)
}

fn parse_off(text: &str, path: &Path) -> MeshResult<Mesh> {
    let mut lines = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty());

    let header = lines
        .next()
        .ok_or_else(|| MeshError::parse(path, "empty OFF file"))?;

    let mut tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.first().is_some_and(|t| t.ends_with("OFF")) {
        tokens.remove(0);
    } else {
        return Err(MeshError::parse(path, format!("missing OFF header, found '{}'", header)));
    }
    if tokens.is_empty() {
        let counts = lines
            .next()
            .ok_or_else(|| MeshError::parse(path, "missing OFF counts line"))?;
        tokens = counts.split_whitespace().collect();
    }
    if tokens.len() < 2 {
        return Err(MeshError::parse(path, "invalid OFF counts line"));
    }

    let vertex_count: usize = parse_token(tokens[0], path)?;
    let face_count: usize = parse_token(tokens[1], path)?;

    // Counts come from the file; every entry needs at least a line of text
    let mut mesh = Mesh::with_capacity(
        vertex_count.min(text.len()),
        face_count.min(text.len()),
    );

    for i in 0..vertex_count {
        let line = lines
            .next()
            .ok_or_else(|| MeshError::parse(path, format!("unexpected end at vertex {}", i)))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(MeshError::parse(
                path,
                format!("vertex {} has insufficient coordinates", i),
            ));
        }
        mesh.vertices.push(Vertex::from_coords(
            parse_token(parts[0], path)?,
            parse_token(parts[1], path)?,
            parse_token(parts[2], path)?,
        ));
    }

    for i in 0..face_count {
        let line = lines
            .next()
            .ok_or_else(|| MeshError::parse(path, format!("unexpected end at face {}", i)))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let n: usize = parse_token(parts[0], path)?;
        if n.checked_add(1).filter(|&needed| parts.len() >= needed).is_none() {
            return Err(MeshError::parse(
                path,
                format!("face {} has insufficient vertex indices", i),
            ));
        }
        let indices = parts[1..=n]
            .iter()
            .map(|t| parse_token::<u32>(t, path))
            .collect::<MeshResult<Vec<u32>>>()?;
        mesh.push_polygon(&indices);
    }

    debug!(
        "OFF loaded: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );

    Ok(mesh)
}

fn parse_token<T: std::str::FromStr>(token: &str, path: &Path) -> MeshResult<T> {
    token
        .parse()
        .map_err(|_| MeshError::parse(path, format!("invalid number '{}'", token)))
}

/// Load every triangle primitive of a glTF/GLB file as its own geometry.
///
/// Node transforms are not applied; geometry is taken in mesh space.
fn load_gltf(path: &Path) -> MeshResult<Vec<(String, Mesh)>> {
    let (document, buffers, _images) =
        gltf::import(path).map_err(|e| MeshError::parse(path, e.to_string()))?;

    let mut geometries = Vec::new();

    for gltf_mesh in document.meshes() {
        let name = gltf_mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("geometry_{}", gltf_mesh.index()));

        for primitive in gltf_mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!(
                    "Skipping {:?} primitive in mesh '{}': only triangles are supported",
                    primitive.mode(),
                    name
                );
                continue;
            }

            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

            let Some(positions) = reader.read_positions() else {
                warn!("Skipping primitive without positions in mesh '{}'", name);
                continue;
            };

            let mut mesh = Mesh::new();
            mesh.vertices.extend(
                positions.map(|p| Vertex::from_coords(p[0] as f64, p[1] as f64, p[2] as f64)),
            );

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..mesh.vertices.len() as u32).collect(),
            };
            mesh.faces
                .extend(indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]));

            if mesh.faces.is_empty() {
                continue;
            }

            debug!(
                "glTF mesh '{}': {} vertices, {} faces",
                name,
                mesh.vertex_count(),
                mesh.face_count()
            );
            geometries.push((name.clone(), mesh));
        }
    }

    Ok(geometries)
}

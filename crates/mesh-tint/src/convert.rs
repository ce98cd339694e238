//! Model to GLB conversion with category tinting.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color::apply_color;
use crate::error::MeshResult;
use crate::glb::{export_mesh, export_model};
use crate::io::{file_name, load_model};
use crate::Model;

/// One GLB written by [`split_convert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// 1-based position in scene order.
    pub index: usize,
    /// Geometry name, or the input file name when nothing was split.
    pub name: String,
    /// Base name of the written GLB.
    pub file: String,
}

/// Tint every geometry of a model with the category color.
pub fn apply_color_to_model(model: &mut Model, category: &str) {
    for mesh in model.meshes_mut() {
        apply_color(mesh, category);
    }
}

/// Convert a whole model file into a single tinted GLB.
pub fn convert(input: &Path, output: &Path, category: &str) -> MeshResult<()> {
    let mut model = load_model(input)?;
    apply_color_to_model(&mut model, category);
    export_model(&model, output)?;

    info!("Converted {:?} -> {:?} as '{}'", input, output, category);
    Ok(())
}

/// Convert a model file into one tinted GLB per geometry.
///
/// A scene with more than one geometry is written to `{prefix}-{n}.glb` for
/// `n` counting from 1 in scene order. Anything else is written whole to
/// `{prefix}.glb` and reported under the input file name.
pub fn split_convert(
    input: &Path,
    output_prefix: &Path,
    category: &str,
) -> MeshResult<Vec<ConversionRecord>> {
    let model = load_model(input)?;

    let records = match model {
        Model::Scene(scene) if scene.len() > 1 => {
            let mut records = Vec::with_capacity(scene.len());
            for (i, (name, mut mesh)) in scene.into_geometries().enumerate() {
                let index = i + 1;
                apply_color(&mut mesh, category);

                let path = suffixed(output_prefix, &format!("-{}.glb", index));
                export_mesh(&mesh, Some(name.as_str()), &path)?;

                records.push(ConversionRecord {
                    index,
                    name,
                    file: file_name(&path),
                });
            }
            records
        }
        mut model => {
            apply_color_to_model(&mut model, category);

            let path = suffixed(output_prefix, ".glb");
            export_model(&model, &path)?;

            vec![ConversionRecord {
                index: 1,
                name: file_name(input),
                file: file_name(&path),
            }]
        }
    };

    info!(
        "Split {:?} into {} file(s) as '{}'",
        input,
        records.len(),
        category
    );
    Ok(records)
}

/// Append a suffix to a path without treating any part of it as an extension.
fn suffixed(prefix: &Path, suffix: &str) -> PathBuf {
    let mut raw = prefix.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::{Mesh, Vertex};
    use std::fs;
    use tempfile::tempdir;

    const THREE_OBJECTS: &str = "\
o base
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o arm
v 0 0 1
v 1 0 1
v 0 1 1
v 1 1 1
f 4 5 6
f 5 7 6
o pin
v 0 0 2
v 1 0 2
v 0 1 2
f 8 9 10
";

    const ONE_TRIANGLE_OFF: &str = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";

    fn load_glb_colors(path: &Path) -> Vec<Vec<[u8; 4]>> {
        let (document, buffers, _) = gltf::import(path).expect("valid glb");
        document
            .meshes()
            .flat_map(|m| m.primitives().collect::<Vec<_>>())
            .map(|primitive| {
                let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| &d.0[..]));
                reader
                    .read_colors(0)
                    .map(|c| c.into_rgba_u8().collect())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn test_convert_single_geometry() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pin.off");
        fs::write(&input, ONE_TRIANGLE_OFF).unwrap();
        let output = dir.path().join("pin.glb");

        convert(&input, &output, "lockpins").expect("should convert");

        let colors = load_glb_colors(&output);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0], vec![[196, 30, 57, 255]; 3]);
    }

    #[test]
    fn test_convert_scene_tints_every_geometry() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("assembly.obj");
        fs::write(&input, THREE_OBJECTS).unwrap();
        let output = dir.path().join("assembly.glb");

        convert(&input, &output, "connectors").expect("should convert");

        let colors = load_glb_colors(&output);
        assert_eq!(colors.len(), 3);
        for mesh_colors in colors {
            assert!(!mesh_colors.is_empty());
            assert!(mesh_colors.iter().all(|c| *c == [0, 85, 179, 255]));
        }
    }

    #[test]
    fn test_convert_missing_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.glb");
        assert!(convert(&dir.path().join("missing.stl"), &output, "supports").is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_split_convert_scene() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("assembly.obj");
        fs::write(&input, THREE_OBJECTS).unwrap();
        let prefix = dir.path().join("part");

        let records = split_convert(&input, &prefix, "other").expect("should split");

        let expected: Vec<ConversionRecord> = ["base", "arm", "pin"]
            .iter()
            .enumerate()
            .map(|(i, name)| ConversionRecord {
                index: i + 1,
                name: name.to_string(),
                file: format!("part-{}.glb", i + 1),
            })
            .collect();
        assert_eq!(records, expected);

        for record in &records {
            let path = dir.path().join(&record.file);
            let colors = load_glb_colors(&path);
            assert_eq!(colors.len(), 1);
            assert!(colors[0].iter().all(|c| *c == [73, 158, 73, 255]));
        }
        assert!(!dir.path().join("part.glb").exists());
    }

    #[test]
    fn test_split_convert_single_geometry() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bracket.off");
        fs::write(&input, ONE_TRIANGLE_OFF).unwrap();
        let prefix = dir.path().join("bracket");

        let records = split_convert(&input, &prefix, "supports").expect("should split");

        assert_eq!(
            records,
            vec![ConversionRecord {
                index: 1,
                name: "bracket.off".to_string(),
                file: "bracket.glb".to_string(),
            }]
        );
        assert!(dir.path().join("bracket.glb").exists());
        assert!(!dir.path().join("bracket-1.glb").exists());
    }

    #[test]
    fn test_split_convert_one_object_scene_is_not_split() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("solo.obj");
        fs::write(&input, "o lonely\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let prefix = dir.path().join("out");

        let records = split_convert(&input, &prefix, "supports").expect("should split");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[0].name, "solo.obj");
        assert_eq!(records[0].file, "out.glb");
    }

    #[test]
    fn test_convert_3mf_keeps_build_placement() {
        use std::io::Write;

        let xml = r#"<model xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02">
  <resources>
    <object id="4" name="clip"><mesh>
      <vertices><vertex x="0" y="0" z="0"/><vertex x="1" y="0" z="0"/><vertex x="0" y="1" z="0"/></vertices>
      <triangles><triangle v1="0" v2="1" v3="2"/></triangles>
    </mesh></object>
  </resources>
  <build><item objectid="4" transform="1 0 0 0 1 0 0 0 1 50 0 0"/></build>
</model>"#;
        let dir = tempdir().unwrap();
        let input = dir.path().join("plate.3mf");
        let mut zip = zip::ZipWriter::new(fs::File::create(&input).unwrap());
        zip.start_file("3D/3dmodel.model", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();

        let output = dir.path().join("plate.glb");
        convert(&input, &output, "supports").expect("should convert");

        let (document, _, _) = gltf::import(&output).expect("valid glb");
        let node = document.nodes().next().expect("one node");
        assert_eq!(node.transform().matrix()[3], [50.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_prefix_with_dots_is_kept() {
        assert_eq!(
            suffixed(Path::new("out/v1.2"), "-3.glb"),
            PathBuf::from("out/v1.2-3.glb")
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = ConversionRecord {
            index: 2,
            name: "arm".to_string(),
            file: "part-2.glb".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"index":2,"name":"arm","file":"part-2.glb"}"#
        );
    }

    #[test]
    fn test_apply_color_to_model() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);

        let mut model = Model::from_geometries(vec![
            ("a".to_string(), mesh.clone()),
            ("b".to_string(), mesh),
        ]);
        apply_color_to_model(&mut model, "unknown");

        for mesh in model.meshes() {
            assert_eq!(mesh.face_colors, Some(vec![Rgba([127, 127, 127, 255])]));
        }
    }
}

//! Material records

use std::io::Write;
use std::path::{Path, PathBuf};

use dc_common::DC_FORMAT;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::asset::{DecodedMaterial, MaterialValue};
use crate::error::{ExportError, Result};
use crate::naming::{output_file, sanitize_filename};

/// JSON shape of an exported material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRecord {
    pub name: String,
    pub shader: String,
    pub properties: Map<String, Value>,
}

pub struct MaterialSerializer;

impl MaterialSerializer {
    /// Project a material into its record
    ///
    /// Numbers, strings and booleans are kept as-is; opaque values are
    /// written as their text. A float that JSON can't carry (NaN, ±inf)
    /// is written as text too.
    pub fn serialize(material: &DecodedMaterial) -> MaterialRecord {
        let properties = material
            .properties
            .iter()
            .map(|(key, value)| (key.clone(), to_json(value)))
            .collect();

        MaterialRecord {
            name: sanitize_filename(&material.name),
            shader: material.shader.clone(),
            properties,
        }
    }

    /// Write the record as pretty JSON to `<dir>/<stem>.json`
    pub fn write(material: &DecodedMaterial, dir: &Path, stem: &str) -> Result<PathBuf> {
        let record = Self::serialize(material);
        let path = output_file(dir, stem, DC_FORMAT.material_ext);

        let file = std::fs::File::create(&path).map_err(ExportError::io(&path))?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &record)?;
        writer.flush().map_err(ExportError::io(&path))?;

        tracing::info!(
            "Extracted material {} ({}, {} properties)",
            stem,
            record.shader,
            record.properties.len()
        );
        Ok(path)
    }
}

fn to_json(value: &MaterialValue) -> Value {
    match value {
        MaterialValue::Int(i) => Value::from(*i),
        MaterialValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        MaterialValue::String(s) => Value::String(s.clone()),
        MaterialValue::Bool(b) => Value::Bool(*b),
        MaterialValue::Opaque(text) => Value::String(text.clone()),
    }
}

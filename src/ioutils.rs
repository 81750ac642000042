use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// JSON object used as the root scope of a render.
pub type ContextMap = serde_json::Map<String, serde_json::Value>;

pub fn create_dir_all<P: AsRef<Path>>(dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    std::fs::create_dir_all(dest_path).map_err(Error::IoError)
}

pub fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    let base_path = std::env::current_dir().unwrap_or_default();
    let abs_path = if dest_path.is_absolute() {
        dest_path.to_path_buf()
    } else {
        base_path.join(dest_path)
    };

    if let Some(parent) = abs_path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(abs_path, content).map_err(Error::IoError)
}

pub fn read_template<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::TemplateDoesNotExistsError {
            template: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(Error::IoError)
}

/// Parses a JSON context; anything but an object yields an empty map.
pub fn parse_string_to_json(buf: &str) -> Result<ContextMap> {
    Ok(into_context_map(serde_json::from_str(buf)?))
}

/// Reads a `.json`, `.yaml` or `.yml` context file.
pub fn read_context_file<P: AsRef<Path>>(path: P) -> Result<ContextMap> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => deserialize_json(&content)?,
        Some("yaml") | Some("yml") => deserialize_yaml(&content)?,
        _ => {
            return Err(Error::UnsupportedContextFile { path: path.display().to_string() })
        }
    };
    Ok(into_context_map(value))
}

fn deserialize_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(serde_json::from_str(content)?)
}

fn deserialize_yaml<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(serde_yaml::from_str(content)?)
}

fn into_context_map(value: serde_json::Value) -> ContextMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => ContextMap::new(),
    }
}

pub fn read_from(mut reader: impl std::io::Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).map_err(Error::IoError)?;
    Ok(buf)
}

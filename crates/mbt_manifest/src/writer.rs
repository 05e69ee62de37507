//! Serializes [`ModuleRules`] to manifest files.

use std::io::Write;
use std::path::{Path, PathBuf};

use mbt_rules::ModuleRules;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::ManifestError;
use crate::{
    ITEM_ELEMENT, MODULE_ELEMENT, MODULE_TYPE_ELEMENT, PRIVATE_DEPENDENCIES_ELEMENT,
    PRIVATE_INCLUDES_ELEMENT, PUBLIC_DEPENDENCIES_ELEMENT, PUBLIC_INCLUDES_ELEMENT,
};

/// Default manifest file extension.
const DEFAULT_EXTENSION: &str = "xml";

/// Writes manifests into one output directory with a fixed extension.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    output_dir: PathBuf,
    extension: String,
}

impl ManifestWriter {
    /// Creates a writer targeting `output_dir` with the given file extension.
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.into(),
        }
    }

    /// Returns the directory manifests are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns where the manifest of `module_name` is written.
    pub fn path_for(&self, module_name: &str) -> PathBuf {
        manifest_path(&self.output_dir, module_name, &self.extension)
    }

    /// Writes the manifest for `module_name`, replacing any existing file.
    ///
    /// Creates the output directory if it doesn't exist. Returns the path written.
    pub fn write(&self, rules: &ModuleRules, module_name: &str) -> Result<PathBuf, ManifestError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| ManifestError::Io {
            path: self.output_dir.clone(),
            source: e,
        })?;
        let path = self.path_for(module_name);
        let document = render_manifest(rules)?;
        std::fs::write(&path, document).map_err(|e| ManifestError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

/// Returns `<output_dir>/<module_name>.<extension>`.
pub fn manifest_path(output_dir: &Path, module_name: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{module_name}.{extension}"))
}

/// Writes `<output_dir>/<module_name>.xml`, creating `output_dir` if needed.
pub fn write_manifest(
    rules: &ModuleRules,
    module_name: &str,
    output_dir: &Path,
) -> Result<PathBuf, ManifestError> {
    ManifestWriter::new(output_dir, DEFAULT_EXTENSION).write(rules, module_name)
}

/// Renders the manifest document for `rules` as a string.
pub fn render_manifest(rules: &ModuleRules) -> Result<String, ManifestError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(MODULE_ELEMENT)))?;

    write_scalar(&mut writer, MODULE_TYPE_ELEMENT, rules.kind.as_str())?;
    write_list(&mut writer, PUBLIC_DEPENDENCIES_ELEMENT, &rules.public_dependency_names)?;
    write_list(&mut writer, PRIVATE_DEPENDENCIES_ELEMENT, &rules.private_dependency_names)?;
    write_list(&mut writer, PUBLIC_INCLUDES_ELEMENT, &rules.public_include_paths)?;
    write_list(&mut writer, PRIVATE_INCLUDES_ELEMENT, &rules.private_include_paths)?;

    writer.write_event(Event::End(BytesEnd::new(MODULE_ELEMENT)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| ManifestError::Xml {
        reason: e.to_string(),
    })
}

fn write_scalar<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ManifestError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_list<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    values: &[String],
) -> Result<(), ManifestError> {
    if values.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    for value in values {
        write_scalar(writer, ITEM_ELEMENT, value)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

//! Parses manifest files back into [`ModuleRules`].

use std::path::Path;

use mbt_rules::{ModuleKind, ModuleRules};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ManifestError;
use crate::{
    ITEM_ELEMENT, MODULE_ELEMENT, MODULE_TYPE_ELEMENT, PRIVATE_DEPENDENCIES_ELEMENT,
    PRIVATE_INCLUDES_ELEMENT, PUBLIC_DEPENDENCIES_ELEMENT, PUBLIC_INCLUDES_ELEMENT,
};

/// Reads and parses the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<ModuleRules, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|e| ManifestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_manifest(&text)
}

/// Parses a manifest document.
///
/// Missing list elements are treated as empty lists; a missing `ModuleType`
/// or any unexpected element is an error. `Item` text is kept exactly as
/// written; whitespace between elements is ignored.
pub fn parse_manifest(text: &str) -> Result<ModuleRules, ManifestError> {
    let mut reader = Reader::from_str(text);

    let mut rules = ModuleRules::default();
    let mut kind: Option<ModuleKind> = None;
    // Element names from the root down to the current element.
    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                open_element(&stack, &name, &mut seen_root)?;
                if name == ITEM_ELEMENT {
                    list_mut(&mut rules, &stack[1])?.push(String::new());
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                open_element(&stack, &name, &mut seen_root)?;
                if name == ITEM_ELEMENT {
                    list_mut(&mut rules, &stack[1])?.push(String::new());
                } else if name == MODULE_TYPE_ELEMENT {
                    return Err(malformed("empty <ModuleType> element"));
                }
            }
            Event::Text(t) => {
                let value = t.unescape()?.into_owned();
                match stack.last().map(String::as_str) {
                    Some(MODULE_TYPE_ELEMENT) => {
                        let parsed = value
                            .parse::<ModuleKind>()
                            .map_err(|e| malformed(e.to_string()))?;
                        kind = Some(parsed);
                    }
                    Some(ITEM_ELEMENT) => {
                        if let Some(last) = list_mut(&mut rules, &stack[1])?.last_mut() {
                            last.push_str(&value);
                        }
                    }
                    _ if value.trim().is_empty() => {}
                    _ => return Err(malformed(format!("unexpected text '{value}'"))),
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed("missing <Module> root element"));
    }
    rules.kind = kind.ok_or_else(|| malformed("missing <ModuleType> element"))?;
    Ok(rules)
}

/// Checks that `name` may appear as a child of the element at the top of `stack`.
fn open_element(stack: &[String], name: &str, seen_root: &mut bool) -> Result<(), ManifestError> {
    let allowed = match stack.len() {
        0 => {
            if *seen_root {
                return Err(malformed("more than one root element"));
            }
            *seen_root = true;
            name == MODULE_ELEMENT
        }
        1 => name == MODULE_TYPE_ELEMENT || is_list_element(name),
        2 => is_list_element(&stack[1]) && name == ITEM_ELEMENT,
        _ => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(malformed(format!("unexpected element <{name}>")))
    }
}

fn is_list_element(name: &str) -> bool {
    matches!(
        name,
        PUBLIC_DEPENDENCIES_ELEMENT
            | PRIVATE_DEPENDENCIES_ELEMENT
            | PUBLIC_INCLUDES_ELEMENT
            | PRIVATE_INCLUDES_ELEMENT
    )
}

fn list_mut<'a>(rules: &'a mut ModuleRules, list: &str) -> Result<&'a mut Vec<String>, ManifestError> {
    match list {
        PUBLIC_DEPENDENCIES_ELEMENT => Ok(&mut rules.public_dependency_names),
        PRIVATE_DEPENDENCIES_ELEMENT => Ok(&mut rules.private_dependency_names),
        PUBLIC_INCLUDES_ELEMENT => Ok(&mut rules.public_include_paths),
        PRIVATE_INCLUDES_ELEMENT => Ok(&mut rules.private_include_paths),
        other => Err(malformed(format!("<{other}> is not a list element"))),
    }
}

fn malformed(reason: impl Into<String>) -> ManifestError {
    ManifestError::Malformed {
        reason: reason.into(),
    }
}

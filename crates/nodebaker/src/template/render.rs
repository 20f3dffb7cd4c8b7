//! Placeholder substitution.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::InsertionPoint;

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{([A-Z0-9_]+)\}\}").expect("placeholder pattern must compile");
}

/// Substitution failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A placeholder survived substitution. A half-rendered script is worse
    /// than no script, so this aborts the render.
    #[error("unbound placeholder {{{{{}}}}} in template bundle {}", placeholder, bundle)]
    UnboundPlaceholder {
        /// The placeholder name, without braces.
        placeholder: String,
        /// The bundle being rendered.
        bundle: String,
    },
}

/// Renders a template: inserts addon blocks at their markers, substitutes
/// scalar placeholders, then verifies nothing is left unbound.
///
/// Blocks are inserted before the scalar pass so block text may itself use
/// scalar placeholders. An omitted block erases its marker line entirely.
/// Identical inputs always produce identical output text.
pub(crate) fn substitute(
    template: &str,
    bundle_name: &str,
    blocks: &[(InsertionPoint, Option<&str>)],
    scalars: &BTreeMap<&'static str, String>,
) -> Result<String, RenderError> {
    let mut rendered = template.to_owned();

    for (point, block) in blocks {
        let marker_line = format!("{{{{{}}}}}\n", point.marker());
        rendered = rendered.replace(&marker_line, block.unwrap_or(""));
    }
    for (name, value) in scalars {
        rendered = rendered.replace(&format!("{{{{{}}}}}", name), value);
    }

    if let Some(capture) = PLACEHOLDER.captures(&rendered) {
        return Err(RenderError::UnboundPlaceholder {
            placeholder: capture[1].to_owned(),
            bundle: bundle_name.to_owned(),
        });
    }
    Ok(rendered)
}

#[cfg(test)]
mod test {
    use super::*;

    fn scalars(entries: &[(&'static str, &str)]) -> BTreeMap<&'static str, String> {
        entries
            .iter()
            .map(|(name, value)| (*name, value.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_scalars() {
        let rendered = substitute(
            "user={{USER}} host={{HOST}}\n",
            "test",
            &[],
            &scalars(&[("USER", "azureuser"), ("HOST", "node-0")]),
        )
        .unwrap();
        assert_eq!(rendered, "user=azureuser host=node-0\n");
    }

    #[test]
    fn inserts_blocks_before_scalars() {
        let rendered = substitute(
            "start\n{{RUNTIME_SETUP}}\nend {{NAME}}\n",
            "test",
            &[(InsertionPoint::RuntimeSetup, Some("block for {{NAME}}\n"))],
            &scalars(&[("NAME", "value")]),
        )
        .unwrap();
        assert_eq!(rendered, "start\nblock for value\nend value\n");
    }

    #[test]
    fn omitted_block_erases_the_marker_line() {
        let rendered = substitute(
            "start\n{{RUNTIME_SETUP}}\nend\n",
            "test",
            &[(InsertionPoint::RuntimeSetup, None)],
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(rendered, "start\nend\n");
    }

    #[test]
    fn unbound_placeholder_is_fatal() {
        let err = substitute("{{NOT_BOUND}}\n", "aks-ubuntu-16.04", &[], &BTreeMap::new())
            .expect_err("unbound placeholder must fail");
        assert_eq!(
            err,
            RenderError::UnboundPlaceholder {
                placeholder: "NOT_BOUND".to_owned(),
                bundle: "aks-ubuntu-16.04".to_owned(),
            }
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let values = scalars(&[("A", "1"), ("B", "2")]);
        let first = substitute("{{A}}{{B}}\n", "test", &[], &values).unwrap();
        let second = substitute("{{A}}{{B}}\n", "test", &[], &values).unwrap();
        assert_eq!(first, second);
    }
}

//! Plugin handle wrapper generation.
//!
//! The input holds `unsafe fn` declarations copied from the plugin vtable, each taking the
//! raw plugin handle as its first parameter:
//!
//! ```text
//!     pub(crate) unsafe fn hexchat_nickcmp(
//!         self,
//!         ph: *mut hexchat_plugin,
//!         s1: *const c_char,
//!         s2: *const c_char,
//!     ) -> c_int {
//!     }
//! ```
//!
//! Each declaration loses its handle parameter and gains a body forwarding every remaining
//! parameter, in order, to the vtable entry of the same name. All other text is copied
//! through untouched.

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::{
    error::GenError,
    types::FunctionSignature,
    utils::quote,
};

lazy_static! {
    static ref UNSAFE_FN:   Regex = Regex::new(r"unsafe\s+fn\s+([A-Za-z_]\w*)\s*\([^{]*\{").unwrap();
    static ref FIRST_PARAM: Regex = Regex::new(r"\n([ \t]+)[A-Za-z_]\w*[ \t]*:(?:[^:]|$)").unwrap();
    static ref IDENTIFIER:  Regex = Regex::new(r"^[A-Za-z_]\w*$").unwrap();
}

const BODY_INDENT: &str = "    ";

/// Whitespace preceding the first `name:` line of `block`, or `""` when the
/// parameters share the declaration's line.
pub fn indentation_unit(block: &str) -> &str {
    FIRST_PARAM
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}

/// Every parameter name of `block` in declaration order, the handle included.
pub fn parameter_names(block: &str, unit: &str) -> Result<Vec<String>, GenError> {
    if unit.is_empty() {
        return Ok(top_level_parameters(block));
    }
    let pattern = Regex::new(&format!(
        r"\n{}([A-Za-z_]\w*)[ \t]*:(?:[^:]|$)",
        regex::escape(unit)
    ))?;
    Ok(pattern
        .captures_iter(block)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect())
}

/// Splits the first parenthesized list of `block` on its top-level commas and keeps the
/// names of the `name: type` segments.
fn top_level_parameters(block: &str) -> Vec<String> {
    let open = match block.find('(') {
        Some(open) => open,
        None => return Vec::new(),
    };

    let mut names = Vec::new();
    let mut push_segment = |segment: &str| {
        if let Some((name, _)) = segment.split_once(':') {
            let name = name.trim();
            if IDENTIFIER.is_match(name) {
                names.push(name.to_string());
            }
        }
    };

    let mut depth = 0usize;
    let mut segment_start = open + 1;
    for (offset, c) in block[open..].char_indices() {
        let index = open + offset;
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    push_segment(&block[segment_start..index]);
                    break;
                }
            }
            ',' if depth == 1 => {
                push_segment(&block[segment_start..index]);
                segment_start = index + 1;
            }
            _ => {}
        }
    }
    names
}

/// Reads the name, forwarded parameters and indentation of one `unsafe fn` block.
pub fn parse_signature(block: &str) -> Result<FunctionSignature, GenError> {
    let name = UNSAFE_FN
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| GenError::RewriteError(format!("Not an unsafe fn block: {}", quote(block))))?;
    let unit = indentation_unit(block);
    let parameters = parameter_names(block, unit)?
        .into_iter()
        .skip(1)
        .collect();
    Ok(FunctionSignature {
        name,
        parameters,
        indentation_unit: unit.to_string(),
    })
}

/// Leading whitespace of the line containing byte offset `at`.
fn line_indent(text: &str, at: usize) -> &str {
    let line_start = text[..at].rfind('\n').map_or(0, |i| i + 1);
    let line = &text[line_start..];
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// The statements placed after the opening brace of a rewritten block.
pub fn forwarding_body(signature: &FunctionSignature, indent: &str) -> String {
    let mut args = String::from("self.handle.as_ptr()");
    for parameter in &signature.parameters {
        args.push_str(", ");
        args.push_str(parameter);
    }
    format!(
        "\n{indent}// Safety: forwarded to caller\n{indent}unsafe {{ ((*self.handle.as_ptr()).{})({}) }}",
        signature.name,
        args,
        indent = indent
    )
}

#[derive(Debug)]
pub struct RewriteOutput {
    pub text:       String,
    pub signatures: Vec<FunctionSignature>,
}

pub struct SignatureRewriter {
    handle_line:   Regex,
    handle_inline: Regex,
}

impl SignatureRewriter {
    pub fn new(handle_type: &str) -> Result<Self, GenError> {
        let ty = regex::escape(handle_type);
        Ok(SignatureRewriter {
            handle_line: Regex::new(&format!(
                r"(?m)^[ \t]*([A-Za-z_]\w*)[ \t]*:[ \t]*\*mut[ \t]+{}[ \t]*,?[ \t]*\r?\n",
                ty
            ))?,
            handle_inline: Regex::new(&format!(
                r"(,\s*)?([A-Za-z_]\w*)\s*:\s*\*mut\s+{}\b(\s*,\s*)?",
                ty
            ))?,
        })
    }

    /// Deletes the handle declaration from `block`, returning the new text and the
    /// handle's name. A handle on its own line takes the whole line with it; an inline
    /// handle takes its trailing comma, or its leading one when it is the last parameter.
    pub fn strip_handle(&self, block: &str) -> Option<(String, String)> {
        let (range, name) = match self.handle_line.captures(block) {
            Some(caps) => {
                let whole = caps.get(0)?;
                (whole.start()..whole.end(), caps.get(1)?)
            }
            None => {
                let caps = self.handle_inline.captures(block)?;
                let whole = caps.get(0)?;
                let name = caps.get(2)?;
                let range = match (caps.get(1), caps.get(3)) {
                    (_, Some(trailing)) => name.start()..trailing.end(),
                    (Some(leading), None) => leading.start()..whole.end(),
                    (None, None) => name.start()..whole.end(),
                };
                (range, name)
            }
        };
        let mut stripped = String::with_capacity(block.len());
        stripped.push_str(&block[..range.start]);
        stripped.push_str(&block[range.end..]);
        Some((stripped, name.as_str().to_string()))
    }

    /// Rewrites a single block whose `unsafe fn` line is indented by `indent`.
    pub fn rewrite_block(
        &self,
        block: &str,
        indent: &str,
    ) -> Result<(String, FunctionSignature), GenError> {
        let signature = parse_signature(block)?;
        let handle = parameter_names(block, &signature.indentation_unit)?
            .into_iter()
            .next();

        let (mut rewritten, removed) = self.strip_handle(block).ok_or_else(|| {
            GenError::RewriteError(format!(
                "No handle parameter found in {}",
                quote(&signature.name)
            ))
        })?;
        if handle.as_deref() != Some(removed.as_str()) {
            return Err(GenError::RewriteError(format!(
                "Handle parameter {} of {} is not its first parameter",
                quote(&removed),
                quote(&signature.name)
            )));
        }

        rewritten.push_str(&forwarding_body(
            &signature,
            &format!("{}{}", indent, BODY_INDENT),
        ));
        debug!(
            "{} forwards {} parameter(s)",
            signature.name,
            signature.parameters.len()
        );
        Ok((rewritten, signature))
    }

    /// Rewrites every block of `text`, copying the text between blocks verbatim.
    pub fn rewrite(&self, text: &str) -> Result<RewriteOutput, GenError> {
        let mut out = String::with_capacity(text.len() * 2);
        let mut signatures = Vec::new();
        let mut last_end = 0;

        for mat in UNSAFE_FN.find_iter(text) {
            out.push_str(&text[last_end..mat.start()]);
            let (block, signature) = self.rewrite_block(mat.as_str(), line_indent(text, mat.start()))?;
            out.push_str(&block);
            signatures.push(signature);
            last_end = mat.end();
        }
        out.push_str(&text[last_end..]);

        if signatures.is_empty() {
            warn!("no unsafe fn declarations found");
        }
        Ok(RewriteOutput {
            text: out,
            signatures,
        })
    }
}

/// Parses every block of `text` without rewriting it.
pub fn extract_signatures(text: &str) -> Result<Vec<FunctionSignature>, GenError> {
    UNSAFE_FN
        .find_iter(text)
        .map(|mat| parse_signature(mat.as_str()))
        .collect()
}

use log::info;

use crate::{
    config::GeneratorConfig,
    descriptors::extract_descriptors,
    error::GenError,
    event_specs::read_event_specs,
    gen_rust::{compile_events_to_rust, compile_prefs_to_rust},
    prefs::extract_prefs,
    signatures::{RewriteOutput, SignatureRewriter},
};

/// Generate the `print_event!` lines from the descriptor source and the event table.
/// Returns `Err(GenError)` if either input is malformed or an event references an
/// undeclared descriptor.
pub fn compile_events(
    descriptors_text: &str,
    events_text: &str,
    config: &GeneratorConfig,
) -> Result<String, GenError> {
    let table = extract_descriptors(
        descriptors_text,
        config.descriptor_header_lines,
        &config.empty_descriptor_key,
    )?;
    let specs = read_event_specs(events_text, config.event_stride)?;
    info!("{} events over {} descriptors", specs.len(), table.len());
    compile_events_to_rust(&specs, &table)
}

/// Generate the `pref!` lines from the preference table source.
pub fn compile_prefs(text: &str, config: &GeneratorConfig) -> Result<String, GenError> {
    let prefs = extract_prefs(text, config.pref_header_lines)?;
    info!("{} preferences", prefs.len());
    Ok(compile_prefs_to_rust(&prefs))
}

/// Strip the handle parameter from every `unsafe fn` and append its forwarding body.
pub fn rewrite_signatures(text: &str, config: &GeneratorConfig) -> Result<RewriteOutput, GenError> {
    let output = SignatureRewriter::new(&config.handle_type)?.rewrite(text)?;
    info!("{} wrappers", output.signatures.len());
    Ok(output)
}

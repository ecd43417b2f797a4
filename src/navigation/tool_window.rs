use crate::host::EditorHost;
use crate::util::log::log_to_file;

/// Frame of the tool window registered under `slot`.
///
/// Lookup failures are logged and reported as absent.
pub fn locate<H: EditorHost>(host: &H, slot: &str) -> Option<H::Frame> {
    if slot.trim().is_empty() {
        return None;
    }

    match host.find_tool_window(slot) {
        Ok(frame) => frame,
        Err(err) => {
            log_to_file(&format!("Tool window lookup for '{}' failed: {}", slot, err));
            None
        }
    }
}

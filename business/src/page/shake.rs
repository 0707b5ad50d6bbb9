use log::warn;
use people_dom::{DomResult, NodeId, SharedDocument};

use super::{MAIN_IMAGE_ID, SHAKE_CLASS};

/// Button label for a target given its current shake state.
pub fn shake_label(target_id: &str, shaking: bool) -> &'static str {
    match (target_id == MAIN_IMAGE_ID, shaking) {
        (true, false) => "Shake Image",
        (true, true) => "Unshake Image",
        (false, false) => "Shake Table",
        (false, true) => "Unshake Table",
    }
}

/// Flips the shake class on `#target_id` and relabels `button`.
///
/// Returns the new state, or `None` when the target does not exist.
pub fn toggle_shake_by_id(
    document: &SharedDocument,
    target_id: &str,
    button: NodeId,
) -> DomResult<Option<bool>> {
    document.write(|doc| {
        let Some(target) = doc.get_element_by_id(target_id) else {
            warn!("Element with id=\"{target_id}\" not found");
            return Ok(None);
        };
        let will_shake = !doc.has_class(target, SHAKE_CLASS)?;
        doc.toggle_class(target, SHAKE_CLASS, Some(will_shake))?;
        doc.set_text(button, shake_label(target_id, will_shake))?;
        Ok(Some(will_shake))
    })
}

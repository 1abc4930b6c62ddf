use web_sys as web;

use crate::constants::DEBUG_HUD_ID;

/// Write the debug readout. No-op when the page has no HUD element.
#[inline]
pub fn update_debug(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id(DEBUG_HUD_ID) {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }
}

#[inline]
pub fn show_debug(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DEBUG_HUD_ID) {
        _ = el.remove_attribute("hidden");
    }
}

#[inline]
pub fn hide_debug(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DEBUG_HUD_ID) {
        _ = el.set_attribute("hidden", "");
        el.set_text_content(None);
    }
}

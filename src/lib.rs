//! chordsheet — chord sheet document model and page layout engine.
//!
//! A chord sheet is a title block, guitar and piano voicing charts, and one
//! beat-gridded chord progression per section. The renderer lays these out
//! on fixed-size pages and emits positioned draw commands, exported as SVG
//! or JSON.
//!
//! # Example
//! ```no_run
//! use chordsheet::{parse_file, render_document_to_svg, Style};
//!
//! let doc = parse_file("path/to/song.xml").unwrap();
//! let pages = render_document_to_svg(&doc, &Style::default()).unwrap();
//! println!("{} page(s)", pages.len());
//! ```

pub mod error;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod style;

use std::path::Path;

pub use error::{DocumentError, Error, LayoutError, Result};
pub use model::*;
pub use parser::{parse_chordsheet_xml, parse_guitar_fingering, parse_name, parse_piano_voicing};
pub use renderer::{
    render_document, render_document_to_json, render_document_to_svg, EstimatedMetrics, RenderedDocument,
    TextMeasure,
};
pub use style::{PageSize, Size, Style, Unit};

/// Load a chordsheet XML file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_bytes(&data)
}

/// Load a chordsheet XML document from raw bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let xml = std::str::from_utf8(data)
        .map_err(|e| DocumentError::Xml(format!("invalid UTF-8 in chordsheet file: {e}")))?;
    Ok(parse_chordsheet_xml(xml)?)
}

/// Parse a chordsheet file and render it to one SVG string per page.
pub fn render_file_to_svg<P: AsRef<Path>>(path: P, style: &Style) -> Result<Vec<String>> {
    let document = parse_file(path)?;
    render_document_to_svg(&document, style)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Render a chordsheet file and return its pages as a JSON array of SVG
/// strings. The caller must free the result with `chordsheet_free_string`.
///
/// `style_json` may be null for the default style. Returns null on any
/// failure.
///
/// # Safety
/// `path` must be a valid null-terminated UTF-8 C string. `style_json`
/// must be null or a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn chordsheet_render_file(path: *const c_char, style_json: *const c_char) -> *mut c_char {
    if path.is_null() {
        return std::ptr::null_mut();
    }
    let path_str = match unsafe { CStr::from_ptr(path) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    let style = if style_json.is_null() {
        Style::default()
    } else {
        let json = match unsafe { CStr::from_ptr(style_json) }.to_str() {
            Ok(s) => s,
            Err(_) => return std::ptr::null_mut(),
        };
        match Style::from_json(json) {
            Ok(style) => style,
            Err(_) => return std::ptr::null_mut(),
        }
    };

    let pages = match render_file_to_svg(path_str, &style) {
        Ok(pages) => pages,
        Err(e) => {
            log::error!("failed to render '{path_str}': {e}");
            return std::ptr::null_mut();
        }
    };

    match serde_json::to_string(&pages) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by chordsheet functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a chordsheet function, or null.
#[no_mangle]
pub unsafe extern "C" fn chordsheet_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

//! Registering fetched web fonts with the font database.

use std::sync::Arc;

use resvg::usvg::fontdb::{Database, Language, Source};

use crate::error::{Error, Result};

const WOFF2_MAGIC: &[u8] = b"wOF2";
const WOFF_MAGIC: &[u8] = b"wOFF";

/// Unwraps WOFF and WOFF2 containers into plain sfnt data.
fn to_sfnt(bytes: &[u8]) -> std::result::Result<Vec<u8>, String> {
    if bytes.starts_with(WOFF2_MAGIC) {
        wuff::decompress_woff2(bytes).map_err(|err| format!("woff2: {err:?}"))
    } else if bytes.starts_with(WOFF_MAGIC) {
        wuff::decompress_woff1(bytes).map_err(|err| format!("woff: {err:?}"))
    } else {
        Ok(bytes.to_vec())
    }
}

/// Loads a fetched font and makes each of its faces answer to `family`.
///
/// The name inside a font file rarely matches the alias a stylesheet gives
/// it, and text lookups go by the alias. Returns the number of faces added.
pub(crate) fn register_web_font(
    db: &mut Database,
    url: &str,
    bytes: &[u8],
    family: &str,
) -> Result<usize> {
    let invalid = |reason: String| Error::AssetLoad {
        url: url.to_string(),
        reason,
    };
    let sfnt = to_sfnt(bytes).map_err(invalid)?;
    let ids = db.load_font_source(Source::Binary(Arc::new(sfnt)));
    if ids.is_empty() {
        return Err(invalid("no font faces found".to_string()));
    }

    let count = ids.len();
    for id in ids {
        let Some(mut info) = db.face(id).cloned() else {
            continue;
        };
        if info.families.iter().any(|(name, _)| name == family) {
            continue;
        }
        info.families.push((family.to_string(), Language::English_UnitedStates));
        db.remove_face(id);
        db.push_face_info(info);
    }
    Ok(count)
}

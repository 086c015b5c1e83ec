mod ec_point_formats;
mod elliptic_curves;

pub use ec_point_formats::{EcPointFormat, EcPointFormatsExtension};
pub use elliptic_curves::{EllipticCurvesExtension, NamedCurve};

use super::{Extension, ExtensionType};
use crate::Error;

/// Data of a raw extension, after checking it is of the expected type.
fn typed_data(ext: &Extension, expected: ExtensionType) -> Result<&[u8], Error> {
    use super::HelloExtension;

    if ext.extension_type() != expected {
        debug!("Expected {} extension, got {}", expected, ext.extension_type());
        return Err(Error::Framing("unexpected extension type"));
    }
    Ok(ext.data())
}

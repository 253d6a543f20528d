//! ZIP container access for xlsx packages.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Path of the workbook part every xlsx package must carry.
const WORKBOOK_PART: &str = "xl/workbook.xml";

/// An xlsx package opened from a ZIP archive.
///
/// Provides access to the XML parts and relationships of the workbook.
/// The archive is fully buffered in memory for the duration of the run.
pub struct XlsxPackage {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl XlsxPackage {
    /// Open an xlsx package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dedupx::container::XlsxPackage;
    ///
    /// let package = XlsxPackage::open("data.xlsx")?;
    /// # Ok::<(), dedupx::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an xlsx package from a byte vector.
    ///
    /// Verifies the ZIP magic bytes and the presence of `xl/workbook.xml`
    /// before handing the archive out.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < 4 || data[..4] != ZIP_MAGIC {
            return Err(Error::NotAWorkbook);
        }

        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        let package = Self {
            archive: RefCell::new(archive),
        };

        if !package.exists(WORKBOOK_PART) {
            return Err(Error::NotAWorkbook);
        }

        Ok(package)
    }

    /// Read an XML part from the archive as a string.
    ///
    /// Handles UTF-8 (with or without BOM) and UTF-16 LE/BE encoded parts.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        decode_xml_bytes(&bytes)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// Read a `.rels` part into a map from relationship ID to target path.
    ///
    /// A missing or empty rels part yields an empty map, matching how the
    /// rest of the package treats optional parts.
    pub fn read_relationships(&self, rels_path: &str) -> Result<HashMap<String, String>> {
        let mut rels = HashMap::new();

        let xml = match self.read_xml(rels_path) {
            Ok(xml) => xml,
            Err(_) => return Ok(rels),
        };

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut target = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                            _ => {}
                        }
                    }

                    if !id.is_empty() && !target.is_empty() {
                        rels.insert(id, target);
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }
}

impl std::fmt::Debug for XlsxPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxPackage")
            .field("parts", &self.archive.borrow().len())
            .finish()
    }
}

/// Decode XML bytes handling UTF-8 and UTF-16 encodings.
///
/// Workbook parts are typically UTF-8, but some producers emit UTF-16
/// with a BOM.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::InvalidData(format!("invalid UTF-8: {}", e))),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => Ok(s),
            // Fall back to lossy UTF-8 conversion
            Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        },
    }
}

/// Decode UTF-16 bytes to String with the given byte-pair combiner.
///
/// The XML declaration is patched to claim UTF-8, since the decoded string
/// no longer matches a declared UTF-16 encoding.
fn decode_utf16(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> Result<String> {
    // Ignore a trailing odd byte
    let len = bytes.len() & !1;
    let units = (0..len).step_by(2).map(|i| combine([bytes[i], bytes[i + 1]]));

    let content = char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(format!("invalid UTF-16: {}", e)))?;

    Ok(fix_encoding_declaration(content))
}

/// Rewrite `encoding="UTF-16"` in the XML declaration to UTF-8.
fn fix_encoding_declaration(content: String) -> String {
    if !content.starts_with("<?xml") {
        return content;
    }
    let Some(end) = content.find("?>") else {
        return content;
    };

    let (decl, rest) = content.split_at(end + 2);
    let fixed = decl
        .replace("\"UTF-16\"", "\"UTF-8\"")
        .replace("'UTF-16'", "'UTF-8'")
        .replace("\"utf-16\"", "\"UTF-8\"")
        .replace("'utf-16'", "'UTF-8'");

    format!("{}{}", fixed, rest)
}

/// Smallest archive that passes the workbook checks. Test-only.
#[cfg(test)]
pub(crate) fn minimal_package_bytes() -> Vec<u8> {
    use std::io::Write;

    let mut buffer = Vec::new();
    let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("xl/workbook.xml", options)
        .expect("start workbook part");
    zip.write_all(b"<workbook><sheets/></workbook>")
        .expect("write workbook part");
    zip.finish().expect("finish archive");
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn test_from_bytes_verifies_magic() {
        let result = XlsxPackage::from_bytes(vec![0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(Error::NotAWorkbook)));
    }

    #[test]
    fn test_from_bytes_requires_workbook_part() {
        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        zip.start_file("mimetype", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"application/zip").unwrap();
        zip.finish().unwrap();

        let result = XlsxPackage::from_bytes(buffer);
        assert!(matches!(result, Err(Error::NotAWorkbook)));
    }

    #[test]
    fn test_read_xml() {
        let package = XlsxPackage::from_bytes(minimal_package_bytes()).unwrap();
        assert!(package.exists("xl/workbook.xml"));

        let xml = package.read_xml("xl/workbook.xml").unwrap();
        assert!(xml.contains("<sheets/>"));

        let missing = package.read_xml("xl/styles.xml");
        assert!(matches!(missing, Err(Error::MissingComponent(_))));
    }

    #[test]
    fn test_missing_rels_is_empty() {
        let package = XlsxPackage::from_bytes(minimal_package_bytes()).unwrap();
        let rels = package
            .read_relationships("xl/_rels/workbook.xml.rels")
            .unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn test_decode_utf16() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        let utf8_plain = b"<?xml>";
        assert_eq!(decode_xml_bytes(utf8_plain).unwrap(), "<?xml>");
    }

    #[test]
    fn test_fix_encoding_declaration() {
        let fixed = fix_encoding_declaration(
            "<?xml version=\"1.0\" encoding=\"UTF-16\"?><workbook/>".to_string(),
        );
        assert_eq!(fixed, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><workbook/>");
    }
}

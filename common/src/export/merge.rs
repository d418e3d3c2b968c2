//! Client-side PDF concatenation.
//!
//! Each appended PDF is parsed once per requested copy from the same bytes,
//! its objects renumbered past everything already collected, and its pages
//! re-parented under a single new page tree. Attributes a page inherits from
//! its old tree (resources, media box, ...) are copied onto the page first so
//! nothing is lost when the old tree is dropped.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};
use std::collections::BTreeMap;

use crate::error::ClientError;

const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Document information written into the merged file.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfMetadata {
    pub title: String,
    pub author: String,
    pub creator: String,
}

#[derive(Default)]
pub struct PdfMerger {
    objects: BTreeMap<ObjectId, Object>,
    pages: Vec<(ObjectId, Dictionary)>,
    max_id: u32,
}

impl PdfMerger {
    pub fn new() -> Self {
        Self {
            max_id: 1,
            ..Self::default()
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Appends `copies` consecutive copies of a PDF's pages.
    ///
    /// The bytes are validated before anything is added, so a broken PDF
    /// leaves the merger untouched. Returns the number of pages per copy.
    pub fn append(&mut self, pdf: &[u8], copies: u32) -> Result<usize, ClientError> {
        let probe = Document::load_mem(pdf)?;
        let pages_per_copy = probe.get_pages().len();
        if pages_per_copy == 0 {
            return Err(ClientError::Pdf("document has no pages".to_string()));
        }

        let mut sources = vec![probe];
        for _ in 1..copies.max(1) {
            sources.push(Document::load_mem(pdf)?);
        }
        for source in sources {
            self.absorb(source)?;
        }
        Ok(pages_per_copy)
    }

    fn absorb(&mut self, mut source: Document) -> Result<(), ClientError> {
        source.renumber_objects_with(self.max_id);
        self.max_id = source.max_id + 1;

        let mut pages = Vec::new();
        for page_id in source.get_pages().into_values() {
            let mut page = source.get_object(page_id)?.as_dict()?.clone();
            inherit_attributes(&source, &mut page)?;
            pages.push((page_id, page));
        }

        for (id, object) in source.objects {
            match object.type_name().unwrap_or("") {
                "Catalog" | "Pages" | "Page" | "Outlines" | "Outline" => {}
                _ => {
                    self.objects.insert(id, object);
                }
            }
        }
        self.pages.extend(pages);
        Ok(())
    }

    /// Builds the merged document. Fails when nothing was appended.
    pub fn finish(self, metadata: &PdfMetadata) -> Result<Vec<u8>, ClientError> {
        if self.pages.is_empty() {
            return Err(ClientError::Pdf("nothing to merge".to_string()));
        }

        let mut document = Document::with_version("1.5");
        document.objects = self.objects;
        document.max_id = self.max_id;

        let pages_id = document.new_object_id();
        let mut kids = Vec::with_capacity(self.pages.len());
        for (page_id, mut page) in self.pages {
            page.set("Parent", pages_id);
            document.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }
        let count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = document.add_object(dictionary! {
            "Title" => text_string(&metadata.title),
            "Author" => text_string(&metadata.author),
            "Creator" => text_string(&metadata.creator),
            "Producer" => text_string(&metadata.creator),
        });
        document.trailer.set("Root", catalog_id);
        document.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|err| ClientError::Pdf(err.to_string()))?;
        Ok(bytes)
    }
}

/// PDF text string: ASCII stays a literal, anything else is UTF-16BE with a
/// byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Copies attributes a page inherits from its ancestors onto the page.
fn inherit_attributes(source: &Document, page: &mut Dictionary) -> Result<(), ClientError> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    while let Some(parent_id) = parent {
        let node = source.get_object(parent_id)?.as_dict()?;
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_metadata_stays_literal() {
        let Object::String(bytes, format) = text_string("Case Documents") else {
            panic!("expected a string object");
        };
        assert!(matches!(format, StringFormat::Literal));
        assert_eq!(bytes, b"Case Documents");
    }

    #[test]
    fn accented_metadata_is_utf16_with_bom() {
        let Object::String(bytes, format) = text_string("José") else {
            panic!("expected a string object");
        };
        assert!(matches!(format, StringFormat::Hexadecimal));
        assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, b'J', 0x00, b'o', 0x00, b's', 0x00, 0xE9]);
    }
}

//! KML markup for places, layer folders and the failure section.

use super::error::DocumentError;
use crate::layers::Icon;
use crate::place::{Failure, Place};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Name of the folder listing rows that could not be converted.
pub const FAILED_FOLDER_NAME: &str = "Failed Conversions";
const FAILED_FOLDER_DESCRIPTION: &str = "Locations that could not be converted";

/// Link text for the source URL segment of a description.
const SOURCE_LINK_TEXT: &str = "View on Google Maps";

/// Streaming writer for one KML document.
///
/// Call [`KmlWriter::begin`] once, then folders and placemarks in order,
/// then [`KmlWriter::finish`].
pub struct KmlWriter {
    writer: Writer<Vec<u8>>,
}

impl KmlWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    /// XML declaration, `<kml>` root and `<Document>`, with an optional name.
    pub fn begin(&mut self, name: Option<&str>) -> Result<(), DocumentError> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("kml");
        root.push_attribute(("xmlns", KML_NAMESPACE));
        self.emit(Event::Start(root))?;
        self.start("Document")?;

        if let Some(name) = name {
            self.text_element("name", name)?;
        }
        Ok(())
    }

    pub fn begin_folder(&mut self, name: &str, description: &str) -> Result<(), DocumentError> {
        self.start("Folder")?;
        self.text_element("name", name)?;
        self.text_element("description", description)
    }

    pub fn end_folder(&mut self) -> Result<(), DocumentError> {
        self.end("Folder")
    }

    /// One point placemark. Icon style is omitted when `icon` is `None`.
    pub fn placemark(&mut self, place: &Place, icon: Option<Icon>) -> Result<(), DocumentError> {
        self.start("Placemark")?;
        self.text_element("name", &place.name)?;

        if let Some(icon) = icon {
            self.start("Style")?;
            self.start("IconStyle")?;
            self.start("Icon")?;
            self.text_element("href", icon.href())?;
            self.end("Icon")?;
            self.end("IconStyle")?;
            self.end("Style")?;
        }

        self.start("Point")?;
        self.text_element("coordinates", &place.point().kml_coordinates())?;
        self.end("Point")?;

        self.text_element("description", &describe(place))?;
        self.end("Placemark")
    }

    /// The failure section: one placemark without geometry per failed row.
    pub fn failures(&mut self, failures: &[Failure]) -> Result<(), DocumentError> {
        self.begin_folder(FAILED_FOLDER_NAME, FAILED_FOLDER_DESCRIPTION)?;
        for failure in failures {
            self.start("Placemark")?;
            self.text_element("name", &failure.subject_name)?;
            self.text_element(
                "description",
                &format!(
                    "URL: {}\nError: {}",
                    failure.source_url.as_deref().unwrap_or_default(),
                    failure.reason
                ),
            )?;
            self.end("Placemark")?;
        }
        self.end_folder()
    }

    /// Close the document and return the markup.
    pub fn finish(mut self) -> Result<String, DocumentError> {
        self.end("Document")?;
        self.end("kml")?;
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        Ok(String::from_utf8(bytes)?)
    }

    fn start(&mut self, tag: &str) -> Result<(), DocumentError> {
        self.emit(Event::Start(BytesStart::new(tag)))
    }

    fn end(&mut self, tag: &str) -> Result<(), DocumentError> {
        self.emit(Event::End(BytesEnd::new(tag)))
    }

    fn text_element(&mut self, tag: &str, text: &str) -> Result<(), DocumentError> {
        self.start(tag)?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(tag)
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), DocumentError> {
        self.writer
            .write_event(event)
            .map_err(|e| DocumentError::Xml(e.to_string()))
    }
}

impl Default for KmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// HTML description: source link, notes, address and phone, `<br/>`-joined.
/// Absent or blank parts are skipped.
pub fn describe(place: &Place) -> String {
    // Balloon HTML: every interpolated value is escaped before it is embedded.
    let present = |v: &Option<String>| {
        v.as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| escape(s).into_owned())
    };

    let mut parts = Vec::new();
    if let Some(url) = present(&place.source_url) {
        parts.push(format!("<a href=\"{url}\">{SOURCE_LINK_TEXT}</a>"));
    }
    if let Some(note) = present(&place.note) {
        parts.push(format!("<b>Notes:</b> {note}"));
    }
    if let Some(address) = present(&place.address) {
        parts.push(format!("<b>Address:</b> {address}"));
    }
    if let Some(phone) = place.phone() {
        parts.push(format!("<b>Phone:</b> {}", escape(phone)));
    }
    parts.join("<br/>")
}

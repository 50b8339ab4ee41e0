//! In-process EXIF decoding with kamadak-exif

use crate::error::ParseError;
use exif::{Context, Exif, Field, In, Reader, Tag, Value};
use exifprobe_domain::traits::MetadataParser;
use exifprobe_domain::{dedup_last_wins, LabelDictionary, MetadataRecord, MetadataValue};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Tags that are structure rather than metadata
const STRUCTURAL_TAGS: &[Tag] = &[
    Tag::ExifIFDPointer,
    Tag::GPSInfoIFDPointer,
    Tag::InteropIFDPointer,
    Tag::JPEGInterchangeFormat,
    Tag::JPEGInterchangeFormatLength,
    Tag::StripOffsets,
    Tag::StripByteCounts,
    Tag::MakerNote,
];

/// Parser tag names that differ from the canonical keys used by exiftool
const ALIASES: &[(&str, &str)] = &[
    ("PhotographicSensitivity", "ISO"),
    ("FocalLengthIn35mmFilm", "FocalLengthIn35mmFormat"),
    ("ImageLength", "ImageHeight"),
];

/// Fast-path metadata parser
///
/// Handles JPEG, TIFF, HEIF, PNG and WebP containers. Emits one record per
/// primary-image field, then the GPS position flattened into decimal degrees.
#[derive(Debug, Clone)]
pub struct ExifParser {
    labels: Arc<LabelDictionary>,
    blob_limit: usize,
}

impl ExifParser {
    /// Create a parser using the given labels
    pub fn new(labels: Arc<LabelDictionary>, blob_limit: usize) -> Self {
        Self { labels, blob_limit }
    }

    fn field_record(&self, field: &Field) -> Option<MetadataRecord> {
        if field.ifd_num != In::PRIMARY
            || field.tag.context() == Context::Gps
            || STRUCTURAL_TAGS.contains(&field.tag)
            || field.tag.description().is_none()
        {
            return None;
        }

        let value = match &field.value {
            Value::Ascii(strings) => {
                let text = strings
                    .iter()
                    .map(|s| String::from_utf8_lossy(s).into_owned())
                    .collect::<Vec<_>>()
                    .join(" ");
                MetadataValue::Text(text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string())
            }
            Value::Undefined(bytes, _) | Value::Byte(bytes) if bytes.len() > self.blob_limit => {
                debug!("Skipping {} ({} byte blob)", field.tag, bytes.len());
                return None;
            }
            Value::Unknown(..) => return None,
            other => single_number(other)
                .unwrap_or_else(|| MetadataValue::Text(field.display_value().to_string())),
        };

        Some(self.labels.record(canonical_name(field.tag), value))
    }

    fn gps_records(&self, exif: &Exif) -> Vec<MetadataRecord> {
        let mut records = Vec::new();

        let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S');
        let longitude = coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W');
        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            records.push(self.labels.record("GPSLatitude", lat.to_string()));
            records.push(self.labels.record("GPSLongitude", lon.to_string()));
        }

        if let Some(altitude) = altitude(exif) {
            records.push(self.labels.record("GPSAltitude", altitude.to_string()));
        }

        records
    }
}

impl Default for ExifParser {
    fn default() -> Self {
        Self::new(LabelDictionary::standard(), 64)
    }
}

impl MetadataParser for ExifParser {
    type Error = ParseError;

    fn parse(&self, bytes: &[u8]) -> Result<Vec<MetadataRecord>, ParseError> {
        let exif = Reader::new().read_from_container(&mut Cursor::new(bytes))?;

        let mut records: Vec<MetadataRecord> = exif
            .fields()
            .filter_map(|field| self.field_record(field))
            .collect();
        records.extend(self.gps_records(&exif));

        debug!("exif-parser decoded {} records", records.len());
        Ok(dedup_last_wins(records))
    }
}

fn canonical_name(tag: Tag) -> String {
    let name = tag.to_string();
    ALIASES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| to.to_string())
        .unwrap_or(name)
}

fn single_number(value: &Value) -> Option<MetadataValue> {
    let number = match value {
        Value::Byte(v) if v.len() == 1 => MetadataValue::Integer(v[0].into()),
        Value::Short(v) if v.len() == 1 => MetadataValue::Integer(v[0].into()),
        Value::Long(v) if v.len() == 1 => MetadataValue::Integer(v[0].into()),
        Value::SByte(v) if v.len() == 1 => MetadataValue::Integer(v[0].into()),
        Value::SShort(v) if v.len() == 1 => MetadataValue::Integer(v[0].into()),
        Value::SLong(v) if v.len() == 1 => MetadataValue::Integer(v[0].into()),
        Value::Rational(v) if v.len() == 1 => finite(v[0].to_f64())?,
        Value::SRational(v) if v.len() == 1 => finite(v[0].to_f64())?,
        Value::Float(v) if v.len() == 1 => finite(v[0].into())?,
        Value::Double(v) if v.len() == 1 => finite(v[0])?,
        _ => return None,
    };
    Some(number)
}

fn finite(value: f64) -> Option<MetadataValue> {
    value.is_finite().then_some(MetadataValue::Float(value))
}

/// Degrees/minutes/seconds to signed decimal degrees
fn coordinate(exif: &Exif, tag: Tag, ref_tag: Tag, negative: u8) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let degrees = match &field.value {
        Value::Rational(v) if v.len() >= 3 => {
            v[0].to_f64() + v[1].to_f64() / 60.0 + v[2].to_f64() / 3600.0
        }
        _ => return None,
    };
    if !degrees.is_finite() {
        return None;
    }

    let is_negative = match exif.get_field(ref_tag, In::PRIMARY).map(|f| &f.value) {
        Some(Value::Ascii(strings)) => strings
            .first()
            .and_then(|s| s.first())
            .is_some_and(|c| c.eq_ignore_ascii_case(&negative)),
        _ => false,
    };

    Some(if is_negative { -degrees } else { degrees })
}

/// Altitude in meters, negative below sea level
fn altitude(exif: &Exif) -> Option<f64> {
    let field = exif.get_field(Tag::GPSAltitude, In::PRIMARY)?;
    let meters = match &field.value {
        Value::Rational(v) if !v.is_empty() => v[0].to_f64(),
        _ => return None,
    };
    if !meters.is_finite() {
        return None;
    }

    let below_sea_level = exif
        .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        == Some(1);

    Some(if below_sea_level { -meters } else { meters })
}

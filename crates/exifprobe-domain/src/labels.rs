//! Label dictionary - human-readable descriptions for canonical field keys
//!
//! A single immutable table shared by every adapter. Lookups never fail: a
//! key that is not in the table has an empty description.

use crate::record::{MetadataRecord, MetadataValue};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Built-in labels, keyed by canonical field name
const STANDARD_LABELS: &[(&str, &str)] = &[
    ("Make", "相机制造商"),
    ("Model", "相机型号"),
    ("LensModel", "镜头型号"),
    ("DateTime", "拍摄日期和时间"),
    ("ExposureTime", "曝光时间"),
    ("FNumber", "光圈值"),
    ("ISO", "ISO感光度"),
    ("FocalLength", "焦距"),
    ("ImageWidth", "图像宽度"),
    ("ImageHeight", "图像高度"),
    ("Orientation", "图像方向"),
    ("GPSLatitude", "GPS纬度"),
    ("GPSLongitude", "GPS经度"),
    ("Flash", "闪光灯状态"),
    ("MeteringMode", "测光模式"),
    ("ExposureProgram", "曝光程序"),
    ("WhiteBalance", "白平衡"),
    ("ExposureCompensation", "曝光补偿"),
    ("SubjectDistance", "拍摄距离"),
    ("DigitalZoomRatio", "数字变焦比"),
    ("FocalLengthIn35mmFormat", "35mm等效焦距"),
    ("SceneCaptureType", "场景捕获类型"),
    ("Contrast", "对比度"),
    ("Saturation", "饱和度"),
    ("Sharpness", "锐度"),
    ("DateTimeOriginal", "原始拍摄时间"),
    ("DateTimeDigitized", "数字化时间"),
    ("SubSecTime", "子秒时间"),
    ("SubSecTimeOriginal", "原始子秒时间"),
    ("SubSecTimeDigitized", "数字化子秒时间"),
    ("GPSAltitude", "GPS海拔高度"),
    ("GPSAltitudeRef", "GPS海拔高度参考"),
    ("GPSTimeStamp", "GPS时间戳"),
    ("GPSDateStamp", "GPS日期戳"),
    ("GPSProcessingMethod", "GPS处理方法"),
    ("GPSAreaInformation", "GPS区域信息"),
    ("GPSDifferential", "GPS差分"),
    // Filesystem fallback fields
    ("FileName", "文件名"),
    ("FileSize", "文件大小"),
    ("LastModified", "最后修改时间"),
    ("FilePath", "文件路径"),
];

/// Properties exported when the caller does not pick any
pub const COMMON_PROPERTIES: &[&str] = &[
    "Make",
    "Model",
    "LensModel",
    "DateTimeOriginal",
    "ExposureTime",
    "FNumber",
    "ISO",
    "FocalLength",
    "ImageWidth",
    "ImageHeight",
];

static STANDARD: LazyLock<Arc<LabelDictionary>> =
    LazyLock::new(|| Arc::new(LabelDictionary::from_pairs(STANDARD_LABELS.iter().copied())));

/// Lookup table from canonical field key to description
#[derive(Debug, Clone, Default)]
pub struct LabelDictionary {
    labels: HashMap<String, String>,
}

impl LabelDictionary {
    /// The built-in dictionary, shared across the process
    pub fn standard() -> Arc<LabelDictionary> {
        Arc::clone(&STANDARD)
    }

    /// Build a dictionary from `(key, description)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            labels: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Description for `key`, or `""` if unknown
    pub fn describe(&self, key: &str) -> &str {
        self.labels.get(key).map(String::as_str).unwrap_or("")
    }

    /// Whether `key` has a description
    pub fn contains(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    /// Build a record whose description is looked up from this dictionary
    pub fn record(&self, name: impl Into<String>, value: impl Into<MetadataValue>) -> MetadataRecord {
        let name = name.into();
        let description = self.describe(&name).to_string();
        MetadataRecord {
            name,
            value: value.into(),
            description,
        }
    }

    /// Number of labelled keys
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

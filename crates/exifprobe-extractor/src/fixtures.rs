//! Hand-built image fixtures for tests

/// One IFD entry in big-endian TIFF encoding
pub(crate) struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    bytes: Vec<u8>,
}

impl Entry {
    pub(crate) fn ascii(tag: u16, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        Self { tag, kind: 2, count: bytes.len() as u32, bytes }
    }

    pub(crate) fn short(tag: u16, value: u16) -> Self {
        Self { tag, kind: 3, count: 1, bytes: value.to_be_bytes().to_vec() }
    }

    pub(crate) fn long(tag: u16, value: u32) -> Self {
        Self { tag, kind: 4, count: 1, bytes: value.to_be_bytes().to_vec() }
    }

    pub(crate) fn byte(tag: u16, value: u8) -> Self {
        Self { tag, kind: 1, count: 1, bytes: vec![value] }
    }

    pub(crate) fn rational(tag: u16, values: &[(u32, u32)]) -> Self {
        let bytes = values
            .iter()
            .flat_map(|(num, denom)| num.to_be_bytes().into_iter().chain(denom.to_be_bytes()))
            .collect();
        Self { tag, kind: 5, count: values.len() as u32, bytes }
    }

    pub(crate) fn undefined(tag: u16, bytes: Vec<u8>) -> Self {
        Self { tag, kind: 7, count: bytes.len() as u32, bytes }
    }
}

/// Builds a TIFF structure with IFD0 and optional Exif/GPS sub-IFDs
#[derive(Default)]
pub(crate) struct TiffBuilder {
    ifd0: Vec<Entry>,
    exif: Vec<Entry>,
    gps: Vec<Entry>,
}

impl TiffBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ifd0(mut self, entry: Entry) -> Self {
        self.ifd0.push(entry);
        self
    }

    pub(crate) fn exif(mut self, entry: Entry) -> Self {
        self.exif.push(entry);
        self
    }

    pub(crate) fn gps(mut self, entry: Entry) -> Self {
        self.gps.push(entry);
        self
    }

    pub(crate) fn tiff(mut self) -> Vec<u8> {
        let mut subs = Vec::new();
        if !self.exif.is_empty() {
            subs.push((0x8769u16, std::mem::take(&mut self.exif)));
        }
        if !self.gps.is_empty() {
            subs.push((0x8825u16, std::mem::take(&mut self.gps)));
        }

        let mut ifd0 = self.ifd0;
        for (pointer, _) in &subs {
            ifd0.push(Entry::long(*pointer, 0));
        }
        ifd0.sort_by_key(|e| e.tag);
        let ifd0_len = encode_ifd(&ifd0, 8).len() as u32;

        let mut offset = 8 + ifd0_len;
        let mut tail = Vec::new();
        for (pointer, mut entries) in subs {
            entries.sort_by_key(|e| e.tag);
            if let Some(entry) = ifd0.iter_mut().find(|e| e.tag == pointer) {
                entry.bytes = offset.to_be_bytes().to_vec();
            }
            let encoded = encode_ifd(&entries, offset);
            offset += encoded.len() as u32;
            tail.extend(encoded);
        }

        let mut out = b"MM\x00\x2a".to_vec();
        out.extend(8u32.to_be_bytes());
        out.extend(encode_ifd(&ifd0, 8));
        out.extend(tail);
        out
    }

    /// Wrap the TIFF structure in a minimal JPEG (SOI, APP1 Exif, EOI)
    pub(crate) fn jpeg(self) -> Vec<u8> {
        let tiff = self.tiff();
        let mut out = vec![0xff, 0xd8, 0xff, 0xe1];
        out.extend(((tiff.len() + 8) as u16).to_be_bytes());
        out.extend(b"Exif\x00\x00");
        out.extend(tiff);
        out.extend([0xff, 0xd9]);
        out
    }
}

fn encode_ifd(entries: &[Entry], start: u32) -> Vec<u8> {
    let data_start = start + 2 + 12 * entries.len() as u32 + 4;
    let mut ifd = (entries.len() as u16).to_be_bytes().to_vec();
    let mut data = Vec::new();

    for entry in entries {
        ifd.extend(entry.tag.to_be_bytes());
        ifd.extend(entry.kind.to_be_bytes());
        ifd.extend(entry.count.to_be_bytes());
        if entry.bytes.len() <= 4 {
            let mut inline = entry.bytes.clone();
            inline.resize(4, 0);
            ifd.extend(inline);
        } else {
            ifd.extend((data_start + data.len() as u32).to_be_bytes());
            data.extend(&entry.bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    }

    ifd.extend(0u32.to_be_bytes());
    ifd.extend(data);
    ifd
}

/// JPEG with Make and Model only
pub(crate) fn camera_jpeg(make: &str, model: &str) -> Vec<u8> {
    TiffBuilder::new()
        .ifd0(Entry::ascii(0x010f, make))
        .ifd0(Entry::ascii(0x0110, model))
        .jpeg()
}

/// A JPEG with no APP1 segment at all
pub(crate) fn bare_jpeg() -> Vec<u8> {
    vec![0xff, 0xd8, 0xff, 0xd9]
}

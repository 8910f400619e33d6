//! In-memory Tiny artifacts

use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;

/// Tiny v2 mappings: two classes, one method, two fields
pub const TINY_V2: &str = "tiny\t2\t0\tofficial\tintermediary\tnamed\n\
c\tdfj\tnet/minecraft/class_2248\tnet/minecraft/block/Block\n\
\tm\t()Z\ta\tmethod_9543\thasRandomTicks\n\
\tf\tLdfj;\tb\tfield_10000\tvalue\n\
c\tcpg\tnet/minecraft/class_1792\tnet/minecraft/item/Item\n\
\tf\tI\tvalue\tfield_8013\tvalue\n";

/// Tiny v1 mappings with the same shape as [`TINY_V2`]
pub const TINY_V1: &str = "v1\tofficial\tintermediary\tnamed\n\
CLASS\tdfj\tnet/minecraft/class_2248\tnet/minecraft/block/Block\n\
METHOD\tdfj\t()Z\ta\tmethod_9543\thasRandomTicks\n\
FIELD\tdfj\tLdfj;\tb\tfield_10000\tvalue\n\
CLASS\tcpg\tnet/minecraft/class_1792\tnet/minecraft/item/Item\n\
FIELD\tcpg\tI\tvalue\tfield_8013\tvalue\n";

pub fn merged_v2_jar(text: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("mappings/mappings.tiny", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(text.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn tiny_v1_gz(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

//! Integration test: local HTTP server serving book zips, full acquire + index
//! + sample access through libcurl.

mod common;

use charshapes_core::{
    ArchiveDescriptor, Catalog, CharShapes, CharShapesOptions, CurlSource, Dataset, DatasetError,
    IndexOptions,
};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use md5::{Digest, Md5};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::time::Duration;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(w, h))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A book zip with one PNG per label.
fn book_zip(id: &str, labels: &[&str]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut zw = zip::ZipWriter::new(&mut buf);
        let opts = SimpleFileOptions::default();
        for (i, label) in labels.iter().enumerate() {
            zw.start_file(format!("{id}/characters/{label}/{id}_{i}.png"), opts)
                .unwrap();
            zw.write_all(&png_bytes(i as u32 + 1, 2)).unwrap();
        }
        zw.finish().unwrap();
    }
    buf.into_inner()
}

/// Serves two books and returns the server plus a catalog pointing at it.
fn serve_books() -> (common::book_server::BookServer, Catalog) {
    let books = [
        ("200003076", vec!["U+4E00", "U+4E01"]),
        ("brsk00000", vec!["U+4E00", "U+3042"]),
    ];
    let mut routes = HashMap::new();
    let mut bodies = Vec::new();
    for (id, labels) in &books {
        let body = book_zip(id, labels);
        routes.insert(format!("/book/{id}/{id}.zip"), body.clone());
        bodies.push((id.to_string(), body));
    }
    let server = common::book_server::start(routes);
    let catalog = Catalog::new(
        bodies
            .iter()
            .map(|(id, body)| {
                ArchiveDescriptor::new(&server.base_url, id, &hex::encode(Md5::digest(body)))
            })
            .collect(),
    );
    (server, catalog)
}

fn options(catalog: &Catalog) -> CharShapesOptions {
    CharShapesOptions::default()
        .with_download(true)
        .with_catalog(catalog.clone())
        .with_source(CurlSource::new(Duration::from_secs(5), Duration::from_secs(30)))
        .with_index_options(IndexOptions {
            sort: true,
            ..Default::default()
        })
}

#[test]
fn download_index_and_read_samples() {
    let (server, catalog) = serve_books();
    let root = tempdir().unwrap();

    let ds = CharShapes::open(root.path(), options(&catalog)).expect("open");
    assert_eq!(server.requests(), 2);
    assert_eq!(ds.len(), 4);
    let classes: Vec<_> = ds.classes().iter().map(String::as_str).collect();
    assert_eq!(classes, ["U+3042", "U+4E00", "U+4E01"]);

    let raw = root.path().join("raw");
    assert!(!raw.join("200003076.zip").exists());
    assert!(!raw.join("brsk00000.zip").exists());
    assert!(raw.join("200003076/200003076/characters/U+4E01").is_dir());

    for i in 0..ds.len() {
        let sample = ds.get(i).expect("sample decodes");
        assert_eq!(sample.code_point, ds.records()[i].code_point);
        assert_eq!(sample.image.dimensions().1, 2);
    }
    assert!(matches!(ds.get(4), Err(DatasetError::OutOfRange { .. })));
}

#[test]
fn second_open_does_not_hit_the_network() {
    let (server, catalog) = serve_books();
    let root = tempdir().unwrap();

    let first = CharShapes::open(root.path(), options(&catalog)).expect("first open");
    assert_eq!(server.requests(), 2);

    let second = CharShapes::open(root.path(), options(&catalog)).expect("second open");
    assert_eq!(server.requests(), 2, "second acquisition must not fetch");
    assert_eq!(second.len(), first.len());
    assert_eq!(second.classes(), first.classes());
}

#[test]
fn stale_archive_is_replaced() {
    let (server, catalog) = serve_books();
    let root = tempdir().unwrap();
    let raw = root.path().join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("200003076.zip"), b"half a download").unwrap();

    let ds = CharShapes::open(root.path(), options(&catalog)).expect("open");
    assert_eq!(server.requests(), 2);
    assert_eq!(ds.len(), 4);
    assert!(!raw.join("200003076.zip").exists());
}

#[test]
fn missing_book_is_http_error() {
    let (_server, catalog) = serve_books();
    let root = tempdir().unwrap();
    let base = catalog.iter().next().unwrap().source_url.clone();
    let base = base.split("/book/").next().unwrap().to_string();
    let catalog = Catalog::new(vec![ArchiveDescriptor::new(&base, "nosuchbook", "0")]);

    let err = CharShapes::open(root.path(), options(&catalog)).err().expect("must fail");
    assert!(matches!(err, DatasetError::HttpStatus { status: 404, .. }));
    assert!(!root.path().join("raw/nosuchbook.zip").exists());
}

//! PDF raster image extraction.
//!
//! Walks a document page by page, lifting image XObjects out of each page's
//! resource dictionary in declaration order. Form XObjects are descended
//! into, so images referenced indirectly still surface. Each image that
//! survives the size filter and decodes cleanly receives a sequential
//! `fig.N` tag.

use std::collections::HashSet;
use std::io::{Cursor, Read};

use flate2::read::ZlibDecoder;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

use crate::error::{ImageError, ImageResult, Result};
use crate::types::ExtractedImage;

/// Images with either dimension below this are decorative noise and are
/// dropped before tagging.
pub const MIN_DIMENSION: u32 = 60;

/// Hard ceiling per invocation. Traversal stops outright once reached,
/// even partway through a page.
pub const MAX_IMAGES: usize = 50;

/// Extract tagged raster images from a PDF document.
///
/// Traversal is page-major, image-minor: pages in document order, images in
/// the order the page's resource dictionary declares them. Tags are assigned
/// only after an image both passes the size filter and decodes, so the
/// resulting sequence `fig.1..fig.k` never has gaps. An image that fails to
/// decode is logged and skipped without consuming a tag.
///
/// An unreadable document is the only fatal error; a readable document with
/// zero qualifying images yields an empty vector.
pub fn extract_images(buffer: &[u8]) -> Result<Vec<ExtractedImage>> {
    let doc = Document::load_mem(buffer)?;
    let mut images: Vec<ExtractedImage> = Vec::new();

    'pages: for (page_number, page_id) in doc.get_pages() {
        for (object_id, stream) in page_image_streams(&doc, page_id) {
            let (width, height) = match image_dimensions(&doc, &stream.dict) {
                Ok(dimensions) => dimensions,
                Err(e) => {
                    warn!(
                        page = page_number,
                        object = object_id.0,
                        error = %e,
                        "skipping image with unreadable dictionary"
                    );
                    continue;
                }
            };

            if width < MIN_DIMENSION as i64 || height < MIN_DIMENSION as i64 {
                debug!(
                    page = page_number,
                    width, height, "skipping sub-threshold image"
                );
                continue;
            }

            let (content, extension) = match decode_image(&doc, stream) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!(
                        page = page_number,
                        object = object_id.0,
                        error = %e,
                        "skipping undecodable image"
                    );
                    continue;
                }
            };

            let tag = format!("fig.{}", images.len() + 1);
            images.push(ExtractedImage {
                tag,
                bytes: content,
                extension,
                width: width as u32,
                height: height as u32,
            });

            if images.len() == MAX_IMAGES {
                debug!(page = page_number, "image cap reached, stopping traversal");
                break 'pages;
            }
        }
    }

    Ok(images)
}

/// Follow a reference to its target, or hand back the object unchanged.
fn resolved<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Image streams reachable from one page, in declaration order.
///
/// The same object referenced twice on a page is reported once. The visited
/// set also breaks cycles between mutually referencing form XObjects.
fn page_image_streams<'a>(doc: &'a Document, page_id: ObjectId) -> Vec<(ObjectId, &'a Stream)> {
    let mut found = Vec::new();
    let mut visited = HashSet::new();
    if let Some(resources) = page_resources(doc, page_id) {
        collect_images(doc, resources, &mut visited, &mut found);
    }
    found
}

fn collect_images<'a>(
    doc: &'a Document,
    resources: &'a Dictionary,
    visited: &mut HashSet<ObjectId>,
    found: &mut Vec<(ObjectId, &'a Stream)>,
) {
    let xobjects = match resources.get(b"XObject").map(|object| resolved(doc, object)) {
        Ok(Object::Dictionary(xobjects)) => xobjects,
        _ => return,
    };

    for (_name, value) in xobjects.iter() {
        // XObject streams are always indirect objects
        let Object::Reference(id) = value else {
            continue;
        };
        if !visited.insert(*id) {
            continue;
        }
        let Ok(Object::Stream(stream)) = doc.get_object(*id) else {
            continue;
        };

        match stream.dict.get(b"Subtype").map(|object| resolved(doc, object)) {
            Ok(Object::Name(subtype)) if subtype == b"Image" => found.push((*id, stream)),
            Ok(Object::Name(subtype)) if subtype == b"Form" => {
                if let Ok(Object::Dictionary(inner)) = stream
                    .dict
                    .get(b"Resources")
                    .map(|object| resolved(doc, object))
                {
                    collect_images(doc, inner, visited, found);
                }
            }
            _ => {}
        }
    }
}

/// Resources for a page, walking up the page tree when inherited.
fn page_resources<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a Dictionary> {
    let mut current = doc.get_object(page_id).ok()?.as_dict().ok()?;
    for _ in 0..64 {
        if let Ok(Object::Dictionary(resources)) =
            current.get(b"Resources").map(|object| resolved(doc, object))
        {
            return Some(resources);
        }
        match current.get(b"Parent").map(|object| resolved(doc, object)) {
            Ok(Object::Dictionary(parent)) => current = parent,
            _ => return None,
        }
    }
    None
}

fn image_dimensions(doc: &Document, dict: &Dictionary) -> ImageResult<(i64, i64)> {
    let width = resolved(doc, dict.get(b"Width")?).as_i64()?;
    let height = resolved(doc, dict.get(b"Height")?).as_i64()?;
    if width <= 0 || height <= 0 {
        return Err(ImageError::InvalidDimensions { width, height });
    }
    Ok((width, height))
}

/// Decode an image stream into encoded bytes plus a file extension.
///
/// JPEG and JPEG 2000 payloads pass through untouched. Flate-compressed and
/// unfiltered raw pixels are re-encoded as PNG. Everything else is reported
/// as unsupported so the caller can skip the image.
fn decode_image(doc: &Document, stream: &Stream) -> ImageResult<(Vec<u8>, String)> {
    match primary_filter(doc, &stream.dict) {
        Some(b"DCTDecode") => Ok((stream.content.clone(), "jpeg".to_string())),
        Some(b"JPXDecode") => Ok((stream.content.clone(), "jpx".to_string())),
        Some(b"FlateDecode") => {
            if has_predictor(doc, &stream.dict) {
                return Err(ImageError::UnsupportedFilter(
                    "FlateDecode with predictor".to_string(),
                ));
            }
            let raw = inflate(&stream.content)?;
            reencode_png(doc, &stream.dict, raw)
        }
        None => reencode_png(doc, &stream.dict, stream.content.clone()),
        Some(other) => Err(ImageError::UnsupportedFilter(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

/// First entry of the Filter chain, if any.
fn primary_filter<'a>(doc: &'a Document, dict: &'a Dictionary) -> Option<&'a [u8]> {
    let object = match dict.get(b"Filter") {
        Ok(object) => resolved(doc, object),
        Err(_) => return None,
    };
    match object {
        Object::Name(name) => Some(name),
        Object::Array(filters) => match filters.first().map(|filter| resolved(doc, filter)) {
            Some(Object::Name(name)) => Some(name),
            _ => None,
        },
        _ => None,
    }
}

fn has_predictor(doc: &Document, dict: &Dictionary) -> bool {
    let parms = dict
        .get(b"DecodeParms")
        .or_else(|_| dict.get(b"DP"))
        .map(|object| resolved(doc, object));
    match parms {
        Ok(Object::Dictionary(parms)) => matches!(
            parms.get(b"Predictor").map(|object| resolved(doc, object)),
            Ok(Object::Integer(predictor)) if *predictor > 1
        ),
        _ => false,
    }
}

fn inflate(content: &[u8]) -> ImageResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(content);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    Ok(raw)
}

#[derive(Debug, Clone, Copy)]
enum PixelLayout {
    Gray,
    Rgb,
    Cmyk,
}

impl PixelLayout {
    fn components(self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::Rgb => 3,
            PixelLayout::Cmyk => 4,
        }
    }
}

/// Rebuild raw pixels into a PNG.
fn reencode_png(doc: &Document, dict: &Dictionary, mut raw: Vec<u8>) -> ImageResult<(Vec<u8>, String)> {
    let (width, height) = image_dimensions(doc, dict)?;
    let (width, height) = (width as u32, height as u32);

    let bits = match dict.get(b"BitsPerComponent") {
        Ok(object) => resolved(doc, object).as_i64()?,
        Err(_) => 8,
    };
    if bits != 8 {
        return Err(ImageError::UnsupportedDepth(bits));
    }

    let layout = color_layout(doc, dict)?;
    let expected = width as usize * height as usize * layout.components();
    // Writers pad streams with trailing whitespace; anything shorter than a
    // full pixel grid is a real defect.
    if raw.len() > expected {
        raw.truncate(expected);
    }
    let got = raw.len();

    let dynamic = match layout {
        PixelLayout::Gray => GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8),
        PixelLayout::Rgb => RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
        PixelLayout::Cmyk => {
            let mut rgb = Vec::with_capacity(expected / 4 * 3);
            for px in raw.chunks_exact(4) {
                let k = 255 - px[3] as u16;
                rgb.push(((255 - px[0] as u16) * k / 255) as u8);
                rgb.push(((255 - px[1] as u16) * k / 255) as u8);
                rgb.push(((255 - px[2] as u16) * k / 255) as u8);
            }
            RgbImage::from_raw(width, height, rgb).map(DynamicImage::ImageRgb8)
        }
    }
    .ok_or(ImageError::PixelBufferMismatch { got, expected })?;

    let mut png = Vec::new();
    dynamic.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok((png, "png".to_string()))
}

fn color_layout(doc: &Document, dict: &Dictionary) -> ImageResult<PixelLayout> {
    let object = match dict.get(b"ColorSpace") {
        Ok(object) => resolved(doc, object),
        Err(_) => return Err(ImageError::UnsupportedColorSpace("absent".to_string())),
    };
    match object {
        Object::Name(name) => layout_for_name(name),
        Object::Array(entries) => {
            let mut entries = entries.iter().map(|entry| resolved(doc, entry));
            match entries.next() {
                Some(Object::Name(name)) if name == b"ICCBased" => {
                    let components = entries
                        .next()
                        .and_then(|profile| match profile {
                            Object::Stream(profile) => profile.dict.get(b"N").ok(),
                            _ => None,
                        })
                        .and_then(|n| resolved(doc, n).as_i64().ok());
                    match components {
                        Some(1) => Ok(PixelLayout::Gray),
                        Some(3) => Ok(PixelLayout::Rgb),
                        Some(4) => Ok(PixelLayout::Cmyk),
                        _ => Err(ImageError::UnsupportedColorSpace("ICCBased".to_string())),
                    }
                }
                Some(Object::Name(name)) => layout_for_name(name),
                _ => Err(ImageError::UnsupportedColorSpace(
                    "malformed array".to_string(),
                )),
            }
        }
        _ => Err(ImageError::UnsupportedColorSpace("malformed entry".to_string())),
    }
}

fn layout_for_name(name: &[u8]) -> ImageResult<PixelLayout> {
    match name {
        b"DeviceRGB" | b"CalRGB" => Ok(PixelLayout::Rgb),
        b"DeviceGray" | b"CalGray" => Ok(PixelLayout::Gray),
        b"DeviceCMYK" => Ok(PixelLayout::Cmyk),
        other => Err(ImageError::UnsupportedColorSpace(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::pdf::{document, single_page, with_form, TestImage};

    #[test]
    fn test_tags_follow_document_order() {
        let buffer = single_page(&[
            TestImage::Jpeg {
                width: 100,
                height: 100,
            },
            TestImage::Jpeg {
                width: 200,
                height: 80,
            },
            TestImage::Jpeg {
                width: 60,
                height: 60,
            },
        ]);

        let images = extract_images(&buffer).unwrap();

        assert_eq!(images.len(), 3);
        assert_eq!(images[0].tag, "fig.1");
        assert_eq!(images[1].tag, "fig.2");
        assert_eq!(images[2].tag, "fig.3");
        assert_eq!(images[0].width, 100);
        assert_eq!(images[1].width, 200);
        assert_eq!(images[2].width, 60);
        assert!(images.iter().all(|image| image.extension == "jpeg"));
    }

    #[test]
    fn test_small_images_filtered_without_tag_gaps() {
        let buffer = single_page(&[
            TestImage::Jpeg {
                width: 100,
                height: 100,
            },
            TestImage::Jpeg {
                width: 59,
                height: 100,
            },
            TestImage::Jpeg {
                width: 100,
                height: 59,
            },
            TestImage::Jpeg {
                width: 72,
                height: 72,
            },
        ]);

        let images = extract_images(&buffer).unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].tag, "fig.1");
        assert_eq!(images[0].width, 100);
        assert_eq!(images[1].tag, "fig.2");
        assert_eq!(images[1].width, 72);
    }

    #[test]
    fn test_cap_stops_traversal_mid_page() {
        let page: Vec<TestImage> = (0..30)
            .map(|_| TestImage::Jpeg {
                width: 100,
                height: 100,
            })
            .collect();
        let buffer = document(&[&page, &page]);

        let images = extract_images(&buffer).unwrap();

        assert_eq!(images.len(), MAX_IMAGES);
        assert_eq!(images[0].tag, "fig.1");
        assert_eq!(images[49].tag, "fig.50");
    }

    #[test]
    fn test_flate_gray_image_reencoded_as_png() {
        let buffer = single_page(&[TestImage::Gray {
            width: 80,
            height: 70,
        }]);

        let images = extract_images(&buffer).unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].extension, "png");
        let decoded = image::load_from_memory(&images[0].bytes).unwrap();
        assert_eq!(decoded.width(), 80);
        assert_eq!(decoded.height(), 70);
    }

    #[test]
    fn test_undecodable_image_consumes_no_tag() {
        let buffer = single_page(&[
            TestImage::Jpeg {
                width: 100,
                height: 100,
            },
            TestImage::Unsupported {
                width: 100,
                height: 100,
            },
            TestImage::Jpeg {
                width: 90,
                height: 90,
            },
        ]);

        let images = extract_images(&buffer).unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].tag, "fig.1");
        assert_eq!(images[0].width, 100);
        assert_eq!(images[1].tag, "fig.2");
        assert_eq!(images[1].width, 90);
    }

    #[test]
    fn test_images_inside_form_xobjects_found() {
        let buffer = with_form(
            &[TestImage::Jpeg {
                width: 100,
                height: 100,
            }],
            &[TestImage::Jpeg {
                width: 120,
                height: 80,
            }],
        );

        let images = extract_images(&buffer).unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].width, 100);
        assert_eq!(images[1].width, 120);
    }

    #[test]
    fn test_document_without_images() {
        let buffer = document(&[&[]]);
        let images = extract_images(&buffer).unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_garbage_input_is_fatal() {
        let result = extract_images(b"not a pdf at all");
        assert!(result.is_err());
    }
}

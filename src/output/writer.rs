//! PDF document writer
//!
//! One page per frame, in batch order. Every frame is embedded as a lossless
//! 8-bit DeviceRGB image XObject stretched over the whole page.

use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::domain::errors::PipelineError;
use crate::domain::model::FrameBatch;

/// Resolution used when none is configured
pub const DEFAULT_RESOLUTION_DPI: u32 = 100;

const POINTS_PER_INCH: f64 = 72.0;
const IMAGE_NAME: &str = "Im0";

/// Writes a `FrameBatch` as a multi-page PDF
#[derive(Debug, Clone)]
pub struct PdfDocumentWriter {
    resolution_dpi: u32,
}

impl Default for PdfDocumentWriter {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION_DPI)
    }
}

impl PdfDocumentWriter {
    pub fn new(resolution_dpi: u32) -> Self {
        Self {
            resolution_dpi: resolution_dpi.max(1),
        }
    }

    pub fn resolution_dpi(&self) -> u32 {
        self.resolution_dpi
    }

    /// Page extent in points for an image extent in pixels
    pub fn page_extent(&self, pixels: u32) -> i64 {
        let points = pixels as f64 * POINTS_PER_INCH / self.resolution_dpi as f64;
        (points.round() as i64).max(1)
    }

    /// Write `frames` to `destination`.
    ///
    /// The document is staged in a temporary file next to `destination` and
    /// renamed into place, so a failure never leaves a partial file behind.
    pub fn write(&self, frames: &FrameBatch, destination: &Path) -> Result<(), PipelineError> {
        if frames.is_empty() {
            return Err(PipelineError::assembly("cannot assemble a document without pages"));
        }

        let mut document = self.build(frames)?;

        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = tempfile::Builder::new()
            .prefix(".framedoc-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| {
                PipelineError::assembly(format!("cannot stage output in {}: {}", dir.display(), e))
            })?;

        {
            let mut out = BufWriter::new(staged.as_file_mut());
            document
                .save_to(&mut out)
                .map_err(|e| PipelineError::assembly(format!("failed to serialize document: {}", e)))?;
            out.flush()
                .map_err(|e| PipelineError::assembly(format!("failed to flush document: {}", e)))?;
        }

        staged.persist(destination).map_err(|e| {
            PipelineError::assembly(format!(
                "failed to move document to {}: {}",
                destination.display(),
                e.error
            ))
        })?;

        debug!(path = %destination.display(), pages = frames.len(), "PDF persisted");
        Ok(())
    }

    /// Build the in-memory document
    fn build(&self, frames: &FrameBatch) -> Result<Document, PipelineError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(frames.len());
        for frame in frames.iter() {
            let page_id = self.add_page(&mut doc, pages_id, frame)?;
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }

    fn add_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        frame: &RgbImage,
    ) -> Result<ObjectId, PipelineError> {
        let (width_px, height_px) = frame.dimensions();
        let width = self.page_extent(width_px);
        let height = self.page_extent(height_px);

        let mut image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width_px as i64,
                "Height" => height_px as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            frame.as_raw().clone(),
        );
        image
            .compress()
            .map_err(|e| PipelineError::assembly(format!("failed to compress page image: {}", e)))?;
        let image_id = doc.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![width.into(), 0.into(), 0.into(), height.into(), 0.into(), 0.into()],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| PipelineError::assembly(format!("failed to encode page content: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => image_id,
                },
            },
        });

        Ok(page_id)
    }
}

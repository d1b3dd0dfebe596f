//! Image-stack export: one grayscale image per non-empty z-slice.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::{ImageBuffer, Luma};

use crate::error::VoxpaintError;
use crate::model::Task;
use crate::volume::Grid;

/// Output encoding for slice images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SliceFormat {
    #[default]
    Tif,
    Png,
}

impl SliceFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SliceFormat::Tif => "tif",
            SliceFormat::Png => "png",
        }
    }

    fn image_format(&self) -> image::ImageFormat {
        match self {
            SliceFormat::Tif => image::ImageFormat::Tiff,
            SliceFormat::Png => image::ImageFormat::Png,
        }
    }
}

impl FromStr for SliceFormat {
    type Err = VoxpaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tif" | "tiff" => Ok(SliceFormat::Tif),
            "png" => Ok(SliceFormat::Png),
            other => Err(VoxpaintError::UnsupportedFormat(format!(
                "'{}' (supported: tif, png)",
                other
            ))),
        }
    }
}

impl fmt::Display for SliceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes a label grid as a stack of 16-bit grayscale slice images.
#[derive(Clone, Debug)]
pub struct SliceExporter {
    directory: PathBuf,
    format: SliceFormat,
}

impl SliceExporter {
    pub fn new(directory: impl Into<PathBuf>, format: SliceFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name for the slice at absolute index `z`.
    pub fn slice_file_name(&self, task: &Task, z: i64) -> String {
        format!(
            "{}_{}_{}_r{}_z{:05}.{}",
            task.collection,
            task.experiment,
            task.channel,
            task.resolution,
            z,
            self.format.extension()
        )
    }

    /// Writes every slice that holds at least one nonzero voxel.
    ///
    /// Returns the written paths in slice order. Slices whose voxels sum to
    /// zero produce no file.
    ///
    /// # Errors
    /// Fails on channel grids, on labels wider than 16 bits, and on I/O or
    /// encoding errors.
    pub fn export(&self, task: &Task, grid: &Grid) -> Result<Vec<PathBuf>, VoxpaintError> {
        if grid.is_channels() {
            return Err(VoxpaintError::InvalidArgument(
                "image stacks are written from label grids, not channel grids".to_string(),
            ));
        }

        let (nx, ny, nz) = grid.dims();
        let width = image_extent(nx, 'x')?;
        let height = image_extent(ny, 'y')?;
        fs::create_dir_all(&self.directory)?;

        let mut written = Vec::new();
        for z in 0..nz {
            if grid.slice_is_empty(z) {
                log::debug!("slice {} is empty, not writing", z);
                continue;
            }

            let abs_z = task.z_min + z as i64;
            let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
            for (x, y, pixel) in img.enumerate_pixels_mut() {
                let label = grid.get(x as usize, y as usize, z);
                let value = u16::try_from(label).map_err(|_| VoxpaintError::LabelOutOfRange {
                    label,
                    z: abs_z,
                    bits: 16,
                })?;
                *pixel = Luma([value]);
            }

            let path = self.directory.join(self.slice_file_name(task, abs_z));
            img.save_with_format(&path, self.format.image_format())
                .map_err(|source| VoxpaintError::ImageWrite {
                    path: path.clone(),
                    source,
                })?;
            written.push(path);
        }

        log::info!(
            "wrote {} of {} slice(s) to {}",
            written.len(),
            nz,
            self.directory.display()
        );
        Ok(written)
    }
}

fn image_extent(len: usize, axis: char) -> Result<u32, VoxpaintError> {
    u32::try_from(len).map_err(|_| {
        VoxpaintError::InvalidArgument(format!("{} extent {} is too large for an image", axis, len))
    })
}

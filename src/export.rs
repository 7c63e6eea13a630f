// export handoff for finished faces.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::dna::Face;
use crate::render::{unpremultiply, CpuRenderer};
use crate::settings::SearchSettings;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create export directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// export collaborator: persists or displays a finished face.
pub trait ExportSink {
    fn export(&mut self, face: &Face) -> Result<PathBuf, ExportError>;
}

/// re-renders finished faces at the output resolution and writes
/// sequentially numbered PNGs into a directory.
pub struct PngExporter {
    renderer: CpuRenderer,
    out_dir: PathBuf,
    canvas_size: u32,
    output_size: u32,
    count: usize,
}

impl PngExporter {
    pub fn new(out_dir: impl Into<PathBuf>, cfg: &SearchSettings) -> Self {
        PngExporter {
            renderer: CpuRenderer::new(cfg.background),
            out_dir: out_dir.into(),
            canvas_size: cfg.canvas_size,
            output_size: cfg.output_size,
            count: 0,
        }
    }

    fn next_path(&mut self) -> PathBuf {
        let path = self.out_dir.join(format!("face_{:04}.png", self.count));
        self.count += 1;
        path
    }
}

impl ExportSink for PngExporter {
    fn export(&mut self, face: &Face) -> Result<PathBuf, ExportError> {
        profiling::scope!("export_png");
        let scale = self.output_size as f32 / self.canvas_size as f32;
        let premul = self.renderer.render_scaled(&face.quads, self.output_size, scale);
        let rgba = unpremultiply(&premul);

        std::fs::create_dir_all(&self.out_dir).map_err(ExportError::CreateDir)?;
        let path = self.next_path();
        image::save_buffer(
            &path,
            &rgba,
            self.output_size,
            self.output_size,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(path)
    }
}

/// keeps finished faces in memory instead of writing them anywhere.
/// useful for tests and embedding hosts.
#[derive(Default)]
pub struct CollectingSink {
    pub finished: Vec<Face>,
}

impl ExportSink for CollectingSink {
    fn export(&mut self, face: &Face) -> Result<PathBuf, ExportError> {
        self.finished.push(face.clone());
        Ok(Path::new("collected").join(format!("{}", self.finished.len() - 1)))
    }
}

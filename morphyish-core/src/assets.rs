use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::config::ExhibitConfig;
use crate::gallery::Exhibit;
use crate::graphic::{AssetError, GraphicRef, SvgGraphic};

/// Loads SVG files from the asset directory, once per file.
pub struct AssetLoader {
    asset_dir: PathBuf,
    cache: HashMap<PathBuf, GraphicRef>,
}

impl AssetLoader {
    pub fn new<P: AsRef<Path>>(asset_dir: P) -> Self {
        Self {
            asset_dir: asset_dir.as_ref().to_path_buf(),
            cache: HashMap::new(),
        }
    }

    pub fn graphic(&mut self, relative: &str) -> Result<GraphicRef, AssetError> {
        let path = self.asset_dir.join(relative);
        if let Some(graphic) = self.cache.get(&path) {
            return Ok(graphic.clone());
        }

        tracing::debug!("Loading graphic: {}", path.display());
        let graphic: GraphicRef = Arc::new(SvgGraphic::load(&path)?);
        self.cache.insert(path, graphic.clone());

        Ok(graphic)
    }

    pub fn exhibits(&mut self, configs: &[ExhibitConfig]) -> Result<Vec<Exhibit>, AssetError> {
        configs
            .iter()
            .map(|config| Ok(Exhibit::new(config.title.clone(), self.graphic(&config.graphic)?)))
            .collect()
    }
}

/// Copy every file under `static_dir` into `output_dir`, keeping relative paths.
/// Returns how many files were copied. A missing directory copies nothing.
pub fn copy_static_files(static_dir: &Path, output_dir: &Path) -> Result<usize, std::io::Error> {
    if !static_dir.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(static_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
    {
        let Ok(relative) = entry.path().strip_prefix(static_dir) else {
            continue;
        };

        let target = output_dir.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(entry.path(), &target)?;
        tracing::debug!("Copied {}", relative.display());
        copied += 1;
    }

    Ok(copied)
}

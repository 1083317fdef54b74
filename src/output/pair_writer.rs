use super::OutputSink;
use crate::degradation::TrainingPair;
use crate::error::Result;
use crate::image_io::save_image;
use std::path::{Path, PathBuf};

/// Writes pairs as PNG files under `<root>/input` and `<root>/label`
pub struct PairWriter {
    input_dir: PathBuf,
    label_dir: PathBuf,
    written: usize,
}

impl PairWriter {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let input_dir = root.join("input");
        let label_dir = root.join("label");

        std::fs::create_dir_all(&input_dir)?;
        std::fs::create_dir_all(&label_dir)?;

        tracing::info!("Writing training pairs to {}", root.display());

        Ok(Self {
            input_dir,
            label_dir,
            written: 0,
        })
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl OutputSink for PairWriter {
    fn write_pair(&mut self, name: &str, pair: &TrainingPair) -> Result<()> {
        let file = format!("{name}.png");
        save_image(self.input_dir.join(&file), &pair.input)?;
        save_image(self.label_dir.join(&file), &pair.label)?;

        self.written += 1;
        tracing::debug!("Wrote pair {}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degradation::Image;

    #[test]
    fn test_writes_both_halves() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = PairWriter::new(dir.path().join("out")).unwrap();

        let pair = TrainingPair {
            input: Image::zeros((4, 6, 3)),
            label: Image::ones((4, 6, 3)),
        };
        writer.write_pair("sample", &pair).unwrap();

        assert_eq!(writer.written(), 1);
        let input = image::open(dir.path().join("out/input/sample.png")).unwrap().to_rgb8();
        let label = image::open(dir.path().join("out/label/sample.png")).unwrap().to_rgb8();
        assert_eq!(input.dimensions(), (6, 4));
        assert_eq!(input.get_pixel(0, 0)[0], 0);
        assert_eq!(label.get_pixel(5, 3)[2], 255);
    }

    #[test]
    fn test_smaller_input_is_written_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = PairWriter::new(dir.path()).unwrap();

        let pair = TrainingPair {
            input: Image::zeros((2, 3, 3)),
            label: Image::zeros((4, 6, 3)),
        };
        writer.write_pair("small", &pair).unwrap();

        let input = image::open(dir.path().join("input/small.png")).unwrap();
        assert_eq!((input.width(), input.height()), (3, 2));
    }
}

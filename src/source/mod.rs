mod directory;

pub use directory::DirectorySource;

use crate::degradation::Image;
use crate::error::Result;

/// Trait for clean image sources
pub trait ImageSource {
    /// Fetch the next image with its name, or `None` once exhausted
    fn next_image(&mut self) -> Result<Option<(String, Image)>>;

    /// Number of images left, if known
    fn len_hint(&self) -> Option<usize> {
        None
    }
}

//! Copies the first input's leading tag to the front of the output.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use super::observer::MergeObserver;
use super::rewrite::AtomicRewriter;
use crate::audio::FrameFormat;
use crate::error::{IoStage, MergeError, Result};

/// Prepends the leading tag of `source` to `output`, if `source` has one.
///
/// Returns the tag length when a tag was copied. Runs after the seek header
/// step so the tag becomes the first bytes of the file.
pub fn copy_leading_tag<F: FrameFormat>(
    output: &Path,
    source: &Path,
    format: &F,
    rewriter: &AtomicRewriter,
    observer: &mut dyn MergeObserver,
) -> Result<Option<usize>> {
    let file = File::open(source).map_err(|e| MergeError::io(IoStage::OpenInput, source, e))?;
    let Some(tag) = format.leading_tag(file).map_err(|e| e.at_path(source))? else {
        debug!(source = %source.display(), "first input has no tag");
        return Ok(None);
    };

    observer.tag_added(tag.len());
    rewriter.prepend(output, &tag.raw_bytes)?;
    Ok(Some(tag.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Mp3Format;
    use crate::merge::observer::NoopObserver;
    use crate::test_fixtures::{audio_frame, id3v2_tag, write_mp3};
    use tempfile::tempdir;

    #[test]
    fn copies_tag_verbatim() {
        let dir = tempdir().unwrap();
        let tag = id3v2_tag(500);
        let source = write_mp3(dir.path(), "0.mp3", &[tag.clone(), audio_frame(128)]);
        let output = dir.path().join("out.mp3");
        std::fs::write(&output, b"frames").unwrap();

        let copied = copy_leading_tag(
            &output,
            &source,
            &Mp3Format::new(),
            &AtomicRewriter::default(),
            &mut NoopObserver,
        )
        .unwrap();
        assert_eq!(copied, Some(500));

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..500], tag.as_slice());
        assert_eq!(&bytes[500..], b"frames");
    }

    #[test]
    fn untagged_source_is_a_no_op() {
        let dir = tempdir().unwrap();
        let source = write_mp3(dir.path(), "0.mp3", &[audio_frame(128)]);
        let output = dir.path().join("out.mp3");
        std::fs::write(&output, b"frames").unwrap();

        let copied = copy_leading_tag(
            &output,
            &source,
            &Mp3Format::new(),
            &AtomicRewriter::default(),
            &mut NoopObserver,
        )
        .unwrap();
        assert!(copied.is_none());
        assert_eq!(std::fs::read(&output).unwrap(), b"frames");
    }
}

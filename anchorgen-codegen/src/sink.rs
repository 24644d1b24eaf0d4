//! The abstract "code sink" (§1, out of scope: "the target-language
//! pretty-printer / source-tree writer, treated as an abstract code sink
//! with method-chain style").
//!
//! Emitters build a [`CodeSink`] with chained `line`/`block`/`raw` calls and
//! finish it into a `String`; the generator collects one [`GeneratedFile`]
//! per output and only touches the filesystem once every file compiled
//! without error (§5, §6: "no partial output is committed").

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Relative to `<dst>/<snake_case_program_name>/`.
    pub relative_path: String,
    pub contents: String,
}

/// A minimal indentation-tracking string builder. Real Go source files are
/// built almost entirely from `format!`-style templates (see `structs.rs`,
/// `instruction.rs`); `CodeSink` exists for the handful of emitters that
/// build up a file by appending declarations one at a time (`dispatch.rs`,
/// `events.rs`).
#[derive(Debug, Default)]
pub struct CodeSink {
    buf: String,
    indent: usize,
}

impl CodeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        for _ in 0..self.indent {
            self.buf.push('\t');
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn raw(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(text.as_ref());
        self
    }

    pub fn indented(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.indent += 1;
        f(self);
        self.indent -= 1;
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Writes the given files under `dst/<program_dir>/`. The caller is
/// expected to have already collected every `GeneratedFile` successfully —
/// this function performs no validation and cannot leave a half-written
/// program directory from a *generation* failure, only from an IO failure
/// partway through the write loop itself (a narrower, unavoidable window
/// the spec's §5 "no resource is shared between generations" does not
/// claim to close).
pub fn write_files(dst: &Path, program_dir: &str, files: &[GeneratedFile]) -> std::io::Result<()> {
    let root = dst.join(program_dir);
    std::fs::create_dir_all(&root)?;
    for file in files {
        let path: PathBuf = root.join(&file.relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &file.contents)?;
    }
    Ok(())
}

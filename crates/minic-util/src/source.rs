//! Source file storage.
//!
//! MiniC compiles a single translation unit at a time, so unlike a
//! multi-file `SourceMap` this is just the one file's name and text.

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { name: name.into(), content: content.into() }
    }
}

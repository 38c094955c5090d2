//! Filesystem ingestion: walks a directory and extracts text from `.txt`,
//! `.pdf` and `.docx` files.
//!
//! Unreadable files are logged and skipped; only a missing root directory is
//! an error.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::traits::DocumentSource;
use crate::types::{DocType, Document};

pub struct DocumentLoader {
    data_dir: PathBuf,
}

impl DocumentLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn load_documents(&self) -> Result<Vec<Document>> {
        if !self.data_dir.is_dir() {
            return Err(Error::NotFound(format!("data directory {}", self.data_dir.display())));
        }
        let files = self.list_supported_files();
        let mut documents = Vec::with_capacity(files.len());
        for (path, doc_type) in files {
            match load_single_document(&path, doc_type) {
                Ok(Some(doc)) => documents.push(doc),
                Ok(None) => tracing::warn!(path = %path.display(), "no text extracted, skipping"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to load document, skipping"),
            }
        }
        tracing::info!(count = documents.len(), dir = %self.data_dir.display(), "loaded documents");
        Ok(documents)
    }

    fn list_supported_files(&self) -> Vec<(PathBuf, DocType)> {
        let mut files: Vec<(PathBuf, DocType)> = walkdir::WalkDir::new(&self.data_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let doc_type = e.path().extension().and_then(|s| s.to_str()).and_then(DocType::from_extension)?;
                Some((e.into_path(), doc_type))
            })
            .collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files
    }
}

impl DocumentSource for DocumentLoader {
    fn load(&self) -> Result<Vec<Document>> {
        self.load_documents()
    }
}

fn load_single_document(path: &Path, doc_type: DocType) -> Result<Option<Document>> {
    let source = path.to_string_lossy().to_string();
    let filename = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| source.clone());
    let mut extra = Vec::new();
    let content = match doc_type {
        DocType::Text => read_text_file(path)?,
        DocType::Pdf => read_pdf_file(path)?,
        DocType::Docx => {
            let (text, paragraphs) = read_docx_file(path)?;
            extra.push(("paragraphs", serde_json::Value::from(paragraphs)));
            text
        }
    };
    let content = content.trim();
    if content.is_empty() {
        return Ok(None);
    }
    let size = content.chars().count();
    let mut doc = Document::new(content, source, doc_type).with_meta("filename", filename).with_meta("size", size);
    for (key, value) in extra {
        doc = doc.with_meta(key, value);
    }
    Ok(Some(doc))
}

fn read_text_file(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}

#[cfg(feature = "pdf")]
fn read_pdf_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    // pdf-extract panics on some malformed files instead of returning an error.
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
        .map_err(|_| Error::ingestion(path.to_string_lossy(), "pdf parser panicked"))?;
    let text = extracted.map_err(|e| Error::ingestion(path.to_string_lossy(), e))?;
    Ok(text.replace('\0', ""))
}

#[cfg(not(feature = "pdf"))]
fn read_pdf_file(path: &Path) -> Result<String> {
    Err(Error::ingestion(path.to_string_lossy(), "built without the `pdf` feature"))
}

#[cfg(feature = "docx")]
fn read_docx_file(path: &Path) -> Result<(String, usize)> {
    let bytes = fs::read(path)?;
    let doc = docx_rs::read_docx(&bytes).map_err(|e| Error::ingestion(path.to_string_lossy(), e))?;
    let mut content = String::new();
    let mut paragraphs = 0usize;
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            paragraphs += 1;
            let mut line = String::new();
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            if !line.trim().is_empty() {
                content.push_str(&line);
                content.push('\n');
            }
        }
    }
    Ok((content, paragraphs))
}

#[cfg(not(feature = "docx"))]
fn read_docx_file(path: &Path) -> Result<(String, usize)> {
    Err(Error::ingestion(path.to_string_lossy(), "built without the `docx` feature"))
}

// src/analysis/document.rs
//! Text extraction from uploaded CV documents.
//!
//! Supports PDF (via pdf-extract), DOCX (via docx-rs) and a best-effort
//! salvage path for legacy binary DOC files. All extraction happens in
//! memory; nothing is written to disk.

use thiserror::Error;

/// Errors produced while turning a document into plain text.
///
/// Extraction failures are data-dependent: retrying the same bytes will
/// fail the same way, so callers must not retry automatically.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document format '{0}'")]
    Unsupported(String),
    #[error("failed to parse PDF document: {0}")]
    Pdf(#[from] pdf_extract::OutputError),
    #[error("failed to parse DOCX document: {0}")]
    Docx(String),
    #[error("document contained no extractable text")]
    Empty,
}

/// Declared format of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
}

impl DocumentFormat {
    /// Detect the declared format from the uploaded filename extension
    /// (case-insensitive). Anything outside PDF/DOC/DOCX is rejected.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "doc" => Ok(DocumentFormat::Doc),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ExtractError::Unsupported(if ext.is_empty() {
                filename.to_string()
            } else {
                ext
            })),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Doc => "doc",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Stateless text extraction service
#[derive(Debug, Clone, Default)]
pub struct CvAnalyzer;

impl CvAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Extract plain text from document bytes in the declared format.
    pub fn extract_text(&self, data: &[u8], format: DocumentFormat) -> Result<String, ExtractError> {
        let text = match format {
            DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(data)?,
            DocumentFormat::Docx => extract_text_from_docx(data)?,
            DocumentFormat::Doc => {
                // Plenty of ".doc" uploads are really OOXML containers with
                // the wrong extension; sniff before falling back to salvage.
                let looks_like_zip = infer::get(data)
                    .map(|kind| kind.mime_type() == "application/zip" || kind.extension() == "docx")
                    .unwrap_or(false);
                if looks_like_zip {
                    extract_text_from_docx(data)?
                } else {
                    salvage_doc_text(data)
                }
            }
        };

        if text.trim().is_empty() {
            return Err(ExtractError::Empty);
        }
        Ok(text.trim().to_string())
    }
}

/// Walk DOCX paragraphs and runs, collecting text in document order.
fn extract_text_from_docx(data: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            for para_child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = para_child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

/// Best-effort text salvage from a legacy binary DOC file.
///
/// Word 97 stores body text as UTF-16LE (or CP1252) runs inside an OLE2
/// container. Rather than parse the container, collect printable UTF-16LE
/// and ASCII runs and keep whichever recovered more.
fn salvage_doc_text(data: &[u8]) -> String {
    let ascii = salvage_printable_runs(data.iter().copied());
    let utf16 = salvage_printable_runs(
        data.chunks_exact(2)
            .map(|pair| if pair[1] == 0 { pair[0] } else { 0xff }),
    );

    if utf16.len() > ascii.len() {
        utf16
    } else {
        ascii
    }
}

fn salvage_printable_runs(bytes: impl Iterator<Item = u8>) -> String {
    const MIN_RUN: usize = 4;

    let mut out = String::new();
    let mut run = String::new();
    for b in bytes {
        if (0x20..0x7f).contains(&b) || b == b'\t' {
            run.push(b as char);
        } else {
            flush_run(&mut out, &mut run, MIN_RUN, b == b'\r' || b == b'\n');
        }
    }
    flush_run(&mut out, &mut run, MIN_RUN, false);
    out
}

fn flush_run(out: &mut String, run: &mut String, min_len: usize, newline: bool) {
    let trimmed = run.trim();
    // Short runs and runs without letters are binary noise
    if trimmed.len() >= min_len && trimmed.chars().any(|c| c.is_alphabetic()) {
        out.push_str(trimmed);
        out.push(if newline { '\n' } else { ' ' });
    }
    run.clear();
}

/// Builds a one-run-per-line DOCX in memory so extraction tests do not
/// need binary fixtures checked into the tree.
#[cfg(test)]
pub(crate) fn docx_fixture(lines: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run};

    let mut docx = Docx::new();
    for line in lines {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
    }
    let mut buf = Vec::new();
    docx.build()
        .pack(&mut std::io::Cursor::new(&mut buf))
        .expect("failed to build docx fixture");
    buf
}

/// Builds a minimal single-page PDF with one text-showing content stream.
/// Object offsets in the xref table are computed while writing, so the
/// fixture stays valid whatever text it carries.
#[cfg(test)]
pub(crate) fn pdf_fixture(text: &str) -> Vec<u8> {
    let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }
    let xref_at = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in &offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    out.into_bytes()
}

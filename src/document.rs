use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static PDF_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\bBT\b(.*?)\bET\b").unwrap());
static PDF_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]+)\)").unwrap());
static DOCX_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").unwrap());
static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s.,@:/+#()-]").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Declared content type of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
    Image,
}

/// Extension table backing `from_path`, and the user-facing list of what
/// the import command picks up.
pub const SUPPORTED_EXTENSIONS: &[(&str, DocumentKind)] = &[
    ("txt", DocumentKind::PlainText),
    ("text", DocumentKind::PlainText),
    ("md", DocumentKind::PlainText),
    ("pdf", DocumentKind::Pdf),
    ("doc", DocumentKind::Docx),
    ("docx", DocumentKind::Docx),
    ("png", DocumentKind::Image),
    ("jpg", DocumentKind::Image),
    ("jpeg", DocumentKind::Image),
    ("gif", DocumentKind::Image),
    ("webp", DocumentKind::Image),
    ("bmp", DocumentKind::Image),
    ("tif", DocumentKind::Image),
    ("tiff", DocumentKind::Image),
];

impl DocumentKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        // Parameters like "; charset=utf-8" are ignored
        let mime = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match mime.as_str() {
            "text/plain" | "text/markdown" => Some(Self::PlainText),
            "application/pdf" => Some(Self::Pdf),
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            m if m.starts_with("image/") => Some(Self::Image),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        SUPPORTED_EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, kind)| *kind)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Image => "image",
        }
    }
}

/// Failures at the extraction boundary. Everything past this point degrades
/// to empty fields instead of erroring.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("unsupported content type: {0}")]
    Unsupported(String),
    #[error("image input needs OCR, which is not implemented")]
    OcrUnavailable,
}

/// Resolve the document kind from an explicitly declared MIME type, falling
/// back to the file extension.
pub fn detect(path: &Path, declared: Option<&str>) -> Result<DocumentKind, ExtractError> {
    if let Some(mime) = declared {
        return DocumentKind::from_mime(mime)
            .ok_or_else(|| ExtractError::Unsupported(mime.to_string()));
    }
    DocumentKind::from_path(path)
        .ok_or_else(|| ExtractError::Unsupported(path.display().to_string()))
}

/// Best-effort plain text from a raw file buffer. Per-format heuristics, not
/// real parsers: PDF and DOCX are scraped with regex passes and fall back to
/// stripping unprintable characters from the whole buffer.
pub fn extract_text(buffer: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(buffer).into_owned()),
        DocumentKind::Pdf => Ok(scrape_pdf(&String::from_utf8_lossy(buffer))),
        DocumentKind::Docx => Ok(scrape_docx(&String::from_utf8_lossy(buffer))),
        DocumentKind::Image => Err(ExtractError::OcrUnavailable),
    }
}

/// Two independent passes: BT..ET text-object blocks, then parenthesized
/// string literals. All matches are concatenated in scan order.
fn scrape_pdf(decoded: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for caps in PDF_BLOCK_RE.captures_iter(decoded) {
        let inner = caps[1].trim();
        if !inner.is_empty() {
            parts.push(inner.to_string());
        }
    }
    for caps in PDF_LITERAL_RE.captures_iter(decoded) {
        let literal = caps[1].trim();
        if !literal.is_empty() {
            parts.push(literal.to_string());
        }
    }

    let joined = parts.join(" ");
    if joined.trim().is_empty() {
        strip_fallback(decoded)
    } else {
        joined
    }
}

/// Collect <w:t> run contents. A real .docx is a ZIP, so this only works on
/// unpacked document XML; anything else hits the fallback.
fn scrape_docx(decoded: &str) -> String {
    let runs: Vec<&str> = DOCX_RUN_RE
        .captures_iter(decoded)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
        .collect();

    if runs.is_empty() {
        strip_fallback(decoded)
    } else {
        runs.join(" ")
    }
}

/// Last resort: drop everything but word characters, whitespace and basic
/// punctuation, then collapse horizontal whitespace runs.
fn strip_fallback(decoded: &str) -> String {
    let stripped = STRIP_RE.replace_all(decoded, " ");
    SPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passthrough() {
        let input = "John Smith\njohn@example.com\n";
        let out = extract_text(input.as_bytes(), DocumentKind::PlainText).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn pdf_text_object_blocks() {
        let pdf = "junk BT /F1 12 Tf (John Smith) Tj ET junk";
        let out = extract_text(pdf.as_bytes(), DocumentKind::Pdf).unwrap();
        assert!(out.contains("John Smith"));
    }

    #[test]
    fn pdf_parenthesized_literals() {
        let pdf = "stream (Jane Doe) more (jane@mail.com) endstream";
        let out = extract_text(pdf.as_bytes(), DocumentKind::Pdf).unwrap();
        assert!(out.contains("Jane Doe"));
        assert!(out.contains("jane@mail.com"));
    }

    #[test]
    fn pdf_fallback_strips_noise() {
        let pdf = "%%\u{1}\u{2}John\u{3} Smith\u{4}%%";
        let out = extract_text(pdf.as_bytes(), DocumentKind::Pdf).unwrap();
        assert!(out.contains("John"));
        assert!(out.contains("Smith"));
        assert!(!out.contains('\u{1}'));
    }

    #[test]
    fn pdf_fallback_keeps_parenthesized_text() {
        // Unbalanced paren, so the literal pass cannot match and the
        // strip fallback runs
        let pdf = "\u{1}(Acme \u{2}Corp";
        let out = extract_text(pdf.as_bytes(), DocumentKind::Pdf).unwrap();
        assert_eq!(out, "(Acme Corp");
    }

    #[test]
    fn docx_runs_joined() {
        let xml = r#"<w:p><w:r><w:t>John</w:t></w:r><w:r><w:t xml:space="preserve">Smith</w:t></w:r></w:p>"#;
        let out = extract_text(xml.as_bytes(), DocumentKind::Docx).unwrap();
        assert_eq!(out, "John Smith");
    }

    #[test]
    fn docx_without_runs_falls_back() {
        let out = extract_text(b"plain words only", DocumentKind::Docx).unwrap();
        assert_eq!(out, "plain words only");
    }

    #[test]
    fn image_is_unsupported() {
        let err = extract_text(b"\x89PNG", DocumentKind::Image).unwrap_err();
        assert!(matches!(err, ExtractError::OcrUnavailable));
    }

    #[test]
    fn kind_from_mime() {
        assert_eq!(DocumentKind::from_mime("text/plain; charset=utf-8"), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_mime("application/pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_mime("image/png"), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::from_mime("application/zip"), None);
    }

    #[test]
    fn kind_from_path() {
        assert_eq!(DocumentKind::from_path(Path::new("cv.PDF")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("cv.docx")), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_path(Path::new("notes.txt")), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_path(Path::new("archive.zip")), None);
        assert_eq!(DocumentKind::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn every_listed_extension_is_detected() {
        for (ext, kind) in SUPPORTED_EXTENSIONS {
            let path = format!("resume.{ext}");
            assert_eq!(DocumentKind::from_path(Path::new(&path)), Some(*kind));
        }
    }

    #[test]
    fn detect_prefers_declared_mime() {
        let kind = detect(Path::new("resume.bin"), Some("application/pdf")).unwrap();
        assert_eq!(kind, DocumentKind::Pdf);
        let err = detect(Path::new("resume.bin"), None).unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported(_)));
    }

    #[test]
    fn arbitrary_bytes_never_panic() {
        let bytes: Vec<u8> = (0..=255).collect();
        for kind in [DocumentKind::PlainText, DocumentKind::Pdf, DocumentKind::Docx] {
            let _ = extract_text(&bytes, kind).unwrap();
        }
    }
}

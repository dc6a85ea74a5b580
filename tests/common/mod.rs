/*!
 * Common test utilities for the corroborate test suite
 */

use std::path::PathBuf;
use std::fs;
use std::io::Write;
use anyhow::Result;
use tempfile::TempDir;
use zip::write::{FileOptions, ZipWriter};

/// Initializes logging for tests that want to inspect log output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample transcript text file for testing
pub fn create_test_transcript(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "step out of the vehicle please\n\
                   have you been drinking tonight\n\
                   i only had one beer\n";
    create_test_file(dir, filename, content)
}

/// Creates a minimal DOCX file containing the given paragraphs
pub fn create_test_docx(dir: &PathBuf, filename: &str, paragraphs: &[&str]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    let file = fs::File::create(&file_path)?;
    let mut zip = ZipWriter::new(file);

    zip.start_file::<_, ()>("[Content_Types].xml", FileOptions::default())?;
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#)?;

    zip.start_file::<_, ()>("_rels/.rels", FileOptions::default())?;
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#)?;

    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    zip.start_file::<_, ()>("word/document.xml", FileOptions::default())?;
    zip.write_all(document.as_bytes())?;

    zip.finish()?;
    Ok(file_path)
}

use super::guard_parser;

/// Extracts text page by page and joins pages with a newline.
///
/// Pages without a text layer contribute an empty string, so the page count is
/// preserved in the output. `pdf-extract` can panic on malformed input; that is
/// reported as an error like any other parse failure.
pub fn extract_pdf(content: &[u8]) -> Result<String, String> {
    let pages = guard_parser("PDF", || {
        pdf_extract::extract_text_from_mem_by_pages(content)
            .map_err(|e| format!("invalid PDF: {e}"))
    })?;

    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

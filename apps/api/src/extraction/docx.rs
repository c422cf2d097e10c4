use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::guard_parser;

/// Reads top-level body paragraphs in document order, one line per paragraph.
/// Table cells, headers and footers are not included.
pub fn extract_docx(content: &[u8]) -> Result<String, String> {
    let docx = guard_parser("DOCX", || {
        docx_rs::read_docx(content).map_err(|e| format!("invalid DOCX: {e}"))
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        push_paragraph_child(child, &mut text);
    }
    text
}

fn push_paragraph_child(child: &ParagraphChild, out: &mut String) {
    match child {
        ParagraphChild::Run(run) => {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => out.push_str(&t.text),
                    RunChild::Tab(_) => out.push('\t'),
                    RunChild::Break(_) => out.push('\n'),
                    _ => {}
                }
            }
        }
        ParagraphChild::Hyperlink(link) => {
            for nested in &link.children {
                push_paragraph_child(nested, out);
            }
        }
        _ => {}
    }
}

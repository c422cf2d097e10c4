/// Best-effort UTF-8 decode that never fails. Invalid byte sequences are
/// dropped rather than replaced; characters that were validly encoded,
/// U+FFFD included, are kept.
pub fn decode_lossy(content: &[u8]) -> String {
    content.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

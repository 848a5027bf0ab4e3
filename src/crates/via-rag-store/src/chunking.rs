//! Word-based overlapping chunker, ported from `rag_service.py`'s
//! `chunk_text`: normalizes whitespace, then strides over the word list
//! `chunk_size - chunk_overlap` words at a time.

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

pub fn chunk_text(content: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let normalized = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Vec::new();
    }
    let words: Vec<&str> = normalized.split(' ').collect();
    let stride = chunk_size.saturating_sub(chunk_overlap).max(1);

    let mut chunks = Vec::new();
    let mut i = 0;
    loop {
        let end = (i + chunk_size).min(words.len());
        let chunk = words[i..end].join(" ");
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        if i + chunk_size >= words.len() {
            break;
        }
        i += stride;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_short_text_into_a_single_chunk() {
        let chunks = chunk_text("the quick brown fox", 500, 50);
        assert_eq!(chunks, vec!["the quick brown fox".to_string()]);
    }

    #[test]
    fn chunks_long_text_with_overlap() {
        let words: Vec<String> = (0..1200).map(|i| i.to_string()).collect();
        let text = words.join(" ");
        let chunks = chunk_text(&text, 500, 50);
        assert!(chunks.len() >= 2);
        // consecutive chunks share the last 50 words / first 50 words overlap
        let first_words: Vec<&str> = chunks[0].split(' ').collect();
        let second_words: Vec<&str> = chunks[1].split(' ').collect();
        assert_eq!(first_words[450], second_words[0]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("   ", 500, 50).is_empty());
    }
}

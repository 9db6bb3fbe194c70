//! Byte-oriented word splitting.
//!
//! A word is a maximal run of ASCII letters and apostrophes; everything else
//! is a separator. Words are lowercased on extraction. This is deliberately
//! not a linguistic tokenizer; the frequency tables it feeds are compared
//! byte-for-byte across implementations.

/// 単語を構成するバイトかどうかを判定します
#[inline]
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'\''
}

/// テキストから単語を順に取り出すイテレータ
/// 取り出した単語は小文字化されます
pub struct Words<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Words<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        // skip separators
        let mut start = 0;
        while start < self.rest.len() && !is_word_byte(self.rest[start]) {
            start += 1;
        }
        if start >= self.rest.len() {
            self.rest = &[];
            return None;
        }

        let mut end = start;
        while end < self.rest.len() && is_word_byte(self.rest[end]) {
            end += 1;
        }

        let word = self.rest[start..end]
            .iter()
            .map(|&b| b.to_ascii_lowercase() as char)
            .collect();
        self.rest = &self.rest[end..];
        Some(word)
    }
}

/// テキストの単語イテレータを作成します
///
/// # Arguments
/// * `text` - 入力テキスト
pub fn words(text: &str) -> Words<'_> {
    Words {
        rest: text.as_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<String> {
        words(text).collect()
    }

    #[test]
    fn splits_on_non_letters_and_lowercases() {
        assert_eq!(
            collect("Hello, World! 42 times"),
            vec!["hello", "world", "times"]
        );
    }

    #[test]
    fn keeps_apostrophes_inside_words() {
        assert_eq!(collect("don't stop"), vec!["don't", "stop"]);
    }

    #[test]
    fn empty_and_separator_only_input_yield_nothing() {
        assert_eq!(collect(""), Vec::<String>::new());
        assert_eq!(collect("  \t\n 123 ---"), Vec::<String>::new());
    }

    #[test]
    fn non_ascii_bytes_are_separators() {
        // multi-byte sequences never satisfy is_word_byte, so they split words
        assert_eq!(collect("caféteria"), vec!["caf", "teria"]);
    }
}
